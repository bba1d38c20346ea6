//! Core types and configuration for the news-labeler system.
//!
//! This crate provides shared types used across all other crates:
//! - Price observations, events and labels
//! - The searchable per-symbol price series (`SeriesIndex`)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod series;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use series::SeriesIndex;
pub use types::*;
