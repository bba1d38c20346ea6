//! Event alignment and labeling for the news-labeler system.
//!
//! This crate provides:
//! - Anchor/target alignment of news events against daily price series
//! - Three-way labeling of the relative change
//! - Skip-reason and success accounting
//! - Sequential and parallel runs with identical results

pub mod aligner;
pub mod label;
pub mod stats;

pub use aligner::{Aligner, AlignmentRun, EventOutcome, SeriesLookup, SkipReason};
pub use label::{label_for, relative_change, LabelCounts};
pub use stats::RunStats;
