//! Feature computation for the news-labeler system.
//!
//! This crate handles:
//! - Per-row z-score normalization of price windows
//! - Sentiment scoring through an external classifier, in batches
//! - Histograms of score distributions
//! - The scoring pipeline that chains the three

pub mod histogram;
pub mod pipeline;
pub mod sentiment;
pub mod zscore;

pub use histogram::Histogram;
pub use pipeline::{score_windows, ScoredDataset};
pub use sentiment::{SentimentModel, SentimentScorer};
pub use zscore::{normalize_windows, row_zscores, NormalizedWindows};
