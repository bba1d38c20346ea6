//! Window scoring pipeline: normalize, score titles, summarize.

use crate::histogram::Histogram;
use crate::sentiment::{SentimentModel, SentimentScorer};
use crate::zscore::normalize_windows;
use newslabel_core::{PriceWindow, Result, ScoredWindow};
use tracing::info;

/// Normalized, scored rows plus the score distribution.
#[derive(Debug, Clone)]
pub struct ScoredDataset {
    pub rows: Vec<ScoredWindow>,
    /// Rows dropped for non-finite z-scores.
    pub dropped: usize,
    pub histogram: Histogram,
}

/// Z-score every window, drop invalid rows, then score the remaining titles.
///
/// Rows are dropped before scoring so the model never sees them.
pub fn score_windows<M: SentimentModel>(
    windows: Vec<PriceWindow>,
    scorer: &SentimentScorer<M>,
    bins: usize,
) -> Result<ScoredDataset> {
    let normalized = normalize_windows(windows);
    let mut rows = normalized.rows;
    scorer.score_windows(&mut rows)?;

    let scores: Vec<f64> = rows.iter().filter_map(|r| r.sentiment).collect();
    let histogram = Histogram::compute(&scores, bins);
    info!(counts = ?histogram.counts, "Sentiment histogram");
    info!(edges = ?histogram.edges, "Sentiment histogram bin edges");

    Ok(ScoredDataset {
        rows,
        dropped: normalized.dropped,
        histogram,
    })
}
