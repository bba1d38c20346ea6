//! Per-row z-score normalization.
//!
//! Each window is standardized against its own mean and population standard
//! deviation. Rows whose z-scores are not all finite (flat windows, NaN input)
//! are dropped.

use newslabel_core::{PriceWindow, ScoredWindow};
use statrs::statistics::Statistics;
use tracing::info;

/// Windows that survived normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizedWindows {
    /// Normalized rows, unscored.
    pub rows: Vec<ScoredWindow>,
    /// Rows dropped for non-finite z-scores.
    pub dropped: usize,
}

/// Z-scores of a row against its own mean and population standard deviation.
pub fn row_zscores(values: &[f64]) -> Vec<f64> {
    let mean = values.mean();
    let std_dev = values.population_std_dev();
    values.iter().map(|v| (v - mean) / std_dev).collect()
}

/// Normalize every window, dropping rows with NaN or infinite z-scores.
pub fn normalize_windows(windows: Vec<PriceWindow>) -> NormalizedWindows {
    let mut out = NormalizedWindows::default();
    for window in windows {
        let zscores = row_zscores(&window.values);
        if zscores.iter().all(|z| z.is_finite()) {
            out.rows.push(ScoredWindow {
                title: window.title,
                sentiment: None,
                zscores,
            });
        } else {
            out.dropped += 1;
        }
    }

    if out.dropped > 0 {
        info!(dropped = out.dropped, "Dropping rows with invalid z-scores (NaN/inf)");
    }
    info!(remaining = out.rows.len(), "Remaining valid rows");
    out
}
