//! Equal-width histogram of a score distribution.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Bin counts and the `bins + 1` edges bounding them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: Vec<u64>,
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Bin finite values into `bins` equal-width bins over [min, max].
    ///
    /// Every bin is half-open except the last, which includes `max`. A range
    /// of zero width is widened to [v - 0.5, v + 0.5]; no values gives [0, 1].
    /// Non-finite values are ignored.
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite = || values.iter().copied().filter(|v| v.is_finite());

        let lo = finite().map(OrderedFloat).min().map(|v| v.0);
        let hi = finite().map(OrderedFloat).max().map(|v| v.0);
        let (lo, hi) = match (lo, hi) {
            (Some(lo), Some(hi)) if lo < hi => (lo, hi),
            (Some(v), Some(_)) => (v - 0.5, v + 0.5),
            _ => (0.0, 1.0),
        };

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0u64; bins];
        for v in finite() {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { counts, edges }
    }

    /// Number of values binned.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
