//! Discretization of relative price changes.

use newslabel_core::{AlignmentResult, Label};
use serde::{Deserialize, Serialize};
use std::fmt;

/// (target - anchor) / anchor.
#[inline]
pub fn relative_change(anchor: f64, target: f64) -> f64 {
    (target - anchor) / anchor
}

/// `Up` when `r >= threshold`, `Down` when `r <= -threshold`, `Flat` otherwise.
#[inline]
pub fn label_for(r: f64, threshold: f64) -> Label {
    if r >= threshold {
        Label::Up
    } else if r <= -threshold {
        Label::Down
    } else {
        Label::Flat
    }
}

/// Label distribution of a set of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub up: u64,
    pub flat: u64,
    pub down: u64,
}

impl LabelCounts {
    pub fn from_results(results: &[AlignmentResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            counts.add(result.label);
        }
        counts
    }

    pub fn add(&mut self, label: Label) {
        match label {
            Label::Up => self.up += 1,
            Label::Flat => self.flat += 1,
            Label::Down => self.down += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.up + self.flat + self.down
    }
}

impl fmt::Display for LabelCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+1: {}, 0: {}, -1: {}", self.up, self.flat, self.down)
    }
}
