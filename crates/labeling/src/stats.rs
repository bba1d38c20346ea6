//! Per-run outcome counters.

use crate::aligner::{EventOutcome, SkipReason};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Why events were skipped and how many were labeled.
///
/// Counters only grow; partial tallies from parallel workers merge by
/// field-wise addition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Symbol missing from the price book, or its series empty.
    pub no_ticker: u64,
    /// Anchor lookup out of range.
    pub no_anchor: u64,
    /// No observation at or after the horizon day.
    pub no_target_after: u64,
    /// Events labeled.
    pub success: u64,
}

impl RunStats {
    /// Count one event outcome. Invalid prices are not counted.
    pub fn record(&mut self, outcome: &EventOutcome) {
        match outcome {
            EventOutcome::Aligned(_) => self.success += 1,
            EventOutcome::Skipped(SkipReason::NoTicker) => self.no_ticker += 1,
            EventOutcome::Skipped(SkipReason::NoAnchor) => self.no_anchor += 1,
            EventOutcome::Skipped(SkipReason::NoTargetAfter) => self.no_target_after += 1,
            EventOutcome::Skipped(SkipReason::InvalidPrice) => {}
        }
    }

    /// Events skipped for a counted reason.
    pub fn skipped(&self) -> u64 {
        self.no_ticker + self.no_anchor + self.no_target_after
    }

    /// All counted events.
    pub fn total(&self) -> u64 {
        self.skipped() + self.success
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, other: Self) {
        self.no_ticker += other.no_ticker;
        self.no_anchor += other.no_anchor;
        self.no_target_after += other.no_target_after;
        self.success += other.success;
    }
}

impl Add for RunStats {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "no_ticker: {}", self.no_ticker)?;
        writeln!(f, "no_anchor: {}", self.no_anchor)?;
        writeln!(f, "no_target_after: {}", self.no_target_after)?;
        write!(f, "success: {}", self.success)
    }
}
