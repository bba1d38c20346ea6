//! Ordered daily price series with nearest-day and at-or-after lookups.

use crate::error::{Error, Result};
use crate::types::{Day, Observation};

/// One symbol's observations, strictly increasing by date.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesIndex {
    symbol: String,
    observations: Vec<Observation>,
}

impl SeriesIndex {
    /// Build an index from observations that are already strictly increasing by date.
    ///
    /// Unsorted input and duplicate dates are rejected.
    pub fn new(symbol: impl Into<String>, observations: Vec<Observation>) -> Result<Self> {
        let symbol = symbol.into();
        if let Some(w) = observations.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(Error::data(format!(
                "{symbol}: dates must be strictly increasing ({} followed by {})",
                w[0].date, w[1].date
            )));
        }
        Ok(Self {
            symbol,
            observations,
        })
    }

    /// Symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observation at a position.
    pub fn get(&self, pos: usize) -> Option<&Observation> {
        self.observations.get(pos)
    }

    /// All observations in date order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// First trading day.
    pub fn first_date(&self) -> Option<Day> {
        self.observations.first().map(|o| o.date)
    }

    /// Last trading day.
    pub fn last_date(&self) -> Option<Day> {
        self.observations.last().map(|o| o.date)
    }

    /// Smallest index whose date is >= `day` (may equal `len()`).
    #[inline]
    fn insertion_point(&self, day: Day) -> usize {
        self.observations.partition_point(|o| o.date < day)
    }

    /// Position of the observation nearest to `day`.
    ///
    /// Days before the first observation clamp to 0 and days after the last
    /// clamp to `len() - 1`. When `day` is equidistant from the observations on
    /// either side, the earlier one wins.
    pub fn nearest_anchor(&self, day: Day) -> Result<usize> {
        if self.is_empty() {
            return Err(Error::empty_series(self.symbol.as_str()));
        }

        let pos = self.insertion_point(day);
        if pos == 0 {
            return Ok(0);
        }
        if pos == self.len() {
            return Ok(self.len() - 1);
        }

        let prev = self.observations[pos - 1].date;
        let next = self.observations[pos].date;
        let to_prev = (day - prev).num_days().abs();
        let to_next = (next - day).num_days().abs();

        if to_prev <= to_next {
            Ok(pos - 1)
        } else {
            Ok(pos)
        }
    }

    /// Position of the first observation on or after `day`.
    ///
    /// Returns `None` when every observation precedes `day`; never clamps.
    pub fn target_at_or_after(&self, day: Day) -> Option<usize> {
        let pos = self.insertion_point(day);
        (pos < self.len()).then_some(pos)
    }
}
