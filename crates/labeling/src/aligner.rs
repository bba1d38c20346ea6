//! Event-to-price-series alignment.
//!
//! Each event passes through a fixed sequence of gates:
//! resolve series → anchor → target → price guard → label.
//! The first gate that fails ends the event with a skip reason. Events never
//! influence each other, so runs can be split across threads and merged.

use crate::label::{label_for, relative_change};
use crate::stats::RunStats;
use chrono::Duration;
use newslabel_core::config::AlignerConfig;
use newslabel_core::{AlignmentResult, Event, Result, SeriesIndex};
use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::{debug, info, trace};

/// Read access to per-symbol price series.
pub trait SeriesLookup {
    fn series(&self, symbol: &str) -> Option<&SeriesIndex>;
}

impl<S: BuildHasher> SeriesLookup for HashMap<String, SeriesIndex, S> {
    fn series(&self, symbol: &str) -> Option<&SeriesIndex> {
        self.get(symbol)
    }
}

/// Why an event produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Symbol has no series, or an empty one.
    NoTicker,
    /// Anchor lookup fell outside the series.
    NoAnchor,
    /// No observation on or after the horizon day.
    NoTargetAfter,
    /// Anchor value zero, or either value NaN. Not counted in `RunStats`.
    InvalidPrice,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NoTicker => "no_ticker",
            SkipReason::NoAnchor => "no_anchor",
            SkipReason::NoTargetAfter => "no_target_after",
            SkipReason::InvalidPrice => "invalid_price",
        }
    }
}

/// Result of aligning a single event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Aligned(AlignmentResult),
    Skipped(SkipReason),
}

/// Results of a run, in event order, with their counters.
#[derive(Debug, Clone, Default)]
pub struct AlignmentRun {
    pub results: Vec<AlignmentResult>,
    pub stats: RunStats,
}

impl AlignmentRun {
    /// Count an outcome and keep its result.
    pub fn record(&mut self, outcome: EventOutcome) {
        self.stats.record(&outcome);
        if let EventOutcome::Aligned(result) = outcome {
            self.results.push(result);
        }
    }

    /// Append a later part of the same run.
    pub fn append(&mut self, mut other: AlignmentRun) {
        self.results.append(&mut other.results);
        self.stats += other.stats;
    }
}

/// Aligns events against price series and labels the move over the horizon.
#[derive(Debug, Clone)]
pub struct Aligner {
    config: AlignerConfig,
    horizon: Duration,
}

impl Aligner {
    /// Create an aligner; the configuration is validated.
    pub fn new(config: AlignerConfig) -> Result<Self> {
        config.validate()?;
        let horizon = Duration::days(config.horizon_days);
        Ok(Self { config, horizon })
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Run one event through every gate.
    pub fn align_event<L: SeriesLookup + ?Sized>(&self, event: &Event, lookup: &L) -> EventOutcome {
        let series = match lookup.series(&event.symbol) {
            Some(series) if !series.is_empty() => series,
            _ => return EventOutcome::Skipped(SkipReason::NoTicker),
        };

        // `nearest_anchor` clamps into a non-empty series, so this gate only
        // fires if the series and its index disagree.
        let anchor = series
            .nearest_anchor(event.date)
            .ok()
            .and_then(|pos| series.get(pos).map(|obs| (pos, obs)));
        let Some((anchor_pos, anchor)) = anchor else {
            return EventOutcome::Skipped(SkipReason::NoAnchor);
        };

        let target = event
            .date
            .checked_add_signed(self.horizon)
            .and_then(|day| series.target_at_or_after(day))
            .and_then(|pos| series.get(pos).map(|obs| (pos, obs)));
        let Some((target_pos, target)) = target else {
            return EventOutcome::Skipped(SkipReason::NoTargetAfter);
        };

        let anchor_value = anchor.field(self.config.anchor_field);
        let target_value = target.field(self.config.target_field);
        if anchor_value == 0.0 || anchor_value.is_nan() || target_value.is_nan() {
            trace!(
                symbol = %event.symbol,
                date = %event.date,
                anchor_value,
                target_value,
                "Invalid reference price, skipping"
            );
            return EventOutcome::Skipped(SkipReason::InvalidPrice);
        }

        let r = relative_change(anchor_value, target_value);
        EventOutcome::Aligned(AlignmentResult {
            title: event.title.clone(),
            symbol: event.symbol.clone(),
            event_date: event.date,
            anchor_pos,
            target_pos,
            anchor_date: anchor.date,
            target_date: target.date,
            anchor_value,
            target_value,
            relative_change: r,
            label: label_for(r, self.config.threshold),
        })
    }

    /// Align events one after another.
    pub fn run<L: SeriesLookup + ?Sized>(&self, events: &[Event], lookup: &L) -> AlignmentRun {
        let interval = self.config.progress_interval;
        let mut run = AlignmentRun::default();

        for event in events {
            let before = run.stats.success;
            run.record(self.align_event(event, lookup));

            let success = run.stats.success;
            if interval > 0 && success != before && success % interval == 0 {
                info!(
                    no_ticker = run.stats.no_ticker,
                    no_anchor = run.stats.no_anchor,
                    no_target_after = run.stats.no_target_after,
                    success,
                    "Interim stats"
                );
            }
        }

        info!(events = events.len(), labeled = run.results.len(), "Alignment finished");
        run
    }

    /// Align events in parallel chunks.
    ///
    /// Produces the same results, in the same order, and the same counters as
    /// [`Aligner::run`].
    pub fn run_parallel<L: SeriesLookup + Sync + ?Sized>(
        &self,
        events: &[Event],
        lookup: &L,
    ) -> AlignmentRun {
        let parts: Vec<AlignmentRun> = events
            .par_chunks(self.config.chunk_size)
            .enumerate()
            .map(|(chunk, batch)| {
                let mut part = AlignmentRun::default();
                for event in batch {
                    part.record(self.align_event(event, lookup));
                }
                debug!(chunk, events = batch.len(), success = part.stats.success, "Chunk aligned");
                part
            })
            .collect();

        let mut run = AlignmentRun::default();
        for part in parts {
            run.append(part);
        }

        info!(
            events = events.len(),
            labeled = run.results.len(),
            chunks = events.len().div_ceil(self.config.chunk_size),
            "Parallel alignment finished"
        );
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use newslabel_core::{Day, Label, Observation, PriceField};

    fn day(d: u32) -> Day {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn obs(date: Day, open: f64, close: f64) -> Observation {
        Observation {
            date,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
        }
    }

    /// d0 = Jan 4, d1 = Jan 5 (Friday), d4 = Jan 8 (Monday).
    fn scenario_book() -> HashMap<String, SeriesIndex> {
        let series = SeriesIndex::new(
            "AAA",
            vec![
                obs(day(4), 10.0, 10.0),
                obs(day(5), 11.0, 11.0),
                obs(day(8), 20.0, 20.0),
            ],
        )
        .unwrap();
        HashMap::from([("AAA".to_string(), series)])
    }

    fn aligner() -> Aligner {
        Aligner::new(AlignerConfig::default()).unwrap()
    }

    fn aligned(outcome: EventOutcome) -> AlignmentResult {
        match outcome {
            EventOutcome::Aligned(result) => result,
            EventOutcome::Skipped(reason) => panic!("skipped: {}", reason.as_str()),
        }
    }

    #[test]
    fn test_horizon_crosses_weekend() {
        let book = scenario_book();
        let result = aligned(aligner().align_event(&Event::new("A", "AAA", day(5)), &book));

        assert_eq!(result.anchor_pos, 1);
        assert_eq!(result.target_pos, 2);
        assert_eq!(result.anchor_value, 11.0);
        assert_eq!(result.target_value, 20.0);
        assert_relative_eq!(result.relative_change, 9.0 / 11.0, epsilon = 1e-12);
        assert_eq!(result.label, Label::Up);
    }

    #[test]
    fn test_target_is_first_day_on_or_after_horizon() {
        let book = scenario_book();
        let result = aligned(aligner().align_event(&Event::new("B", "AAA", day(4)), &book));

        assert_eq!(result.anchor_pos, 0);
        assert_eq!(result.anchor_value, 10.0);
        assert_eq!(result.target_date, day(8));
        assert_relative_eq!(result.relative_change, 1.0);
        assert_eq!(result.label, Label::Up);
    }

    #[test]
    fn test_no_target_past_end_of_history() {
        let book = scenario_book();
        let aligner = aligner();
        let event = Event::new("C", "AAA", day(8));

        assert_eq!(
            aligner.align_event(&event, &book),
            EventOutcome::Skipped(SkipReason::NoTargetAfter)
        );
        let run = aligner.run(&[event], &book);
        assert_eq!(run.stats.no_target_after, 1);
        assert!(run.results.is_empty());
    }

    #[test]
    fn test_unknown_or_empty_symbol() {
        let mut book = scenario_book();
        book.insert("EMPTY".to_string(), SeriesIndex::new("EMPTY", vec![]).unwrap());
        let events = vec![
            Event::new("D", "ZZZ", day(5)),
            Event::new("D2", "EMPTY", day(5)),
            Event::new("D3", "", day(5)),
        ];

        let run = aligner().run(&events, &book);
        assert_eq!(run.stats.no_ticker, 3);
        assert_eq!(run.stats.success, 0);
        assert!(run.results.is_empty());
    }

    #[test]
    fn test_zero_anchor_price_skipped_silently() {
        let series = SeriesIndex::new(
            "ZERO",
            vec![obs(day(4), 0.0, 10.0), obs(day(8), 12.0, 12.0)],
        )
        .unwrap();
        let book = HashMap::from([("ZERO".to_string(), series)]);
        let aligner = aligner();
        let event = Event::new("E", "ZERO", day(4));

        assert_eq!(
            aligner.align_event(&event, &book),
            EventOutcome::Skipped(SkipReason::InvalidPrice)
        );
        let run = aligner.run(&[event], &book);
        assert_eq!(run.stats, RunStats::default());
        assert!(run.results.is_empty());
    }

    #[test]
    fn test_nan_target_price_skipped() {
        let series = SeriesIndex::new(
            "NAN",
            vec![obs(day(4), 10.0, 10.0), obs(day(8), 12.0, f64::NAN)],
        )
        .unwrap();
        let book = HashMap::from([("NAN".to_string(), series)]);
        assert_eq!(
            aligner().align_event(&Event::new("E", "NAN", day(4)), &book),
            EventOutcome::Skipped(SkipReason::InvalidPrice)
        );
    }

    #[test]
    fn test_event_before_history_anchors_on_first_day() {
        let book = scenario_book();
        let result = aligned(aligner().align_event(&Event::new("early", "AAA", day(1)), &book));
        assert_eq!(result.anchor_pos, 0);
        // Jan 1 + 3 = Jan 4, which exists.
        assert_eq!(result.target_pos, 0);
        assert_eq!(result.label, Label::Flat);
    }

    #[test]
    fn test_out_of_range_events_clamp_instead_of_losing_anchor() {
        let book = scenario_book();
        let aligner = aligner();
        let dates = [
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            day(1),
            day(31),
            NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        ];
        let mut stats = RunStats::default();
        for date in dates {
            let outcome = aligner.align_event(&Event::new("far", "AAA", date), &book);
            assert_ne!(outcome, EventOutcome::Skipped(SkipReason::NoAnchor), "{date}");
            stats.record(&outcome);
        }
        assert_eq!(stats.no_anchor, 0);
        // Early events anchor on Jan 4; late ones have no target after the end.
        assert_eq!(stats.success, 2);
        assert_eq!(stats.no_target_after, 2);
    }

    #[test]
    fn test_fields_and_threshold_follow_config() {
        let book = scenario_book();
        let config = AlignerConfig {
            horizon_days: 0,
            threshold: 0.5,
            anchor_field: PriceField::Close,
            target_field: PriceField::Close,
            ..Default::default()
        };
        let aligner = Aligner::new(config).unwrap();

        // Same-day anchor and target: r = 0.
        let result = aligned(aligner.align_event(&Event::new("same", "AAA", day(5)), &book));
        assert_eq!(result.anchor_pos, result.target_pos);
        assert_eq!(result.label, Label::Flat);
    }

    #[test]
    fn test_down_label() {
        let series = SeriesIndex::new(
            "DN",
            vec![obs(day(4), 100.0, 100.0), obs(day(8), 90.0, 95.0)],
        )
        .unwrap();
        let book = HashMap::from([("DN".to_string(), series)]);
        let result = aligned(aligner().align_event(&Event::new("dn", "DN", day(4)), &book));
        assert_relative_eq!(result.relative_change, -0.05, epsilon = 1e-12);
        assert_eq!(result.label, Label::Down);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AlignerConfig {
            threshold: -0.01,
            ..Default::default()
        };
        assert!(Aligner::new(config).is_err());
    }

    fn mixed_events() -> Vec<Event> {
        let mut events = Vec::new();
        for i in 0..200u32 {
            let symbol = match i % 4 {
                0 | 1 => "AAA",
                2 => "ZERO",
                _ => "MISSING",
            };
            events.push(Event::new(format!("event-{i}"), symbol, day(1 + i % 12)));
        }
        events
    }

    fn mixed_book() -> HashMap<String, SeriesIndex> {
        let mut book = scenario_book();
        let zero = SeriesIndex::new(
            "ZERO",
            vec![obs(day(2), 0.0, 1.0), obs(day(9), 5.0, 5.0)],
        )
        .unwrap();
        book.insert("ZERO".to_string(), zero);
        book
    }

    fn labels_by_title(run: &AlignmentRun) -> HashMap<String, Label> {
        run.results
            .iter()
            .map(|r| (r.title.clone(), r.label))
            .collect()
    }

    #[test]
    fn test_order_independent() {
        let book = mixed_book();
        let aligner = aligner();
        let events = mixed_events();

        let forward = aligner.run(&events, &book);

        let mut reversed = events.clone();
        reversed.reverse();
        let backward = aligner.run(&reversed, &book);

        let mut rotated = events.clone();
        rotated.rotate_left(77);
        let rotated = aligner.run(&rotated, &book);

        assert!(forward.stats.success > 0);
        assert!(forward.stats.no_ticker > 0);
        assert!(forward.stats.no_target_after > 0);
        assert_eq!(forward.stats, backward.stats);
        assert_eq!(forward.stats, rotated.stats);
        assert_eq!(labels_by_title(&forward), labels_by_title(&backward));
        assert_eq!(labels_by_title(&forward), labels_by_title(&rotated));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let book = mixed_book();
        let config = AlignerConfig {
            chunk_size: 7,
            ..Default::default()
        };
        let aligner = Aligner::new(config).unwrap();
        let events = mixed_events();

        let sequential = aligner.run(&events, &book);
        let parallel = aligner.run_parallel(&events, &book);

        assert_eq!(sequential.stats, parallel.stats);
        assert_eq!(sequential.results, parallel.results);
    }

    #[test]
    fn test_caller_driven_partial_run_stays_consistent() {
        let book = mixed_book();
        let aligner = aligner();
        let events = mixed_events();

        let mut partial = AlignmentRun::default();
        for event in events.iter().take(50) {
            partial.record(aligner.align_event(event, &book));
        }
        let full_prefix = aligner.run(&events[..50], &book);

        assert_eq!(partial.stats, full_prefix.stats);
        assert_eq!(partial.results.len() as u64, partial.stats.success);
    }
}
