//! News event loading.

use crate::dates::parse_daily_date;
use crate::price_loader::located;
use newslabel_core::config::EventColumns;
use newslabel_core::{Error, Event, Result};
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tracing::info;

/// Load every row of a headered news CSV as an event.
pub fn load_events(path: &Path, columns: &EventColumns) -> Result<Vec<Event>> {
    let file = std::fs::File::open(path)?;
    read_events(file, columns, &path.display().to_string())
}

/// Read events from any CSV source.
///
/// Missing columns and unparsable dates are errors. A blank symbol is kept
/// so the event is still counted downstream.
pub fn read_events<R: io::Read>(reader: R, columns: &EventColumns, source: &str) -> Result<Vec<Event>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::data(format!("{source}: missing column '{name}'")))
    };
    let title_idx = column(&columns.title)?;
    let symbol_idx = column(&columns.symbol)?;
    let date_idx = column(&columns.date)?;

    let mut events = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let line = row + 2;
        let date = parse_daily_date(record.get(date_idx).unwrap_or(""))
            .map_err(|e| located(source, line, e))?;
        events.push(Event::new(
            record.get(title_idx).unwrap_or(""),
            record.get(symbol_idx).unwrap_or("").trim(),
            date,
        ));
    }

    let first = events.iter().map(|e| e.date).min();
    let last = events.iter().map(|e| e.date).max();
    info!(events = events.len(), ?first, ?last, source, "Loaded news events");
    Ok(events)
}

/// Non-empty symbols in first-seen order.
pub fn distinct_symbols(events: &[Event]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for event in events {
        if !event.symbol.is_empty() && seen.insert(event.symbol.as_str()) {
            symbols.push(event.symbol.clone());
        }
    }
    symbols
}
