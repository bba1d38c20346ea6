//! Per-symbol daily price history loading.
//!
//! Each symbol lives in `{data_dir}/{SYMBOL}.csv`. The date column may be named
//! `date`, `Date` or `DATE`; price columns are matched to Open/High/Low/Close
//! regardless of casing and every other column is ignored.

use crate::dates::parse_daily_date;
use newslabel_core::config::LoaderConfig;
use newslabel_core::{Error, Observation, PriceField, Result, SeriesIndex};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Symbol to price series mapping consumed by the aligner.
pub type PriceBook = HashMap<String, SeriesIndex>;

/// Accepted names of the date column, in priority order.
const DATE_COLUMNS: [&str; 3] = ["date", "Date", "DATE"];

/// Path of a symbol's history file.
pub fn series_path(data_dir: &Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{symbol}.csv"))
}

/// Load one symbol's history.
///
/// Returns `Ok(None)` when the file does not exist or lacks the date or price
/// columns. Unparsable cells are an error.
pub fn load_series(data_dir: &Path, symbol: &str) -> Result<Option<SeriesIndex>> {
    let path = series_path(data_dir, symbol);
    if !path.is_file() {
        debug!(symbol, path = %path.display(), "No price history file");
        return Ok(None);
    }
    let file = std::fs::File::open(&path)?;
    read_series(symbol, file, &path.display().to_string())
}

/// Read a symbol's history from any CSV source.
pub fn read_series<R: io::Read>(symbol: &str, reader: R, source: &str) -> Result<Option<SeriesIndex>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let Some(date_idx) = DATE_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
    else {
        warn!(symbol, source, "No date column, skipping");
        return Ok(None);
    };

    let mut field_idx = [0usize; 4];
    for (slot, field) in field_idx.iter_mut().zip(PriceField::ALL) {
        match headers.iter().position(|h| h.trim().eq_ignore_ascii_case(field.as_str())) {
            Some(idx) => *slot = idx,
            None => {
                warn!(symbol, source, missing = %field, "Missing price column, skipping");
                return Ok(None);
            }
        }
    }

    let mut observations = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = row + 2;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let date = parse_daily_date(cell(date_idx)).map_err(|e| located(source, line, e))?;
        let mut prices = [0.0f64; 4];
        for (price, &idx) in prices.iter_mut().zip(field_idx.iter()) {
            *price = parse_price(cell(idx)).map_err(|e| located(source, line, e))?;
        }

        observations.push(Observation {
            date,
            open: prices[0],
            high: prices[1],
            low: prices[2],
            close: prices[3],
        });
    }

    observations.sort_by_key(|o| o.date);
    let before = observations.len();
    observations.dedup_by_key(|o| o.date);
    let dropped = before - observations.len();
    if dropped > 0 {
        warn!(symbol, source, dropped, "Dropped rows with duplicate dates");
    }

    SeriesIndex::new(symbol, observations).map(Some)
}

/// Empty cells are missing values (NaN); anything else must be numeric.
fn parse_price(raw: &str) -> Result<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .map_err(|_| Error::parse(format!("invalid price '{raw}'")))
}

/// Prefix a parse error with where it happened.
pub(crate) fn located(source: &str, line: usize, err: Error) -> Error {
    match err {
        Error::Parse(msg) => Error::parse(format!("{source} line {line}: {msg}")),
        other => other,
    }
}

/// Load the history of every distinct symbol, skipping absent or empty ones.
pub fn load_price_book(config: &LoaderConfig, symbols: &[String]) -> Result<PriceBook> {
    let mut book = PriceBook::new();
    for symbol in symbols {
        if symbol.is_empty() || book.contains_key(symbol) {
            continue;
        }
        match load_series(&config.data_dir, symbol) {
            Ok(Some(series)) if !series.is_empty() => {
                book.insert(symbol.clone(), series);
            }
            Ok(_) => {}
            Err(e) if config.skip_malformed => {
                warn!(symbol = %symbol, error = %e, "Malformed price history, skipping");
            }
            Err(e) => return Err(e),
        }
    }

    info!(loaded = book.len(), requested = symbols.len(), "Loaded stock histories");
    if let Some((symbol, series)) = book.iter().min_by(|a, b| a.0.cmp(b.0)) {
        info!(
            example = %symbol,
            first = ?series.first_date(),
            last = ?series.last_date(),
            "Price date range"
        );
    }
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use std::fs;

    fn day(y: i32, m: u32, d: u32) -> newslabel_core::Day {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalizes_columns_and_sorts() {
        let csv = "Date,volume,open,HIGH,Low,close\n\
                   2024-01-03,10,3,3.5,2.5,3.2\n\
                   2024-01-02 00:00:00+00:00,10,2,2.5,1.5,2.2\n";
        let series = read_series("ABC", csv.as_bytes(), "mem").unwrap().unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(day(2024, 1, 2)));
        let first = series.get(0).unwrap();
        assert_relative_eq!(first.open, 2.0);
        assert_relative_eq!(first.high, 2.5);
        assert_relative_eq!(first.low, 1.5);
        assert_relative_eq!(first.close, 2.2);
    }

    #[test]
    fn test_prefers_lowercase_date_column() {
        let csv = "DATE,date,Open,High,Low,Close\n\
                   bogus,2024-01-02,1,1,1,1\n";
        let series = read_series("ABC", csv.as_bytes(), "mem").unwrap().unwrap();
        assert_eq!(series.first_date(), Some(day(2024, 1, 2)));
    }

    #[test]
    fn test_missing_columns_is_absent() {
        let no_date = "when,Open,High,Low,Close\n2024-01-02,1,1,1,1\n";
        assert!(read_series("ABC", no_date.as_bytes(), "mem").unwrap().is_none());

        let no_low = "date,Open,High,Close\n2024-01-02,1,1,1\n";
        assert!(read_series("ABC", no_low.as_bytes(), "mem").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_dates_keep_first() {
        let csv = "date,Open,High,Low,Close\n\
                   2024-01-02,1,1,1,1\n\
                   2024-01-02,9,9,9,9\n\
                   2024-01-03,2,2,2,2\n";
        let series = read_series("ABC", csv.as_bytes(), "mem").unwrap().unwrap();
        assert_eq!(series.len(), 2);
        assert_relative_eq!(series.get(0).unwrap().open, 1.0);
    }

    #[test]
    fn test_empty_price_is_nan_and_garbage_is_error() {
        let csv = "date,Open,High,Low,Close\n2024-01-02,,1,1,1\n";
        let series = read_series("ABC", csv.as_bytes(), "mem").unwrap().unwrap();
        assert!(series.get(0).unwrap().open.is_nan());

        let csv = "date,Open,High,Low,Close\n2024-01-02,abc,1,1,1\n";
        assert!(matches!(
            read_series("ABC", csv.as_bytes(), "mem"),
            Err(Error::Parse(_))
        ));

        let csv = "date,Open,High,Low,Close\nnot-a-date,1,1,1,1\n";
        assert!(read_series("ABC", csv.as_bytes(), "mem").is_err());
    }

    #[test]
    fn test_load_price_book() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("AAA.csv"),
            "date,Open,High,Low,Close\n2024-01-02,1,1,1,1\n",
        )
        .unwrap();
        fs::write(dir.path().join("EMPTY.csv"), "date,Open,High,Low,Close\n").unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,Open,High,Low,Close\nnope,1,1,1,1\n",
        )
        .unwrap();

        let symbols: Vec<String> = ["AAA", "AAA", "EMPTY", "MISSING", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = LoaderConfig {
            data_dir: dir.path().to_path_buf(),
            skip_malformed: false,
        };
        let book = load_price_book(&config, &symbols).unwrap();
        assert_eq!(book.len(), 1);
        assert!(book.contains_key("AAA"));

        let with_bad = vec!["AAA".to_string(), "BAD".to_string()];
        assert!(load_price_book(&config, &with_bad).is_err());

        let lenient = LoaderConfig {
            skip_malformed: true,
            ..config
        };
        let book = load_price_book(&lenient, &with_bad).unwrap();
        assert_eq!(book.len(), 1);
    }
}
