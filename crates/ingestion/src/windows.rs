//! Price-window rows: a title followed by trailing price columns.

use crate::price_loader::located;
use newslabel_core::{Error, PriceWindow, Result, ScoredWindow};
use std::io;
use std::path::Path;

/// Read `title, ..., p_0..p_{width-1}` rows; the header row is skipped.
pub fn read_price_windows(path: &Path, width: usize) -> Result<Vec<PriceWindow>> {
    let file = std::fs::File::open(path)?;
    read_price_windows_from(file, width, &path.display().to_string())
}

/// Read price windows from any CSV source.
///
/// The title is the first column and the values are the last `width` columns.
pub fn read_price_windows_from<R: io::Read>(
    reader: R,
    width: usize,
    source: &str,
) -> Result<Vec<PriceWindow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut windows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let line = row + 2;
        if record.len() < width + 1 {
            return Err(Error::parse(format!(
                "{source} line {line}: expected at least {} columns, found {}",
                width + 1,
                record.len()
            )));
        }

        let values = record
            .iter()
            .skip(record.len() - width)
            .map(|cell| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| Error::parse(format!("invalid price '{cell}'")))
            })
            .collect::<Result<Vec<f64>>>()
            .map_err(|e| located(source, line, e))?;

        windows.push(PriceWindow {
            title: record.get(0).unwrap_or("").to_string(),
            values,
        });
    }
    Ok(windows)
}

/// Write `title[,sentiment_score],zscore_0..` rows to a CSV file.
pub fn write_window_rows(path: &Path, rows: &[ScoredWindow], width: usize) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_window_rows_to(file, rows, width)
}

/// Write scored windows to any writer.
///
/// The sentiment column is present when any row carries a score.
pub fn write_window_rows_to<W: io::Write>(
    writer: W,
    rows: &[ScoredWindow],
    width: usize,
) -> Result<usize> {
    let with_sentiment = rows.iter().any(|r| r.sentiment.is_some());
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec!["title".to_string()];
    if with_sentiment {
        header.push("sentiment_score".to_string());
    }
    header.extend((0..width).map(|i| format!("zscore_{i}")));
    writer.write_record(&header)?;

    for row in rows {
        if row.zscores.len() != width {
            return Err(Error::data(format!(
                "'{}': expected {width} z-scores, found {}",
                row.title,
                row.zscores.len()
            )));
        }
        let mut record = Vec::with_capacity(header.len());
        record.push(row.title.clone());
        if with_sentiment {
            record.push(row.sentiment.map(|s| s.to_string()).unwrap_or_default());
        }
        record.extend(row.zscores.iter().map(|z| z.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(rows.len())
}
