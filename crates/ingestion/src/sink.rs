//! Labeled dataset output.

use newslabel_core::{AlignmentResult, LabelRecord, Result};
use std::io;
use std::path::Path;

const HEADER: [&str; 2] = ["Article_title", "Label"];

/// Write `Article_title,Label` rows to a CSV file.
///
/// Returns the number of rows written.
pub fn write_labels(path: &Path, results: &[AlignmentResult]) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_labels_to(file, results)
}

/// Write `Article_title,Label` rows to any writer.
///
/// The header is written even when there are no results.
pub fn write_labels_to<W: io::Write>(writer: W, results: &[AlignmentResult]) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(HEADER)?;
    for result in results {
        writer.serialize(LabelRecord::from(result))?;
    }
    writer.flush()?;
    Ok(results.len())
}
