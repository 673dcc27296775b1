//! CSV plumbing shared by the status export and the roster.

use crate::error::{MatchError, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn open_dataset(path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(MatchError::MissingDataset(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

/// Reader for tables with no trusted header row; rows may differ in width.
pub fn positional_reader<R: Read>(reader: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

/// Reader for tables whose first row names the columns.
pub fn named_reader<R: Read>(reader: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

pub fn record_fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// Reads at most `rows` leading records of a positional table.
pub fn read_preview(path: &Path, rows: usize) -> Result<Vec<Vec<String>>> {
    let mut reader = positional_reader(open_dataset(path)?);
    let mut preview = Vec::with_capacity(rows);
    for record in reader.records().take(rows) {
        preview.push(record_fields(&record?));
    }
    Ok(preview)
}

#[cfg(test)]
mod tests {
    use super::{open_dataset, positional_reader, record_fields};
    use crate::error::MatchError;
    use std::path::Path;

    #[test]
    fn open_dataset_reports_missing_file() {
        let err = open_dataset(Path::new("/nonexistent/results.csv")).unwrap_err();
        assert!(matches!(err, MatchError::MissingDataset(_)));
    }

    #[test]
    fn positional_reader_accepts_ragged_rows() {
        let data = "title\nphone,status,extra\n1,2\n";
        let mut reader = positional_reader(data.as_bytes());
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|record| record_fields(&record.expect("record")))
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["title"]);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[2].len(), 2);
    }
}
