use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("dataset not found: {0}")]
    MissingDataset(PathBuf),
    #[error("could not locate a phone column in the first {} rows", .preview.len())]
    PhoneColumnUndetected { preview: Vec<Vec<String>> },
    #[error("status column not detected and last-column fallback is disabled")]
    StatusColumnUndetected,
    #[error("roster has no column {field:?} (available: {})", .available.join(", "))]
    MissingRosterField {
        field: String,
        available: Vec<String>,
    },
    #[error("invalid output path: {0}")]
    InvalidOutputPath(PathBuf),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatchError>;
