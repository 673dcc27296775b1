//! Builds the set of phones that carry the positive status in a loosely
//! structured export.

use crate::dataset::{open_dataset, positional_reader, record_fields};
use crate::error::{MatchError, Result};
use csv::StringRecord;
use rollcall_core::schema::DEFAULT_PREVIEW_ROWS;
use rollcall_core::{detect_columns, normalize_phone, PhoneNumber, SchemaKeywords, StatusColumn};
use serde::Serialize;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Settings for reading the status export.
#[derive(Debug, Clone)]
pub struct StatusSource {
    pub positive_value: String,
    /// Explicit column names; used only when both are present in the header.
    pub phone_column: Option<String>,
    pub status_column: Option<String>,
    pub preview_rows: usize,
    /// Read the status from each row's last field when no status column is detected.
    pub last_column_fallback: bool,
    pub keywords: SchemaKeywords,
}

impl StatusSource {
    pub fn new(positive_value: impl Into<String>) -> Self {
        Self {
            positive_value: positive_value.into(),
            phone_column: None,
            status_column: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            last_column_fallback: true,
            keywords: SchemaKeywords::default(),
        }
    }

    pub fn with_columns(mut self, phone: impl Into<String>, status: impl Into<String>) -> Self {
        self.phone_column = Some(phone.into());
        self.status_column = Some(status.into());
        self
    }
}

/// How phone and status values are located in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ColumnStrategy {
    /// Configured names found in the first row.
    Named { phone: usize, status: usize },
    /// Columns inferred from header keywords.
    Positional {
        phone: usize,
        status: StatusColumn,
        header_row: usize,
    },
}

impl ColumnStrategy {
    fn phone(&self) -> usize {
        match self {
            Self::Named { phone, .. } | Self::Positional { phone, .. } => *phone,
        }
    }

    fn status(&self) -> StatusColumn {
        match self {
            Self::Named { status, .. } => StatusColumn::Index(*status),
            Self::Positional { status, .. } => *status,
        }
    }

    /// Index of the first data row.
    fn data_start(&self) -> usize {
        match self {
            Self::Named { .. } => 1,
            Self::Positional { header_row, .. } => header_row + 1,
        }
    }
}

/// Phones known to carry the positive status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSet(BTreeSet<PhoneNumber>);

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, phone: PhoneNumber) -> bool {
        self.0.insert(phone)
    }

    pub fn contains(&self, phone: &PhoneNumber) -> bool {
        self.0.contains(phone)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, PhoneNumber> {
        self.0.iter()
    }

    pub fn sample(&self, limit: usize) -> Vec<&PhoneNumber> {
        self.0.iter().take(limit).collect()
    }
}

impl FromIterator<PhoneNumber> for StatusSet {
    fn from_iter<I: IntoIterator<Item = PhoneNumber>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StatusSet {
    type Item = &'a PhoneNumber;
    type IntoIter = btree_set::Iter<'a, PhoneNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub strategy: ColumnStrategy,
    pub rows_scanned: usize,
    pub positive_rows: usize,
    pub unnormalized_phones: usize,
    pub short_rows: usize,
    pub unique_phones: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedStatus {
    pub set: StatusSet,
    pub report: StatusReport,
}

pub fn load_status_set(path: &Path, source: &StatusSource) -> Result<LoadedStatus> {
    let file = open_dataset(path)?;
    debug!(path = %path.display(), "loading status export");
    build_status_set(file, source)
}

/// Reads the whole export once: the leading rows pick the strategy, then every
/// data row contributes its phone when its status matches.
pub fn build_status_set<R: Read>(reader: R, source: &StatusSource) -> Result<LoadedStatus> {
    let mut reader = positional_reader(reader);
    let mut records = reader.records();

    let mut buffered = Vec::new();
    for record in records.by_ref().take(source.preview_rows.max(1)) {
        buffered.push(record?);
    }
    let preview: Vec<Vec<String>> = buffered.iter().map(record_fields).collect();
    let strategy = resolve_strategy(&preview, source)?;
    debug!(?strategy, "status columns resolved");

    let mut collector = StatusCollector::new(strategy, &source.positive_value);
    for record in buffered.iter().skip(strategy.data_start()) {
        collector.absorb(record);
    }
    for record in records {
        collector.absorb(&record?);
    }
    Ok(collector.finish())
}

/// Picks named columns when both configured names are in the first row,
/// otherwise infers positions from the preview.
pub fn resolve_strategy(preview: &[Vec<String>], source: &StatusSource) -> Result<ColumnStrategy> {
    if let (Some(phone_name), Some(status_name)) = (&source.phone_column, &source.status_column) {
        if let Some(header) = preview.first() {
            let phone = find_named_column(header, phone_name);
            let status = find_named_column(header, status_name);
            if let (Some(phone), Some(status)) = (phone, status) {
                return Ok(ColumnStrategy::Named { phone, status });
            }
        }
        debug!(
            phone = %phone_name,
            status = %status_name,
            "configured columns not in header, inferring positions"
        );
    }

    let roles = detect_columns(preview, &source.keywords).ok_or_else(|| {
        MatchError::PhoneColumnUndetected {
            preview: preview.to_vec(),
        }
    })?;

    let status = match roles.status {
        Some(idx) => StatusColumn::Index(idx),
        None if source.last_column_fallback => {
            warn!(
                header_row = roles.header_row,
                "status column not detected, reading status from the last column"
            );
            StatusColumn::LastColumn
        }
        None => return Err(MatchError::StatusColumnUndetected),
    };

    Ok(ColumnStrategy::Positional {
        phone: roles.phone,
        status,
        header_row: roles.header_row,
    })
}

fn find_named_column(header: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    header
        .iter()
        .position(|cell| cell.trim().to_lowercase() == wanted)
}

struct StatusCollector {
    strategy: ColumnStrategy,
    positive: String,
    set: StatusSet,
    rows_scanned: usize,
    positive_rows: usize,
    unnormalized_phones: usize,
    short_rows: usize,
}

impl StatusCollector {
    fn new(strategy: ColumnStrategy, positive_value: &str) -> Self {
        Self {
            strategy,
            positive: positive_value.trim().to_lowercase(),
            set: StatusSet::new(),
            rows_scanned: 0,
            positive_rows: 0,
            unnormalized_phones: 0,
            short_rows: 0,
        }
    }

    fn absorb(&mut self, record: &StringRecord) {
        self.rows_scanned += 1;

        let phone = record.get(self.strategy.phone());
        let status = self
            .strategy
            .status()
            .resolve(record.len())
            .and_then(|idx| record.get(idx));
        let (Some(phone), Some(status)) = (phone, status) else {
            self.short_rows += 1;
            return;
        };

        if status.trim().to_lowercase() != self.positive {
            return;
        }
        self.positive_rows += 1;

        match normalize_phone(phone) {
            Some(phone) => {
                self.set.insert(phone);
            }
            None => self.unnormalized_phones += 1,
        }
    }

    fn finish(self) -> LoadedStatus {
        let report = StatusReport {
            strategy: self.strategy,
            rows_scanned: self.rows_scanned,
            positive_rows: self.positive_rows,
            unnormalized_phones: self.unnormalized_phones,
            short_rows: self.short_rows,
            unique_phones: self.set.len(),
        };
        debug!(
            rows = report.rows_scanned,
            positive = report.positive_rows,
            unique = report.unique_phones,
            "status export loaded"
        );
        LoadedStatus {
            set: self.set,
            report,
        }
    }
}
