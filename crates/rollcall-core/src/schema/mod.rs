//! Content-based column detection for tables whose layout is not known up front.

pub mod keywords;

pub use keywords::{KeywordSet, SchemaKeywords, PHONE_KEYWORDS, STATUS_KEYWORDS};

use serde::Serialize;

/// Number of leading rows inspected when looking for a header.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Where the phone and status values live in a positional table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub phone: usize,
    pub status: Option<usize>,
    /// Rows up to and including this index are not data.
    pub header_row: usize,
}

impl ColumnRoles {
    /// Whether both roles were found in the same row.
    pub fn is_confirmed(&self) -> bool {
        self.status.is_some()
    }
}

/// Status column used while reading rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum StatusColumn {
    Index(usize),
    /// Whatever the last field of each row is.
    LastColumn,
}

impl StatusColumn {
    pub fn resolve(self, row_len: usize) -> Option<usize> {
        match self {
            Self::Index(idx) if idx < row_len => Some(idx),
            Self::Index(_) => None,
            Self::LastColumn => row_len.checked_sub(1),
        }
    }
}

/// Finds the header row of `prefix` and the phone/status columns it names.
///
/// The first row holding both a phone keyword and a status keyword wins. If no
/// row has both, the first row with a phone keyword is used and its status
/// column may be missing. `None` means no phone column could be found at all.
pub fn detect_columns<R>(prefix: &[R], keywords: &SchemaKeywords) -> Option<ColumnRoles>
where
    R: AsRef<[String]>,
{
    let hits: Vec<RowHits> = prefix
        .iter()
        .map(|row| RowHits::scan(row.as_ref(), keywords))
        .collect();

    let confirmed = hits.iter().enumerate().find_map(|(idx, hit)| match hit {
        RowHits {
            phone: Some(phone),
            status: Some(status),
        } => Some(ColumnRoles {
            phone: *phone,
            status: Some(*status),
            header_row: idx,
        }),
        _ => None,
    });
    if confirmed.is_some() {
        return confirmed;
    }

    hits.iter().enumerate().find_map(|(idx, hit)| {
        hit.phone.map(|phone| ColumnRoles {
            phone,
            status: hit.status,
            header_row: idx,
        })
    })
}

#[derive(Debug, Default)]
struct RowHits {
    phone: Option<usize>,
    status: Option<usize>,
}

impl RowHits {
    fn scan(row: &[String], keywords: &SchemaKeywords) -> Self {
        let cells: Vec<String> = row.iter().map(|cell| cell.trim().to_lowercase()).collect();
        Self {
            phone: cells.iter().position(|cell| keywords.phone.matches(cell)),
            status: cells.iter().position(|cell| keywords.status.matches(cell)),
        }
    }
}
