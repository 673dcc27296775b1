use crate::dataset::{named_reader, open_dataset};
use crate::error::{MatchError, Result};
use crate::status::StatusSet;
use rollcall_core::{normalize_phone, PhoneNumber};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// How well the status set lines up with the roster's phones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterCoverage {
    pub roster_rows: usize,
    pub roster_phones: usize,
    /// Status-set phones checked against the roster.
    pub checked: usize,
    pub found: usize,
    /// Status-set phones absent from the roster.
    pub missing_examples: Vec<PhoneNumber>,
}

pub fn roster_coverage_file(
    roster: &Path,
    phone_column: &str,
    status: &StatusSet,
    sample_limit: usize,
    example_limit: usize,
) -> Result<RosterCoverage> {
    let file = open_dataset(roster)?;
    roster_coverage(file, phone_column, status, sample_limit, example_limit)
}

/// Checks up to `sample_limit` status-set phones against the roster, stopping
/// early once `example_limit` missing phones have been collected.
pub fn roster_coverage<R: Read>(
    roster: R,
    phone_column: &str,
    status: &StatusSet,
    sample_limit: usize,
    example_limit: usize,
) -> Result<RosterCoverage> {
    let mut reader = named_reader(roster);
    let headers = reader.headers()?.clone();
    let phone_idx = headers
        .iter()
        .position(|name| name == phone_column)
        .ok_or_else(|| MatchError::MissingRosterField {
            field: phone_column.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        })?;

    let mut roster_rows = 0;
    let mut roster_phones = HashSet::new();
    for record in reader.records() {
        let record = record?;
        roster_rows += 1;
        if let Some(phone) = record.get(phone_idx).and_then(normalize_phone) {
            roster_phones.insert(phone);
        }
    }

    let mut checked = 0;
    let mut found = 0;
    let mut missing_examples = Vec::new();
    for phone in status.iter().take(sample_limit) {
        if missing_examples.len() >= example_limit {
            break;
        }
        checked += 1;
        if roster_phones.contains(phone) {
            found += 1;
        } else {
            missing_examples.push(phone.clone());
        }
    }

    Ok(RosterCoverage {
        roster_rows,
        roster_phones: roster_phones.len(),
        checked,
        found,
        missing_examples,
    })
}

#[cfg(test)]
mod tests {
    use super::roster_coverage;
    use crate::error::MatchError;
    use crate::status::StatusSet;
    use rollcall_core::PhoneNumber;

    fn status(phones: &[&str]) -> StatusSet {
        phones
            .iter()
            .map(|raw| PhoneNumber::new(raw).expect("phone"))
            .collect()
    }

    #[test]
    fn counts_roster_phones_and_matches() {
        let roster = "name,phone2\nAda,89161111111\nAda again,+7 916 111 11 11\nBob,bad\nEve,89162222222\n";
        let set = status(&["89161111111", "89163333333"]);
        let coverage = roster_coverage(roster.as_bytes(), "phone2", &set, 500, 10).expect("coverage");
        assert_eq!(coverage.roster_rows, 4);
        assert_eq!(coverage.roster_phones, 2);
        assert_eq!(coverage.checked, 2);
        assert_eq!(coverage.found, 1);
        assert_eq!(coverage.missing_examples.len(), 1);
        assert_eq!(coverage.missing_examples[0].as_str(), "+79163333333");
    }

    #[test]
    fn stops_once_enough_examples_are_collected() {
        let roster = "phone2\n89160000000\n";
        let set = status(&["89161111111", "89162222222", "89163333333", "89164444444"]);
        let coverage = roster_coverage(roster.as_bytes(), "phone2", &set, 500, 2).expect("coverage");
        assert_eq!(coverage.checked, 2);
        assert_eq!(coverage.missing_examples.len(), 2);

        let capped = roster_coverage(roster.as_bytes(), "phone2", &set, 3, 10).expect("coverage");
        assert_eq!(capped.checked, 3);
    }

    #[test]
    fn missing_phone_column_is_reported() {
        let err = roster_coverage("name\nAda\n".as_bytes(), "phone2", &StatusSet::new(), 500, 10)
            .unwrap_err();
        assert!(matches!(err, MatchError::MissingRosterField { .. }));
    }
}
