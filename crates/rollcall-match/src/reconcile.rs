use crate::dataset::{named_reader, open_dataset};
use crate::error::{MatchError, Result};
use crate::paths::{check_output_path, ensure_parent_dir, partial_path};
use crate::status::StatusSet;
use csv::{StringRecord, StringRecordsIntoIter, Writer};
use rollcall_core::{normalize_phone, PhoneNumber, Verdict, VerdictLabels};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Roster columns and the labels written for each verdict.
#[derive(Debug, Clone)]
pub struct RosterSpec {
    pub phone_column: String,
    pub verdict_column: String,
    pub labels: VerdictLabels,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub processed: usize,
    pub positive: usize,
    pub negative: usize,
}

/// One roster row with the verdict already written into `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRow {
    pub fields: Vec<String>,
    pub phone: Option<PhoneNumber>,
    pub verdict: Verdict,
}

/// Streams roster rows in input order, annotating each against a finished
/// status set.
pub struct Reconciler<'a, R: Read> {
    records: StringRecordsIntoIter<R>,
    headers: Vec<String>,
    phone_idx: usize,
    verdict_idx: usize,
    width: usize,
    status: &'a StatusSet,
    labels: &'a VerdictLabels,
    stats: ReconcileStats,
}

impl<'a, R: Read> Reconciler<'a, R> {
    /// Fails before reading any data row when the phone column is missing.
    pub fn new(reader: R, spec: &'a RosterSpec, status: &'a StatusSet) -> Result<Self> {
        let mut reader = named_reader(reader);
        let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let phone_idx = headers
            .iter()
            .position(|name| name == &spec.phone_column)
            .ok_or_else(|| MatchError::MissingRosterField {
                field: spec.phone_column.clone(),
                available: headers.clone(),
            })?;

        let width = headers.len();
        let verdict_idx = match headers.iter().position(|name| name == &spec.verdict_column) {
            Some(idx) => {
                debug!(column = %spec.verdict_column, "overwriting existing verdict column");
                idx
            }
            None => {
                headers.push(spec.verdict_column.clone());
                width
            }
        };

        Ok(Self {
            records: reader.into_records(),
            headers,
            phone_idx,
            verdict_idx,
            width,
            status,
            labels: &spec.labels,
            stats: ReconcileStats::default(),
        })
    }

    /// Output header: the roster header plus the verdict column.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    fn annotate(&mut self, record: StringRecord) -> AnnotatedRow {
        if record.len() > self.width {
            warn!(
                line = record.position().map(|pos| pos.line()),
                extra = record.len() - self.width,
                "dropping fields beyond the roster header"
            );
        }

        let phone = record.get(self.phone_idx).and_then(normalize_phone);
        let verdict = Verdict::from_match(
            phone
                .as_ref()
                .is_some_and(|phone| self.status.contains(phone)),
        );

        let mut fields: Vec<String> = record
            .iter()
            .take(self.width)
            .map(str::to_string)
            .collect();
        fields.resize(self.width, String::new());
        let label = self.labels.label(verdict).to_string();
        if self.verdict_idx < self.width {
            fields[self.verdict_idx] = label;
        } else {
            fields.push(label);
        }

        self.stats.processed += 1;
        if verdict.is_positive() {
            self.stats.positive += 1;
        } else {
            self.stats.negative += 1;
        }

        AnnotatedRow {
            fields,
            phone,
            verdict,
        }
    }
}

impl<R: Read> Iterator for Reconciler<'_, R> {
    type Item = Result<AnnotatedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next()? {
            Ok(record) => Some(Ok(self.annotate(record))),
            Err(err) => Some(Err(err.into())),
        }
    }
}

/// Writes the annotated roster to `output`.
///
/// Rows go to a hidden sibling file that replaces `output` only after the last
/// row is written, so a failed run leaves no partial output behind.
pub fn reconcile_file(
    input: &Path,
    output: &Path,
    spec: &RosterSpec,
    status: &StatusSet,
) -> Result<ReconcileStats> {
    let file = open_dataset(input)?;
    let mut reconciler = Reconciler::new(file, spec, status)?;

    ensure_parent_dir(output)?;
    let target = check_output_path(output, &[input])?;
    let partial = partial_path(&target)?;

    let written = write_rows(&mut reconciler, &partial)
        .and_then(|()| fs::rename(&partial, &target).map_err(Into::into));
    if let Err(err) = written {
        let _ = fs::remove_file(&partial);
        return Err(err);
    }

    let stats = reconciler.stats();
    debug!(
        processed = stats.processed,
        positive = stats.positive,
        negative = stats.negative,
        output = %target.display(),
        "roster annotated"
    );
    Ok(stats)
}

fn write_rows<R: Read>(reconciler: &mut Reconciler<'_, R>, path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(reconciler.headers())?;
    for row in reconciler.by_ref() {
        writer.write_record(&row?.fields)?;
    }
    writer.flush()?;
    Ok(())
}
