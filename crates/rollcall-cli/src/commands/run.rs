use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use rollcall_config::validate_preview_rows;
use rollcall_core::PhoneNumber;
use rollcall_match::paths::{check_output_path, ensure_parent_dir};
use rollcall_match::{
    load_status_set, reconcile_file, roster_coverage_file, ReconcileStats, RosterCoverage,
    RosterSpec, StatusReport, StatusSource,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

const STATUS_SAMPLE: usize = 10;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Export holding phone statuses
    #[arg(long)]
    pub status: PathBuf,
    /// Roster to annotate
    #[arg(long)]
    pub roster: PathBuf,
    #[arg(long)]
    pub out: PathBuf,
    /// Status value that counts as a match
    #[arg(long)]
    pub positive: Option<String>,
    /// Phone column name in the export
    #[arg(long)]
    pub status_phone_column: Option<String>,
    /// Status column name in the export
    #[arg(long)]
    pub status_column: Option<String>,
    /// Phone column name in the roster
    #[arg(long)]
    pub phone_column: Option<String>,
    /// Column the verdict is written to
    #[arg(long)]
    pub verdict_column: Option<String>,
    #[arg(long)]
    pub preview_rows: Option<usize>,
    /// Fail instead of reading the status from the last column
    #[arg(long)]
    pub no_last_column_fallback: bool,
    #[arg(long)]
    pub skip_coverage: bool,
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    status: &'a StatusReport,
    sample: Vec<&'a PhoneNumber>,
    coverage: Option<&'a RosterCoverage>,
    reconcile: ReconcileStats,
    output: String,
}

pub fn run(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    let source = status_source(ctx, &args)?;
    let roster = roster_spec(ctx, &args)?;

    ensure_parent_dir(&args.out)?;
    check_output_path(&args.out, &[args.roster.as_path(), args.status.as_path()])
        .with_context(|| format!("check output {}", args.out.display()))?;

    let loaded = load_status_set(&args.status, &source)
        .with_context(|| format!("load status export {}", args.status.display()))?;
    let sample = loaded.set.sample(STATUS_SAMPLE);
    if loaded.set.is_empty() {
        warn!(
            positive = %source.positive_value,
            "no phones in the status export carry the positive value"
        );
    }
    if !ctx.json {
        println!(
            "Loaded {} unique phones with status {:?} from {}",
            loaded.set.len(),
            source.positive_value,
            args.status.display()
        );
        if !sample.is_empty() {
            println!("Sample:");
            for phone in &sample {
                println!("  {}", phone);
            }
        }
    }

    let coverage = if args.skip_coverage {
        None
    } else {
        let diagnostics = &ctx.config.diagnostics;
        let coverage = roster_coverage_file(
            &args.roster,
            &roster.phone_column,
            &loaded.set,
            diagnostics.coverage_sample,
            diagnostics.coverage_examples,
        )
        .with_context(|| format!("check roster {}", args.roster.display()))?;
        if !ctx.json {
            print_coverage(&coverage, &roster.phone_column);
        }
        Some(coverage)
    };

    let stats = reconcile_file(&args.roster, &args.out, &roster, &loaded.set)
        .with_context(|| format!("annotate roster {}", args.roster.display()))?;

    if ctx.json {
        return print_json(&RunReport {
            status: &loaded.report,
            sample,
            coverage: coverage.as_ref(),
            reconcile: stats,
            output: args.out.display().to_string(),
        });
    }

    println!("Processed rows: {}", stats.processed);
    println!("With status: {}", stats.positive);
    println!("Without status: {}", stats.negative);
    println!("Saved to {}", args.out.display());
    Ok(())
}

fn status_source(ctx: &Context<'_>, args: &RunArgs) -> Result<StatusSource> {
    let config = &ctx.config.status;
    let positive_value = match &args.positive {
        Some(value) => non_empty("--positive", value)?,
        None => config.positive_value.clone(),
    };
    let preview_rows = match args.preview_rows {
        Some(rows) => validate_preview_rows(rows)?,
        None => config.preview_rows,
    };

    Ok(StatusSource {
        positive_value,
        phone_column: args
            .status_phone_column
            .clone()
            .or_else(|| config.phone_column.clone()),
        status_column: args
            .status_column
            .clone()
            .or_else(|| config.status_column.clone()),
        preview_rows,
        last_column_fallback: config.last_column_fallback && !args.no_last_column_fallback,
        keywords: config.keywords.clone(),
    })
}

fn roster_spec(ctx: &Context<'_>, args: &RunArgs) -> Result<RosterSpec> {
    let config = &ctx.config.roster;
    let phone_column = match &args.phone_column {
        Some(value) => non_empty("--phone-column", value)?,
        None => config.phone_column.clone(),
    };
    let verdict_column = match &args.verdict_column {
        Some(value) => non_empty("--verdict-column", value)?,
        None => config.verdict_column.clone(),
    };
    if phone_column == verdict_column {
        return Err(invalid_input(
            "verdict column must differ from the roster phone column",
        ));
    }
    Ok(RosterSpec {
        phone_column,
        verdict_column,
        labels: ctx.config.verdict.clone(),
    })
}

fn non_empty(flag: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid_input(format!("{flag} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn print_coverage(coverage: &RosterCoverage, phone_column: &str) {
    println!(
        "Roster has {} unique phones in column {:?} ({} rows)",
        coverage.roster_phones, phone_column, coverage.roster_rows
    );
    println!(
        "Checked {} status phones: {} found in roster, {} missing examples",
        coverage.checked,
        coverage.found,
        coverage.missing_examples.len()
    );
    if !coverage.missing_examples.is_empty() {
        println!("Status phones not in roster:");
        for phone in &coverage.missing_examples {
            println!("  {}", phone);
        }
    }
}
