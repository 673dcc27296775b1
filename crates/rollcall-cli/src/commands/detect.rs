use crate::commands::{print_json, print_preview, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use rollcall_config::validate_preview_rows;
use rollcall_core::{detect_columns, ColumnRoles};
use rollcall_match::dataset::read_preview;
use rollcall_match::MatchError;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DetectArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Serialize)]
struct DetectReport<'a> {
    roles: ColumnRoles,
    confirmed: bool,
    header: Option<&'a [String]>,
    preview: &'a [Vec<String>],
}

pub fn detect(ctx: &Context<'_>, args: DetectArgs) -> Result<()> {
    let rows = match args.preview_rows {
        Some(rows) => validate_preview_rows(rows)?,
        None => ctx.config.status.preview_rows,
    };
    let preview = read_preview(&args.file, rows)
        .with_context(|| format!("read {}", args.file.display()))?;

    let Some(roles) = detect_columns(&preview, &ctx.config.status.keywords) else {
        return Err(MatchError::PhoneColumnUndetected { preview }.into());
    };
    let header = preview.get(roles.header_row).map(Vec::as_slice);

    if ctx.json {
        return print_json(&DetectReport {
            roles,
            confirmed: roles.is_confirmed(),
            header,
            preview: &preview,
        });
    }

    let column_name = |idx: usize| {
        header
            .and_then(|row| row.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    };
    println!("Header row: {}", roles.header_row);
    println!("Phone column: {} ({:?})", roles.phone, column_name(roles.phone));
    match roles.status {
        Some(idx) => println!("Status column: {} ({:?})", idx, column_name(idx)),
        None => println!("Status column: not detected"),
    }
    if !roles.is_confirmed() && ctx.config.status.last_column_fallback {
        println!("The last column of each row will be read as the status");
    }
    println!("Preview:");
    print_preview(&preview);
    Ok(())
}
