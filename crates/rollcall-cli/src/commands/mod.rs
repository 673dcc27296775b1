use anyhow::Result;
use rollcall_config::AppConfig;
use serde::Serialize;
use std::io::{self, Write};

pub mod detect;
pub mod normalize;
pub mod run;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn print_preview(rows: &[Vec<String>]) {
    for (idx, row) in rows.iter().enumerate() {
        println!("  {:>3}: {}", idx, row.join(" | "));
    }
}
