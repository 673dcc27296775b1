use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use rollcall_core::{normalize_phone, PhoneNumber};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[arg(required = true)]
    pub phones: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NormalizedPhone {
    input: String,
    phone: Option<PhoneNumber>,
}

pub fn normalize(ctx: &Context<'_>, args: NormalizeArgs) -> Result<()> {
    let results: Vec<NormalizedPhone> = args
        .phones
        .into_iter()
        .map(|input| NormalizedPhone {
            phone: normalize_phone(&input),
            input,
        })
        .collect();

    if ctx.json {
        return print_json(&results);
    }

    for result in results {
        match result.phone {
            Some(phone) => println!("{}\t{}", result.input, phone),
            None => println!("{}\t-", result.input),
        }
    }
    Ok(())
}
