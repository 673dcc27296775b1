use anyhow::Error;
use rollcall_config::ConfigError;
use rollcall_core::CoreError;
use rollcall_match::MatchError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:?}", err);
    } else {
        eprintln!("error: {:#}", err);
    }

    for cause in err.chain() {
        if let Some(MatchError::PhoneColumnUndetected { preview }) =
            cause.downcast_ref::<MatchError>()
        {
            eprintln!("Check the column names; first rows of the file:");
            for (idx, row) in preview.iter().enumerate() {
                eprintln!("  {:>3}: {}", idx, row.join(" | "));
            }
        }
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
            });
        }
        if let Some(match_err) = cause.downcast_ref::<MatchError>() {
            return ExitCode::from(match_exit_code(match_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn match_exit_code(err: &MatchError) -> u8 {
    match err {
        MatchError::MissingDataset(_) => EXIT_NOT_FOUND,
        MatchError::PhoneColumnUndetected { .. }
        | MatchError::StatusColumnUndetected
        | MatchError::MissingRosterField { .. }
        | MatchError::InvalidOutputPath(_) => EXIT_INVALID_INPUT,
        MatchError::Csv(_) | MatchError::Io(_) => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidPreviewRows(_)
        | ConfigError::EmptyField { .. }
        | ConfigError::InvalidField { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
