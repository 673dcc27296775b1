use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rollcall_core::schema::DEFAULT_PREVIEW_ROWS;
use rollcall_core::{CoreError, KeywordSet, SchemaKeywords, Verdict, VerdictLabels};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "rollcall";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_POSITIVE_STATUS: &str = "ДА";
pub const DEFAULT_ROSTER_PHONE_COLUMN: &str = "phone2";
pub const DEFAULT_VERDICT_COLUMN: &str = "WA";
pub const DEFAULT_COVERAGE_SAMPLE: usize = 500;
pub const DEFAULT_COVERAGE_EXAMPLES: usize = 10;
pub const MAX_PREVIEW_ROWS: usize = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub status: StatusConfig,
    pub roster: RosterConfig,
    pub verdict: VerdictLabels,
    pub diagnostics: DiagnosticsConfig,
}

/// How the secondary status export is read.
#[derive(Debug, Clone)]
pub struct StatusConfig {
    pub positive_value: String,
    pub phone_column: Option<String>,
    pub status_column: Option<String>,
    pub preview_rows: usize,
    pub last_column_fallback: bool,
    pub keywords: SchemaKeywords,
}

#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub phone_column: String,
    pub verdict_column: String,
}

#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    pub coverage_sample: usize,
    pub coverage_examples: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            status: StatusConfig {
                positive_value: DEFAULT_POSITIVE_STATUS.to_string(),
                phone_column: None,
                status_column: None,
                preview_rows: DEFAULT_PREVIEW_ROWS,
                last_column_fallback: true,
                keywords: SchemaKeywords::default(),
            },
            roster: RosterConfig {
                phone_column: DEFAULT_ROSTER_PHONE_COLUMN.to_string(),
                verdict_column: DEFAULT_VERDICT_COLUMN.to_string(),
            },
            verdict: VerdictLabels::default(),
            diagnostics: DiagnosticsConfig {
                coverage_sample: DEFAULT_COVERAGE_SAMPLE,
                coverage_examples: DEFAULT_COVERAGE_EXAMPLES,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid preview_rows value: {0}")]
    InvalidPreviewRows(usize),
    #[error("invalid {field} value: must not be empty")]
    EmptyField { field: &'static str },
    #[error("invalid {field} value: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: CoreError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    status: Option<StatusFile>,
    roster: Option<RosterFile>,
    verdict: Option<VerdictFile>,
    diagnostics: Option<DiagnosticsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StatusFile {
    positive_value: Option<String>,
    phone_column: Option<String>,
    status_column: Option<String>,
    preview_rows: Option<usize>,
    last_column_fallback: Option<bool>,
    phone_keywords: Option<Vec<String>>,
    status_keywords: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RosterFile {
    phone_column: Option<String>,
    verdict_column: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VerdictFile {
    positive: Option<String>,
    negative: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DiagnosticsFile {
    coverage_sample: Option<usize>,
    coverage_examples: Option<usize>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(status) = parsed.status {
        if let Some(value) = status.positive_value {
            config.status.positive_value = required_text("status.positive_value", value)?;
        }
        config.status.phone_column = optional_text(status.phone_column);
        config.status.status_column = optional_text(status.status_column);
        if let Some(rows) = status.preview_rows {
            config.status.preview_rows = validate_preview_rows(rows)?;
        }
        if let Some(enabled) = status.last_column_fallback {
            config.status.last_column_fallback = enabled;
        }
        if let Some(keywords) = status.phone_keywords {
            config.status.keywords.phone = keyword_set("status.phone_keywords", &keywords)?;
        }
        if let Some(keywords) = status.status_keywords {
            config.status.keywords.status = keyword_set("status.status_keywords", &keywords)?;
        }
    }

    if let Some(roster) = parsed.roster {
        if let Some(column) = roster.phone_column {
            config.roster.phone_column = required_text("roster.phone_column", column)?;
        }
        if let Some(column) = roster.verdict_column {
            config.roster.verdict_column = required_text("roster.verdict_column", column)?;
        }
    }

    if let Some(verdict) = parsed.verdict {
        let defaults = VerdictLabels::default();
        let positive = verdict
            .positive
            .unwrap_or_else(|| defaults.label(Verdict::Positive).to_string());
        let negative = verdict
            .negative
            .unwrap_or_else(|| defaults.label(Verdict::Negative).to_string());
        config.verdict = VerdictLabels::new(&positive, &negative).map_err(|source| {
            ConfigError::InvalidField {
                field: "verdict",
                source,
            }
        })?;
    }

    if let Some(diagnostics) = parsed.diagnostics {
        if let Some(sample) = diagnostics.coverage_sample {
            config.diagnostics.coverage_sample = sample;
        }
        if let Some(examples) = diagnostics.coverage_examples {
            config.diagnostics.coverage_examples = examples;
        }
    }

    Ok(config)
}

pub fn validate_preview_rows(rows: usize) -> Result<usize> {
    if rows == 0 || rows > MAX_PREVIEW_ROWS {
        return Err(ConfigError::InvalidPreviewRows(rows));
    }
    Ok(rows)
}

fn required_text(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn keyword_set(field: &'static str, keywords: &[String]) -> Result<KeywordSet> {
    KeywordSet::new(keywords).map_err(|source| ConfigError::InvalidField { field, source })
}
