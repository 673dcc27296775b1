use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(String),
    #[error("keyword list cannot be empty")]
    EmptyKeywordSet,
    #[error("invalid keyword: {0:?}")]
    InvalidKeyword(String),
    #[error("invalid verdict label")]
    InvalidVerdictLabel,
}
