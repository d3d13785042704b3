use chrono::NaiveDate;
use thiserror::Error;

/// Errors from the ingest, window and output layers.
///
/// The aggregation core itself never fails: nulls, blanks and zero
/// denominators all have defined fallbacks.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
