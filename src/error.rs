//! Error types for the boundary layers. The scheduling core itself never fails.

use chrono::NaiveDate;
use thiserror::Error;

/// A schedule request rejected before it reaches the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("End date must be after start date (start {start}, end {end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("daily work hours must be between 1 and 24 (got {0})")]
    DailyHoursOutOfRange(u32),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("Project {0} not found")]
    ProjectNotFound(i32),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
