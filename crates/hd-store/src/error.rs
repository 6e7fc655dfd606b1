//! Error types for hd-store.

use hd_demand::DemandError;
use thiserror::Error;

/// Errors from reading or writing snapshots and reports.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid snapshot: {0}")]
    Demand(#[from] DemandError),

    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
