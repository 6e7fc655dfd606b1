//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `HdError` as one variant
//! via `#[from]`.

use thiserror::Error;

/// The top-level error type for `hd-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HdError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `hd-core`.
pub type HdResult<T> = Result<T, HdError>;
