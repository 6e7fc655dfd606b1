use hd_core::HdError;
use hd_demand::DemandError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookingError {
    #[error("booking configuration error: {0}")]
    Config(String),

    #[error("demand error: {0}")]
    Demand(#[from] DemandError),

    #[error(transparent)]
    Core(#[from] HdError),
}

pub type BookingResult<T> = Result<T, BookingError>;
