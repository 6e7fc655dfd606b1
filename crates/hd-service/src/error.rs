use hd_booking::BookingError;
use hd_demand::DemandError;
use hd_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown run `{0}`")]
    UnknownRun(String),

    #[error("run `{0}` already exists")]
    DuplicateRun(String),

    #[error("malformed price input: {0}")]
    MalformedPriceInput(String),

    #[error("run `{0}` is unavailable after a panic while it was locked")]
    Poisoned(String),

    #[error(transparent)]
    Demand(#[from] DemandError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
