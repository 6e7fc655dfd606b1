use hd_core::{HdError, ItineraryId, UserId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DemandError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name:   &'static str,
        reason: String,
    },

    #[error("invalid distribution: {0}")]
    Distribution(String),

    #[error("could not place trip {trip_id} of {user} inside the horizon after {attempts} attempts")]
    Placement {
        user:     UserId,
        trip_id:  u32,
        attempts: u32,
    },

    #[error("malformed itinerary {user}/{trip_id}: {reason}")]
    MalformedItinerary {
        user:    UserId,
        trip_id: u32,
        reason:  String,
    },

    #[error("duplicate itinerary {user}/{trip_id}")]
    DuplicateItinerary { user: UserId, trip_id: u32 },

    #[error("{0} not found")]
    UnknownItinerary(ItineraryId),

    #[error("{0} is already booked")]
    AlreadyBooked(ItineraryId),

    #[error(transparent)]
    Core(#[from] HdError),
}

pub type DemandResult<T> = Result<T, DemandError>;
