//! `hd-service`: day-driven API over many independent simulations.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`registry`] | `RunRegistry`: create/open/save runs, status, advance-day  |
//! | [`prices`]   | Wire-format price parsing with per-date issue reporting    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use hd_service::{AdvanceDayRequest, CreateRun, RunRegistry};
//!
//! let registry = RunRegistry::new();
//! let id = registry.create(CreateRun {
//!     total_users: 100, proportion_casual: 0.7, hotel_capacity_per_day: 20,
//!     seed: Some(7), simulation_id: None,
//! })?;
//! let response = registry.advance_day(&id, &AdvanceDayRequest {
//!     simulation_day: -20,
//!     prices: serde_json::json!({ "30": 95.0, "31": { "hotel_a": { "price": 90.0, "capacity": 3 } } }),
//! })?;
//! println!("{} bookings", response.bookings.len());
//! ```

pub mod error;
pub mod prices;
pub mod registry;

#[cfg(test)]
mod tests;

pub use error::{ServiceError, ServiceResult};
pub use prices::{ParsedPrices, PriceIssue, parse_prices};
pub use registry::{AdvanceDayRequest, AdvanceDayResponse, CreateRun, RunRegistry, RunStatus};
