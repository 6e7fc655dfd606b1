//! `hd-core`: foundational types for the hotel demand simulator.
//!
//! This crate is a dependency of every other `hd-*` crate.  It has no `hd-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ItineraryId`, `UserId`, `PersonaKind`                |
//! | [`time`]        | `Day`, `StayDates`, `Horizon`, `RunConfig`            |
//! | [`rng`]         | `UserRng` (per-user), `SimRng` (global)               |
//! | [`error`]       | `HdError`, `HdResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{HdError, HdResult};
pub use ids::{ItineraryId, PersonaKind, UserId};
pub use rng::{SimRng, UserRng};
pub use time::{Day, Horizon, RunConfig, StayDates};
