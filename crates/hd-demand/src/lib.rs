//! `hd-demand`: who shops for a room, when, and at what price.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`demand`]      | `Demand`, `Itinerary`, `SimulationParameters`, `SimulationRun` |
//! | [`persona`]     | `PersonaModel` trait, `CasualModel`, `BusinessModel`, `PriceCurve` |
//! | [`generator`]   | `DemandGenerator`, `generate`                         |
//! | [`index`]       | `DemandIndex`: pending demand keyed by shopping day  |
//! | [`error`]       | `DemandError`, `DemandResult`                         |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Sample users on Rayon's thread pool (same output).      |

pub mod demand;
pub mod error;
pub mod generator;
pub mod index;
pub mod persona;


pub use demand::{Demand, Itinerary, SimulationParameters, SimulationRun};
pub use error::{DemandError, DemandResult};
pub use generator::{DemandGenerator, GenerationParams, generate};
pub use index::{DemandIndex, DemandRef};
pub use persona::{
    BusinessModel, CasualModel, LeadDays, NormalParam, PersonaModel, PersonaSet, PriceCurve,
    TripPlan,
};
