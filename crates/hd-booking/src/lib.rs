//! `hd-booking`: turns daily price quotes into bookings.
//!
//! # Day loop
//!
//! ```text
//! for day in horizon.earliest_shopping_day..=horizon.last_day():
//!   ① Quotes     PriceSource publishes one Quote per stay date
//!                (SourceQuotes + SelectionPolicy when several suppliers quote).
//!   ② Drain      DemandIndex::take_day(day) yields today's unbooked demand.
//!   ③ Resolve    BookingEngine::resolve checks price, then capacity on every
//!                night, in ascending user id; nothing is mutated.
//!   ④ Apply      each BookingEvent books its itinerary; ledger replaced.
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`quote`]       | `Quote`, `DailyPrices`, `SourceQuotes`, `SelectionPolicy` |
//! | [`ledger`]      | `CapacityLedger`                                      |
//! | [`engine`]      | `BookingEngine`, `BookingEvent`, `Resolution`, `DaySummary` |
//! | [`simulation`]  | `Simulation`, `DayOutcome`, `BookingRecord`, `OutOfOrderDay` |
//! | [`observer`]    | `DayObserver`, `NoopObserver`                         |
//! | [`pricing`]     | `PriceSource`, `FlatPrice`, `LeadTimePrice`           |
//! | [`stats`]       | `RunStatistics`, `PersonaStatistics`                  |

pub mod engine;
pub mod error;
pub mod ledger;
pub mod observer;
pub mod pricing;
pub mod quote;
pub mod simulation;
pub mod stats;


pub use engine::{BookingEngine, BookingEvent, DaySummary, Resolution};
pub use error::{BookingError, BookingResult};
pub use ledger::CapacityLedger;
pub use observer::{DayObserver, NoopObserver};
pub use pricing::{FlatPrice, LeadTimePrice, MarkupPrice, PriceSource};
pub use quote::{DailyPrices, Quote, SelectionPolicy, SourceQuotes, TRAVEL_PLATFORM};
pub use simulation::{BookingRecord, DayOutcome, OutOfOrderDay, Simulation};
pub use stats::{PersonaStatistics, RunStatistics};
