//! `BookingEngine`: decides which of today's shoppers convert.
//!
//! # Command and apply
//!
//! ```text
//! resolve(run, day, candidates, ledger, prices)   // reads only
//!     → Resolution { events, ledger', summary }
//! Simulation::apply(resolution)                   // the only writer
//! ```
//!
//! Candidates are visited in ascending `ItineraryId`, which is ascending
//! user id then trip id, so the same inputs always allocate rooms to the
//! same customers.

use std::collections::BTreeMap;

use serde::Serialize;

use hd_core::{Day, ItineraryId, StayDates, UserId};
use hd_demand::{DemandRef, SimulationRun};

use crate::{CapacityLedger, DailyPrices};

/// One booking decided by the engine, not yet applied to the run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BookingEvent {
    pub day:             Day,
    pub itinerary:       ItineraryId,
    pub user_id:         UserId,
    pub trip_id:         u32,
    pub price_per_night: f64,
    pub stay:            StayDates,
}

/// Per-day counters.
///
/// Every checked candidate lands in exactly one of `booked`,
/// `price_rejections`, `capacity_rejections` or `unpriced`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day:                 Day,
    pub checked:             u32,
    pub booked:              u32,
    pub price_rejections:    u32,
    pub capacity_rejections: u32,
    pub unpriced:            u32,
}

impl DaySummary {
    pub fn new(day: Day) -> Self {
        Self { day, ..Self::default() }
    }
}

/// The outcome of [`BookingEngine::resolve`].
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub events:  Vec<BookingEvent>,
    /// The ledger with every event's nights reserved.
    pub ledger:  CapacityLedger,
    pub summary: DaySummary,
}

/// Matching rules for one shopping day.
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingEngine;

impl BookingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decide today's bookings without mutating anything.
    ///
    /// - The nightly rate is the quote for the stay's first night.  No quote
    ///   means the candidate is unpriced today and stays pending.
    /// - A candidate converts when its willingness to pay is at least that
    ///   rate.
    /// - Each night of the stay needs a room: the ledger's remaining rooms,
    ///   capped by that night's quoted capacity when there is one, minus
    ///   rooms already taken earlier in this call.
    pub fn resolve(
        &self,
        run:        &SimulationRun,
        day:        Day,
        candidates: &[DemandRef],
        ledger:     &CapacityLedger,
        prices:     &DailyPrices,
    ) -> Resolution {
        let mut ledger = ledger.clone();
        let mut taken_today: BTreeMap<Day, u32> = BTreeMap::new();
        let mut events = Vec::new();
        let mut summary = DaySummary::new(day);

        for entry in candidates {
            let Some(itinerary) = run.itinerary(entry.itinerary) else { continue };
            if itinerary.is_booked() {
                continue;
            }
            let Some(demand) = entry.resolve(run) else { continue };
            summary.checked += 1;

            let stay = demand.stay();
            let Some(quote) = prices.get(&stay.start) else {
                summary.unpriced += 1;
                continue;
            };
            if !demand.accepts(quote.price) {
                summary.price_rejections += 1;
                continue;
            }

            let quoted_left = |night: Day| {
                prices.get(&night).and_then(|q| q.capacity).map(|cap| {
                    cap.saturating_sub(taken_today.get(&night).copied().unwrap_or(0))
                })
            };
            if !ledger.can_host(stay, quoted_left) {
                summary.capacity_rejections += 1;
                continue;
            }

            ledger.reserve(stay);
            for night in stay.nights_iter() {
                *taken_today.entry(night).or_default() += 1;
            }
            summary.booked += 1;
            events.push(BookingEvent {
                day,
                itinerary: entry.itinerary,
                user_id: itinerary.user_id,
                trip_id: itinerary.trip_id,
                price_per_night: quote.price,
                stay,
            });
        }

        Resolution { events, ledger, summary }
    }
}
