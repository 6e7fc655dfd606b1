//! Run-level statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use hd_core::{Day, PersonaKind};
use hd_demand::SimulationRun;

/// Counters for one persona.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PersonaStatistics {
    pub itineraries:        usize,
    pub bookings:           usize,
    pub booked_room_nights: u64,
    pub revenue:            f64,
}

/// Revenue and occupancy of a run as of a given shopping day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunStatistics {
    pub total_itineraries:       usize,
    pub total_bookings:          usize,
    pub booked_room_nights:      u64,
    pub total_revenue:           f64,
    /// Room nights available over the horizon (`capacity × stay days`).
    pub capacity_room_nights:    u64,
    /// Booked room nights as a percentage of `capacity_room_nights`.
    pub occupancy_rate:          f64,
    /// Revenue per booked room night (ADR).
    pub average_price_per_night: f64,
    /// Revenue per available room night (RevPAR).
    pub revenue_per_available_room: f64,
    /// Unbooked itineraries whose window has not closed yet.
    pub pending_itineraries:     usize,
    /// Unbooked itineraries whose last shopping day is before `as_of`.
    pub expired_itineraries:     usize,
    pub by_persona:              BTreeMap<PersonaKind, PersonaStatistics>,
}

impl RunStatistics {
    /// Aggregate `run`; `as_of` is the next day still to be processed.
    pub fn from_run(run: &SimulationRun, as_of: Day) -> Self {
        let mut by_persona: BTreeMap<PersonaKind, PersonaStatistics> = BTreeMap::new();
        let mut pending = 0;
        let mut expired = 0;

        for itinerary in run.itineraries() {
            let entry = by_persona.entry(itinerary.persona()).or_default();
            entry.itineraries += 1;
            match itinerary.booked_price_per_night() {
                Some(price) => {
                    let nights = itinerary.stay().nights() as u64;
                    entry.bookings += 1;
                    entry.booked_room_nights += nights;
                    entry.revenue += price * nights as f64;
                }
                None if *itinerary.shopping_window().end() < as_of => expired += 1,
                None => pending += 1,
            }
        }

        let total_bookings = by_persona.values().map(|p| p.bookings).sum();
        let booked_room_nights: u64 = by_persona.values().map(|p| p.booked_room_nights).sum();
        let total_revenue: f64 = by_persona.values().map(|p| p.revenue).sum();
        let capacity_room_nights = run.capacity_per_day() as u64 * run.horizon().stay_day_count as u64;

        let ratio = |num: f64, den: u64| if den == 0 { 0.0 } else { num / den as f64 };

        Self {
            total_itineraries: run.itineraries().len(),
            total_bookings,
            booked_room_nights,
            total_revenue,
            capacity_room_nights,
            occupancy_rate: ratio(booked_room_nights as f64 * 100.0, capacity_room_nights),
            average_price_per_night: ratio(total_revenue, booked_room_nights),
            revenue_per_available_room: ratio(total_revenue, capacity_room_nights),
            pending_itineraries: pending,
            expired_itineraries: expired,
            by_persona,
        }
    }
}
