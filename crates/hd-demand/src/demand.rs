//! Core demand types: `Demand`, `Itinerary`, and the owning `SimulationRun`.
//!
//! # Bitemporal layout
//!
//! A `Demand` is indexed on two independent axes: the `shopping_date` on
//! which a customer checks prices and the stay interval they want.  An
//! `Itinerary` fixes the stay and owns one `Demand` per shopping day, so only
//! `shopping_date` and `max_price_per_night` vary inside it.
//!
//! # Ownership
//!
//! `SimulationRun` owns every itinerary.  Other structures (the shopping-day
//! index, booking events) refer to itineraries by `ItineraryId`, which is the
//! position in the run's `(user_id, trip_id)`-sorted storage.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use hd_core::{Day, Horizon, ItineraryId, PersonaKind, StayDates, UserId};

use crate::{DemandError, DemandResult};

// ── Demand ────────────────────────────────────────────────────────────────────

/// One customer's shopping observation on one day for one prospective stay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub shopping_date:       Day,
    pub stay_start_date:     Day,
    /// Checkout day (exclusive).
    pub stay_end_date:       Day,
    pub max_price_per_night: f64,
}

impl Demand {
    #[inline]
    pub fn stay(&self) -> StayDates {
        StayDates { start: self.stay_start_date, end: self.stay_end_date }
    }

    /// `true` if this customer accepts a nightly rate of `price`.
    #[inline]
    pub fn accepts(&self, price: f64) -> bool {
        self.max_price_per_night >= price
    }
}

// ── Itinerary ─────────────────────────────────────────────────────────────────

/// One trip attempt by one user.
///
/// Invariants, checked on construction:
/// - `demands` is non-empty and strictly ascending by `shopping_date`;
/// - every demand shares the same stay, and every shopping date precedes it;
/// - prices are finite and non-negative.
///
/// The booking transition `Pending → Booked` happens at most once via
/// [`book`](Self::book).
#[derive(Clone, Debug, PartialEq)]
pub struct Itinerary {
    pub user_id: UserId,
    pub trip_id: u32,
    demands:     Vec<Demand>,
    booked_price_per_night: Option<f64>,
}

impl Itinerary {
    /// A fresh, unbooked itinerary.
    pub fn new(user_id: UserId, trip_id: u32, demands: Vec<Demand>) -> DemandResult<Self> {
        let itinerary = Self { user_id, trip_id, demands, booked_price_per_night: None };
        itinerary.check()?;
        Ok(itinerary)
    }

    /// Rebuild an itinerary with a previously recorded booking state.
    pub fn restore(
        user_id:  UserId,
        trip_id:  u32,
        demands:  Vec<Demand>,
        is_booked: bool,
        booked_price_per_night: Option<f64>,
    ) -> DemandResult<Self> {
        let mut itinerary = Self::new(user_id, trip_id, demands)?;
        match (is_booked, booked_price_per_night) {
            (false, None) => {}
            (true, Some(price)) if price.is_finite() && price >= 0.0 => {
                itinerary.booked_price_per_night = Some(price);
            }
            (true, Some(price)) => return Err(itinerary.malformed(format!("invalid booked price {price}"))),
            (true, None) => return Err(itinerary.malformed("booked without a price".into())),
            (false, Some(_)) => return Err(itinerary.malformed("price recorded but not booked".into())),
        }
        Ok(itinerary)
    }

    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    pub fn persona(&self) -> PersonaKind {
        self.user_id.persona
    }

    /// The stay shared by every demand of this itinerary.
    pub fn stay(&self) -> StayDates {
        self.demands[0].stay()
    }

    /// First through last shopping day.
    pub fn shopping_window(&self) -> RangeInclusive<Day> {
        let first = self.demands[0].shopping_date;
        let last = self.demands[self.demands.len() - 1].shopping_date;
        first..=last
    }

    /// The demand observed on `day`, with its position, if `day` is inside
    /// the window.
    pub fn demand_on(&self, day: Day) -> Option<(usize, &Demand)> {
        self.demands
            .binary_search_by_key(&day, |d| d.shopping_date)
            .ok()
            .map(|i| (i, &self.demands[i]))
    }

    pub fn is_booked(&self) -> bool {
        self.booked_price_per_night.is_some()
    }

    pub fn booked_price_per_night(&self) -> Option<f64> {
        self.booked_price_per_night
    }

    /// Record the booking.  Fails if the itinerary is already booked.
    pub fn book(&mut self, id: ItineraryId, price_per_night: f64) -> DemandResult<()> {
        if self.is_booked() {
            return Err(DemandError::AlreadyBooked(id));
        }
        self.booked_price_per_night = Some(price_per_night);
        Ok(())
    }

    fn check(&self) -> DemandResult<()> {
        let Some(first) = self.demands.first() else {
            return Err(self.malformed("no demands".into()));
        };
        let stay = StayDates::from_bounds(first.stay_start_date, first.stay_end_date)
            .map_err(|e| self.malformed(e.to_string()))?;

        let mut previous: Option<Day> = None;
        for d in &self.demands {
            if d.stay() != stay {
                return Err(self.malformed(format!(
                    "stay {} on {} differs from {}",
                    d.stay(), d.shopping_date, stay
                )));
            }
            if d.shopping_date >= stay.start {
                return Err(self.malformed(format!(
                    "shopping date {} is not before the stay", d.shopping_date
                )));
            }
            if !(d.max_price_per_night.is_finite() && d.max_price_per_night >= 0.0) {
                return Err(self.malformed(format!(
                    "invalid max price {} on {}", d.max_price_per_night, d.shopping_date
                )));
            }
            if previous.is_some_and(|p| p >= d.shopping_date) {
                return Err(self.malformed("shopping dates are not strictly ascending".into()));
            }
            previous = Some(d.shopping_date);
        }
        Ok(())
    }

    fn malformed(&self, reason: String) -> DemandError {
        DemandError::MalformedItinerary { user: self.user_id, trip_id: self.trip_id, reason }
    }
}

// ── SimulationParameters ──────────────────────────────────────────────────────

/// Generation parameters recorded with a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub total_users:            u32,
    pub proportion_casual:      f64,
    /// Default room pool for every stay night.
    pub hotel_capacity_per_day: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default, skip_serializing_if = "is_default_horizon")]
    pub horizon: Horizon,
}

fn is_default_horizon(h: &Horizon) -> bool {
    *h == Horizon::default()
}

// ── SimulationRun ─────────────────────────────────────────────────────────────

/// The aggregate: parameters plus every itinerary of every user.
///
/// Itineraries are stored sorted by `(user_id, trip_id)`; an
/// [`ItineraryId`] is a position in that order.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationRun {
    pub parameters: SimulationParameters,
    itineraries:    Vec<Itinerary>,
}

impl SimulationRun {
    /// Assemble a run, sorting itineraries and rejecting duplicate
    /// `(user_id, trip_id)` pairs.
    pub fn new(parameters: SimulationParameters, mut itineraries: Vec<Itinerary>) -> DemandResult<Self> {
        itineraries.sort_by_key(|i| (i.user_id, i.trip_id));
        if let Some(pair) = itineraries
            .windows(2)
            .find(|w| (w[0].user_id, w[0].trip_id) == (w[1].user_id, w[1].trip_id))
        {
            return Err(DemandError::DuplicateItinerary {
                user:    pair[0].user_id,
                trip_id: pair[0].trip_id,
            });
        }
        if ItineraryId::try_from(itineraries.len()).is_err() {
            return Err(DemandError::InvalidParameter {
                name:   "itineraries",
                reason: format!("{} itineraries exceed the id space", itineraries.len()),
            });
        }
        Ok(Self { parameters, itineraries })
    }

    pub fn horizon(&self) -> Horizon {
        self.parameters.horizon
    }

    pub fn capacity_per_day(&self) -> u32 {
        self.parameters.hotel_capacity_per_day
    }

    pub fn itineraries(&self) -> &[Itinerary] {
        &self.itineraries
    }

    pub fn itinerary(&self, id: ItineraryId) -> Option<&Itinerary> {
        self.itineraries.get(id.index())
    }

    /// Every itinerary paired with its id, ascending.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (ItineraryId, &Itinerary)> + '_ {
        self.itineraries
            .iter()
            .enumerate()
            .map(|(i, it)| (ItineraryId(i as u32), it))
    }

    /// Itineraries grouped by user, ascending by user id then trip id.
    pub fn users(&self) -> impl Iterator<Item = (UserId, &[Itinerary])> + '_ {
        self.itineraries
            .chunk_by(|a, b| a.user_id == b.user_id)
            .map(|group| (group[0].user_id, group))
    }

    pub fn user_count(&self) -> usize {
        self.users().count()
    }

    pub fn demand_count(&self) -> usize {
        self.itineraries.iter().map(|i| i.demands().len()).sum()
    }

    pub fn booked_count(&self) -> usize {
        self.itineraries.iter().filter(|i| i.is_booked()).count()
    }

    /// Mark one itinerary booked at `price_per_night`.
    pub fn apply_booking(&mut self, id: ItineraryId, price_per_night: f64) -> DemandResult<()> {
        self.itineraries
            .get_mut(id.index())
            .ok_or(DemandError::UnknownItinerary(id))?
            .book(id, price_per_night)
    }
}
