//! `CapacityLedger`: rooms sold per stay night against the daily pool.

use std::collections::BTreeMap;

use hd_core::{Day, Horizon, StayDates};
use hd_demand::SimulationRun;

/// Rooms sold per stay night.
///
/// Every night inside the horizon starts with `capacity_per_day` rooms.
/// Nights outside the horizon have no rooms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapacityLedger {
    capacity_per_day: u32,
    horizon:          Horizon,
    sold:             BTreeMap<Day, u32>,
}

impl CapacityLedger {
    pub fn new(capacity_per_day: u32, horizon: Horizon) -> Self {
        Self { capacity_per_day, horizon, sold: BTreeMap::new() }
    }

    /// Rebuild from the bookings already recorded in `run`.
    pub fn from_run(run: &SimulationRun) -> Self {
        let mut ledger = Self::new(run.capacity_per_day(), run.horizon());
        for itinerary in run.itineraries().iter().filter(|i| i.is_booked()) {
            ledger.reserve(itinerary.stay());
        }
        ledger
    }

    pub fn capacity_per_day(&self) -> u32 {
        self.capacity_per_day
    }

    pub fn sold(&self, night: Day) -> u32 {
        self.sold.get(&night).copied().unwrap_or(0)
    }

    pub fn remaining(&self, night: Day) -> u32 {
        if !self.horizon.contains_stay_night(night) {
            return 0;
        }
        self.capacity_per_day.saturating_sub(self.sold(night))
    }

    /// `true` if every night of `stay` has a room left, counting at most
    /// `limit(night)` rooms for nights where it returns `Some`.
    pub fn can_host(&self, stay: StayDates, limit: impl Fn(Day) -> Option<u32>) -> bool {
        stay.nights_iter().all(|night| {
            let left = self.remaining(night);
            limit(night).map_or(left, |cap| left.min(cap)) > 0
        })
    }

    /// Take one room on every night of `stay`.
    pub fn reserve(&mut self, stay: StayDates) {
        for night in stay.nights_iter() {
            *self.sold.entry(night).or_default() += 1;
        }
    }

    /// Total room nights sold.
    pub fn room_nights_sold(&self) -> u64 {
        self.sold.values().map(|&n| n as u64).sum()
    }
}
