//! Simulation day model.
//!
//! # Design
//!
//! Time is a signed integer `Day`.  Day 0 is the first night the hotel
//! sells; negative days are pre-opening shopping days.  Using integer days
//! keeps window arithmetic exact and comparisons O(1).
//!
//! Two axes share this type: the *shopping* day a customer checks prices and
//! the *stay* days they intend to occupy a room.  `StayDates` is the
//! half-open stay interval; `Horizon` bounds both axes for one run.

use std::fmt;
use std::ops::RangeInclusive;

use crate::{HdError, HdResult};

// ── Day ───────────────────────────────────────────────────────────────────────

/// An absolute simulation day.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Day(pub i32);

impl Day {
    pub const ZERO: Day = Day(0);

    /// Return the day `n` steps after `self` (`n` may be negative).
    #[inline]
    pub fn offset(self, n: i32) -> Day {
        Day(self.0 + n)
    }

    /// The following day.
    #[inline]
    pub fn next(self) -> Day {
        Day(self.0 + 1)
    }
}

impl std::ops::Add<i32> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: i32) -> Day {
        Day(self.0 + rhs)
    }
}

impl std::ops::Sub for Day {
    type Output = i32;
    #[inline]
    fn sub(self, rhs: Day) -> i32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── StayDates ─────────────────────────────────────────────────────────────────

/// A half-open stay interval `[start, end)`; `end` is the checkout day.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StayDates {
    #[cfg_attr(feature = "serde", serde(rename = "start_date"))]
    pub start: Day,
    #[cfg_attr(feature = "serde", serde(rename = "end_date"))]
    pub end: Day,
}

impl StayDates {
    /// A stay of `nights` (≥ 1) starting at `start`.
    pub fn new(start: Day, nights: u32) -> Self {
        debug_assert!(nights >= 1, "a stay has at least one night");
        Self { start, end: start + nights as i32 }
    }

    /// Build from explicit bounds, rejecting `end <= start`.
    pub fn from_bounds(start: Day, end: Day) -> HdResult<Self> {
        if end <= start {
            return Err(HdError::Parse(format!(
                "stay end {end} must be after stay start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn nights(&self) -> u32 {
        (self.end - self.start) as u32
    }

    /// Every occupied night, ascending.
    pub fn nights_iter(&self) -> impl Iterator<Item = Day> + use<> {
        (self.start.0..self.end.0).map(Day)
    }
}

impl fmt::Display for StayDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.0, self.end.0)
    }
}

// ── Horizon ───────────────────────────────────────────────────────────────────

/// The simulated booking horizon.
///
/// Stays lie in `[first_stay_day, first_stay_day + stay_day_count)`.
/// Shopping may begin as early as `earliest_shopping_day` and runs through
/// the last stay day.  The default is the conventional 100-day season with
/// shopping opening 20 days before it.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Horizon {
    pub earliest_shopping_day: Day,
    pub first_stay_day: Day,
    pub stay_day_count: u32,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            earliest_shopping_day: Day(-20),
            first_stay_day: Day::ZERO,
            stay_day_count: 100,
        }
    }
}

impl Horizon {
    /// Exclusive upper bound on stay nights (the last possible checkout day).
    #[inline]
    pub fn stay_end(&self) -> Day {
        self.first_stay_day + self.stay_day_count as i32
    }

    /// The final day that is simulated (last stay night).
    #[inline]
    pub fn last_day(&self) -> Day {
        self.stay_end().offset(-1)
    }

    /// All shopping days from the earliest through the last day, ascending.
    pub fn shopping_days(&self) -> impl Iterator<Item = Day> + use<> {
        (self.earliest_shopping_day.0..=self.last_day().0).map(Day)
    }

    /// `true` if `day` is a sellable stay night.
    #[inline]
    pub fn contains_stay_night(&self, day: Day) -> bool {
        self.first_stay_day <= day && day < self.stay_end()
    }

    /// Stay start days at which a trip of `nights` whose shopping opens
    /// `lead_days` before the stay fits entirely inside the horizon.
    ///
    /// Returns `None` when no start day fits.
    pub fn feasible_starts(&self, lead_days: u32, nights: u32) -> Option<RangeInclusive<i32>> {
        let lo = self
            .first_stay_day
            .0
            .max(self.earliest_shopping_day.0 + lead_days as i32);
        let hi = self.stay_end().0 - nights as i32;
        (lo <= hi).then_some(lo..=hi)
    }

    /// Reject horizons with no stay nights or shopping opening after stays.
    pub fn validate(&self) -> HdResult<()> {
        if self.stay_day_count == 0 {
            return Err(HdError::Config("horizon has no stay days".into()));
        }
        if self.earliest_shopping_day > self.first_stay_day {
            return Err(HdError::Config(format!(
                "earliest shopping day {} is after the first stay day {}",
                self.earliest_shopping_day, self.first_stay_day
            )));
        }
        Ok(())
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Run-level knobs shared by generation and booking.
///
/// Typically loaded from a TOML file by the application crate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Master RNG seed.  The same seed always produces identical demand.
    pub seed: u64,

    /// Booking horizon bounds.
    pub horizon: Horizon,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { seed: 42, horizon: Horizon::default() }
    }
}
