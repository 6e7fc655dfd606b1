//! Persona models: how each customer archetype travels and what it pays.
//!
//! A persona answers two questions through the [`PersonaModel`] trait:
//!
//! 1. *When and how long?*  [`sample_trip_plan`][PersonaModel::sample_trip_plan]
//!    draws a trip length and a shopping window expressed as lead times
//!    before the stay.
//! 2. *How much?*  [`sample_price_curve`][PersonaModel::sample_price_curve]
//!    draws a [`PriceCurve`] that maps a position in the shopping window to
//!    a willingness to pay.
//!
//! The set of personas is closed ([`PersonaKind`]); [`PersonaSet::model`]
//! dispatches a kind to its model.  Parameters are plain data with
//! defaults matching the reference calibration, so applications can
//! override them from configuration.

use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use hd_core::{PersonaKind, UserRng};

use crate::{DemandError, DemandResult};

/// Resample budget for strictly positive price draws.
const MAX_PRICE_RESAMPLES: u32 = 32;

/// Price used when every resample came out non-positive.
const PRICE_FLOOR: f64 = 1.0;

// ── Distribution parameters ───────────────────────────────────────────────────

/// A normal distribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalParam {
    pub mean:    f64,
    pub std_dev: f64,
}

impl NormalParam {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    fn distribution(&self) -> DemandResult<Normal<f64>> {
        Normal::new(self.mean, self.std_dev).map_err(|e| {
            DemandError::Distribution(format!("normal({}, {}): {e}", self.mean, self.std_dev))
        })
    }

    /// Draw and round to the nearest whole number of nights (at least 1).
    pub fn sample_nights(&self, rng: &mut UserRng) -> DemandResult<u32> {
        let draw: f64 = rng.inner().sample(self.distribution()?);
        Ok(draw.round().max(1.0) as u32)
    }

    /// Draw a strictly positive price, resampling non-positive draws.
    pub fn sample_price(&self, rng: &mut UserRng) -> DemandResult<f64> {
        let normal = self.distribution()?;
        for _ in 0..MAX_PRICE_RESAMPLES {
            let draw: f64 = rng.inner().sample(normal);
            if draw > 0.0 {
                return Ok(draw);
            }
        }
        Ok(PRICE_FLOOR)
    }
}

/// An inclusive integer range of lead days, sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDays {
    pub min: u32,
    pub max: u32,
}

impl LeadDays {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut UserRng) -> u32 {
        rng.gen_range(self.min..=self.max)
    }

    fn check(&self, name: &'static str) -> DemandResult<()> {
        if self.min > self.max {
            return Err(DemandError::InvalidParameter {
                name,
                reason: format!("min {} exceeds max {}", self.min, self.max),
            });
        }
        Ok(())
    }
}

// ── TripPlan ──────────────────────────────────────────────────────────────────

/// One sampled trip, relative to its (not yet placed) stay start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TripPlan {
    /// Stay length in nights (≥ 1).
    pub nights: u32,
    /// Shopping opens this many days before the stay.
    pub window_open_lead: u32,
    /// Shopping closes this many days before the stay (≥ 1, < open lead).
    pub window_close_lead: u32,
}

impl TripPlan {
    /// Build a plan, clamping a degenerate window so that shopping closes
    /// at least one day after it opens and no later than the day before the
    /// stay.
    pub fn new(nights: u32, window_open_lead: u32, window_close_lead: u32) -> Self {
        let window_open_lead = window_open_lead.max(2);
        let window_close_lead = window_close_lead.clamp(1, window_open_lead - 1);
        Self { nights: nights.max(1), window_open_lead, window_close_lead }
    }

    /// Offset of the first shopping day from the stay start (negative).
    pub fn window_start_offset(&self) -> i32 {
        -(self.window_open_lead as i32)
    }

    /// Offset of the last shopping day from the stay start (negative).
    pub fn window_end_offset(&self) -> i32 {
        -(self.window_close_lead as i32)
    }

    /// Number of shopping days, both endpoints included.
    pub fn window_len(&self) -> u32 {
        self.window_open_lead - self.window_close_lead + 1
    }
}

// ── PriceCurve ────────────────────────────────────────────────────────────────

/// Willingness to pay across a shopping window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PriceCurve {
    /// Linear from `min_price` on the first window day to `max_price` on the
    /// last.
    Rising { min_price: f64, max_price: f64 },
    /// The same price on every window day.
    Flat { max_price: f64 },
}

impl PriceCurve {
    /// Price on the `offset`-th day (0-based) of a window of `window_len` days.
    pub fn price_at(&self, offset: u32, window_len: u32) -> f64 {
        match *self {
            PriceCurve::Flat { max_price } => max_price,
            PriceCurve::Rising { min_price, max_price } => {
                if window_len <= 1 {
                    return max_price;
                }
                let progress = offset.min(window_len - 1) as f64 / (window_len - 1) as f64;
                min_price + (max_price - min_price) * progress
            }
        }
    }
}

// ── PersonaModel ──────────────────────────────────────────────────────────────

/// Behavior profile of one customer archetype.
///
/// Implementations must be pure given the RNG: two calls with RNGs in the
/// same state return the same result.
pub trait PersonaModel: Send + Sync {
    fn kind(&self) -> PersonaKind;

    /// Trips each user of this persona attempts over the horizon.
    fn trips_per_year(&self) -> usize;

    /// Sample the length and shopping window of trip `trip_index`
    /// (`0..trips_per_year()`).
    fn sample_trip_plan(&self, trip_index: usize, rng: &mut UserRng) -> DemandResult<TripPlan>;

    /// Sample the willingness-to-pay curve for one trip.
    fn sample_price_curve(&self, rng: &mut UserRng) -> DemandResult<PriceCurve>;

    /// Reject parameter sets that cannot produce valid trips.
    fn validate(&self) -> DemandResult<()>;
}

// ── Casual ────────────────────────────────────────────────────────────────────

/// Leisure traveller: few long-planned trips, price sensitive early,
/// willing to pay more as the stay approaches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasualModel {
    pub trips_per_year:     usize,
    pub nights:             NormalParam,
    pub window_open_lead:   LeadDays,
    pub window_close_lead:  LeadDays,
    pub base_max_price:     NormalParam,
    /// `min_price = base_max_price * U[min_price_fraction]`.
    pub min_price_fraction: (f64, f64),
}

impl Default for CasualModel {
    fn default() -> Self {
        Self {
            trips_per_year:     2,
            nights:             NormalParam::new(8.0, 2.0),
            window_open_lead:   LeadDays::new(20, 50),
            window_close_lead:  LeadDays::new(5, 15),
            base_max_price:     NormalParam::new(110.0, 20.0),
            min_price_fraction: (0.7, 0.9),
        }
    }
}

impl PersonaModel for CasualModel {
    fn kind(&self) -> PersonaKind {
        PersonaKind::Casual
    }

    fn trips_per_year(&self) -> usize {
        self.trips_per_year
    }

    fn sample_trip_plan(&self, _trip_index: usize, rng: &mut UserRng) -> DemandResult<TripPlan> {
        let nights = self.nights.sample_nights(rng)?;
        let open = self.window_open_lead.sample(rng);
        let close = self.window_close_lead.sample(rng);
        Ok(TripPlan::new(nights, open, close))
    }

    fn sample_price_curve(&self, rng: &mut UserRng) -> DemandResult<PriceCurve> {
        let max_price = self.base_max_price.sample_price(rng)?;
        let (lo, hi) = self.min_price_fraction;
        let fraction = rng.gen_range(lo..=hi);
        Ok(PriceCurve::Rising { min_price: max_price * fraction, max_price })
    }

    fn validate(&self) -> DemandResult<()> {
        self.window_open_lead.check("casual.window_open_lead")?;
        self.window_close_lead.check("casual.window_close_lead")?;
        let (lo, hi) = self.min_price_fraction;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(DemandError::InvalidParameter {
                name:   "casual.min_price_fraction",
                reason: format!("({lo}, {hi}) must be an ordered pair inside [0, 1]"),
            });
        }
        self.nights.distribution()?;
        self.base_max_price.distribution()?;
        Ok(())
    }
}

// ── Business ──────────────────────────────────────────────────────────────────

/// Corporate traveller: one long and several short trips a year, booked at
/// short notice at a fixed, higher price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessModel {
    pub long_trips:        usize,
    pub short_trips:       usize,
    pub long_nights:       NormalParam,
    pub short_nights:      NormalParam,
    pub window_open_lead:  LeadDays,
    pub window_close_lead: u32,
    pub max_price:         NormalParam,
}

impl Default for BusinessModel {
    fn default() -> Self {
        Self {
            long_trips:        1,
            short_trips:       4,
            long_nights:       NormalParam::new(20.0, 5.0),
            short_nights:      NormalParam::new(5.0, 1.0),
            window_open_lead:  LeadDays::new(3, 7),
            window_close_lead: 1,
            max_price:         NormalParam::new(150.0, 10.0),
        }
    }
}

impl PersonaModel for BusinessModel {
    fn kind(&self) -> PersonaKind {
        PersonaKind::Business
    }

    fn trips_per_year(&self) -> usize {
        self.long_trips + self.short_trips
    }

    /// Trips `0..long_trips` are long; the rest are short.
    fn sample_trip_plan(&self, trip_index: usize, rng: &mut UserRng) -> DemandResult<TripPlan> {
        let length = if trip_index < self.long_trips { &self.long_nights } else { &self.short_nights };
        let nights = length.sample_nights(rng)?;
        let open = self.window_open_lead.sample(rng);
        Ok(TripPlan::new(nights, open, self.window_close_lead))
    }

    fn sample_price_curve(&self, rng: &mut UserRng) -> DemandResult<PriceCurve> {
        Ok(PriceCurve::Flat { max_price: self.max_price.sample_price(rng)? })
    }

    fn validate(&self) -> DemandResult<()> {
        self.window_open_lead.check("business.window_open_lead")?;
        self.long_nights.distribution()?;
        self.short_nights.distribution()?;
        self.max_price.distribution()?;
        Ok(())
    }
}

// ── PersonaSet ────────────────────────────────────────────────────────────────

/// One model per [`PersonaKind`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSet {
    pub casual:   CasualModel,
    pub business: BusinessModel,
}

impl PersonaSet {
    pub fn model(&self, kind: PersonaKind) -> &dyn PersonaModel {
        match kind {
            PersonaKind::Casual => &self.casual,
            PersonaKind::Business => &self.business,
        }
    }

    pub fn validate(&self) -> DemandResult<()> {
        self.casual.validate()?;
        self.business.validate()
    }
}
