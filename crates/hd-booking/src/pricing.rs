//! Reference price sources for full-horizon runs.
//!
//! A [`PriceSource`] plays the pricing strategy: once per simulated day it
//! publishes the quotes the engine will see.  These are fixed schedules for
//! driving and testing the simulator, not optimizers.

use serde::{Deserialize, Serialize};

use hd_core::{Day, Horizon};

use crate::{DailyPrices, Quote};

pub trait PriceSource {
    /// Quotes published on shopping day `day`.
    fn quotes(&mut self, day: Day, horizon: &Horizon) -> DailyPrices;
}

impl<P: PriceSource + ?Sized> PriceSource for &mut P {
    fn quotes(&mut self, day: Day, horizon: &Horizon) -> DailyPrices {
        (**self).quotes(day, horizon)
    }
}

impl<P: PriceSource + ?Sized> PriceSource for Box<P> {
    fn quotes(&mut self, day: Day, horizon: &Horizon) -> DailyPrices {
        (**self).quotes(day, horizon)
    }
}

/// Stay nights still sellable on `day`.
fn quotable_nights(day: Day, horizon: &Horizon) -> impl Iterator<Item = Day> + use<> {
    let first = day.max(horizon.first_stay_day);
    (first.0..horizon.stay_end().0).map(Day)
}

/// The same rate for every stay date.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatPrice {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl PriceSource for FlatPrice {
    fn quotes(&mut self, day: Day, horizon: &Horizon) -> DailyPrices {
        let quote = Quote { price: self.price, capacity: self.capacity };
        quotable_nights(day, horizon).map(|night| (night, quote)).collect()
    }
}

/// A base rate marked up as the stay date approaches.
///
/// | Days until stay | Multiplier |
/// |-----------------|------------|
/// | ≤ 7             | 1.5        |
/// | ≤ 14            | 1.3        |
/// | ≤ 30            | 1.1        |
/// | otherwise       | 1.0        |
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeadTimePrice {
    pub base_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl LeadTimePrice {
    pub fn multiplier(lead_days: i32) -> f64 {
        match lead_days {
            ..=7 => 1.5,
            8..=14 => 1.3,
            15..=30 => 1.1,
            _ => 1.0,
        }
    }

    pub fn price_for(&self, day: Day, night: Day) -> f64 {
        self.base_price * Self::multiplier(night - day)
    }
}

impl PriceSource for LeadTimePrice {
    fn quotes(&mut self, day: Day, horizon: &Horizon) -> DailyPrices {
        quotable_nights(day, horizon)
            .map(|night| (night, Quote { price: self.price_for(day, night), capacity: self.capacity }))
            .collect()
    }
}

/// A resale channel: buys at a lead-time rate, adds a per-room operating
/// cost, then applies its margin.
///
/// `price = (base.price_for(day, night) + operating_cost) * (1 + margin)`
///
/// `capacity` is the channel's own allotment; the base rate's capacity is
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkupPrice {
    pub base:           LeadTimePrice,
    #[serde(default)]
    pub operating_cost: f64,
    #[serde(default)]
    pub margin:         f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity:       Option<u32>,
}

impl MarkupPrice {
    pub fn price_for(&self, day: Day, night: Day) -> f64 {
        (self.base.price_for(day, night) + self.operating_cost) * (1.0 + self.margin)
    }
}

impl PriceSource for MarkupPrice {
    fn quotes(&mut self, day: Day, horizon: &Horizon) -> DailyPrices {
        quotable_nights(day, horizon)
            .map(|night| (night, Quote { price: self.price_for(day, night), capacity: self.capacity }))
            .collect()
    }
}
