//! Price and capacity quotes per stay date.
//!
//! The engine consumes exactly one [`Quote`] per stay date ([`DailyPrices`]).
//! Several suppliers may quote the same date; [`SourceQuotes`] holds those
//! and [`SelectionPolicy`] reduces them to one quote per date.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hd_core::Day;

/// Source id used for the aggregated third-party channel.
pub const TRAVEL_PLATFORM: &str = "travel_platform";

/// A nightly rate for one stay date, optionally capped by a room count.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    /// Rooms offered on this date; `None` means only the hotel's own
    /// remaining capacity limits bookings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl Quote {
    pub fn new(price: f64) -> Self {
        Self { price, capacity: None }
    }

    pub fn with_capacity(price: f64, capacity: u32) -> Self {
        Self { price, capacity: Some(capacity) }
    }

    /// `false` only for an explicit zero room count.
    pub fn has_rooms(&self) -> bool {
        self.capacity != Some(0)
    }
}

/// One quote per stay date: the engine's price input for one day.
pub type DailyPrices = BTreeMap<Day, Quote>;

// ── Multi-source quotes ───────────────────────────────────────────────────────

/// How competing source quotes for one date become a single quote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// The cheapest source that still has rooms; if none has rooms, the
    /// cheapest overall.  Ties go to the lexicographically first source id.
    #[default]
    LowestPrice,
    /// Only the named source; dates it does not quote stay unpriced.
    Source(String),
}

/// Quotes per stay date, per source id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceQuotes {
    inner: BTreeMap<Day, BTreeMap<String, Quote>>,
}

impl SourceQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `source`'s quote for `date`, replacing any earlier one.
    pub fn insert(&mut self, date: Day, source: impl Into<String>, quote: Quote) {
        self.inner.entry(date).or_default().insert(source.into(), quote);
    }

    /// Reduce to one quote per date under `policy`.
    pub fn select(&self, policy: &SelectionPolicy) -> DailyPrices {
        self.inner
            .iter()
            .filter_map(|(&date, sources)| select_one(sources, policy).map(|q| (date, q)))
            .collect()
    }
}

fn select_one(sources: &BTreeMap<String, Quote>, policy: &SelectionPolicy) -> Option<Quote> {
    match policy {
        SelectionPolicy::Source(id) => sources.get(id).copied(),
        SelectionPolicy::LowestPrice => {
            let cheapest = |with_rooms: bool| {
                sources
                    .values()
                    .filter(|q| !with_rooms || q.has_rooms())
                    .copied()
                    .reduce(|best, q| if q.price < best.price { q } else { best })
            };
            cheapest(true).or_else(|| cheapest(false))
        }
    }
}
