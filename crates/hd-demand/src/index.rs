//! `DemandIndex`: pending demand keyed by shopping day.
//!
//! Every generated demand has a fixed shopping date, so the index is built
//! once from the run and then only drained: each simulated day removes its
//! own bucket.  The engine touches only the demand that shops today instead
//! of scanning every itinerary.
//!
//! Entries are keys into the owning [`SimulationRun`]; the index never holds
//! demand data.  An itinerary booked on an earlier day still has entries in
//! later buckets.  Those are filtered out when the bucket is read.

use std::collections::BTreeMap;

use hd_core::{Day, ItineraryId};

use crate::{Demand, SimulationRun};

/// Key of one demand: its itinerary and its position inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DemandRef {
    pub itinerary: ItineraryId,
    pub demand:    u32,
}

impl DemandRef {
    /// Resolve against the run that built the index.
    pub fn resolve<'a>(&self, run: &'a SimulationRun) -> Option<&'a Demand> {
        run.itinerary(self.itinerary)?.demands().get(self.demand as usize)
    }
}

/// Shopping day → demands due that day, each bucket ascending by
/// `ItineraryId` (and therefore by user id, then trip id).
#[derive(Clone, Debug, Default)]
pub struct DemandIndex {
    inner: BTreeMap<Day, Vec<DemandRef>>,
    /// Cached entry count for O(1) `len()`.
    total: usize,
}

impl DemandIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every demand of every unbooked itinerary in `run`.
    pub fn build(run: &SimulationRun) -> Self {
        let mut index = Self::new();
        for (id, itinerary) in run.iter_with_ids() {
            if itinerary.is_booked() {
                continue;
            }
            for (pos, demand) in itinerary.demands().iter().enumerate() {
                index.push(demand.shopping_date, DemandRef { itinerary: id, demand: pos as u32 });
            }
        }
        index
    }

    /// Add one entry.  Callers push in ascending `ItineraryId` order to keep
    /// buckets sorted.
    pub fn push(&mut self, day: Day, entry: DemandRef) {
        self.inner.entry(day).or_default().push(entry);
        self.total += 1;
    }

    /// Unbooked entries due on `day`, without consuming them.
    pub fn pending_for_day(&self, day: Day, run: &SimulationRun) -> Vec<DemandRef> {
        self.inner
            .get(&day)
            .map(|bucket| unbooked(bucket.iter().copied(), run))
            .unwrap_or_default()
    }

    /// Remove the bucket for `day` and return its unbooked entries.
    ///
    /// A second call for the same day returns an empty list.
    pub fn take_day(&mut self, day: Day, run: &SimulationRun) -> Vec<DemandRef> {
        let Some(bucket) = self.inner.remove(&day) else {
            return Vec::new();
        };
        self.total -= bucket.len();
        unbooked(bucket.into_iter(), run)
    }

    /// Drop every bucket strictly before `day`; returns how many entries
    /// were discarded.
    pub fn discard_before(&mut self, day: Day) -> usize {
        let kept = self.inner.split_off(&day);
        let dropped: usize = self.inner.values().map(Vec::len).sum();
        self.inner = kept;
        self.total -= dropped;
        dropped
    }

    /// The earliest day with at least one entry.
    pub fn next_day(&self) -> Option<Day> {
        self.inner.keys().next().copied()
    }

    /// Total entries across all days, booked ones included until drained.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct days that still have entries.
    pub fn day_count(&self) -> usize {
        self.inner.len()
    }
}

fn unbooked(entries: impl Iterator<Item = DemandRef>, run: &SimulationRun) -> Vec<DemandRef> {
    entries
        .filter(|e| run.itinerary(e.itinerary).is_some_and(|it| !it.is_booked()))
        .collect()
}
