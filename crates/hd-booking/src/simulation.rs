//! The `Simulation` struct and its day loop.

use serde::Serialize;
use tracing::{Level, event};

use hd_core::{Day, ItineraryId, StayDates, UserId};
use hd_demand::{DemandIndex, SimulationRun};

use crate::{
    BookingEngine, BookingResult, CapacityLedger, DailyPrices, DayObserver, DaySummary,
    PriceSource, Resolution, RunStatistics,
};

/// A booking as reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BookingRecord {
    pub user_id:                UserId,
    pub trip_id:                u32,
    #[serde(skip)]
    pub itinerary:              ItineraryId,
    pub booked_price_per_night: f64,
    pub stay_dates:             StayDates,
}

/// Advisory: a day was processed after a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OutOfOrderDay {
    pub day:      Day,
    /// The next day the simulation expected.
    pub expected: Day,
}

/// Everything one call to
/// [`process_daily_prices`](Simulation::process_daily_prices) produced.
#[derive(Clone, Debug, PartialEq)]
pub struct DayOutcome {
    /// Bookings created by this call only.
    pub bookings: Vec<BookingRecord>,
    pub summary:  DaySummary,
    pub advisory: Option<OutOfOrderDay>,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// A run plus the state needed to advance it day by day.
///
/// Per day:
///
/// 1. **Drain**: take the day's bucket from the [`DemandIndex`].
/// 2. **Resolve**: [`BookingEngine::resolve`] decides bookings against the
///    ledger and the day's quotes, reading only.
/// 3. **Apply**: each event marks its itinerary booked; the resolved ledger
///    replaces the old one.
pub struct Simulation {
    run:      SimulationRun,
    index:    DemandIndex,
    ledger:   CapacityLedger,
    engine:   BookingEngine,
    next_day: Day,
}

impl Simulation {
    /// Start a run from the horizon's earliest shopping day.
    pub fn new(run: SimulationRun) -> Self {
        let next_day = run.horizon().earliest_shopping_day;
        Self::resume(run, next_day)
    }

    /// Continue a run whose days before `next_day` were already processed.
    ///
    /// Demand for earlier days is dropped from the index; bookings recorded
    /// in `run` are charged to the ledger.
    pub fn resume(run: SimulationRun, next_day: Day) -> Self {
        let mut index = DemandIndex::build(&run);
        index.discard_before(next_day);
        let ledger = CapacityLedger::from_run(&run);
        Self { run, index, ledger, engine: BookingEngine::new(), next_day }
    }

    pub fn simulation_run(&self) -> &SimulationRun {
        &self.run
    }

    pub fn into_run(self) -> SimulationRun {
        self.run
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    pub fn index(&self) -> &DemandIndex {
        &self.index
    }

    /// The first day not yet processed.
    pub fn next_day(&self) -> Day {
        self.next_day
    }

    /// `true` once every horizon day has been processed.
    pub fn is_finished(&self) -> bool {
        self.next_day > self.run.horizon().last_day()
    }

    /// Unbooked itineraries whose window has not closed before `next_day`.
    pub fn pending_itineraries(&self) -> usize {
        self.run
            .itineraries()
            .iter()
            .filter(|i| !i.is_booked() && *i.shopping_window().end() >= self.next_day)
            .count()
    }

    pub fn statistics(&self) -> RunStatistics {
        RunStatistics::from_run(&self.run, self.next_day)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Process shopping day `day` against `prices`.
    ///
    /// Processing a day twice books nothing the second time.  A day behind
    /// [`next_day`](Self::next_day) is still processed (its demand was
    /// normally drained already) and flagged with an [`OutOfOrderDay`].
    pub fn process_daily_prices(&mut self, day: Day, prices: &DailyPrices) -> BookingResult<DayOutcome> {
        let advisory = (day < self.next_day).then_some(OutOfOrderDay { day, expected: self.next_day });
        if let Some(a) = advisory {
            event!(Level::WARN, day = a.day.0, expected = a.expected.0, "day processed out of order");
        }

        let candidates = self.index.take_day(day, &self.run);
        let resolution = self.engine.resolve(&self.run, day, &candidates, &self.ledger, prices);
        let summary = resolution.summary;
        let bookings = self.apply(resolution)?;

        if day >= self.next_day {
            self.next_day = day.next();
        }

        event!(
            Level::DEBUG,
            day = day.0,
            checked = summary.checked,
            booked = summary.booked,
            price_rejections = summary.price_rejections,
            capacity_rejections = summary.capacity_rejections,
            unpriced = summary.unpriced,
            "day processed"
        );
        Ok(DayOutcome { bookings, summary, advisory })
    }

    /// Run from [`next_day`](Self::next_day) through the horizon's last day.
    ///
    /// Calls observer hooks at every day boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<P: PriceSource, O: DayObserver>(&mut self, prices: &mut P, observer: &mut O) -> BookingResult<()> {
        while !self.is_finished() {
            self.step(prices, observer)?;
        }
        observer.on_run_end(self.next_day);

        let stats = self.statistics();
        event!(
            Level::INFO,
            bookings = stats.total_bookings,
            revenue = stats.total_revenue,
            occupancy = stats.occupancy_rate,
            "simulation complete"
        );
        Ok(())
    }

    /// Run exactly `n` days from the current position, ignoring the horizon
    /// end.
    pub fn run_days<P: PriceSource, O: DayObserver>(
        &mut self,
        n:        u32,
        prices:   &mut P,
        observer: &mut O,
    ) -> BookingResult<()> {
        for _ in 0..n {
            self.step(prices, observer)?;
        }
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn step<P: PriceSource, O: DayObserver>(&mut self, prices: &mut P, observer: &mut O) -> BookingResult<()> {
        let day = self.next_day;
        observer.on_day_start(day);
        let quotes = prices.quotes(day, &self.run.horizon());
        let outcome = self.process_daily_prices(day, &quotes)?;
        for booking in &outcome.bookings {
            observer.on_booking(day, booking);
        }
        observer.on_day_end(&outcome.summary);
        Ok(())
    }

    fn apply(&mut self, resolution: Resolution) -> BookingResult<Vec<BookingRecord>> {
        let mut bookings = Vec::with_capacity(resolution.events.len());
        for e in resolution.events {
            self.run.apply_booking(e.itinerary, e.price_per_night)?;
            event!(
                Level::DEBUG,
                day = e.day.0,
                user = %e.user_id,
                trip = e.trip_id,
                price = e.price_per_night,
                stay = %e.stay,
                "booked"
            );
            bookings.push(BookingRecord {
                user_id:                e.user_id,
                trip_id:                e.trip_id,
                itinerary:              e.itinerary,
                booked_price_per_night: e.price_per_night,
                stay_dates:             e.stay,
            });
        }
        self.ledger = resolution.ledger;
        Ok(bookings)
    }
}
