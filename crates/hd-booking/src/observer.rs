//! Day-loop observer trait for progress reporting and data collection.

use hd_core::Day;

use crate::{BookingRecord, DaySummary};

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] and
/// [`Simulation::run_days`][crate::Simulation::run_days].
///
/// All methods have default no-op implementations.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl DayObserver for Progress {
///     fn on_day_end(&mut self, summary: &DaySummary) {
///         println!("{}: {} booked", summary.day, summary.booked);
///     }
/// }
/// ```
pub trait DayObserver {
    /// Before the day's prices are requested.
    fn on_day_start(&mut self, _day: Day) {}

    /// Once per booking created today, in allocation order.
    fn on_booking(&mut self, _day: Day, _booking: &BookingRecord) {}

    /// After every booking of the day is applied.
    fn on_day_end(&mut self, _summary: &DaySummary) {}

    /// Once after the last horizon day (only from `run`).
    fn on_run_end(&mut self, _next_day: Day) {}
}

/// A [`DayObserver`] that does nothing.
pub struct NoopObserver;

impl DayObserver for NoopObserver {}
