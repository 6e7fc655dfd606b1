//! `ReportObserver<W>`: bridges `DayObserver` to a `ReportWriter`.

use hd_booking::{BookingRecord, DayObserver, DaySummary};
use hd_core::Day;

use crate::row::{BookingRow, DaySummaryRow};
use crate::writer::ReportWriter;
use crate::{StoreError, StoreResult};

/// A [`DayObserver`] that writes every booking and day summary to any
/// [`ReportWriter`].
///
/// Observer hooks cannot fail, so the first write error is stored.  After
/// the run returns, check it with [`take_error`][Self::take_error].
pub struct ReportObserver<W: ReportWriter> {
    writer:     W,
    last_error: Option<StoreError>,
}

impl<W: ReportWriter> ReportObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<StoreError> {
        self.last_error.take()
    }

    /// Flush the writer; needed after `run_days`, which has no run-end hook.
    pub fn finish(&mut self) -> StoreResult<()> {
        self.writer.finish()
    }

    fn store_err(&mut self, result: StoreResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: ReportWriter> DayObserver for ReportObserver<W> {
    fn on_booking(&mut self, day: Day, booking: &BookingRecord) {
        let result = self.writer.write_booking(&BookingRow::new(day, booking));
        self.store_err(result);
    }

    fn on_day_end(&mut self, summary: &DaySummary) {
        let result = self.writer.write_day_summary(&DaySummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_run_end(&mut self, _next_day: Day) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
