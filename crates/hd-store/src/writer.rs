//! The `ReportWriter` trait implemented by report backends.

use crate::{BookingRow, DaySummaryRow, StoreResult};

/// Sink for booking and day-summary rows.
///
/// Errors surface through [`ReportObserver::take_error`][crate::ReportObserver::take_error]
/// when driven by the day loop.
pub trait ReportWriter {
    fn write_booking(&mut self, row: &BookingRow) -> StoreResult<()>;

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> StoreResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> StoreResult<()>;
}
