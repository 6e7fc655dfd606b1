//! CSV report backend.
//!
//! Creates two files in the configured output directory:
//! - `bookings.csv`
//! - `day_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::ReportWriter;
use crate::{BookingRow, DaySummaryRow, StoreResult};

pub const BOOKINGS_FILE: &str = "bookings.csv";
pub const DAY_SUMMARIES_FILE: &str = "day_summaries.csv";

/// Writes booking reports to two CSV files.
pub struct CsvReportWriter {
    bookings:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvReportWriter {
    /// Create `dir` if needed, open both files and write the header rows.
    pub fn new(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut bookings = Writer::from_path(dir.join(BOOKINGS_FILE))?;
        bookings.write_record(["day", "user_id", "trip_id", "price_per_night", "stay_start", "stay_end", "nights"])?;

        let mut summaries = Writer::from_path(dir.join(DAY_SUMMARIES_FILE))?;
        summaries.write_record(["day", "checked", "booked", "price_rejections", "capacity_rejections", "unpriced"])?;

        Ok(Self { bookings, summaries, finished: false })
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_booking(&mut self, row: &BookingRow) -> StoreResult<()> {
        self.bookings.write_record(&[
            row.day.to_string(),
            row.user_id.clone(),
            row.trip_id.to_string(),
            format!("{:.2}", row.price_per_night),
            row.stay_start.to_string(),
            row.stay_end.to_string(),
            row.nights.to_string(),
        ])?;
        Ok(())
    }

    fn write_day_summary(&mut self, row: &DaySummaryRow) -> StoreResult<()> {
        self.summaries.write_record(&[
            row.day.to_string(),
            row.checked.to_string(),
            row.booked.to_string(),
            row.price_rejections.to_string(),
            row.capacity_rejections.to_string(),
            row.unpriced.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> StoreResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.bookings.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
