//! Flat report rows.

use hd_booking::{BookingRecord, DaySummary};
use hd_core::Day;

/// One row of `bookings.csv`.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingRow {
    pub day:             i32,
    pub user_id:         String,
    pub trip_id:         u32,
    pub price_per_night: f64,
    pub stay_start:      i32,
    /// Checkout day (exclusive).
    pub stay_end:        i32,
    pub nights:          u32,
}

impl BookingRow {
    pub fn new(day: Day, booking: &BookingRecord) -> Self {
        Self {
            day:             day.0,
            user_id:         booking.user_id.to_string(),
            trip_id:         booking.trip_id,
            price_per_night: booking.booked_price_per_night,
            stay_start:      booking.stay_dates.start.0,
            stay_end:        booking.stay_dates.end.0,
            nights:          booking.stay_dates.nights(),
        }
    }
}

/// One row of `day_summaries.csv`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DaySummaryRow {
    pub day:                 i32,
    pub checked:             u32,
    pub booked:              u32,
    pub price_rejections:    u32,
    pub capacity_rejections: u32,
    pub unpriced:            u32,
}

impl From<&DaySummary> for DaySummaryRow {
    fn from(s: &DaySummary) -> Self {
        Self {
            day:                 s.day.0,
            checked:             s.checked,
            booked:              s.booked,
            price_rejections:    s.price_rejections,
            capacity_rejections: s.capacity_rejections,
            unpriced:            s.unpriced,
        }
    }
}
