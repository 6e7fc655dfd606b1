//! `hd-store`: persistence and reporting for the hotel demand simulator.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`snapshot`]  | JSON snapshot save/load with full re-validation           |
//! | [`csv`]       | `CsvReportWriter`: `bookings.csv`, `day_summaries.csv`    |
//! | [`observer`]  | `ReportObserver`, driving a writer from the day loop      |
//!
//! # Usage
//!
//! ```rust,ignore
//! use hd_store::{CsvReportWriter, ReportObserver, load_snapshot, save_snapshot};
//!
//! let snapshot = load_snapshot(Path::new("run.json"))?;
//! let mut sim = Simulation::new(snapshot.run);
//! let mut obs = ReportObserver::new(CsvReportWriter::new(Path::new("./reports"))?);
//! sim.run(&mut prices, &mut obs)?;
//! obs.take_error().map(|e| eprintln!("report error: {e}"));
//! save_snapshot(Path::new("run.json"), sim.simulation_run(), Some(sim.next_day()))?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod snapshot;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvReportWriter;
pub use error::{StoreError, StoreResult};
pub use observer::ReportObserver;
pub use row::{BookingRow, DaySummaryRow};
pub use snapshot::{
    ItineraryRecord, Progress, Snapshot, SnapshotDocument, UserTable, from_json, load_snapshot,
    save_snapshot, to_json,
};
pub use writer::ReportWriter;
