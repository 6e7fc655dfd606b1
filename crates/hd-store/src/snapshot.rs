//! JSON snapshot of a run: parameters, every itinerary grouped by user, and
//! optionally how far the day loop has progressed.
//!
//! ```json
//! {
//!   "simulation_parameters": { "total_users": 10, "proportion_casual": 0.8,
//!                              "hotel_capacity_per_day": 50 },
//!   "users": {
//!     "casual-001": [ { "trip_id": 0, "demands": [ ... ],
//!                       "is_booked": false, "booked_price_per_night": null } ]
//!   },
//!   "progress": { "next_shopping_day": -20 }
//! }
//! ```
//!
//! Loading re-validates every itinerary, so a corrupt file is an error and
//! never an empty or partial run.  A user id that appears twice under
//! `users` is rejected rather than letting one entry replace the other.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{Level, event};

use hd_core::{Day, UserId};
use hd_demand::{Demand, Itinerary, SimulationParameters, SimulationRun};

use crate::{StoreError, StoreResult};

/// One itinerary as stored; the user id is the enclosing map key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRecord {
    pub trip_id:                u32,
    pub demands:                Vec<Demand>,
    pub is_booked:              bool,
    pub booked_price_per_night: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub next_shopping_day: Day,
}

/// The serialized form of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub simulation_parameters: SimulationParameters,
    pub users:                 UserTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress:              Option<Progress>,
}

/// The `users` object, kept in document order with every entry, including
/// repeated keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserTable(pub Vec<(UserId, Vec<ItineraryRecord>)>);

impl Serialize for UserTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(user, records)| (user, records)))
    }
}

impl<'de> Deserialize<'de> for UserTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = UserTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of user id to itineraries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<UserTable, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(UserTable(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// A loaded run plus its recorded progress.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub run:               SimulationRun,
    pub next_shopping_day: Option<Day>,
}

impl SnapshotDocument {
    pub fn from_run(run: &SimulationRun, next_shopping_day: Option<Day>) -> Self {
        let users = run
            .users()
            .map(|(user, itineraries)| {
                let records = itineraries
                    .iter()
                    .map(|it| ItineraryRecord {
                        trip_id:                it.trip_id,
                        demands:                it.demands().to_vec(),
                        is_booked:              it.is_booked(),
                        booked_price_per_night: it.booked_price_per_night(),
                    })
                    .collect();
                (user, records)
            })
            .collect();
        Self {
            simulation_parameters: run.parameters.clone(),
            users: UserTable(users),
            progress: next_shopping_day.map(|next_shopping_day| Progress { next_shopping_day }),
        }
    }

    /// Rebuild and validate the run.
    pub fn into_snapshot(self) -> StoreResult<Snapshot> {
        let mut itineraries = Vec::new();
        let mut seen = BTreeSet::new();
        for (user, records) in self.users.0 {
            if !seen.insert(user) {
                return Err(StoreError::Invalid(format!("user {user} appears more than once")));
            }
            if records.is_empty() {
                return Err(StoreError::Invalid(format!("{user} has no itineraries")));
            }
            for r in records {
                itineraries.push(Itinerary::restore(
                    user,
                    r.trip_id,
                    r.demands,
                    r.is_booked,
                    r.booked_price_per_night,
                )?);
            }
        }
        let run = SimulationRun::new(self.simulation_parameters, itineraries)?;

        let next_shopping_day = self.progress.map(|p| p.next_shopping_day);
        if let Some(day) = next_shopping_day {
            let h = run.horizon();
            if day < h.earliest_shopping_day || day > h.stay_end() {
                return Err(StoreError::Invalid(format!(
                    "next shopping day {day} lies outside the horizon"
                )));
            }
        }
        Ok(Snapshot { run, next_shopping_day })
    }
}

// ── Files ─────────────────────────────────────────────────────────────────────

pub fn to_json(run: &SimulationRun, next_shopping_day: Option<Day>) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(&SnapshotDocument::from_run(run, next_shopping_day))?)
}

pub fn from_json(json: &str) -> StoreResult<Snapshot> {
    serde_json::from_str::<SnapshotDocument>(json)?.into_snapshot()
}

/// Write `run` to `path`, replacing any existing file.
pub fn save_snapshot(path: &Path, run: &SimulationRun, next_shopping_day: Option<Day>) -> StoreResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &SnapshotDocument::from_run(run, next_shopping_day))?;
    out.flush()?;
    event!(
        Level::INFO,
        path = %path.display(),
        itineraries = run.itineraries().len(),
        booked = run.booked_count(),
        "snapshot saved"
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> StoreResult<Snapshot> {
    let document: SnapshotDocument = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let snapshot = document.into_snapshot()?;
    event!(
        Level::INFO,
        path = %path.display(),
        itineraries = snapshot.run.itineraries().len(),
        booked = snapshot.run.booked_count(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
