//! `RunRegistry`: many independent simulations addressed by run id.
//!
//! # Locking
//!
//! The id → run map sits behind one `Mutex`; each run behind its own
//! `Arc<Mutex<Simulation>>`.  An operation holds the map lock only long
//! enough to clone the run's `Arc`, then works under the run lock, so calls
//! for different runs proceed in parallel while calls for one run are
//! serialized.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Level, event};

use hd_booking::{BookingRecord, DaySummary, OutOfOrderDay, RunStatistics, SelectionPolicy, Simulation};
use hd_core::Day;
use hd_demand::{DemandGenerator, GenerationParams, SimulationRun};

use crate::prices::{PriceIssue, parse_prices};
use crate::{ServiceError, ServiceResult};

/// Input for [`RunRegistry::create`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateRun {
    pub total_users:            u32,
    pub proportion_casual:      f64,
    pub hotel_capacity_per_day: u32,
    #[serde(default)]
    pub seed:                   Option<u64>,
    #[serde(default)]
    pub simulation_id:          Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunStatus {
    pub next_shopping_day:   Day,
    pub bookings_so_far:     usize,
    pub pending_itineraries: usize,
}

/// Input for [`RunRegistry::advance_day`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AdvanceDayRequest {
    pub simulation_day: i32,
    pub prices:         Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdvanceDayResponse {
    pub simulation_day: Day,
    /// Bookings created by this call only.
    pub bookings:       Vec<BookingRecord>,
    pub summary:        DaySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_order:   Option<OutOfOrderDay>,
    /// Price entries that were skipped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues:         Vec<PriceIssue>,
}

type SharedRun = Arc<Mutex<Simulation>>;

/// Registry of live runs.
#[derive(Default)]
pub struct RunRegistry {
    runs:   Mutex<FxHashMap<String, SharedRun>>,
    policy: SelectionPolicy,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that reduces multi-source quotes with `policy`.
    pub fn with_policy(policy: SelectionPolicy) -> Self {
        Self { runs: Mutex::default(), policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Generate a new run and register it under its simulation id.
    pub fn create(&self, request: CreateRun) -> ServiceResult<String> {
        let params = GenerationParams {
            total_users:            request.total_users,
            proportion_casual:      request.proportion_casual,
            hotel_capacity_per_day: request.hotel_capacity_per_day,
        };
        let mut generator = DemandGenerator::new(params);
        if let Some(seed) = request.seed {
            generator = generator.seed(seed);
        }
        if let Some(id) = request.simulation_id {
            generator = generator.simulation_id(id);
        }
        self.insert(generator.generate()?, None)
    }

    /// Register an existing run, optionally resuming at `next_day`.
    ///
    /// The id is the run's `simulation_id`, or `run_<n>` when it has none.
    pub fn insert(&self, run: SimulationRun, next_day: Option<Day>) -> ServiceResult<String> {
        let mut runs = self.map()?;
        let id = match &run.parameters.simulation_id {
            Some(id) => id.clone(),
            None => (runs.len() + 1..)
                .map(|n| format!("run_{n}"))
                .find(|id| !runs.contains_key(id))
                .unwrap_or_default(),
        };
        if runs.contains_key(&id) {
            return Err(ServiceError::DuplicateRun(id));
        }

        let sim = match next_day {
            Some(day) => Simulation::resume(run, day),
            None => Simulation::new(run),
        };
        event!(
            Level::INFO,
            run = %id,
            itineraries = sim.simulation_run().itineraries().len(),
            next_day = sim.next_day().0,
            "run registered"
        );
        runs.insert(id.clone(), Arc::new(Mutex::new(sim)));
        Ok(id)
    }

    /// Load a snapshot file as a new run.
    pub fn open_snapshot(&self, path: &Path) -> ServiceResult<String> {
        let snapshot = hd_store::load_snapshot(path)?;
        self.insert(snapshot.run, snapshot.next_shopping_day)
    }

    /// Write `run_id` with its progress to `path`.
    pub fn save_snapshot(&self, run_id: &str, path: &Path) -> ServiceResult<()> {
        let shared = self.get(run_id)?;
        let sim = lock(&shared, run_id)?;
        hd_store::save_snapshot(path, sim.simulation_run(), Some(sim.next_day()))?;
        Ok(())
    }

    pub fn remove(&self, run_id: &str) -> ServiceResult<()> {
        self.map()?
            .remove(run_id)
            .ok_or_else(|| ServiceError::UnknownRun(run_id.to_owned()))?;
        event!(Level::INFO, run = %run_id, "run removed");
        Ok(())
    }

    /// Every registered run id, sorted.
    pub fn list(&self) -> ServiceResult<Vec<String>> {
        let mut ids: Vec<String> = self.map()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn status(&self, run_id: &str) -> ServiceResult<RunStatus> {
        let shared = self.get(run_id)?;
        let sim = lock(&shared, run_id)?;
        Ok(RunStatus {
            next_shopping_day:   sim.next_day(),
            bookings_so_far:     sim.simulation_run().booked_count(),
            pending_itineraries: sim.pending_itineraries(),
        })
    }

    pub fn statistics(&self, run_id: &str) -> ServiceResult<RunStatistics> {
        let shared = self.get(run_id)?;
        let sim = lock(&shared, run_id)?;
        Ok(sim.statistics())
    }

    // ── Day processing ────────────────────────────────────────────────────

    /// Process one shopping day for `run_id`.
    pub fn advance_day(&self, run_id: &str, request: &AdvanceDayRequest) -> ServiceResult<AdvanceDayResponse> {
        let shared = self.get(run_id)?;
        let parsed = parse_prices(&request.prices, &self.policy)?;

        let mut sim = lock(&shared, run_id)?;
        let day = Day(request.simulation_day);
        let outcome = sim.process_daily_prices(day, &parsed.prices)?;
        if !parsed.issues.is_empty() {
            event!(Level::DEBUG, run = %run_id, day = day.0, skipped = parsed.issues.len(), "price entries skipped");
        }

        Ok(AdvanceDayResponse {
            simulation_day: day,
            bookings:       outcome.bookings,
            summary:        outcome.summary,
            out_of_order:   outcome.advisory,
            issues:         parsed.issues,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn map(&self) -> ServiceResult<MutexGuard<'_, FxHashMap<String, SharedRun>>> {
        self.runs
            .lock()
            .map_err(|_| ServiceError::Poisoned("registry".into()))
    }

    fn get(&self, run_id: &str) -> ServiceResult<SharedRun> {
        self.map()?
            .get(run_id)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownRun(run_id.to_owned()))
    }
}

fn lock<'a>(shared: &'a SharedRun, run_id: &str) -> ServiceResult<MutexGuard<'a, Simulation>> {
    shared
        .lock()
        .map_err(|_| ServiceError::Poisoned(run_id.to_owned()))
}
