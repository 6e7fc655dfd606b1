//! `DemandGenerator`: builds a full `SimulationRun` up front.
//!
//! # Determinism
//!
//! Personas are assigned in ordinal order from one `SimRng` seeded with the
//! run seed.  Everything else a user draws (trip plans, placement, price
//! curves) comes from that user's private `UserRng`, so users are
//! independent and may be generated on any thread.  With the `parallel`
//! feature the per-user pass runs on Rayon and the output is identical.

use tracing::{Level, event};

use hd_core::{Day, Horizon, PersonaKind, RunConfig, SimRng, StayDates, UserId, UserRng};

use crate::{
    Demand, DemandError, DemandResult, Itinerary, PersonaModel, PersonaSet, SimulationParameters,
    SimulationRun, TripPlan,
};

/// Resample budget for a trip plan that does not fit the horizon.
const MAX_PLACEMENT_ATTEMPTS: u32 = 256;

/// The three caller-facing generation inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    pub total_users:            u32,
    pub proportion_casual:      f64,
    pub hotel_capacity_per_day: u32,
}

impl GenerationParams {
    /// Reject out-of-range inputs.
    pub fn validate(&self) -> DemandResult<()> {
        if self.total_users == 0 {
            return Err(DemandError::InvalidParameter {
                name:   "total_users",
                reason: "must be at least 1".into(),
            });
        }
        if !self.proportion_casual.is_finite() || !(0.0..=1.0).contains(&self.proportion_casual) {
            return Err(DemandError::InvalidParameter {
                name:   "proportion_casual",
                reason: format!("{} is not in [0, 1]", self.proportion_casual),
            });
        }
        if self.hotel_capacity_per_day == 0 {
            return Err(DemandError::InvalidParameter {
                name:   "hotel_capacity_per_day",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Generate a run with default personas and horizon.
///
/// `seed = None` draws a fresh seed; the seed actually used is recorded in
/// the run's parameters.
pub fn generate(
    total_users:       u32,
    proportion_casual: f64,
    hotel_capacity:    u32,
    seed:              Option<u64>,
) -> DemandResult<SimulationRun> {
    let params = GenerationParams {
        total_users,
        proportion_casual,
        hotel_capacity_per_day: hotel_capacity,
    };
    let generator = DemandGenerator::new(params);
    match seed {
        Some(seed) => generator.seed(seed).generate(),
        None => generator.generate(),
    }
}

/// Fluent builder for one generation pass.
///
/// | Method                | Default                          |
/// |-----------------------|----------------------------------|
/// | `.seed(s)`            | fresh random seed                |
/// | `.horizon(h)`         | `Horizon::default()`             |
/// | `.config(&c)`         | sets both seed and horizon       |
/// | `.personas(p)`        | `PersonaSet::default()`          |
/// | `.simulation_id(id)`  | `sim_<seed>`                     |
#[derive(Clone, Debug)]
pub struct DemandGenerator {
    params:        GenerationParams,
    seed:          Option<u64>,
    horizon:       Horizon,
    personas:      PersonaSet,
    simulation_id: Option<String>,
}

impl DemandGenerator {
    pub fn new(params: GenerationParams) -> Self {
        Self {
            params,
            seed:          None,
            horizon:       Horizon::default(),
            personas:      PersonaSet::default(),
            simulation_id: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn config(self, config: &RunConfig) -> Self {
        self.seed(config.seed).horizon(config.horizon)
    }

    pub fn personas(mut self, personas: PersonaSet) -> Self {
        self.personas = personas;
        self
    }

    pub fn simulation_id(mut self, id: impl Into<String>) -> Self {
        self.simulation_id = Some(id.into());
        self
    }

    /// Validate every input, then sample the whole run.
    pub fn generate(self) -> DemandResult<SimulationRun> {
        self.params.validate()?;
        self.horizon.validate()?;
        self.personas.validate()?;

        let seed = self.seed.unwrap_or_else(rand::random);
        event!(
            Level::DEBUG,
            seed,
            users = self.params.total_users,
            proportion_casual = self.params.proportion_casual,
            "generating demand"
        );

        let users = assign_personas(self.params.total_users, self.params.proportion_casual, seed);
        let per_user = self.sample_users(&users, seed)?;
        let itineraries: Vec<Itinerary> = per_user.into_iter().flatten().collect();

        let parameters = SimulationParameters {
            total_users:            self.params.total_users,
            proportion_casual:      self.params.proportion_casual,
            hotel_capacity_per_day: self.params.hotel_capacity_per_day,
            simulation_id:          Some(self.simulation_id.unwrap_or_else(|| format!("sim_{seed}"))),
            seed:                   Some(seed),
            horizon:                self.horizon,
        };
        let run = SimulationRun::new(parameters, itineraries)?;

        event!(
            Level::INFO,
            users = run.user_count(),
            itineraries = run.itineraries().len(),
            demands = run.demand_count(),
            "demand generated"
        );
        Ok(run)
    }

    #[cfg(not(feature = "parallel"))]
    fn sample_users(&self, users: &[(u32, UserId)], seed: u64) -> DemandResult<Vec<Vec<Itinerary>>> {
        users
            .iter()
            .map(|&(ordinal, user)| self.sample_user(ordinal, user, seed))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn sample_users(&self, users: &[(u32, UserId)], seed: u64) -> DemandResult<Vec<Vec<Itinerary>>> {
        use rayon::prelude::*;
        users
            .par_iter()
            .map(|&(ordinal, user)| self.sample_user(ordinal, user, seed))
            .collect()
    }

    /// Every itinerary of one user.
    fn sample_user(&self, ordinal: u32, user: UserId, seed: u64) -> DemandResult<Vec<Itinerary>> {
        let model = self.personas.model(user.persona);
        let mut rng = UserRng::new(seed, ordinal);
        (0..model.trips_per_year())
            .map(|trip| sample_itinerary(model, &self.horizon, user, trip, &mut rng))
            .collect()
    }
}

/// One Bernoulli draw per ordinal; ids count up per persona from 1.
fn assign_personas(total_users: u32, proportion_casual: f64, seed: u64) -> Vec<(u32, UserId)> {
    let mut rng = SimRng::new(seed);
    let mut casual = 0;
    let mut business = 0;
    (0..total_users)
        .map(|ordinal| {
            let user = if rng.gen_bool(proportion_casual) {
                casual += 1;
                UserId::new(PersonaKind::Casual, casual)
            } else {
                business += 1;
                UserId::new(PersonaKind::Business, business)
            };
            (ordinal, user)
        })
        .collect()
}

fn sample_itinerary(
    model:   &dyn PersonaModel,
    horizon: &Horizon,
    user:    UserId,
    trip:    usize,
    rng:     &mut UserRng,
) -> DemandResult<Itinerary> {
    let trip_id = trip as u32;

    let (plan, start) = place_trip(model, horizon, trip, rng)?
        .ok_or(DemandError::Placement { user, trip_id, attempts: MAX_PLACEMENT_ATTEMPTS })?;

    let curve = model.sample_price_curve(rng)?;
    let stay = StayDates::new(start, plan.nights);
    let window_len = plan.window_len();
    let demands = (0..window_len)
        .map(|k| Demand {
            shopping_date:       start + plan.window_start_offset() + k as i32,
            stay_start_date:     stay.start,
            stay_end_date:       stay.end,
            max_price_per_night: curve.price_at(k, window_len),
        })
        .collect();

    Itinerary::new(user, trip_id, demands)
}

/// Sample plans until one fits, then pick a uniform start among the fitting
/// days.  `None` once the attempt budget is spent.
fn place_trip(
    model:   &dyn PersonaModel,
    horizon: &Horizon,
    trip:    usize,
    rng:     &mut UserRng,
) -> DemandResult<Option<(TripPlan, Day)>> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let plan = model.sample_trip_plan(trip, rng)?;
        if let Some(starts) = horizon.feasible_starts(plan.window_open_lead, plan.nights) {
            return Ok(Some((plan, Day(rng.gen_range(starts)))));
        }
    }
    Ok(None)
}
