//! Subcommand implementations.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{Level, event};

use hd_booking::{BookingRecord, DayObserver, DaySummary, Simulation};
use hd_core::Day;
use hd_demand::DemandGenerator;
use hd_store::{CsvReportWriter, ReportObserver, ReportWriter, Snapshot, load_snapshot, save_snapshot};

use crate::cli::{GenerateArgs, RunArgs, SnapshotArgs};
use crate::pricing::MarketPrices;
use crate::AppConfig;

// ── generate ──────────────────────────────────────────────────────────────────

pub fn generate(mut config: AppConfig, args: &GenerateArgs) -> Result<()> {
    let generation = &mut config.generation;
    if let Some(users) = args.users {
        generation.total_users = users;
    }
    if let Some(casual) = args.casual {
        generation.proportion_casual = casual;
    }
    if let Some(capacity) = args.capacity {
        generation.hotel_capacity_per_day = capacity;
    }
    if let Some(id) = &args.id {
        generation.simulation_id = Some(id.clone());
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }

    let started = Instant::now();
    let mut generator = DemandGenerator::new(config.generation.params())
        .config(&config.run)
        .personas(config.personas.clone());
    if let Some(id) = &config.generation.simulation_id {
        generator = generator.simulation_id(id.clone());
    }
    let run = generator.generate()?;

    save_snapshot(&args.out, &run, None)
        .with_context(|| format!("writing {}", args.out.display()))?;
    println!(
        "Generated {} users, {} itineraries, {} demands in {:.2?} -> {}",
        run.user_count(),
        run.itineraries().len(),
        run.demand_count(),
        started.elapsed(),
        args.out.display()
    );
    Ok(())
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Counts what passes through to the report observer.
struct Tally<W: ReportWriter> {
    inner:    ReportObserver<W>,
    days:     u32,
    bookings: u32,
}

impl<W: ReportWriter> DayObserver for Tally<W> {
    fn on_booking(&mut self, day: Day, booking: &BookingRecord) {
        self.bookings += 1;
        self.inner.on_booking(day, booking);
    }

    fn on_day_end(&mut self, summary: &DaySummary) {
        self.days += 1;
        self.inner.on_day_end(summary);
    }

    fn on_run_end(&mut self, next_day: Day) {
        self.inner.on_run_end(next_day);
    }
}

pub fn run(mut config: AppConfig, args: &RunArgs) -> Result<()> {
    if let Some(dir) = &args.reports {
        config.reports.dir = dir.clone();
    }

    let mut sim = open(&args.snapshot)?;
    let mut prices = MarketPrices::from_config(&config.pricing);
    let sources: Vec<&str> = prices.source_names().collect();
    event!(Level::INFO, sources = ?sources, selection = ?config.pricing.selection, "pricing configured");

    let writer = CsvReportWriter::new(&config.reports.dir)
        .with_context(|| format!("opening reports in {}", config.reports.dir.display()))?;
    let mut observer = Tally { inner: ReportObserver::new(writer), days: 0, bookings: 0 };

    let started = Instant::now();
    match args.days {
        Some(n) => {
            let left = (sim.simulation_run().horizon().last_day() - sim.next_day() + 1).max(0);
            sim.run_days(n.min(left.unsigned_abs()), &mut prices, &mut observer)?;
            observer.inner.finish()?;
        }
        None => sim.run(&mut prices, &mut observer)?,
    }
    if let Some(e) = observer.inner.take_error() {
        return Err(e).context("writing reports");
    }

    let out = args.out.as_deref().unwrap_or(&args.snapshot);
    save_snapshot(out, sim.simulation_run(), Some(sim.next_day()))
        .with_context(|| format!("writing {}", out.display()))?;

    println!(
        "Played {} days, {} bookings in {:.2?}; next day {} -> {}",
        observer.days,
        observer.bookings,
        started.elapsed(),
        sim.next_day(),
        out.display()
    );
    println!("Reports in {}", config.reports.dir.display());
    Ok(())
}

// ── status / stats ────────────────────────────────────────────────────────────

pub fn status(args: &SnapshotArgs) -> Result<()> {
    let sim = open(&args.snapshot)?;
    let run = sim.simulation_run();
    println!("Run:             {}", run.parameters.simulation_id.as_deref().unwrap_or("(unnamed)"));
    println!("Next day:        {}{}", sim.next_day(), if sim.is_finished() { " (finished)" } else { "" });
    println!("Bookings so far: {} / {}", run.booked_count(), run.itineraries().len());
    println!("Pending:         {}", sim.pending_itineraries());
    Ok(())
}

pub fn stats(args: &SnapshotArgs) -> Result<()> {
    let sim = open(&args.snapshot)?;
    println!("{}", serde_json::to_string_pretty(&sim.statistics())?);
    Ok(())
}

/// Load a snapshot and resume it at its recorded progress.
fn open(path: &Path) -> Result<Simulation> {
    let Snapshot { run, next_shopping_day } =
        load_snapshot(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(match next_shopping_day {
        Some(day) => Simulation::resume(run, day),
        None => Simulation::new(run),
    })
}
