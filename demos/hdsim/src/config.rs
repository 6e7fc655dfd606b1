//! Application configuration management.
//!
//! Values come from, in increasing precedence: built-in defaults, the TOML
//! file named by `--config`, then `HDSIM_<SECTION>__<KEY>` environment
//! variables.
//!
//! ```toml
//! [generation]
//! total_users = 500
//! proportion_casual = 0.7
//! hotel_capacity_per_day = 25
//!
//! [run]
//! seed = 7
//!
//! [pricing]
//! selection = "lowest_price"          # or { source = "hotel" }
//!
//! [pricing.sources.hotel]
//! kind = "lead_time"
//! base_price = 95.0
//!
//! [pricing.sources.travel_platform]
//! kind = "flat"
//! price = 90.0
//! capacity = 3
//!
//! [pricing.sources.agent]
//! kind = "markup"
//! base = { base_price = 80.0 }
//! operating_cost = 12.0
//! margin = 0.15
//!
//! [reports]
//! dir = "reports"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use hd_booking::{FlatPrice, LeadTimePrice, MarkupPrice, PriceSource, SelectionPolicy};
use hd_core::RunConfig;
use hd_demand::{GenerationParams, PersonaSet};

use crate::Cli;

/// The main application configuration that composes all section configs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Seed and horizon.
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub personas: PersonaSet,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub total_users:            u32,
    pub proportion_casual:      f64,
    pub hotel_capacity_per_day: u32,
    pub simulation_id:          Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            total_users:            1_000,
            proportion_casual:      0.7,
            hotel_capacity_per_day: 40,
            simulation_id:          None,
        }
    }
}

impl GenerationConfig {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            total_users:            self.total_users,
            proportion_casual:      self.proportion_casual,
            hotel_capacity_per_day: self.hotel_capacity_per_day,
        }
    }
}

/// One configured quote source.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Flat(FlatPrice),
    LeadTime(LeadTimePrice),
    Markup(MarkupPrice),
}

impl SourceConfig {
    pub fn build(self) -> Box<dyn PriceSource> {
        match self {
            Self::Flat(p) => Box::new(p),
            Self::LeadTime(p) => Box::new(p),
            Self::Markup(p) => Box::new(p),
        }
    }
}

/// Quote sources and how their quotes are reduced to one per date.
///
/// With no `sources` configured a single lead-time `hotel` source is used.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    pub selection: SelectionPolicy,
    pub sources:   BTreeMap<String, SourceConfig>,
}

impl PricingConfig {
    pub const DEFAULT_SOURCE: &'static str = "hotel";

    /// Configured sources, or the default one.
    pub fn effective_sources(&self) -> BTreeMap<String, SourceConfig> {
        if self.sources.is_empty() {
            let hotel = SourceConfig::LeadTime(LeadTimePrice { base_price: 95.0, capacity: None });
            BTreeMap::from([(Self::DEFAULT_SOURCE.to_owned(), hotel)])
        } else {
            self.sources.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Directory for `bookings.csv` and `day_summaries.csv`.
    pub dir: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("reports") }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// `HDSIM_GENERATION__TOTAL_USERS=200` maps to `generation.total_users`.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            if !path.exists() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            config = config.add_source(config::File::from(path.as_path()));
        }

        config = config.add_source(
            config::Environment::with_prefix("HDSIM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let app: Self = config.build()?.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.run.horizon.validate()?;
        self.personas.validate()?;
        if let SelectionPolicy::Source(name) = &self.pricing.selection {
            if !self.pricing.effective_sources().contains_key(name) {
                anyhow::bail!("pricing.selection names unknown source `{name}`");
            }
        }
        Ok(())
    }
}
