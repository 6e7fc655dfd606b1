//! Tests for the hdsim driver.

use std::path::{Path, PathBuf};

use crate::{AppConfig, Cli, Commands, SnapshotArgs};

fn cli_with(config: Option<PathBuf>) -> Cli {
    Cli {
        config,
        command: Commands::Status(SnapshotArgs { snapshot: PathBuf::from("run.json") }),
    }
}

fn write_config(dir: &Path, toml: &str) -> PathBuf {
    let path = dir.join("hdsim.toml");
    std::fs::write(&path, toml).unwrap();
    path
}

#[cfg(test)]
mod config_tests {
    use hd_booking::{FlatPrice, LeadTimePrice, MarkupPrice, PriceSource, SelectionPolicy};

    use super::*;
    use crate::{PricingConfig, SourceConfig};

    #[test]
    fn defaults_without_a_file() {
        let config = AppConfig::load(&cli_with(None)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.generation.total_users, 1_000);
        assert_eq!(config.run.seed, 42);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [generation]
            total_users = 250

            [run]
            seed = 9

            [pricing]
            selection = { source = "travel_platform" }

            [pricing.sources.hotel]
            kind = "lead_time"
            base_price = 120.0

            [pricing.sources.travel_platform]
            kind = "flat"
            price = 99.0
            capacity = 4

            [reports]
            dir = "out"
            "#,
        );
        let config = AppConfig::load(&cli_with(Some(path))).unwrap();
        assert_eq!(config.generation.total_users, 250);
        assert_eq!(config.generation.proportion_casual, 0.7);
        assert_eq!(config.run.seed, 9);
        assert_eq!(config.pricing.selection, SelectionPolicy::Source("travel_platform".into()));
        assert_eq!(
            config.pricing.sources["hotel"],
            SourceConfig::LeadTime(LeadTimePrice { base_price: 120.0, capacity: None })
        );
        assert_eq!(
            config.pricing.sources["travel_platform"],
            SourceConfig::Flat(FlatPrice { price: 99.0, capacity: Some(4) })
        );
        assert_eq!(config.reports.dir, PathBuf::from("out"));
    }

    #[test]
    fn markup_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [pricing.sources.agent]
            kind = "markup"
            base = { base_price = 80.0 }
            operating_cost = 12.0
            margin = 0.25
            capacity = 6
            "#,
        );
        let config = AppConfig::load(&cli_with(Some(path))).unwrap();
        assert_eq!(
            config.pricing.sources["agent"],
            SourceConfig::Markup(MarkupPrice {
                base:           LeadTimePrice { base_price: 80.0, capacity: None },
                operating_cost: 12.0,
                margin:         0.25,
                capacity:       Some(6),
            })
        );

        let mut source = config.pricing.sources["agent"].build();
        let quotes = source.quotes(hd_core::Day(0), &hd_core::Horizon::default());
        assert_eq!(quotes[&hd_core::Day(60)], hd_booking::Quote::with_capacity(115.0, 6));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(&cli_with(Some(dir.path().join("nope.toml")))).is_err());
    }

    #[test]
    fn selection_must_name_a_configured_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[pricing]\nselection = { source = \"motel\" }\n");
        assert!(AppConfig::load(&cli_with(Some(path))).is_err());
    }

    #[test]
    fn default_source_when_none_configured() {
        let sources = PricingConfig::default().effective_sources();
        assert_eq!(sources.keys().collect::<Vec<_>>(), [PricingConfig::DEFAULT_SOURCE]);
    }
}

#[cfg(test)]
mod pricing_tests {
    use hd_booking::{FlatPrice, PriceSource, Quote, SelectionPolicy};
    use hd_core::{Day, Horizon};

    use crate::pricing::MarketPrices;

    fn market(policy: SelectionPolicy) -> MarketPrices {
        let hotel: Box<dyn PriceSource> = Box::new(FlatPrice { price: 100.0, capacity: Some(5) });
        let platform: Box<dyn PriceSource> = Box::new(FlatPrice { price: 90.0, capacity: Some(0) });
        MarketPrices::new(vec![("hotel".into(), hotel), ("travel_platform".into(), platform)], policy)
    }

    #[test]
    fn lowest_price_with_rooms_wins() {
        let quotes = market(SelectionPolicy::LowestPrice).quotes(Day(-20), &Horizon::default());
        assert_eq!(quotes.len(), 100);
        assert_eq!(quotes[&Day(0)], Quote::with_capacity(100.0, 5));
    }

    #[test]
    fn named_source_is_used_even_when_sold_out() {
        let policy = SelectionPolicy::Source("travel_platform".into());
        let quotes = market(policy).quotes(Day(50), &Horizon::default());
        assert_eq!(quotes.len(), 50);
        assert_eq!(quotes[&Day(50)], Quote::with_capacity(90.0, 0));
    }
}

#[cfg(test)]
mod command_tests {
    use hd_store::load_snapshot;

    use super::*;
    use crate::{GenerateArgs, RunArgs, commands};

    #[test]
    fn generate_then_play_in_two_legs() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("run.json");
        let reports = dir.path().join("reports");

        let generate = GenerateArgs {
            out:      snapshot.clone(),
            users:    Some(60),
            casual:   Some(0.5),
            capacity: Some(5),
            seed:     Some(3),
            id:       None,
        };
        commands::generate(AppConfig::default(), &generate).unwrap();
        let generated = load_snapshot(&snapshot).unwrap();
        assert_eq!(generated.run.user_count(), 60);
        assert_eq!(generated.run.parameters.simulation_id.as_deref(), Some("sim_3"));
        assert_eq!(generated.next_shopping_day, None);

        let leg = |days| RunArgs {
            snapshot: snapshot.clone(),
            out:      None,
            reports:  Some(reports.clone()),
            days,
        };
        commands::run(AppConfig::default(), &leg(Some(30))).unwrap();
        assert_eq!(load_snapshot(&snapshot).unwrap().next_shopping_day, Some(hd_core::Day(10)));

        commands::run(AppConfig::default(), &leg(None)).unwrap();
        let played = load_snapshot(&snapshot).unwrap();
        assert_eq!(played.next_shopping_day, Some(hd_core::Day(100)));
        assert!(played.run.booked_count() > 0);
        assert!(reports.join(hd_store::csv::BOOKINGS_FILE).exists());

        commands::status(&SnapshotArgs { snapshot: snapshot.clone() }).unwrap();
        commands::stats(&SnapshotArgs { snapshot }).unwrap();
    }
}
