//! Several configured quote sources reduced to one quote per stay date.

use hd_booking::{DailyPrices, PriceSource, SelectionPolicy, SourceQuotes};
use hd_core::{Day, Horizon};

use crate::config::PricingConfig;

pub struct MarketPrices {
    sources: Vec<(String, Box<dyn PriceSource>)>,
    policy:  SelectionPolicy,
}

impl MarketPrices {
    pub fn new(sources: Vec<(String, Box<dyn PriceSource>)>, policy: SelectionPolicy) -> Self {
        Self { sources, policy }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        let sources = config
            .effective_sources()
            .into_iter()
            .map(|(name, source)| (name, source.build()))
            .collect();
        Self::new(sources, config.selection.clone())
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(name, _)| name.as_str())
    }
}

impl PriceSource for MarketPrices {
    fn quotes(&mut self, day: Day, horizon: &Horizon) -> DailyPrices {
        let mut all = SourceQuotes::new();
        for (name, source) in &mut self.sources {
            for (date, quote) in source.quotes(day, horizon) {
                all.insert(date, name.as_str(), quote);
            }
        }
        all.select(&self.policy)
    }
}
