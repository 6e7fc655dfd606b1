//! Wire-format daily prices.
//!
//! `prices` is a JSON object keyed by stay date (an integer in a string).
//! Each value is either
//!
//! - a bare number: one nightly rate, no room cap, or
//! - an object of source quotes: `{ "<source_id>": { "price": p, "capacity": c } }`,
//!   reduced to one quote by the run's [`SelectionPolicy`].
//!
//! A malformed date entry is skipped (its stay date stays unpriced) and
//! reported as a [`PriceIssue`]; the rest of the day is still usable.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{Level, event};

use hd_booking::{DailyPrices, Quote, SelectionPolicy, SourceQuotes};
use hd_core::Day;

use crate::{ServiceError, ServiceResult};

/// One skipped date entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceIssue {
    /// The key exactly as received.
    pub date:   String,
    pub reason: String,
}

/// Parsed prices plus every entry that was skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedPrices {
    pub prices: DailyPrices,
    pub issues: Vec<PriceIssue>,
}

/// Parse one day's `prices` object.
///
/// Fails only when `value` is not an object at all.
pub fn parse_prices(value: &Value, policy: &SelectionPolicy) -> ServiceResult<ParsedPrices> {
    let Value::Object(entries) = value else {
        return Err(ServiceError::MalformedPriceInput(format!(
            "expected an object keyed by stay date, got {}",
            kind(value)
        )));
    };

    let mut parsed = ParsedPrices::default();
    let mut sourced = SourceQuotes::new();

    for (key, entry) in entries {
        let outcome = parse_date(key).and_then(|date| match entry {
            Value::Object(sources) => parse_sources(sources).map(|quotes| {
                for (source, quote) in quotes {
                    sourced.insert(date, source, quote);
                }
            }),
            bare => parse_price(bare).map(|price| {
                parsed.prices.insert(date, Quote::new(price));
            }),
        });
        if let Err(reason) = outcome {
            event!(Level::WARN, date = %key, %reason, "skipping malformed price entry");
            parsed.issues.push(PriceIssue { date: key.clone(), reason });
        }
    }

    parsed.prices.extend(sourced.select(policy));
    Ok(parsed)
}

fn parse_date(key: &str) -> Result<Day, String> {
    key.trim()
        .parse::<i32>()
        .map(Day)
        .map_err(|_| format!("stay date `{key}` is not an integer"))
}

fn parse_price(value: &Value) -> Result<f64, String> {
    match value.as_f64() {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(p),
        Some(p) => Err(format!("price {p} is negative")),
        None => Err(format!("price must be a number, got {}", kind(value))),
    }
}

fn parse_capacity(value: &Value) -> Result<u32, String> {
    value
        .as_u64()
        .and_then(|c| u32::try_from(c).ok())
        .ok_or_else(|| format!("capacity must be a non-negative integer, got {value}"))
}

fn parse_sources(sources: &Map<String, Value>) -> Result<Vec<(String, Quote)>, String> {
    if sources.is_empty() {
        return Err("no source quotes".into());
    }
    sources
        .iter()
        .map(|(source, quote)| {
            let Value::Object(fields) = quote else {
                return Err(format!("quote from `{source}` must be an object"));
            };
            let price = fields
                .get("price")
                .ok_or_else(|| format!("quote from `{source}` has no price"))
                .and_then(parse_price)?;
            let capacity = match fields.get("capacity") {
                None | Some(Value::Null) => None,
                Some(c) => Some(parse_capacity(c)?),
            };
            Ok((source.clone(), Quote { price, capacity }))
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
