//! Tests for hd-service.

use serde_json::{Value, json};

use hd_core::{Day, Horizon, PersonaKind, UserId};
use hd_demand::{Demand, Itinerary, SimulationParameters, SimulationRun};

use crate::{AdvanceDayRequest, CreateRun, RunRegistry, ServiceError};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Two casual users after the same stay `[30, 38)`, shopping `-20..=-10`
/// at 70 per night, in a hotel with one room.
fn contested_run(id: &str) -> SimulationRun {
    let itinerary = |n: u32| {
        let demands = (-20..=-10)
            .map(|d| Demand {
                shopping_date:       Day(d),
                stay_start_date:     Day(30),
                stay_end_date:       Day(38),
                max_price_per_night: 70.0,
            })
            .collect();
        Itinerary::new(UserId::new(PersonaKind::Casual, n), 0, demands).unwrap()
    };
    let parameters = SimulationParameters {
        total_users:            2,
        proportion_casual:      1.0,
        hotel_capacity_per_day: 1,
        simulation_id:          Some(id.to_owned()),
        seed:                   None,
        horizon:                Horizon::default(),
    };
    SimulationRun::new(parameters, vec![itinerary(1), itinerary(2)]).unwrap()
}

fn advance(day: i32, prices: Value) -> AdvanceDayRequest {
    AdvanceDayRequest { simulation_day: day, prices }
}

/// Every stay date priced at `price`, no cap.
fn flat_prices(price: f64) -> Value {
    let h = Horizon::default();
    Value::Object((h.first_stay_day.0..h.stay_end().0).map(|d| (d.to_string(), json!(price))).collect())
}

fn create(seed: u64) -> CreateRun {
    CreateRun {
        total_users:            200,
        proportion_casual:      0.6,
        hotel_capacity_per_day: 10,
        seed:                   Some(seed),
        simulation_id:          None,
    }
}

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn unknown_run_is_reported() {
        let registry = RunRegistry::new();
        assert!(matches!(registry.status("nope"), Err(ServiceError::UnknownRun(id)) if id == "nope"));
        assert!(matches!(registry.statistics("nope"), Err(ServiceError::UnknownRun(_))));
        assert!(matches!(registry.remove("nope"), Err(ServiceError::UnknownRun(_))));
        assert!(matches!(
            registry.advance_day("nope", &advance(-20, json!({}))),
            Err(ServiceError::UnknownRun(_))
        ));
    }

    #[test]
    fn fresh_status() {
        let registry = RunRegistry::new();
        let id = registry.insert(contested_run("hand"), None).unwrap();
        assert_eq!(id, "hand");
        let status = registry.status(&id).unwrap();
        assert_eq!(status.next_shopping_day, Day(-20));
        assert_eq!(status.bookings_so_far, 0);
        assert_eq!(status.pending_itineraries, 2);
    }

    #[test]
    fn create_uses_seeded_id() {
        let registry = RunRegistry::new();
        assert_eq!(registry.create(create(7)).unwrap(), "sim_7");
        assert_eq!(registry.create(create(3)).unwrap(), "sim_3");
        assert!(matches!(registry.create(create(7)), Err(ServiceError::DuplicateRun(_))));
        assert_eq!(registry.list().unwrap(), ["sim_3", "sim_7"]);

        registry.remove("sim_3").unwrap();
        assert_eq!(registry.list().unwrap(), ["sim_7"]);
    }

    #[test]
    fn invalid_generation_input_is_rejected() {
        let registry = RunRegistry::new();
        let bad = CreateRun { proportion_casual: 1.5, ..create(1) };
        assert!(matches!(registry.create(bad), Err(ServiceError::Demand(_))));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn runs_without_ids_are_numbered() {
        let registry = RunRegistry::new();
        let mut run = contested_run("x");
        run.parameters.simulation_id = None;
        assert_eq!(registry.insert(run.clone(), None).unwrap(), "run_1");
        assert_eq!(registry.insert(run, None).unwrap(), "run_2");
    }

    #[test]
    fn snapshot_round_trip_keeps_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        let registry = RunRegistry::new();
        let id = registry.create(create(11)).unwrap();
        for day in -20..0 {
            registry.advance_day(&id, &advance(day, flat_prices(50.0))).unwrap();
        }
        let before = registry.status(&id).unwrap();
        assert!(before.bookings_so_far > 0);
        registry.save_snapshot(&id, &path).unwrap();

        assert!(matches!(registry.open_snapshot(&path), Err(ServiceError::DuplicateRun(_))));

        let other = RunRegistry::new();
        let reopened = other.open_snapshot(&path).unwrap();
        assert_eq!(reopened, id);
        assert_eq!(other.status(&reopened).unwrap(), before);
        assert_eq!(other.statistics(&reopened).unwrap(), registry.statistics(&id).unwrap());
    }

    #[test]
    fn missing_snapshot_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RunRegistry::new();
        assert!(matches!(
            registry.open_snapshot(&dir.path().join("missing.json")),
            Err(ServiceError::Store(_))
        ));
    }
}

#[cfg(test)]
mod advance_day {
    use hd_booking::SelectionPolicy;

    use super::*;

    #[test]
    fn bare_price_books_lowest_user_first() {
        let registry = RunRegistry::new();
        let id = registry.insert(contested_run("hand"), None).unwrap();

        let response = registry.advance_day(&id, &advance(-20, json!({ "30": 65.0 }))).unwrap();
        assert_eq!(response.simulation_day, Day(-20));
        assert_eq!(response.bookings.len(), 1);
        assert_eq!(response.bookings[0].user_id, UserId::new(PersonaKind::Casual, 1));
        assert_eq!(response.bookings[0].booked_price_per_night, 65.0);
        assert_eq!(response.summary.capacity_rejections, 1);
        assert!(response.issues.is_empty());
        assert!(response.out_of_order.is_none());

        let status = registry.status(&id).unwrap();
        assert_eq!(status.next_shopping_day, Day(-19));
        assert_eq!(status.bookings_so_far, 1);
        assert_eq!(status.pending_itineraries, 1);
    }

    #[test]
    fn malformed_entries_are_skipped_and_reported() {
        let registry = RunRegistry::new();
        let id = registry.insert(contested_run("hand"), None).unwrap();

        let prices = json!({
            "30": "cheap",
            "tomorrow": 50.0,
            "31": -3.0,
            "32": { "hotel_a": { "price": 40.0, "capacity": -1 } },
            "33": 55.0
        });
        let response = registry.advance_day(&id, &advance(-20, prices)).unwrap();
        let mut skipped: Vec<&str> = response.issues.iter().map(|i| i.date.as_str()).collect();
        skipped.sort_unstable();
        assert_eq!(skipped, ["30", "31", "32", "tomorrow"]);
        assert!(response.bookings.is_empty());
        assert_eq!(response.summary.unpriced, 2);

        // the skipped date is still bookable later
        let response = registry.advance_day(&id, &advance(-19, json!({ "30": 60.0 }))).unwrap();
        assert_eq!(response.bookings.len(), 1);
    }

    #[test]
    fn non_object_prices_fail() {
        let registry = RunRegistry::new();
        let id = registry.insert(contested_run("hand"), None).unwrap();
        for prices in [json!([1, 2]), json!(65.0), Value::Null] {
            assert!(matches!(
                registry.advance_day(&id, &advance(-20, prices)),
                Err(ServiceError::MalformedPriceInput(_))
            ));
        }
        assert_eq!(registry.status(&id).unwrap().next_shopping_day, Day(-20));
    }

    fn sourced() -> Value {
        json!({ "30": {
            "hotel_a":         { "price": 68.0, "capacity": 2 },
            "travel_platform": { "price": 62.0, "capacity": 0 }
        } })
    }

    #[test]
    fn lowest_price_skips_sold_out_source() {
        let registry = RunRegistry::new();
        let id = registry.insert(contested_run("hand"), None).unwrap();
        let response = registry.advance_day(&id, &advance(-20, sourced())).unwrap();
        assert_eq!(response.bookings.len(), 1);
        assert_eq!(response.bookings[0].booked_price_per_night, 68.0);
    }

    #[test]
    fn named_source_policy() {
        let registry = RunRegistry::with_policy(SelectionPolicy::Source("travel_platform".into()));
        let id = registry.insert(contested_run("hand"), None).unwrap();
        let response = registry.advance_day(&id, &advance(-20, sourced())).unwrap();
        assert!(response.bookings.is_empty());
        assert_eq!(response.summary.capacity_rejections, 2);
    }

    #[test]
    fn past_day_is_flagged_and_books_nothing() {
        let registry = RunRegistry::new();
        let id = registry.insert(contested_run("hand"), None).unwrap();
        registry.advance_day(&id, &advance(-20, json!({}))).unwrap();
        registry.advance_day(&id, &advance(-19, json!({}))).unwrap();

        let response = registry.advance_day(&id, &advance(-20, json!({ "30": 10.0 }))).unwrap();
        let advisory = response.out_of_order.unwrap();
        assert_eq!(advisory.day, Day(-20));
        assert_eq!(advisory.expected, Day(-18));
        assert!(response.bookings.is_empty());
        assert_eq!(registry.status(&id).unwrap().next_shopping_day, Day(-18));
    }

    #[test]
    fn response_json_shape() {
        let registry = RunRegistry::new();
        let id = registry.insert(contested_run("hand"), None).unwrap();
        let response = registry.advance_day(&id, &advance(-20, json!({ "30": 65.0, "x": 1 }))).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["simulation_day"], -20);
        assert_eq!(json["bookings"][0]["user_id"], "casual-001");
        assert_eq!(json["issues"][0]["date"], "x");
        assert!(json.get("out_of_order").is_none());
    }
}

#[cfg(test)]
mod concurrency {
    use std::thread;

    use super::*;

    #[test]
    fn same_day_from_many_threads_books_once() {
        let reference = RunRegistry::new();
        let id = reference.create(create(21)).unwrap();
        let expected = reference.advance_day(&id, &advance(-5, flat_prices(1.0))).unwrap().bookings.len();
        assert!(expected > 0);

        let registry = RunRegistry::new();
        let id = registry.create(create(21)).unwrap();
        let request = advance(-5, flat_prices(1.0));
        let booked: usize = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| registry.advance_day(&id, &request).unwrap().bookings.len()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(booked, expected);
        assert_eq!(registry.status(&id).unwrap().bookings_so_far, expected);
    }

    #[test]
    fn independent_runs_advance_in_parallel() {
        let registry = RunRegistry::new();
        let ids: Vec<String> = (1..=4).map(|seed| registry.create(create(seed)).unwrap()).collect();
        let prices = flat_prices(100.0);

        thread::scope(|s| {
            for id in &ids {
                let (registry, prices) = (&registry, &prices);
                s.spawn(move || {
                    for day in -20..100 {
                        registry.advance_day(id, &advance(day, prices.clone())).unwrap();
                    }
                });
            }
        });

        for (seed, id) in (1..=4).zip(&ids) {
            let solo = RunRegistry::new();
            let solo_id = solo.create(create(seed)).unwrap();
            for day in -20..100 {
                solo.advance_day(&solo_id, &advance(day, prices.clone())).unwrap();
            }
            assert_eq!(registry.statistics(id).unwrap(), solo.statistics(&solo_id).unwrap());
            assert_eq!(registry.status(id).unwrap().next_shopping_day, Day(100));
        }
    }
}
