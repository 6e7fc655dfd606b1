//! Integration tests for hd-store.

use hd_booking::{FlatPrice, NoopObserver, Simulation};
use hd_demand::SimulationRun;

fn tmp() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// A generated run with some bookings applied.
fn played_run(days: u32) -> Simulation {
    let run = hd_demand::generate(40, 0.6, 4, Some(5)).unwrap();
    let mut sim = Simulation::new(run);
    sim.run_days(days, &mut FlatPrice { price: 85.0, capacity: None }, &mut NoopObserver).unwrap();
    sim
}

fn fresh_run() -> SimulationRun {
    hd_demand::generate(10, 0.8, 50, Some(42)).unwrap()
}

#[cfg(test)]
mod snapshot_tests {
    use hd_core::Day;

    use super::*;
    use crate::{StoreError, from_json, load_snapshot, save_snapshot, to_json};

    #[test]
    fn file_round_trip_is_exact() {
        let dir = tmp();
        let path = dir.path().join("run.json");
        let sim = played_run(60);
        assert!(sim.simulation_run().booked_count() > 0);

        save_snapshot(&path, sim.simulation_run(), Some(sim.next_day())).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(&loaded.run, sim.simulation_run());
        assert_eq!(loaded.next_shopping_day, Some(Day(40)));
    }

    #[test]
    fn unplayed_run_round_trips_without_progress() {
        let run = fresh_run();
        let json = to_json(&run, None).unwrap();
        assert!(!json.contains("progress"));
        let loaded = from_json(&json).unwrap();
        assert_eq!(loaded.run, run);
        assert_eq!(loaded.next_shopping_day, None);
    }

    #[test]
    fn document_shape() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&fresh_run(), Some(Day(-20))).unwrap()).unwrap();
        let params = &json["simulation_parameters"];
        assert_eq!(params["total_users"], 10);
        assert_eq!(params["hotel_capacity_per_day"], 50);
        assert_eq!(params["simulation_id"], "sim_42");
        assert_eq!(params["seed"], 42);
        assert_eq!(json["progress"]["next_shopping_day"], -20);

        let users = json["users"].as_object().unwrap();
        assert_eq!(users.len(), 10);
        let (id, trips) = users.iter().next().unwrap();
        assert!(id.starts_with("business-") || id.starts_with("casual-"));
        let first = &trips[0];
        assert_eq!(first["trip_id"], 0);
        assert_eq!(first["is_booked"], false);
        assert!(first["booked_price_per_night"].is_null());
        let demand = &first["demands"][0];
        for key in ["shopping_date", "stay_start_date", "stay_end_date", "max_price_per_night"] {
            assert!(demand.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let json = r#"{
            "simulation_parameters": { "total_users": 1, "proportion_casual": 1.0, "hotel_capacity_per_day": 5 },
            "users": {
                "casual-001": [
                    { "trip_id": 0,
                      "demands": [
                        { "shopping_date": -12, "stay_start_date": 30, "stay_end_date": 38, "max_price_per_night": 91.5 },
                        { "shopping_date": -11, "stay_start_date": 30, "stay_end_date": 38, "max_price_per_night": 92.5 }
                      ],
                      "is_booked": false }
                ]
            }
        }"#;
        let loaded = from_json(json).unwrap();
        assert_eq!(loaded.run.itineraries().len(), 1);
        assert_eq!(loaded.run.parameters.seed, None);
        assert_eq!(loaded.run.demand_count(), 2);
    }

    fn with_itinerary(itinerary: &str) -> String {
        format!(
            r#"{{ "simulation_parameters": {{ "total_users": 1, "proportion_casual": 1.0, "hotel_capacity_per_day": 5 }},
                 "users": {{ "casual-001": [ {itinerary} ] }} }}"#
        )
    }

    #[test]
    fn invalid_documents_are_load_errors() {
        let d = |s: i32, start: i32, end: i32| {
            format!(r#"{{ "shopping_date": {s}, "stay_start_date": {start}, "stay_end_date": {end}, "max_price_per_night": 50.0 }}"#)
        };
        let cases = [
            // empty demand list
            with_itinerary(r#"{ "trip_id": 0, "demands": [], "is_booked": false }"#),
            // mismatched stays
            with_itinerary(&format!(
                r#"{{ "trip_id": 0, "demands": [{}, {}], "is_booked": false }}"#,
                d(-5, 10, 12),
                d(-4, 10, 13)
            )),
            // booked without a price
            with_itinerary(&format!(r#"{{ "trip_id": 0, "demands": [{}], "is_booked": true }}"#, d(-5, 10, 12))),
        ];
        for json in &cases {
            assert!(matches!(from_json(json), Err(StoreError::Demand(_))), "accepted {json}");
        }
    }

    #[test]
    fn unparsable_user_id_is_an_error() {
        let json = r#"{ "simulation_parameters": { "total_users": 1, "proportion_casual": 1.0, "hotel_capacity_per_day": 5 },
                        "users": { "tourist-001": [] } }"#;
        assert!(matches!(from_json(json), Err(StoreError::Json(_))));
    }

    fn with_users(users: &str) -> String {
        format!(
            r#"{{ "simulation_parameters": {{ "total_users": 2, "proportion_casual": 1.0, "hotel_capacity_per_day": 5 }},
                 "users": {{ {users} }} }}"#
        )
    }

    fn one_trip(stay_start: i32) -> String {
        format!(
            r#"[ {{ "trip_id": 0,
                    "demands": [ {{ "shopping_date": -5, "stay_start_date": {stay_start}, "stay_end_date": {}, "max_price_per_night": 50.0 }} ],
                    "is_booked": false }} ]"#,
            stay_start + 2
        )
    }

    #[test]
    fn unpadded_user_id_is_an_error() {
        let json = with_users(&format!(r#""casual-1": {}, "casual-001": {}"#, one_trip(10), one_trip(20)));
        assert!(matches!(from_json(&json), Err(StoreError::Json(_))));
    }

    #[test]
    fn repeated_user_id_is_an_error() {
        let json = with_users(&format!(r#""casual-001": {}, "casual-001": {}"#, one_trip(10), one_trip(20)));
        assert!(matches!(from_json(&json), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn distinct_users_all_load() {
        let json = with_users(&format!(r#""casual-002": {}, "casual-001": {}"#, one_trip(10), one_trip(20)));
        let loaded = from_json(&json).unwrap();
        assert_eq!(loaded.run.user_count(), 2);
        assert_eq!(loaded.run.itineraries().len(), 2);
    }

    #[test]
    fn user_without_itineraries_is_an_error() {
        let json = r#"{ "simulation_parameters": { "total_users": 1, "proportion_casual": 1.0, "hotel_capacity_per_day": 5 },
                        "users": { "casual-001": [] } }"#;
        assert!(matches!(from_json(json), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn progress_outside_horizon_is_an_error() {
        let json = to_json(&fresh_run(), Some(Day(500))).unwrap();
        assert!(matches!(from_json(&json), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn missing_or_corrupt_files_fail() {
        let dir = tmp();
        assert!(matches!(load_snapshot(&dir.path().join("nope.json")), Err(StoreError::Io(_))));

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        assert!(matches!(load_snapshot(&corrupt), Err(StoreError::Json(_))));
    }
}

#[cfg(test)]
mod csv_tests {
    use hd_core::{Day, ItineraryId, PersonaKind, StayDates, UserId};
    use hd_booking::{BookingRecord, DaySummary};

    use super::*;
    use crate::csv::{BOOKINGS_FILE, DAY_SUMMARIES_FILE};
    use crate::{BookingRow, CsvReportWriter, DaySummaryRow, ReportObserver, ReportWriter};

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvReportWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(
            headers(&dir.path().join(BOOKINGS_FILE)),
            ["day", "user_id", "trip_id", "price_per_night", "stay_start", "stay_end", "nights"]
        );
        assert_eq!(
            headers(&dir.path().join(DAY_SUMMARIES_FILE)),
            ["day", "checked", "booked", "price_rejections", "capacity_rejections", "unpriced"]
        );
    }

    #[test]
    fn booking_row_written() {
        let dir = tmp();
        let mut w = CsvReportWriter::new(dir.path()).unwrap();
        let record = BookingRecord {
            user_id:                UserId::new(PersonaKind::Casual, 1),
            trip_id:                1,
            itinerary:              ItineraryId(0),
            booked_price_per_night: 65.0,
            stay_dates:             StayDates::new(Day(30), 8),
        };
        w.write_booking(&BookingRow::new(Day(-10), &record)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(BOOKINGS_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let fields: Vec<&str> = rows[0].iter().collect();
        assert_eq!(fields, ["-10", "casual-001", "1", "65.00", "30", "38", "8"]);
    }

    #[test]
    fn summary_row_written() {
        let dir = tmp();
        let mut w = CsvReportWriter::new(dir.path()).unwrap();
        let summary = DaySummary {
            day:                 Day(3),
            checked:             9,
            booked:              2,
            price_rejections:    4,
            capacity_rejections: 1,
            unpriced:            2,
        };
        w.write_day_summary(&DaySummaryRow::from(&summary)).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(DAY_SUMMARIES_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        let fields: Vec<&str> = rows[0].iter().collect();
        assert_eq!(fields, ["3", "9", "2", "4", "1", "2"]);
    }

    #[test]
    fn observer_writes_a_full_run() {
        let dir = tmp();
        let mut sim = Simulation::new(fresh_run());
        let mut obs = ReportObserver::new(CsvReportWriter::new(dir.path()).unwrap());
        sim.run(&mut FlatPrice { price: 80.0, capacity: None }, &mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join(DAY_SUMMARIES_FILE)).unwrap();
        assert_eq!(rdr.records().count(), 120);

        let mut rdr = csv::Reader::from_path(dir.path().join(BOOKINGS_FILE)).unwrap();
        assert_eq!(rdr.records().count(), sim.simulation_run().booked_count());
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _w = CsvReportWriter::new(&nested).unwrap();
        assert!(nested.join(BOOKINGS_FILE).exists());
    }
}
