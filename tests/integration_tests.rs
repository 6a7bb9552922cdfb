use flight_delay_stats::config::{DashboardConfig, ReportConfig};
use flight_delay_stats::engine::aggregate::aggregate;
use flight_delay_stats::engine::classify::{TimeOfDay, classify_all};
use flight_delay_stats::engine::filter::{FilterSpec, apply};
use flight_delay_stats::engine::report::{assemble_dashboard, assemble_report};
use flight_delay_stats::record::{FlightRecord, load_flights};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/flights_sample.csv");

fn fixture_records() -> Vec<FlightRecord> {
    let loaded = load_flights(FIXTURE).expect("Failed to load fixture");
    assert_eq!(loaded.rejected_rows, 0);
    loaded.records
}

fn report_config() -> ReportConfig {
    ReportConfig {
        airport_min_volume: 2,
        ..ReportConfig::default()
    }
}

fn record(airline: &str, delay: Option<i32>) -> FlightRecord {
    FlightRecord {
        airline: airline.into(),
        origin_airport: "ORD".into(),
        scheduled_departure: Some(1200),
        day_of_week: 3,
        month: 6,
        arrival_delay: delay,
    }
}

#[test]
fn test_four_record_scenario() {
    let records = vec![
        record("A", Some(10)),
        record("A", Some(20)),
        record("B", None),
        record("B", Some(5)),
    ];
    let flights = classify_all(&records);
    let groups = aggregate(&flights, |f| f.record.airline.clone(), 0);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].group_key, "A");
    assert_eq!((groups[0].total, groups[0].delayed), (2, 1));
    assert_eq!(groups[0].delay_rate_pct, 50.0);
    assert_eq!(groups[1].group_key, "B");
    assert_eq!((groups[1].total, groups[1].delayed), (1, 0));
    assert_eq!(groups[1].delay_rate_pct, 0.0);

    let spec = FilterSpec::default().with_airlines(["B"]);
    let filtered = aggregate(&apply(&flights, &spec), |f| f.record.airline.clone(), 0);
    assert_eq!(filtered, vec![groups[1].clone()]);
}

#[test]
fn test_empty_dataset_report() {
    let report = assemble_report(&[], None, &ReportConfig::default());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["delay_rate_pct"], 0.0);
    assert_eq!(json["top5_airports"], serde_json::json!([]));
    assert!(json["worst_airline"].is_null());
}

#[test]
fn test_fixture_report_kpis() {
    let report = assemble_report(&fixture_records(), None, &report_config());

    assert_eq!(report.total_flights, 20);
    assert_eq!(report.delayed_flights, 7);
    assert_eq!(report.delay_rate_pct, 38.89);
    assert_eq!(report.avg_delay_min, 21.22);
    assert_eq!(report.median_delay_min, 10.0);
    assert_eq!(report.max_delay_min, 125);
}

#[test]
fn test_fixture_report_rankings() {
    let report = assemble_report(&fixture_records(), None, &report_config());

    let airports: Vec<_> = report.top5_airports.iter().map(|a| a.airport.as_str()).collect();
    assert_eq!(airports, vec!["JFK", "LAS", "LAX", "ANC", "ATL"]);

    let worst = report.worst_airline.as_ref().unwrap();
    assert_eq!((worst.airline.as_str(), worst.delay_rate), ("NK", 80.0));
    assert_eq!(report.best_airline.as_ref().unwrap().airline, "AS");

    let rankings: Vec<_> = report.airline_rankings.iter().map(|a| a.airline.as_str()).collect();
    assert_eq!(rankings, vec!["NK", "AA", "AS", "DL"]);
    assert_eq!(report.airline_rankings[1].avg_delay, 11.17);

    assert_eq!(report.best_month.as_ref().unwrap().month, 5);
    let worst_month = report.worst_month.as_ref().unwrap();
    assert_eq!((worst_month.month, worst_month.delay_rate), (2, 66.67));
}

#[test]
fn test_fixture_time_stats() {
    let report = assemble_report(&fixture_records(), None, &report_config());
    let periods: Vec<_> = report
        .time_stats
        .iter()
        .map(|t| (t.time_period, t.total, t.delay_rate))
        .collect();

    assert_eq!(
        periods,
        vec![
            (TimeOfDay::Morning, 6, 33.33),
            (TimeOfDay::Afternoon, 4, 75.0),
            (TimeOfDay::Evening, 1, 0.0),
            (TimeOfDay::Night, 6, 16.67),
            (TimeOfDay::Unknown, 1, 100.0),
        ]
    );
}

#[test]
fn test_fixture_report_json_shape() {
    let report = assemble_report(&fixture_records(), None, &report_config());
    let json = serde_json::to_value(&report).unwrap();

    for key in [
        "total_flights",
        "delayed_flights",
        "delay_rate_pct",
        "avg_delay_min",
        "median_delay_min",
        "max_delay_min",
        "delay_distribution_pct",
        "top5_airports",
        "worst_airline",
        "best_airline",
        "time_stats",
        "best_month",
        "worst_month",
        "airline_rankings",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["delay_distribution_pct"]["On Time/Early"], 38.89);
    assert_eq!(json["delay_distribution_pct"]["Major Delay (>60 min)"], 16.67);
    assert_eq!(json["top5_airports"][0]["Airport"], "JFK");
    assert_eq!(json["top5_airports"][0]["Total"], 2);
    assert_eq!(json["time_stats"][0]["Time_Period"], "Morning (5am-12pm)");
    assert_eq!(json["worst_month"]["Month"], 2);
}

#[test]
fn test_report_is_reproducible() {
    let records = fixture_records();
    let first = serde_json::to_string(&assemble_report(&records, None, &report_config())).unwrap();
    let second = serde_json::to_string(&assemble_report(&records, None, &report_config())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_fixture_dashboard_with_filter() {
    let spec = FilterSpec::default()
        .with_airlines(["NK"])
        .with_month_range(1, 3);
    let config = DashboardConfig {
        airport_min_volume: 1,
        ..DashboardConfig::default()
    };
    let dashboard = assemble_dashboard(&fixture_records(), Some(&spec), &config);

    assert_eq!(dashboard.kpis.total_flights, 4);
    assert_eq!(dashboard.kpis.delayed_flights, 3);
    assert_eq!(dashboard.kpis.delay_rate_pct, 75.0);
    assert_eq!(dashboard.airline_rankings.len(), 1);
    assert_eq!(dashboard.critical_airports[0].group_key, "LAS");
    assert_eq!(dashboard.delay_durations[0].count, 3);
}
