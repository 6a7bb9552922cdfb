//! Output formatting and persistence for reports and working sets.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::engine::classify::{ClassifiedFlight, DayName, DelayCategory, TimeOfDay};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Writes `value` as pretty-printed JSON to `writer`, followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes `value` as JSON to the file at `path`, or to stdout when `path` is
/// `None`.
pub fn emit_json(path: Option<&Path>, value: &impl Serialize) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_json(file, value)?;
            info!(path = %path.display(), "JSON written");
        }
        None => write_json(std::io::stdout().lock(), value)?,
    }
    Ok(())
}

/// Header of an export, matching the field names of [`ExportRow`].
pub const EXPORT_COLUMNS: [&str; 9] = [
    "AIRLINE",
    "ORIGIN_AIRPORT",
    "SCHEDULED_DEPARTURE",
    "DAY_OF_WEEK",
    "MONTH",
    "ARRIVAL_DELAY",
    "DELAY_CATEGORY",
    "TIME_OF_DAY",
    "DAY_NAME",
];

/// One exported row: the input columns followed by the derived ones.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "AIRLINE")]
    airline: &'a str,
    #[serde(rename = "ORIGIN_AIRPORT")]
    origin_airport: &'a str,
    #[serde(rename = "SCHEDULED_DEPARTURE")]
    scheduled_departure: Option<i32>,
    #[serde(rename = "DAY_OF_WEEK")]
    day_of_week: u8,
    #[serde(rename = "MONTH")]
    month: u8,
    #[serde(rename = "ARRIVAL_DELAY")]
    arrival_delay: Option<i32>,
    #[serde(rename = "DELAY_CATEGORY")]
    delay_category: Option<DelayCategory>,
    #[serde(rename = "TIME_OF_DAY")]
    time_of_day: TimeOfDay,
    #[serde(rename = "DAY_NAME")]
    day_name: DayName,
}

impl<'a> From<&'a ClassifiedFlight> for ExportRow<'a> {
    fn from(flight: &'a ClassifiedFlight) -> Self {
        let r = &flight.record;
        ExportRow {
            airline: &r.airline,
            origin_airport: &r.origin_airport,
            scheduled_departure: r.scheduled_departure,
            day_of_week: r.day_of_week,
            month: r.month,
            arrival_delay: r.arrival_delay,
            delay_category: flight.derived.delay_category,
            time_of_day: flight.derived.time_of_day,
            day_name: flight.derived.day_name,
        }
    }
}

/// Writes flights as CSV with a header row. The header is written even when
/// there are no flights.
pub fn write_csv<W: Write>(writer: W, flights: &[ClassifiedFlight]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    if flights.is_empty() {
        writer.write_record(EXPORT_COLUMNS)?;
    }
    for flight in flights {
        writer.serialize(ExportRow::from(flight))?;
    }
    writer.flush()?;
    Ok(())
}

/// Exports flights to a CSV file, gzip-compressed when `gzip` is set.
pub fn export_csv(path: &Path, flights: &[ClassifiedFlight], gzip: bool) -> Result<()> {
    debug!(path = %path.display(), rows = flights.len(), gzip, "Exporting CSV");
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_csv(&mut encoder, flights)?;
        encoder.finish()?;
    } else {
        write_csv(file, flights)?;
    }

    info!(path = %path.display(), rows = flights.len(), "CSV export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::classify_all;
    use crate::record::{FlightRecord, read_flights};
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn flights() -> Vec<ClassifiedFlight> {
        classify_all(&[
            FlightRecord {
                airline: "AA".into(),
                origin_airport: "JFK".into(),
                scheduled_departure: Some(745),
                day_of_week: 1,
                month: 3,
                arrival_delay: Some(42),
            },
            FlightRecord {
                airline: "DL".into(),
                origin_airport: "ATL".into(),
                scheduled_departure: None,
                day_of_week: 9,
                month: 3,
                arrival_delay: None,
            },
        ])
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&flights());
    }

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &serde_json::json!({"total_flights": 0})).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"total_flights\": 0"));
    }

    #[test]
    fn test_write_csv_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &flights()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "AIRLINE,ORIGIN_AIRPORT,SCHEDULED_DEPARTURE,DAY_OF_WEEK,MONTH,ARRIVAL_DELAY,DELAY_CATEGORY,TIME_OF_DAY,DAY_NAME"
        );
        assert_eq!(
            lines[1],
            "AA,JFK,745,1,3,42,Significant Delay (31-60 min),Morning (5am-12pm),Mon"
        );
        assert_eq!(lines[2], "DL,ATL,,9,3,,,Unknown,Unknown");
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, format!("{}\n", EXPORT_COLUMNS.join(",")));
    }

    #[test]
    fn test_export_columns_match_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &flights()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some(EXPORT_COLUMNS.join(",").as_str()));
    }

    #[test]
    fn test_export_is_readable_again() {
        let path = temp_path("flight_delay_stats_test_export.csv");
        let _ = fs::remove_file(&path);

        export_csv(&path, &flights(), false).unwrap();
        let loaded = read_flights(File::open(&path).unwrap(), &path).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].arrival_delay, Some(42));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_gzip() {
        let path = temp_path("flight_delay_stats_test_export.csv.gz");
        let _ = fs::remove_file(&path);

        export_csv(&path, &flights(), true).unwrap();
        let decoder = GzDecoder::new(File::open(&path).unwrap());
        let loaded = read_flights(decoder, &path).unwrap();
        assert_eq!(loaded.records[1].airline, "DL");

        fs::remove_file(&path).unwrap();
    }
}
