//! CSV ingestion for flight records.
//!
//! The column contract is checked once here; everything downstream works on
//! the typed [`FlightRecord`] and never looks at column names again.

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::LoadError;

/// Columns every dataset must carry. Any other column is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "AIRLINE",
    "ORIGIN_AIRPORT",
    "SCHEDULED_DEPARTURE",
    "DAY_OF_WEEK",
    "MONTH",
    "ARRIVAL_DELAY",
];

/// One observed flight leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    pub airline: String,
    pub origin_airport: String,
    /// Local scheduled departure as HHMM.
    pub scheduled_departure: Option<i32>,
    /// 1 = Monday .. 7 = Sunday. Not range checked at load time.
    pub day_of_week: u8,
    /// 1..=12; rows outside that range are rejected at load time.
    pub month: u8,
    /// Minutes late at arrival; `None` for cancelled or diverted flights.
    pub arrival_delay: Option<i32>,
}

/// Result of loading a dataset: the accepted records and how many rows were
/// unusable.
#[derive(Debug, Default)]
pub struct LoadedFlights {
    pub records: Vec<FlightRecord>,
    pub rejected_rows: usize,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "AIRLINE")]
    airline: Option<String>,
    #[serde(rename = "ORIGIN_AIRPORT")]
    origin_airport: Option<String>,
    #[serde(rename = "SCHEDULED_DEPARTURE")]
    scheduled_departure: Option<String>,
    #[serde(rename = "DAY_OF_WEEK")]
    day_of_week: Option<String>,
    #[serde(rename = "MONTH")]
    month: Option<String>,
    #[serde(rename = "ARRIVAL_DELAY")]
    arrival_delay: Option<String>,
}

impl RawRow {
    fn into_record(self) -> Option<FlightRecord> {
        let airline = non_empty(self.airline)?;
        let origin_airport = non_empty(self.origin_airport)?;
        let day_of_week =
            parse_int(self.day_of_week.as_deref()).and_then(|v| u8::try_from(v).ok())?;
        let month = parse_int(self.month.as_deref())
            .and_then(|v| u8::try_from(v).ok())
            .filter(|m| (1..=12).contains(m))?;

        Some(FlightRecord {
            airline,
            origin_airport,
            scheduled_departure: parse_int(self.scheduled_departure.as_deref()),
            day_of_week,
            month,
            arrival_delay: parse_int(self.arrival_delay.as_deref()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an integer cell, accepting integral floats such as `15.0` as written
/// by dataframe exports. Fractional values such as `15.4` are treated as
/// missing, as is anything else that is not a whole number.
pub fn parse_int(cell: Option<&str>) -> Option<i32> {
    let cell = cell?.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(v) = cell.parse::<i32>() {
        return Some(v);
    }
    let v = cell.parse::<f64>().ok()?;
    if !v.is_finite() || v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

/// Loads a flight dataset from a CSV file. Paths ending in `.gz` are
/// decompressed on the fly.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file is absent, lacks one of the
/// [`REQUIRED_COLUMNS`], or yields no usable records.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_flights(path: impl AsRef<Path>) -> Result<LoadedFlights, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!("Reading gzip-compressed dataset");
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let loaded = read_flights(reader, path)?;
    info!(
        records = loaded.records.len(),
        rejected = loaded.rejected_rows,
        "Dataset loaded"
    );
    Ok(loaded)
}

/// Reads flight records from any CSV source. `origin` is only used in errors.
pub fn read_flights<R: Read>(reader: R, origin: &Path) -> Result<LoadedFlights, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: origin.to_path_buf(),
            missing,
        });
    }

    let mut loaded = LoadedFlights::default();
    for (line, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(csv_err(e)),
            Err(e) => {
                warn!(row = line + 1, error = %e, "Skipping malformed row");
                loaded.rejected_rows += 1;
                continue;
            }
        };

        match row.into_record() {
            Some(record) => loaded.records.push(record),
            None => {
                warn!(
                    row = line + 1,
                    "Skipping row without airline, airport, weekday or a month in 1..=12"
                );
                loaded.rejected_rows += 1;
            }
        }
    }

    if loaded.records.is_empty() {
        return Err(LoadError::Empty(PathBuf::from(origin)));
    }

    Ok(loaded)
}
