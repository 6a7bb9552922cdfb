//! Derived categorical fields for a single flight.

use chrono::Weekday;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::record::FlightRecord;

/// Arrival delays above this many minutes count as "delayed".
pub const DELAY_THRESHOLD_MIN: i32 = 15;

/// Severity band of an arrival delay.
///
/// | Range          | Category         |
/// |----------------|------------------|
/// | d <= 0         | OnTimeOrEarly    |
/// | 0 < d <= 15    | MinorDelay       |
/// | 15 < d <= 30   | ModerateDelay    |
/// | 30 < d <= 60   | SignificantDelay |
/// | d > 60         | MajorDelay       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DelayCategory {
    OnTimeOrEarly,
    MinorDelay,
    ModerateDelay,
    SignificantDelay,
    MajorDelay,
}

impl DelayCategory {
    pub const ALL: [DelayCategory; 5] = [
        DelayCategory::OnTimeOrEarly,
        DelayCategory::MinorDelay,
        DelayCategory::ModerateDelay,
        DelayCategory::SignificantDelay,
        DelayCategory::MajorDelay,
    ];

    pub fn from_delay(delay: i32) -> Self {
        match delay {
            d if d <= 0 => DelayCategory::OnTimeOrEarly,
            d if d <= 15 => DelayCategory::MinorDelay,
            d if d <= 30 => DelayCategory::ModerateDelay,
            d if d <= 60 => DelayCategory::SignificantDelay,
            _ => DelayCategory::MajorDelay,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DelayCategory::OnTimeOrEarly => "On Time/Early",
            DelayCategory::MinorDelay => "Minor Delay (1-15 min)",
            DelayCategory::ModerateDelay => "Moderate Delay (16-30 min)",
            DelayCategory::SignificantDelay => "Significant Delay (31-60 min)",
            DelayCategory::MajorDelay => "Major Delay (>60 min)",
        }
    }
}

/// Part of the day a flight was scheduled to leave in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
    Unknown,
}

impl TimeOfDay {
    /// Buckets an HHMM departure. `2400` is midnight; any other value whose
    /// hour or minute is out of range is `Unknown`.
    pub fn from_scheduled_departure(hhmm: Option<i32>) -> Self {
        let Some(hhmm) = hhmm else {
            return TimeOfDay::Unknown;
        };
        if !(0..=2400).contains(&hhmm) || hhmm % 100 >= 60 {
            return TimeOfDay::Unknown;
        }

        match (hhmm / 100) % 24 {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning (5am-12pm)",
            TimeOfDay::Afternoon => "Afternoon (12pm-5pm)",
            TimeOfDay::Evening => "Evening (5pm-9pm)",
            TimeOfDay::Night => "Night (9pm-5am)",
            TimeOfDay::Unknown => "Unknown",
        }
    }
}

/// Weekday name of a flight, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayName {
    Known(Weekday),
    Unknown,
}

impl DayName {
    /// Maps `1..=7` (Monday..Sunday) to a weekday.
    pub fn from_day_of_week(day: u8) -> Self {
        day.checked_sub(1)
            .and_then(|d| Weekday::try_from(d).ok())
            .map_or(DayName::Unknown, DayName::Known)
    }

    pub fn label(self) -> String {
        self.to_string()
    }

    fn sort_index(self) -> u32 {
        match self {
            DayName::Known(w) => w.num_days_from_monday(),
            DayName::Unknown => 7,
        }
    }
}

impl PartialOrd for DayName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DayName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_index().cmp(&other.sort_index())
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayName::Known(w) => write!(f, "{w}"),
            DayName::Unknown => f.write_str("Unknown"),
        }
    }
}

macro_rules! serialize_as_label {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(&self.label())
                }
            }
        )*
    };
}

serialize_as_label!(DelayCategory, TimeOfDay, DayName);

/// Fields computed from a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    /// `None` when the flight has no arrival delay.
    pub delay_category: Option<DelayCategory>,
    pub time_of_day: TimeOfDay,
    pub day_name: DayName,
}

/// A raw record paired with its derived fields. The record itself is never
/// modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFlight {
    pub record: FlightRecord,
    pub derived: DerivedFields,
}

impl ClassifiedFlight {
    pub fn new(record: FlightRecord) -> Self {
        let derived = classify(&record);
        Self { record, derived }
    }

    pub fn arrival_delay(&self) -> Option<i32> {
        self.record.arrival_delay
    }

    pub fn is_delayed(&self) -> bool {
        self.record
            .arrival_delay
            .is_some_and(|d| d > DELAY_THRESHOLD_MIN)
    }
}

/// Computes the derived fields of a record. Total: malformed inputs land in
/// the `Unknown` buckets.
pub fn classify(record: &FlightRecord) -> DerivedFields {
    DerivedFields {
        delay_category: record.arrival_delay.map(DelayCategory::from_delay),
        time_of_day: TimeOfDay::from_scheduled_departure(record.scheduled_departure),
        day_name: DayName::from_day_of_week(record.day_of_week),
    }
}

pub fn classify_all(records: &[FlightRecord]) -> Vec<ClassifiedFlight> {
    records.iter().cloned().map(ClassifiedFlight::new).collect()
}
