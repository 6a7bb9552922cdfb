//! Declarative record filtering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::engine::classify::ClassifiedFlight;
use crate::record::FlightRecord;

/// Which flights to keep. Empty sets place no restriction on their field;
/// the month range is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub airlines: BTreeSet<String>,
    pub origin_airports: BTreeSet<String>,
    pub month_range: (u8, u8),
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            airlines: BTreeSet::new(),
            origin_airports: BTreeSet::new(),
            month_range: (1, 12),
        }
    }
}

impl FilterSpec {
    pub fn with_airlines<I, S>(mut self, airlines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.airlines = airlines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_origin_airports<I, S>(mut self, airports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.origin_airports = airports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_month_range(mut self, min_month: u8, max_month: u8) -> Self {
        self.month_range = (min_month, max_month);
        self
    }

    /// True when no predicate excludes anything for a 1–12 month calendar.
    pub fn is_unrestricted(&self) -> bool {
        self.airlines.is_empty()
            && self.origin_airports.is_empty()
            && self.month_range.0 <= 1
            && self.month_range.1 >= 12
    }

    pub fn matches(&self, record: &FlightRecord) -> bool {
        let (min_month, max_month) = self.month_range;
        (self.airlines.is_empty() || self.airlines.contains(&record.airline))
            && (self.origin_airports.is_empty()
                || self.origin_airports.contains(&record.origin_airport))
            && (min_month..=max_month).contains(&record.month)
    }
}

/// Keeps the flights matching `spec`, in their original order.
pub fn apply(flights: &[ClassifiedFlight], spec: &FilterSpec) -> Vec<ClassifiedFlight> {
    flights
        .iter()
        .filter(|f| spec.matches(&f.record))
        .cloned()
        .collect()
}

/// Choices a filtering UI can offer for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub airlines: Vec<String>,
    pub origin_airports: Vec<String>,
    /// `None` for an empty dataset.
    pub month_range: Option<(u8, u8)>,
}

impl FilterOptions {
    pub fn from_records(records: &[FlightRecord]) -> Self {
        let airlines: BTreeSet<&str> = records.iter().map(|r| r.airline.as_str()).collect();
        let airports: BTreeSet<&str> = records.iter().map(|r| r.origin_airport.as_str()).collect();
        let min_month = records.iter().map(|r| r.month).min();
        let max_month = records.iter().map(|r| r.month).max();

        Self {
            airlines: airlines.into_iter().map(String::from).collect(),
            origin_airports: airports.into_iter().map(String::from).collect(),
            month_range: min_month.zip(max_month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::classify_all;

    fn record(airline: &str, origin: &str, month: u8) -> FlightRecord {
        FlightRecord {
            airline: airline.into(),
            origin_airport: origin.into(),
            scheduled_departure: Some(1000),
            day_of_week: 2,
            month,
            arrival_delay: Some(0),
        }
    }

    fn flights() -> Vec<ClassifiedFlight> {
        classify_all(&[
            record("AA", "JFK", 1),
            record("DL", "ATL", 3),
            record("AA", "ORD", 6),
            record("UA", "JFK", 12),
        ])
    }

    fn airlines(flights: &[ClassifiedFlight]) -> Vec<&str> {
        flights.iter().map(|f| f.record.airline.as_str()).collect()
    }

    #[test]
    fn test_empty_spec_keeps_everything_in_order() {
        let all = flights();
        let spec = FilterSpec::default();
        assert!(spec.is_unrestricted());
        assert_eq!(apply(&all, &spec), all);
    }

    #[test]
    fn test_conjunctive_predicates() {
        let spec = FilterSpec::default()
            .with_airlines(["AA", "UA"])
            .with_origin_airports(["JFK"]);
        assert_eq!(airlines(&apply(&flights(), &spec)), vec!["AA", "UA"]);

        let spec = FilterSpec::default().with_airlines(["AA"]).with_month_range(2, 12);
        let kept = apply(&flights(), &spec);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].record.origin_airport, "ORD");
    }

    #[test]
    fn test_month_range_is_inclusive() {
        let spec = FilterSpec::default().with_month_range(3, 6);
        assert_eq!(airlines(&apply(&flights(), &spec)), vec!["DL", "AA"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let spec = FilterSpec::default().with_origin_airports(["JFK", "ATL"]);
        let once = apply(&flights(), &spec);
        assert_eq!(apply(&once, &spec), once);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let spec = FilterSpec::default().with_airlines(["ZZ"]);
        assert!(apply(&flights(), &spec).is_empty());

        let inverted = FilterSpec::default().with_month_range(9, 2);
        assert!(apply(&flights(), &inverted).is_empty());
    }

    #[test]
    fn test_filter_options() {
        let records: Vec<FlightRecord> = flights().into_iter().map(|f| f.record).collect();
        let options = FilterOptions::from_records(&records);

        assert_eq!(options.airlines, vec!["AA", "DL", "UA"]);
        assert_eq!(options.origin_airports, vec!["ATL", "JFK", "ORD"]);
        assert_eq!(options.month_range, Some((1, 12)));
        assert_eq!(FilterOptions::from_records(&[]).month_range, None);
    }
}
