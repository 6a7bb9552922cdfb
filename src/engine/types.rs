//! Data types produced by the aggregation engine.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::engine::classify::{DayName, DelayCategory, TimeOfDay};

/// Delay statistics for one group of flights.
///
/// `total` only counts flights with an arrival delay; `no_data` marks groups
/// where that count is zero, in which case the rate is 0.0 and the delay
/// statistics are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAggregate<K> {
    pub group_key: K,
    pub total: usize,
    pub delayed: usize,
    pub delay_rate_pct: f64,
    pub no_data: bool,
    pub mean_delay: Option<f64>,
    pub median_delay: Option<f64>,
    pub max_delay: Option<i32>,
}

/// A value per delay category, kept in category order and serialized as a
/// JSON object keyed by category label.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown<T>(pub Vec<(DelayCategory, T)>);

impl<T> CategoryBreakdown<T> {
    pub fn get(&self, category: DelayCategory) -> Option<&T> {
        self.0.iter().find(|(c, _)| *c == category).map(|(_, v)| v)
    }
}

impl<T: Serialize> Serialize for CategoryBreakdown<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, value) in &self.0 {
            map.serialize_entry(category.label(), value)?;
        }
        map.end()
    }
}

/// Airport row of the batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportRate {
    #[serde(rename = "Airport")]
    pub airport: String,
    #[serde(rename = "Delay_Rate")]
    pub delay_rate: f64,
    #[serde(rename = "Total")]
    pub total: usize,
}

/// Best/worst airline entry of the batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirlineRate {
    #[serde(rename = "Airline")]
    pub airline: String,
    #[serde(rename = "Delay_Rate")]
    pub delay_rate: f64,
}

/// Airline ranking row of the batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirlineRanking {
    #[serde(rename = "Airline")]
    pub airline: String,
    #[serde(rename = "Delay_Rate")]
    pub delay_rate: f64,
    #[serde(rename = "Avg_Delay")]
    pub avg_delay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePeriodRate {
    #[serde(rename = "Time_Period")]
    pub time_period: TimeOfDay,
    #[serde(rename = "Delay_Rate")]
    pub delay_rate: f64,
    #[serde(rename = "Total")]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRate {
    #[serde(rename = "Month")]
    pub month: u8,
    #[serde(rename = "Delay_Rate")]
    pub delay_rate: f64,
}

/// Static report document. Field names are a fixed contract for downstream
/// consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total_flights: usize,
    pub delayed_flights: usize,
    pub delay_rate_pct: f64,
    pub avg_delay_min: f64,
    pub median_delay_min: f64,
    pub max_delay_min: i32,
    pub delay_distribution_pct: CategoryBreakdown<f64>,
    pub top5_airports: Vec<AirportRate>,
    pub worst_airline: Option<AirlineRate>,
    pub best_airline: Option<AirlineRate>,
    pub time_stats: Vec<TimePeriodRate>,
    pub best_month: Option<MonthRate>,
    pub worst_month: Option<MonthRate>,
    pub airline_rankings: Vec<AirlineRanking>,
}

/// Headline numbers of the interactive view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_flights: usize,
    pub scored_flights: usize,
    pub cancelled_or_diverted: usize,
    pub delayed_flights: usize,
    pub delay_rate_pct: f64,
    pub mean_delay_min: f64,
    pub median_delay_min: f64,
    pub max_delay_min: i32,
    /// `total_flights` scaled up by the sampling multiplier.
    pub estimated_full_volume: u64,
}

/// Five-number summary of delay durations for one airline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayDurationSummary {
    pub airline: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Named summaries backing the interactive view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub delay_distribution: CategoryBreakdown<usize>,
    pub critical_airports: Vec<GroupAggregate<String>>,
    pub airline_rankings: Vec<GroupAggregate<String>>,
    pub delay_durations: Vec<DelayDurationSummary>,
    pub time_of_day: Vec<GroupAggregate<TimeOfDay>>,
    pub day_of_week: Vec<GroupAggregate<DayName>>,
}
