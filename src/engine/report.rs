//! Report assembly: classify once, filter once, then build every section from
//! the same working set.

use tracing::{debug, info};

use crate::config::{DashboardConfig, ReportConfig};
use crate::engine::aggregate::{aggregate, delay_durations, summarize};
use crate::engine::classify::{ClassifiedFlight, DelayCategory, classify_all};
use crate::engine::filter::{FilterSpec, apply};
use crate::engine::rank::{Direction, Metric, best, rank, worst};
use crate::engine::types::{
    AirlineRanking, AirlineRate, AirportRate, CategoryBreakdown, Dashboard, GroupAggregate, Kpis,
    MonthRate, Report, TimePeriodRate,
};
use crate::engine::utility::{pct, round2};
use crate::record::FlightRecord;

/// Classified and filtered flights that every section of one report reads.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    flights: Vec<ClassifiedFlight>,
}

impl WorkingSet {
    pub fn build(records: &[FlightRecord], filter: Option<&FilterSpec>) -> Self {
        let classified = classify_all(records);
        let flights = match filter {
            Some(spec) if !spec.is_unrestricted() => apply(&classified, spec),
            _ => classified,
        };
        debug!(
            input = records.len(),
            working_set = flights.len(),
            "Working set built"
        );
        Self { flights }
    }

    pub fn flights(&self) -> &[ClassifiedFlight] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    fn category_counts(&self) -> CategoryBreakdown<usize> {
        CategoryBreakdown(
            DelayCategory::ALL
                .iter()
                .map(|category| {
                    let count = self
                        .flights
                        .iter()
                        .filter(|f| f.derived.delay_category == Some(*category))
                        .count();
                    (*category, count)
                })
                .collect(),
        )
    }

    fn by_airline(&self, min_volume: usize) -> Vec<GroupAggregate<String>> {
        aggregate(&self.flights, |f| f.record.airline.clone(), min_volume)
    }

    fn by_airport(&self, min_volume: usize) -> Vec<GroupAggregate<String>> {
        aggregate(&self.flights, |f| f.record.origin_airport.clone(), min_volume)
    }
}

fn airline_rate(group: GroupAggregate<String>) -> AirlineRate {
    AirlineRate {
        airline: group.group_key,
        delay_rate: round2(group.delay_rate_pct),
    }
}

fn month_rate(group: GroupAggregate<u8>) -> MonthRate {
    MonthRate {
        month: group.group_key,
        delay_rate: round2(group.delay_rate_pct),
    }
}

/// Builds the static report over `records`, optionally narrowed by `filter`.
///
/// Never fails: an empty working set yields zero rates and empty rankings.
#[tracing::instrument(skip_all, fields(records = records.len(), filtered = filter.is_some()))]
pub fn assemble_report(
    records: &[FlightRecord],
    filter: Option<&FilterSpec>,
    config: &ReportConfig,
) -> Report {
    let working = WorkingSet::build(records, filter);
    let flights = working.flights();
    let overall = summarize(flights);

    let counts = working.category_counts();
    let delay_distribution_pct = CategoryBreakdown(
        counts
            .0
            .iter()
            .map(|(category, count)| (*category, round2(pct(*count, overall.total))))
            .collect(),
    );

    let airports = working.by_airport(config.airport_min_volume);
    let top5_airports = rank(
        &airports,
        Metric::DelayRate,
        Direction::Descending,
        Some(config.top_airports),
    )
    .into_iter()
    .map(|g| AirportRate {
        airport: g.group_key,
        delay_rate: round2(g.delay_rate_pct),
        total: g.total,
    })
    .collect();

    let airlines = working.by_airline(0);
    let airline_rankings = rank(
        &airlines,
        Metric::DelayRate,
        Direction::Descending,
        Some(config.airline_rankings_limit),
    )
    .into_iter()
    .map(|g| AirlineRanking {
        avg_delay: round2(g.mean_delay.unwrap_or(0.0)),
        airline: g.group_key,
        delay_rate: round2(g.delay_rate_pct),
    })
    .collect();

    let time_stats = aggregate(flights, |f| f.derived.time_of_day, 0)
        .into_iter()
        .map(|g| TimePeriodRate {
            time_period: g.group_key,
            delay_rate: round2(g.delay_rate_pct),
            total: g.total,
        })
        .collect();

    let months = aggregate(flights, |f| f.record.month, 0);

    let report = Report {
        total_flights: working.len(),
        delayed_flights: overall.delayed,
        delay_rate_pct: round2(overall.delay_rate_pct),
        avg_delay_min: round2(overall.mean_delay.unwrap_or(0.0)),
        median_delay_min: round2(overall.median_delay.unwrap_or(0.0)),
        max_delay_min: overall.max_delay.unwrap_or(0),
        delay_distribution_pct,
        top5_airports,
        worst_airline: worst(&airlines, Metric::DelayRate).map(airline_rate),
        best_airline: best(&airlines, Metric::DelayRate).map(airline_rate),
        time_stats,
        best_month: best(&months, Metric::DelayRate).map(month_rate),
        worst_month: worst(&months, Metric::DelayRate).map(month_rate),
        airline_rankings,
    };

    info!(
        total_flights = report.total_flights,
        delay_rate_pct = report.delay_rate_pct,
        "Report assembled"
    );
    report
}

/// Builds the interactive summaries over `records`, optionally narrowed by
/// `filter`.
#[tracing::instrument(skip_all, fields(records = records.len(), filtered = filter.is_some()))]
pub fn assemble_dashboard(
    records: &[FlightRecord],
    filter: Option<&FilterSpec>,
    config: &DashboardConfig,
) -> Dashboard {
    let working = WorkingSet::build(records, filter);
    dashboard_from(&working, config)
}

/// Builds the interactive summaries from an already prepared working set, so
/// a caller exporting the same rows sees exactly what was summarized.
pub fn dashboard_from(working: &WorkingSet, config: &DashboardConfig) -> Dashboard {
    let flights = working.flights();
    let overall = summarize(flights);

    let kpis = Kpis {
        total_flights: working.len(),
        scored_flights: overall.total,
        cancelled_or_diverted: working.len() - overall.total,
        delayed_flights: overall.delayed,
        delay_rate_pct: overall.delay_rate_pct,
        mean_delay_min: overall.mean_delay.unwrap_or(0.0),
        median_delay_min: overall.median_delay.unwrap_or(0.0),
        max_delay_min: overall.max_delay.unwrap_or(0),
        estimated_full_volume: (working.len() as u64).saturating_mul(config.sample_multiplier),
    };

    let critical_airports = rank(
        &working.by_airport(config.airport_min_volume),
        Metric::DelayRate,
        Direction::Descending,
        Some(config.critical_airports),
    );
    let airline_rankings = rank(
        &working.by_airline(0),
        Metric::DelayRate,
        Direction::Descending,
        None,
    );
    let (lower, upper) = config.duration_window_min;

    let dashboard = Dashboard {
        kpis,
        delay_distribution: working.category_counts(),
        critical_airports,
        airline_rankings,
        delay_durations: delay_durations(flights, lower, upper),
        time_of_day: aggregate(flights, |f| f.derived.time_of_day, 0),
        day_of_week: aggregate(flights, |f| f.derived.day_name, 0),
    };

    info!(
        total_flights = dashboard.kpis.total_flights,
        airports = dashboard.critical_airports.len(),
        airlines = dashboard.airline_rankings.len(),
        "Dashboard assembled"
    );
    dashboard
}
