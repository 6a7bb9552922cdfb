//! Grouped delay statistics over classified flights.

use crate::engine::classify::{ClassifiedFlight, DELAY_THRESHOLD_MIN};
use crate::engine::types::{DelayDurationSummary, GroupAggregate};
use crate::engine::utility::{mean, median, pct, percentile, sorted_delays};
use std::collections::BTreeMap;
use tracing::debug;

impl<K> GroupAggregate<K> {
    /// Builds the statistics of one group from the arrival delays of its
    /// flights. Flights without a delay must already be left out.
    pub fn from_delays(group_key: K, delays: &[i32]) -> Self {
        let total = delays.len();
        let delayed = delays.iter().filter(|d| **d > DELAY_THRESHOLD_MIN).count();

        if total == 0 {
            return GroupAggregate {
                group_key,
                total: 0,
                delayed: 0,
                delay_rate_pct: 0.0,
                no_data: true,
                mean_delay: None,
                median_delay: None,
                max_delay: None,
            };
        }

        let sorted = sorted_delays(delays.iter().copied());

        GroupAggregate {
            group_key,
            total,
            delayed,
            delay_rate_pct: pct(delayed, total),
            no_data: false,
            mean_delay: Some(mean(&sorted)),
            median_delay: Some(median(&sorted)),
            max_delay: delays.iter().copied().max(),
        }
    }
}

/// Groups flights by `key_fn` and computes one [`GroupAggregate`] per group,
/// ordered by ascending key.
///
/// With `min_volume > 0`, groups with fewer than `min_volume` delay-bearing
/// flights are dropped. With `min_volume == 0` every group is kept, including
/// ones without any delay data.
pub fn aggregate<K, F>(
    flights: &[ClassifiedFlight],
    key_fn: F,
    min_volume: usize,
) -> Vec<GroupAggregate<K>>
where
    K: Ord,
    F: Fn(&ClassifiedFlight) -> K,
{
    let mut groups: BTreeMap<K, Vec<i32>> = BTreeMap::new();

    for flight in flights {
        let delays = groups.entry(key_fn(flight)).or_default();
        if let Some(delay) = flight.arrival_delay() {
            delays.push(delay);
        }
    }

    let group_count = groups.len();
    let aggregates: Vec<_> = groups
        .into_iter()
        .filter(|(_, delays)| min_volume == 0 || delays.len() >= min_volume)
        .map(|(key, delays)| GroupAggregate::from_delays(key, &delays))
        .collect();

    debug!(
        groups = group_count,
        kept = aggregates.len(),
        min_volume,
        "Aggregated flights"
    );

    aggregates
}

/// Statistics over the whole collection, as a single group.
pub fn summarize(flights: &[ClassifiedFlight]) -> GroupAggregate<()> {
    let delays: Vec<i32> = flights.iter().filter_map(|f| f.arrival_delay()).collect();
    GroupAggregate::from_delays((), &delays)
}

/// Per-airline spread of delays strictly inside `(lower, upper)` minutes,
/// ordered by airline. Airlines with no delay in the window are omitted.
pub fn delay_durations(
    flights: &[ClassifiedFlight],
    lower: i32,
    upper: i32,
) -> Vec<DelayDurationSummary> {
    let mut by_airline: BTreeMap<&str, Vec<i32>> = BTreeMap::new();

    for flight in flights {
        if let Some(delay) = flight.arrival_delay().filter(|d| *d > lower && *d < upper) {
            by_airline
                .entry(flight.record.airline.as_str())
                .or_default()
                .push(delay);
        }
    }

    by_airline
        .into_iter()
        .map(|(airline, delays)| {
            let sorted = sorted_delays(delays.into_iter());
            DelayDurationSummary {
                airline: airline.to_string(),
                count: sorted.len(),
                min: percentile(&sorted, 0.0),
                q1: percentile(&sorted, 0.25),
                median: median(&sorted),
                q3: percentile(&sorted, 0.75),
                max: percentile(&sorted, 1.0),
            }
        })
        .collect()
}
