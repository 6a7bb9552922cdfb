//! Ordering of aggregated groups.
//!
//! Every selection goes through [`rank`], so `best`/`worst` always agree with
//! the head of the fully sorted list, ties included.

use std::cmp::Ordering;

use crate::engine::types::GroupAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    DelayRate,
    MeanDelay,
    MedianDelay,
    MaxDelay,
    Total,
}

impl Metric {
    /// `None` for groups that carry no delay data, which always rank last.
    pub fn value<K>(self, group: &GroupAggregate<K>) -> Option<f64> {
        if group.no_data {
            return None;
        }
        match self {
            Metric::DelayRate => Some(group.delay_rate_pct),
            Metric::MeanDelay => group.mean_delay,
            Metric::MedianDelay => group.median_delay,
            Metric::MaxDelay => group.max_delay.map(f64::from),
            Metric::Total => Some(group.total as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

fn compare<K: Ord>(
    a: &GroupAggregate<K>,
    b: &GroupAggregate<K>,
    metric: Metric,
    direction: Direction,
) -> Ordering {
    let by_metric = match (metric.value(a), metric.value(b)) {
        (Some(x), Some(y)) => match direction {
            Direction::Ascending => x.total_cmp(&y),
            Direction::Descending => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_metric.then_with(|| a.group_key.cmp(&b.group_key))
}

/// Sorts groups by `metric` in `direction`, breaking ties by ascending key, and
/// keeps the first `top_n` (all when `None`).
pub fn rank<K: Ord + Clone>(
    groups: &[GroupAggregate<K>],
    metric: Metric,
    direction: Direction,
    top_n: Option<usize>,
) -> Vec<GroupAggregate<K>> {
    let mut ranked = groups.to_vec();
    ranked.sort_by(|a, b| compare(a, b, metric, direction));
    if let Some(n) = top_n {
        ranked.truncate(n);
    }
    ranked
}

/// Lowest group by `metric`.
pub fn best<K: Ord + Clone>(
    groups: &[GroupAggregate<K>],
    metric: Metric,
) -> Option<GroupAggregate<K>> {
    rank(groups, metric, Direction::Ascending, Some(1)).into_iter().next()
}

/// Highest group by `metric`.
pub fn worst<K: Ord + Clone>(
    groups: &[GroupAggregate<K>],
    metric: Metric,
) -> Option<GroupAggregate<K>> {
    rank(groups, metric, Direction::Descending, Some(1)).into_iter().next()
}
