//! Flight delay aggregation engine.
//!
//! Classifies each flight into delay, time-of-day and weekday buckets, filters
//! the collection, groups it per dimension, ranks the groups, and assembles the
//! results into a static [`types::Report`] or interactive [`types::Dashboard`].

pub mod aggregate;
pub mod classify;
pub mod filter;
pub mod rank;
pub mod report;
pub mod types;
pub mod utility;
