//! Result aggregation: multi-source fan-out, dedup, cap, visibility.
//!
//! Name-or-email searches merge three sources in a fixed order, keep the
//! first occurrence of every user, cap the list, drop users hidden from the
//! caller, and enrich what remains. Interest searches run the same tail over
//! a single source.

pub mod dedup;
pub mod limit;
pub mod search;
pub mod visibility;

pub use search::ResultAggregator;
