//! Data models for the stats pipeline
//!
//! Fetched statistics flow in as `StatOutcome`s and leave as a `Summary`.

pub mod stats;
pub mod summary;

pub use stats::{MetricKind, StatOutcome, UserStatistic};
pub use summary::{NamedField, Summary};
