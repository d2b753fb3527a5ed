//! Performance metrics engine: weighted composite scores, multi-period trends, group outlier
//! detection, and goal completion statistics over evaluation records.

pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;
