//! Performance metrics derived from submitted evaluation records.
//!
//! Every computation is a read-only reduction over whatever a [`RecordSource`] returns at call
//! time. "No qualifying data" is always reported as `None`, never as a zero score, because zero
//! is a legitimate score.

pub mod domain;
pub mod goals;
pub mod outliers;
pub mod scoring;
pub mod service;
pub mod source;
pub mod summary;
pub mod trend;

#[cfg(test)]
mod tests;

pub use domain::{
    Criterion, Evaluation, EvaluationId, EvaluationKind, EvaluationStatus, GoalId, GoalRecord,
    GoalStatus, GroupId, Identity, IdentityId, Period, PeriodId, PeriodStatus, Rating,
    UnknownVariant,
};
pub use goals::{GoalAchievement, GoalAggregator};
pub use outliers::{Outlier, OutlierDetector, PopulationStats};
pub use scoring::{CompositeScore, KindContribution, KindWeights, ScoreAggregator};
pub use service::PerformanceMetricsService;
pub use source::{RecordSource, Snapshot, SnapshotError, SnapshotSource, SourceError};
pub use summary::{GroupSummarizer, GroupSummary, PerformerEntry};
pub use trend::{TrendComputer, TrendEntry};

/// Round to `digits` decimal places; exact halves go to the even neighbour.
pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round_ties_even() / factor
}
