use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    Evaluation, EvaluationStatus, GoalRecord, GroupId, Identity, IdentityId, Period, PeriodId,
    PeriodStatus,
};

/// Read-only view over evaluation records.
///
/// Every read excludes soft-deleted rows, so callers never reason about deletion state.
pub trait RecordSource: Send + Sync {
    /// Evaluations (with nested ratings) for one subject and period, optionally narrowed by status.
    fn evaluations_for(
        &self,
        subject: IdentityId,
        period: PeriodId,
        status: Option<EvaluationStatus>,
    ) -> Result<Vec<Evaluation>, SourceError>;

    /// Up to `limit` periods, most recently ended first.
    fn periods_ordered_by_end_date_desc(&self, limit: usize) -> Result<Vec<Period>, SourceError>;

    fn latest_closed_period(&self) -> Result<Option<Period>, SourceError>;

    fn identities_in_group(&self, group: &GroupId) -> Result<Vec<Identity>, SourceError>;

    fn goals_for(
        &self,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<Vec<GoalRecord>, SourceError>;
}

/// Error enumeration for record source failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("record source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed {entity}: {detail}")]
    Malformed { entity: &'static str, detail: String },
}

impl SourceError {
    fn malformed(entity: &'static str, detail: String) -> Self {
        warn!(entity, %detail, "rejecting malformed snapshot rows");
        Self::Malformed { entity, detail }
    }
}

/// Failure while loading a snapshot from disk or a reader.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Rows that can be soft-deleted by the owning store.
trait SoftDelete {
    fn is_deleted(&self) -> bool;
}

impl SoftDelete for Identity {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl SoftDelete for Evaluation {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

impl SoftDelete for GoalRecord {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

fn live<T: SoftDelete>(rows: &[T]) -> impl Iterator<Item = &T> {
    rows.iter().filter(|row| !row.is_deleted())
}

/// Point-in-time copy of every entity the metrics engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub identities: Vec<Identity>,
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
}

impl Snapshot {
    /// Check the uniqueness and reference invariants the engine relies on.
    pub fn validate(&self) -> Result<(), SourceError> {
        let mut period_ids = HashSet::new();
        for period in &self.periods {
            if !period_ids.insert(period.id) {
                return Err(SourceError::malformed(
                    "period",
                    format!("duplicate period id {}", period.id),
                ));
            }
        }

        let mut identity_ids = HashSet::new();
        for identity in &self.identities {
            if !identity_ids.insert(identity.id) {
                return Err(SourceError::malformed(
                    "identity",
                    format!("duplicate identity id {}", identity.id),
                ));
            }
        }

        let mut evaluation_keys = HashSet::new();
        for evaluation in live(&self.evaluations) {
            if !period_ids.contains(&evaluation.period) {
                return Err(SourceError::malformed(
                    "evaluation",
                    format!(
                        "evaluation {} references unknown period {}",
                        evaluation.id.0, evaluation.period
                    ),
                ));
            }

            let key = (
                evaluation.subject,
                evaluation.period,
                evaluation.evaluator,
                evaluation.kind,
            );
            if !evaluation_keys.insert(key) {
                return Err(SourceError::malformed(
                    "evaluation",
                    format!(
                        "subject {} already has a {} evaluation from {} in period {}",
                        evaluation.subject,
                        evaluation.kind.label(),
                        evaluation.evaluator,
                        evaluation.period
                    ),
                ));
            }

            let mut criteria = HashSet::new();
            for rating in &evaluation.ratings {
                if !criteria.insert(rating.criterion) {
                    return Err(SourceError::malformed(
                        "rating",
                        format!(
                            "evaluation {} rates {} more than once",
                            evaluation.id.0,
                            rating.criterion.label()
                        ),
                    ));
                }
            }
        }

        for goal in live(&self.goals) {
            if !period_ids.contains(&goal.period) {
                return Err(SourceError::malformed(
                    "goal",
                    format!(
                        "goal {} references unknown period {}",
                        goal.id.0, goal.period
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// In-memory [`RecordSource`] over a validated [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Result<Self, SourceError> {
        snapshot.validate()?;
        Ok(Self { snapshot })
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        Ok(Self::new(snapshot)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Periods ordered by end date descending; equal end dates fall back to id descending.
    fn periods_desc(&self) -> Vec<&Period> {
        let mut periods: Vec<&Period> = self.snapshot.periods.iter().collect();
        periods.sort_by(|a, b| b.end_date.cmp(&a.end_date).then(b.id.cmp(&a.id)));
        periods
    }
}

impl RecordSource for SnapshotSource {
    fn evaluations_for(
        &self,
        subject: IdentityId,
        period: PeriodId,
        status: Option<EvaluationStatus>,
    ) -> Result<Vec<Evaluation>, SourceError> {
        Ok(live(&self.snapshot.evaluations)
            .filter(|evaluation| evaluation.subject == subject && evaluation.period == period)
            .filter(|evaluation| status.map_or(true, |wanted| evaluation.status == wanted))
            .cloned()
            .collect())
    }

    fn periods_ordered_by_end_date_desc(&self, limit: usize) -> Result<Vec<Period>, SourceError> {
        Ok(self
            .periods_desc()
            .into_iter()
            .take(limit)
            .cloned()
            .collect())
    }

    fn latest_closed_period(&self) -> Result<Option<Period>, SourceError> {
        Ok(self
            .periods_desc()
            .into_iter()
            .find(|period| period.status == PeriodStatus::Closed)
            .cloned())
    }

    fn identities_in_group(&self, group: &GroupId) -> Result<Vec<Identity>, SourceError> {
        let mut members: Vec<Identity> = live(&self.snapshot.identities)
            .filter(|identity| &identity.group == group)
            .cloned()
            .collect();
        members.sort_by_key(|identity| identity.id);
        Ok(members)
    }

    fn goals_for(
        &self,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<Vec<GoalRecord>, SourceError> {
        Ok(live(&self.snapshot.goals)
            .filter(|goal| goal.subject == subject && goal.period == period)
            .cloned()
            .collect())
    }
}
