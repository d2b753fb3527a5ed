use chrono::NaiveDate;

use crate::metrics::domain::{
    Criterion, Evaluation, EvaluationId, EvaluationKind, EvaluationStatus, GoalId, GoalRecord,
    GoalStatus, GroupId, Identity, IdentityId, Period, PeriodId, PeriodStatus, Rating,
};
use crate::metrics::source::{RecordSource, Snapshot, SnapshotSource, SourceError};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Quarter-long period ending on the given date.
pub(super) fn period(id: u64, name: &str, end: NaiveDate, status: PeriodStatus) -> Period {
    Period {
        id: PeriodId(id),
        name: name.to_string(),
        start_date: end - chrono::Duration::days(90),
        end_date: end,
        status,
    }
}

pub(super) fn identity(id: u64, name: &str, group: &str) -> Identity {
    Identity {
        id: IdentityId(id),
        name: name.to_string(),
        group: GroupId::new(group),
        manager: None,
        is_deleted: false,
    }
}

/// Submitted evaluation whose ratings map onto the criteria in their canonical order.
pub(super) fn submitted(
    id: u64,
    subject: u64,
    evaluator: u64,
    period: u64,
    kind: EvaluationKind,
    values: &[i32],
) -> Evaluation {
    Evaluation {
        id: EvaluationId(id),
        subject: IdentityId(subject),
        evaluator: IdentityId(evaluator),
        period: PeriodId(period),
        kind,
        status: EvaluationStatus::Submitted,
        ratings: Criterion::ordered()
            .into_iter()
            .zip(values.iter().copied())
            .map(|(criterion, value)| Rating::new(criterion, value))
            .collect(),
        is_deleted: false,
    }
}

pub(super) fn goal(
    id: u64,
    subject: u64,
    period: u64,
    progress: i32,
    status: GoalStatus,
) -> GoalRecord {
    GoalRecord {
        id: GoalId(id),
        subject: IdentityId(subject),
        period: PeriodId(period),
        description: format!("goal {id}"),
        progress,
        status,
        is_deleted: false,
    }
}

pub(super) fn source(snapshot: Snapshot) -> SnapshotSource {
    SnapshotSource::new(snapshot).expect("fixture snapshot is valid")
}

/// Single closed period with one subject in the "eng" group.
pub(super) fn single_period(evaluations: Vec<Evaluation>) -> SnapshotSource {
    source(Snapshot {
        identities: vec![identity(1, "Ada", "eng")],
        periods: vec![period(1, "2024-Q2", date(2024, 6, 30), PeriodStatus::Closed)],
        evaluations,
        goals: Vec::new(),
    })
}

/// Source that fails every read, standing in for an offline store.
pub(super) struct UnavailableSource;

impl RecordSource for UnavailableSource {
    fn evaluations_for(
        &self,
        _subject: IdentityId,
        _period: PeriodId,
        _status: Option<EvaluationStatus>,
    ) -> Result<Vec<Evaluation>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn periods_ordered_by_end_date_desc(&self, _limit: usize) -> Result<Vec<Period>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn latest_closed_period(&self) -> Result<Option<Period>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn identities_in_group(&self, _group: &GroupId) -> Result<Vec<Identity>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }

    fn goals_for(
        &self,
        _subject: IdentityId,
        _period: PeriodId,
    ) -> Result<Vec<GoalRecord>, SourceError> {
        Err(SourceError::Unavailable("database offline".to_string()))
    }
}
