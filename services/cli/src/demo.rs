use chrono::NaiveDate;
use perf_metrics::metrics::{
    CompositeScore, Criterion, Evaluation, EvaluationId, EvaluationKind, EvaluationStatus,
    GoalAchievement, GoalId, GoalRecord, GoalStatus, GroupId, GroupSummary, Identity, IdentityId,
    Outlier, PerformanceMetricsService, Period, PeriodId, PeriodStatus, Rating, Snapshot,
    SnapshotSource, SourceError, TrendEntry,
};
use serde::Serialize;
use tracing::info;

const DEMO_GROUP: &str = "engineering";

/// Subject whose history the demo walks through.
const DEMO_SUBJECT: IdentityId = IdentityId(2);

#[derive(Debug, Serialize)]
pub(crate) struct DemoReport {
    pub(crate) subject: IdentityId,
    pub(crate) latest_closed_period: Option<PeriodId>,
    pub(crate) breakdown: Option<CompositeScore>,
    pub(crate) trend: Vec<TrendEntry>,
    pub(crate) goals: Option<GoalAchievement>,
    pub(crate) outliers: Vec<Outlier>,
    pub(crate) summary: Option<GroupSummary>,
}

pub(crate) fn run_demo(
    service: &PerformanceMetricsService<SnapshotSource>,
) -> Result<DemoReport, SourceError> {
    let group = GroupId::new(DEMO_GROUP);
    let summary = service.group_summary(&group)?;
    let latest_closed_period = summary.as_ref().map(|summary| summary.period_id);

    let (breakdown, goals) = match latest_closed_period {
        Some(period) => (
            service.score_breakdown(DEMO_SUBJECT, period)?,
            Some(service.goal_achievement(DEMO_SUBJECT, period)?),
        ),
        None => (None, None),
    };

    let report = DemoReport {
        subject: DEMO_SUBJECT,
        latest_closed_period,
        breakdown,
        trend: service.recent_trend(DEMO_SUBJECT)?,
        goals,
        outliers: service.outliers(&group)?,
        summary,
    };

    info!(
        trend_entries = report.trend.len(),
        outliers = report.outliers.len(),
        "demo report ready"
    );
    Ok(report)
}

pub(crate) fn snapshot_source() -> Result<SnapshotSource, SourceError> {
    SnapshotSource::new(demo_snapshot()?)
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, SourceError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| SourceError::Malformed {
        entity: "period",
        detail: format!("invalid date {year}-{month:02}-{day:02}"),
    })
}

fn quarter(
    id: u64,
    name: &str,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    status: PeriodStatus,
) -> Result<Period, SourceError> {
    Ok(Period {
        id: PeriodId(id),
        name: name.to_string(),
        start_date: date(start.0, start.1, start.2)?,
        end_date: date(end.0, end.1, end.2)?,
        status,
    })
}

fn member(id: u64, name: &str, manager: Option<u64>) -> Identity {
    Identity {
        id: IdentityId(id),
        name: name.to_string(),
        group: GroupId::new(DEMO_GROUP),
        manager: manager.map(IdentityId),
        is_deleted: false,
    }
}

fn evaluation(
    id: u64,
    subject: u64,
    evaluator: u64,
    period: u64,
    kind: EvaluationKind,
    values: [i32; 4],
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
            .zip(values)
            .map(|(criterion, value)| Rating::new(criterion, value))
            .collect(),
        is_deleted: false,
    }
}

fn goal(id: u64, description: &str, progress: i32, status: GoalStatus) -> GoalRecord {
    GoalRecord {
        id: GoalId(id),
        subject: DEMO_SUBJECT,
        period: PeriodId(3),
        description: description.to_string(),
        progress,
        status,
        is_deleted: false,
    }
}

/// Small engineering team across three quarters; the latest quarter is still open.
fn demo_snapshot() -> Result<Snapshot, SourceError> {
    use EvaluationKind::{Manager, Peer, SelfAssessment};

    Ok(Snapshot {
        identities: vec![
            member(1, "Morgan Reyes", None),
            member(2, "Avery Chen", Some(1)),
            member(3, "Jordan Patel", Some(1)),
            member(4, "Riley Okafor", Some(1)),
            member(5, "Casey Novak", Some(1)),
            member(6, "Quinn Alvarez", Some(1)),
        ],
        periods: vec![
            quarter(1, "2024-Q2", (2024, 4, 1), (2024, 6, 30), PeriodStatus::Closed)?,
            quarter(2, "2024-Q3", (2024, 7, 1), (2024, 9, 30), PeriodStatus::Closed)?,
            quarter(3, "2024-Q4", (2024, 10, 1), (2024, 12, 31), PeriodStatus::Closed)?,
            quarter(4, "2025-Q1", (2025, 1, 1), (2025, 3, 31), PeriodStatus::Active)?,
        ],
        evaluations: vec![
            evaluation(1, 2, 1, 1, Manager, [6, 7, 6, 7]),
            evaluation(2, 2, 1, 2, Manager, [7, 7, 6, 8]),
            evaluation(3, 2, 2, 2, SelfAssessment, [8, 7, 7, 8]),
            evaluation(4, 2, 1, 3, Manager, [8, 7, 6, 9]),
            evaluation(5, 2, 2, 3, SelfAssessment, [7, 6, 7, 8]),
            evaluation(6, 2, 3, 3, Peer, [8, 8, 7, 7]),
            evaluation(7, 3, 1, 3, Manager, [7, 8, 7, 8]),
            evaluation(8, 4, 1, 3, Manager, [7, 7, 8, 8]),
            evaluation(9, 5, 1, 3, Manager, [8, 7, 7, 8]),
            evaluation(10, 6, 1, 3, Manager, [3, 2, 2, 3]),
            evaluation(11, 2, 1, 4, Manager, [9, 8, 8, 9]),
        ],
        goals: vec![
            goal(1, "Migrate billing to the new ledger", 40, GoalStatus::InProgress),
            goal(2, "Mentor two new hires", 60, GoalStatus::Completed),
        ],
    })
}
