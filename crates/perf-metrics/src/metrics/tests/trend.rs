use super::common::*;
use crate::metrics::domain::{EvaluationKind, IdentityId, PeriodId, PeriodStatus};
use crate::metrics::scoring::ScoreAggregator;
use crate::metrics::source::{Snapshot, SnapshotSource};
use crate::metrics::trend::{TrendComputer, TrendEntry};

const SUBJECT: IdentityId = IdentityId(1);

/// Four quarters, most recent last; Q3 has no submitted evaluation for the subject.
fn quarterly_history() -> SnapshotSource {
    source(Snapshot {
        identities: vec![identity(1, "Ada", "eng")],
        periods: vec![
            period(1, "2024-Q1", date(2024, 3, 31), PeriodStatus::Closed),
            period(2, "2024-Q2", date(2024, 6, 30), PeriodStatus::Closed),
            period(3, "2024-Q3", date(2024, 9, 30), PeriodStatus::Closed),
            period(4, "2024-Q4", date(2024, 12, 31), PeriodStatus::Active),
        ],
        evaluations: vec![
            submitted(1, 1, 2, 1, EvaluationKind::Manager, &[7, 8, 7, 8]),
            submitted(2, 1, 2, 2, EvaluationKind::Manager, &[6, 6, 6, 6]),
            submitted(3, 1, 2, 4, EvaluationKind::Manager, &[8, 8, 8, 8]),
        ],
        goals: Vec::new(),
    })
}

fn entry(period: u64, name: &str, score: f64, change_pct: Option<f64>) -> TrendEntry {
    TrendEntry {
        period_id: PeriodId(period),
        period_name: name.to_string(),
        score,
        change_pct,
    }
}

#[test]
fn skips_unscored_periods_and_compares_to_last_emitted() {
    let trend = TrendComputer::default()
        .trend(&quarterly_history(), SUBJECT, 3)
        .expect("source readable");

    assert_eq!(
        trend,
        vec![
            entry(4, "2024-Q4", 8.0, None),
            entry(2, "2024-Q2", 6.0, Some(-25.0)),
            entry(1, "2024-Q1", 7.5, Some(25.0)),
        ]
    );
}

#[test]
fn never_exceeds_requested_length() {
    let computer = TrendComputer::default();
    let source = quarterly_history();

    let two = computer.trend(&source, SUBJECT, 2).expect("source readable");
    assert_eq!(two.len(), 2);
    assert_eq!(two[0].change_pct, None);

    let all = computer.trend(&source, SUBJECT, 10).expect("source readable");
    assert_eq!(all.len(), 3);

    assert!(computer
        .trend(&source, SUBJECT, 0)
        .expect("source readable")
        .is_empty());
}

#[test]
fn zero_baseline_suppresses_change() {
    let source = source(Snapshot {
        identities: vec![identity(1, "Ada", "eng")],
        periods: vec![
            period(1, "2024-Q1", date(2024, 3, 31), PeriodStatus::Closed),
            period(2, "2024-Q2", date(2024, 6, 30), PeriodStatus::Closed),
            period(3, "2024-Q3", date(2024, 9, 30), PeriodStatus::Closed),
        ],
        evaluations: vec![
            submitted(1, 1, 2, 1, EvaluationKind::Manager, &[6, 6, 6, 6]),
            submitted(2, 1, 2, 2, EvaluationKind::Manager, &[]),
            submitted(3, 1, 2, 3, EvaluationKind::Manager, &[8, 8, 8, 8]),
        ],
        goals: Vec::new(),
    });

    let trend = TrendComputer::default()
        .trend(&source, SUBJECT, 3)
        .expect("source readable");

    assert_eq!(
        trend,
        vec![
            entry(3, "2024-Q3", 8.0, None),
            entry(2, "2024-Q2", 0.0, Some(-100.0)),
            entry(1, "2024-Q1", 6.0, None),
        ]
    );
}

#[test]
fn candidate_cap_bounds_the_scan() {
    let computer = TrendComputer::new(ScoreAggregator::default(), 1);
    let trend = computer
        .trend(&quarterly_history(), SUBJECT, 3)
        .expect("source readable");

    assert_eq!(trend, vec![entry(4, "2024-Q4", 8.0, None)]);
}

#[test]
fn unevaluated_subject_has_empty_trend() {
    let trend = TrendComputer::default()
        .trend(&quarterly_history(), IdentityId(42), 3)
        .expect("source readable");
    assert!(trend.is_empty());
}

#[test]
fn source_failures_propagate() {
    assert!(TrendComputer::default()
        .trend(&UnavailableSource, SUBJECT, 3)
        .is_err());
}
