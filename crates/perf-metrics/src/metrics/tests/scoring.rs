use super::common::*;
use crate::metrics::domain::{EvaluationKind, EvaluationStatus, IdentityId, PeriodId};
use crate::metrics::scoring::{evaluation_mean, KindWeights, ScoreAggregator};
use crate::metrics::source::SourceError;

const SUBJECT: IdentityId = IdentityId(1);
const PERIOD: PeriodId = PeriodId(1);

#[test]
fn manager_and_self_combine_with_renormalized_weights() {
    let source = single_period(vec![
        submitted(1, 1, 2, 1, EvaluationKind::Manager, &[8, 7, 6, 9]),
        submitted(2, 1, 1, 1, EvaluationKind::SelfAssessment, &[7, 6, 7, 8]),
    ]);

    let breakdown = ScoreAggregator::default()
        .breakdown(&source, SUBJECT, PERIOD)
        .expect("source readable")
        .expect("score present");

    assert_eq!(breakdown.score, 7.312);
    assert_eq!(breakdown.components.len(), 2);

    let manager = &breakdown.components[0];
    assert_eq!(manager.kind, EvaluationKind::Manager);
    assert_eq!(manager.mean, 7.5);
    assert!((manager.weight - 0.625).abs() < 1e-9);

    let own = &breakdown.components[1];
    assert_eq!(own.kind, EvaluationKind::SelfAssessment);
    assert_eq!(own.mean, 7.0);
    assert!((own.weight - 0.375).abs() < 1e-9);

    let total: f64 = breakdown.components.iter().map(|c| c.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn missing_submissions_yield_no_score() {
    let empty = single_period(Vec::new());
    assert_eq!(
        ScoreAggregator::default()
            .composite_score(&empty, SUBJECT, PERIOD)
            .expect("source readable"),
        None
    );

    let mut draft = submitted(1, 1, 2, 1, EvaluationKind::Manager, &[9, 9, 9, 9]);
    draft.status = EvaluationStatus::Draft;
    let mut deleted = submitted(2, 1, 3, 1, EvaluationKind::Peer, &[9, 9, 9, 9]);
    deleted.is_deleted = true;
    let source = single_period(vec![draft, deleted]);

    assert_eq!(
        ScoreAggregator::default()
            .composite_score(&source, SUBJECT, PERIOD)
            .expect("source readable"),
        None
    );
}

#[test]
fn unrated_evaluation_votes_zero() {
    let source = single_period(vec![
        submitted(1, 1, 2, 1, EvaluationKind::Manager, &[8, 8, 8, 8]),
        submitted(2, 1, 3, 1, EvaluationKind::Manager, &[]),
    ]);

    let breakdown = ScoreAggregator::default()
        .breakdown(&source, SUBJECT, PERIOD)
        .expect("source readable")
        .expect("score present");

    assert_eq!(breakdown.score, 4.0);
    assert_eq!(breakdown.components[0].evaluation_count, 2);
}

#[test]
fn a_lone_unrated_evaluation_scores_zero_not_absent() {
    let source = single_period(vec![submitted(1, 1, 2, 1, EvaluationKind::Peer, &[])]);

    assert_eq!(
        ScoreAggregator::default()
            .composite_score(&source, SUBJECT, PERIOD)
            .expect("source readable"),
        Some(0.0)
    );
}

#[test]
fn peers_are_averaged_before_weighting() {
    let source = single_period(vec![
        submitted(1, 1, 2, 1, EvaluationKind::Manager, &[8, 8, 8, 8]),
        submitted(2, 1, 1, 1, EvaluationKind::SelfAssessment, &[6, 6, 6, 6]),
        submitted(3, 1, 3, 1, EvaluationKind::Peer, &[6, 6, 6, 6]),
        submitted(4, 1, 4, 1, EvaluationKind::Peer, &[8, 8, 8, 8]),
    ]);

    let breakdown = ScoreAggregator::default()
        .breakdown(&source, SUBJECT, PERIOD)
        .expect("source readable")
        .expect("score present");

    let kinds: Vec<EvaluationKind> = breakdown.components.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, EvaluationKind::ordered().to_vec());
    assert_eq!(breakdown.components[2].mean, 7.0);
    assert_eq!(breakdown.components[2].evaluation_count, 2);
    // 8 * 0.5 + 6 * 0.3 + 7 * 0.2
    assert_eq!(breakdown.score, 7.2);
}

#[test]
fn out_of_range_ratings_propagate_arithmetically() {
    let source = single_period(vec![submitted(
        1,
        1,
        2,
        1,
        EvaluationKind::Manager,
        &[15, -3],
    )]);

    assert_eq!(
        ScoreAggregator::default()
            .composite_score(&source, SUBJECT, PERIOD)
            .expect("source readable"),
        Some(6.0)
    );
}

#[test]
fn zero_weight_table_falls_back_to_equal_weights() {
    let aggregator = ScoreAggregator::new(KindWeights {
        manager: 0.0,
        self_assessment: 0.0,
        peer: 0.0,
    });
    let source = single_period(vec![
        submitted(1, 1, 2, 1, EvaluationKind::Manager, &[8, 8, 8, 8]),
        submitted(2, 1, 3, 1, EvaluationKind::Peer, &[6, 6, 6, 6]),
    ]);

    let breakdown = aggregator
        .breakdown(&source, SUBJECT, PERIOD)
        .expect("source readable")
        .expect("score present");

    assert_eq!(breakdown.score, 7.0);
    assert!(breakdown.components.iter().all(|c| c.weight == 0.5));
}

#[test]
fn evaluation_mean_is_arithmetic() {
    let evaluation = submitted(1, 1, 2, 1, EvaluationKind::Manager, &[1, 2, 3, 5]);
    assert_eq!(evaluation_mean(&evaluation), 2.75);
}

#[test]
fn exact_halves_round_to_even_digit() {
    // Manager means 7.25, 7, 7, 7 average to exactly 7.0625.
    let source = single_period(vec![
        submitted(1, 1, 2, 1, EvaluationKind::Manager, &[8, 7, 7, 7]),
        submitted(2, 1, 3, 1, EvaluationKind::Manager, &[7, 7, 7, 7]),
        submitted(3, 1, 4, 1, EvaluationKind::Manager, &[7, 7, 7, 7]),
        submitted(4, 1, 5, 1, EvaluationKind::Manager, &[7, 7, 7, 7]),
    ]);

    assert_eq!(
        ScoreAggregator::default()
            .composite_score(&source, SUBJECT, PERIOD)
            .expect("source readable"),
        Some(7.062)
    );
}

#[test]
fn repeated_calls_agree() {
    let source = single_period(vec![
        submitted(1, 1, 2, 1, EvaluationKind::Manager, &[8, 7, 6, 9]),
        submitted(2, 1, 3, 1, EvaluationKind::Peer, &[5, 6, 7, 3]),
    ]);
    let aggregator = ScoreAggregator::default();

    let first = aggregator.breakdown(&source, SUBJECT, PERIOD).expect("read");
    let second = aggregator.breakdown(&source, SUBJECT, PERIOD).expect("read");
    assert_eq!(first, second);
}

#[test]
fn source_failures_propagate() {
    match ScoreAggregator::default().composite_score(&UnavailableSource, SUBJECT, PERIOD) {
        Err(SourceError::Unavailable(reason)) => assert_eq!(reason, "database offline"),
        other => panic!("expected unavailable source, got {other:?}"),
    }
}
