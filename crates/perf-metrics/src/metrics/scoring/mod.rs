mod weights;

pub use weights::KindWeights;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Evaluation, EvaluationKind, EvaluationStatus, IdentityId, PeriodId};
use super::round_to;
use super::source::{RecordSource, SourceError};

/// Digits kept on every composite score surfaced by the engine.
pub const SCORE_DIGITS: i32 = 3;

/// Reduces submitted evaluations to a single weighted composite score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator {
    weights: KindWeights,
}

impl ScoreAggregator {
    pub fn new(weights: KindWeights) -> Self {
        Self { weights }
    }

    /// Composite score for the subject in the period, or `None` when nothing was submitted.
    pub fn composite_score<S>(
        &self,
        source: &S,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<Option<f64>, SourceError>
    where
        S: RecordSource + ?Sized,
    {
        Ok(self
            .breakdown(source, subject, period)?
            .map(|composite| composite.score))
    }

    /// Composite score together with the per-kind means and weights that produced it.
    pub fn breakdown<S>(
        &self,
        source: &S,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<Option<CompositeScore>, SourceError>
    where
        S: RecordSource + ?Sized,
    {
        let evaluations =
            source.evaluations_for(subject, period, Some(EvaluationStatus::Submitted))?;
        let composite = self.combine(subject, period, &evaluations);

        debug!(
            %subject,
            %period,
            evaluations = evaluations.len(),
            score = ?composite.as_ref().map(|composite| composite.score),
            "computed composite score"
        );

        Ok(composite)
    }

    /// Pure reduction over already-fetched evaluations.
    pub fn combine(
        &self,
        subject: IdentityId,
        period: PeriodId,
        evaluations: &[Evaluation],
    ) -> Option<CompositeScore> {
        if evaluations.is_empty() {
            return None;
        }

        let mut means_by_kind: BTreeMap<EvaluationKind, Vec<f64>> = BTreeMap::new();
        for evaluation in evaluations {
            means_by_kind
                .entry(evaluation.kind)
                .or_default()
                .push(evaluation_mean(evaluation));
        }

        let present: Vec<EvaluationKind> = means_by_kind.keys().copied().collect();
        let weights = self.weights.normalized(&present);

        let mut total = 0.0;
        let mut components = Vec::with_capacity(weights.len());
        for (kind, weight) in weights {
            let means = &means_by_kind[&kind];
            let mean = means.iter().sum::<f64>() / means.len() as f64;
            total += mean * weight;
            components.push(KindContribution {
                kind,
                mean,
                evaluation_count: means.len(),
                weight,
            });
        }

        Some(CompositeScore {
            subject,
            period,
            score: round_to(total, SCORE_DIGITS),
            components,
        })
    }
}

/// Arithmetic mean of an evaluation's ratings. An unrated evaluation still counts, as 0.0.
pub fn evaluation_mean(evaluation: &Evaluation) -> f64 {
    if evaluation.ratings.is_empty() {
        return 0.0;
    }

    let sum: f64 = evaluation
        .ratings
        .iter()
        .map(|rating| f64::from(rating.value))
        .sum();
    sum / evaluation.ratings.len() as f64
}

/// One evaluation kind's share of a composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindContribution {
    pub kind: EvaluationKind,
    pub mean: f64,
    pub evaluation_count: usize,
    pub weight: f64,
}

/// Composite score with the audit trail of how it was weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub subject: IdentityId,
    pub period: PeriodId,
    pub score: f64,
    pub components: Vec<KindContribution>,
}
