use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{GroupId, IdentityId, PeriodId};
use super::round_to;
use super::scoring::{ScoreAggregator, SCORE_DIGITS};
use super::source::{RecordSource, SourceError};

/// Members further than `multiplier * std` from the mean are flagged.
pub const DEFAULT_STD_MULTIPLIER: f64 = 1.5;

/// Group member whose composite score deviates from the group mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    pub subject_id: IdentityId,
    pub period_id: PeriodId,
    pub score: f64,
    pub difference: f64,
    pub mean: f64,
    pub std: f64,
}

/// Descriptive statistics over every scored member (population, not sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
}

impl PopulationStats {
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let count = scores.len();
        let n = count as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores
            .iter()
            .map(|score| (score - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            mean,
            std: variance.sqrt(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    aggregator: ScoreAggregator,
    std_multiplier: f64,
}

impl OutlierDetector {
    pub fn new(aggregator: ScoreAggregator, std_multiplier: f64) -> Self {
        Self {
            aggregator,
            std_multiplier,
        }
    }

    /// Outliers within `group` for the most recently closed period.
    pub fn outliers<S>(&self, source: &S, group: &GroupId) -> Result<Vec<Outlier>, SourceError>
    where
        S: RecordSource + ?Sized,
    {
        let Some(period) = source.latest_closed_period()? else {
            debug!(%group, "no closed period; skipping outlier detection");
            return Ok(Vec::new());
        };

        let mut scored = Vec::new();
        for identity in source.identities_in_group(group)? {
            if let Some(score) = self
                .aggregator
                .composite_score(source, identity.id, period.id)?
            {
                scored.push((identity.id, score));
            }
        }

        let scores: Vec<f64> = scored.iter().map(|(_, score)| *score).collect();
        let Some(stats) = PopulationStats::from_scores(&scores) else {
            return Ok(Vec::new());
        };

        let threshold = self.std_multiplier * stats.std;
        let outliers: Vec<Outlier> = scored
            .into_iter()
            .filter(|(_, score)| (score - stats.mean).abs() > threshold)
            .map(|(subject_id, score)| Outlier {
                subject_id,
                period_id: period.id,
                score,
                difference: round_to(score - stats.mean, SCORE_DIGITS),
                mean: round_to(stats.mean, SCORE_DIGITS),
                std: round_to(stats.std, SCORE_DIGITS),
            })
            .collect();

        debug!(
            %group,
            period = %period.id,
            population = stats.count,
            mean = stats.mean,
            std = stats.std,
            flagged = outliers.len(),
            "computed group outliers"
        );

        Ok(outliers)
    }
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new(ScoreAggregator::default(), DEFAULT_STD_MULTIPLIER)
    }
}
