use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{IdentityId, PeriodId};
use super::round_to;
use super::scoring::ScoreAggregator;
use super::source::{RecordSource, SourceError};

/// Upper bound on how many periods are scanned for a single trend.
pub const DEFAULT_CANDIDATE_CAP: usize = 50;

const CHANGE_DIGITS: i32 = 2;

/// Composite score of one period within a trend, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub period_id: PeriodId,
    pub period_name: String,
    pub score: f64,
    pub change_pct: Option<f64>,
}

/// Walks recent periods and reports period-over-period score movement.
#[derive(Debug, Clone, Copy)]
pub struct TrendComputer {
    aggregator: ScoreAggregator,
    candidate_cap: usize,
}

impl TrendComputer {
    pub fn new(aggregator: ScoreAggregator, candidate_cap: usize) -> Self {
        Self {
            aggregator,
            candidate_cap,
        }
    }

    /// Up to `max_periods` scored periods for the subject. Periods without a score are skipped.
    pub fn trend<S>(
        &self,
        source: &S,
        subject: IdentityId,
        max_periods: usize,
    ) -> Result<Vec<TrendEntry>, SourceError>
    where
        S: RecordSource + ?Sized,
    {
        let mut entries = Vec::new();
        if max_periods == 0 {
            return Ok(entries);
        }

        let candidates = source.periods_ordered_by_end_date_desc(self.candidate_cap)?;
        let mut previous: Option<f64> = None;

        for period in candidates {
            let Some(score) = self
                .aggregator
                .composite_score(source, subject, period.id)?
            else {
                continue;
            };

            entries.push(TrendEntry {
                period_id: period.id,
                period_name: period.name,
                score,
                change_pct: change_pct(previous, score),
            });
            previous = Some(score);

            if entries.len() >= max_periods {
                break;
            }
        }

        debug!(%subject, emitted = entries.len(), max_periods, "computed score trend");
        Ok(entries)
    }
}

impl Default for TrendComputer {
    fn default() -> Self {
        Self::new(ScoreAggregator::default(), DEFAULT_CANDIDATE_CAP)
    }
}

/// Percentage change from the previously emitted score; `None` without a usable baseline.
pub fn change_pct(previous: Option<f64>, score: f64) -> Option<f64> {
    match previous {
        Some(previous) if previous != 0.0 => Some(round_to(
            (score - previous) / previous * 100.0,
            CHANGE_DIGITS,
        )),
        _ => None,
    }
}
