use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{GroupId, IdentityId, PeriodId};
use super::round_to;
use super::scoring::{ScoreAggregator, SCORE_DIGITS};
use super::source::{RecordSource, SourceError};

pub const DEFAULT_TOP_PERFORMERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerEntry {
    pub subject_id: IdentityId,
    pub name: String,
    pub score: f64,
}

/// Group-level roll-up of composite scores for the latest closed period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: GroupId,
    pub period_id: PeriodId,
    pub period_name: String,
    pub average_score: Option<f64>,
    pub member_count: usize,
    pub evaluated_count: usize,
    pub top_performers: Vec<PerformerEntry>,
}

#[derive(Debug, Clone, Copy)]
pub struct GroupSummarizer {
    aggregator: ScoreAggregator,
    top_limit: usize,
}

impl GroupSummarizer {
    pub fn new(aggregator: ScoreAggregator, top_limit: usize) -> Self {
        Self {
            aggregator,
            top_limit,
        }
    }

    /// `None` when no period has closed yet.
    pub fn summarize<S>(
        &self,
        source: &S,
        group: &GroupId,
    ) -> Result<Option<GroupSummary>, SourceError>
    where
        S: RecordSource + ?Sized,
    {
        let Some(period) = source.latest_closed_period()? else {
            return Ok(None);
        };

        let members = source.identities_in_group(group)?;
        let member_count = members.len();

        let mut scored = Vec::new();
        for identity in members {
            if let Some(score) = self
                .aggregator
                .composite_score(source, identity.id, period.id)?
            {
                scored.push(PerformerEntry {
                    subject_id: identity.id,
                    name: identity.name,
                    score,
                });
            }
        }

        let evaluated_count = scored.len();
        let average_score = if scored.is_empty() {
            None
        } else {
            let total: f64 = scored.iter().map(|entry| entry.score).sum();
            Some(round_to(total / evaluated_count as f64, SCORE_DIGITS))
        };

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.subject_id.cmp(&b.subject_id))
        });
        scored.truncate(self.top_limit);

        debug!(%group, period = %period.id, member_count, evaluated_count, "summarized group");

        Ok(Some(GroupSummary {
            group: group.clone(),
            period_id: period.id,
            period_name: period.name,
            average_score,
            member_count,
            evaluated_count,
            top_performers: scored,
        }))
    }
}

impl Default for GroupSummarizer {
    fn default() -> Self {
        Self::new(ScoreAggregator::default(), DEFAULT_TOP_PERFORMERS)
    }
}
