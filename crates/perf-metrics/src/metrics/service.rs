use std::sync::Arc;

use crate::config::ScoringConfig;

use super::domain::{GroupId, IdentityId, PeriodId};
use super::goals::{GoalAchievement, GoalAggregator};
use super::outliers::{Outlier, OutlierDetector};
use super::scoring::{CompositeScore, ScoreAggregator};
use super::source::{RecordSource, SourceError};
use super::summary::{GroupSummarizer, GroupSummary};
use super::trend::{TrendComputer, TrendEntry};

/// Service composing every metrics component over one record source.
pub struct PerformanceMetricsService<S> {
    source: Arc<S>,
    scoring: ScoreAggregator,
    trend: TrendComputer,
    outliers: OutlierDetector,
    goals: GoalAggregator,
    summary: GroupSummarizer,
    default_trend_periods: usize,
}

impl<S> PerformanceMetricsService<S>
where
    S: RecordSource + 'static,
{
    pub fn new(source: Arc<S>, config: ScoringConfig) -> Self {
        let scoring = ScoreAggregator::new(config.weights);

        Self {
            source,
            scoring,
            trend: TrendComputer::new(scoring, config.trend_candidate_cap),
            outliers: OutlierDetector::new(scoring, config.outlier_std_multiplier),
            goals: GoalAggregator,
            summary: GroupSummarizer::new(scoring, config.top_performer_limit),
            default_trend_periods: config.default_trend_periods,
        }
    }

    pub fn composite_score(
        &self,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<Option<f64>, SourceError> {
        self.scoring
            .composite_score(self.source.as_ref(), subject, period)
    }

    pub fn score_breakdown(
        &self,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<Option<CompositeScore>, SourceError> {
        self.scoring.breakdown(self.source.as_ref(), subject, period)
    }

    pub fn trend(
        &self,
        subject: IdentityId,
        max_periods: usize,
    ) -> Result<Vec<TrendEntry>, SourceError> {
        self.trend.trend(self.source.as_ref(), subject, max_periods)
    }

    /// Trend over the configured default number of periods.
    pub fn recent_trend(&self, subject: IdentityId) -> Result<Vec<TrendEntry>, SourceError> {
        self.trend(subject, self.default_trend_periods)
    }

    pub fn outliers(&self, group: &GroupId) -> Result<Vec<Outlier>, SourceError> {
        self.outliers.outliers(self.source.as_ref(), group)
    }

    pub fn goal_achievement(
        &self,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<GoalAchievement, SourceError> {
        self.goals
            .goal_achievement(self.source.as_ref(), subject, period)
    }

    pub fn group_summary(&self, group: &GroupId) -> Result<Option<GroupSummary>, SourceError> {
        self.summary.summarize(self.source.as_ref(), group)
    }
}
