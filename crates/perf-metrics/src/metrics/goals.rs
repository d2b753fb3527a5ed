use serde::{Deserialize, Serialize};

use super::domain::{GoalRecord, GoalStatus, IdentityId, PeriodId};
use super::round_to;
use super::source::{RecordSource, SourceError};

const GOAL_DIGITS: i32 = 2;

/// Completion and progress statistics over a subject's goals for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalAchievement {
    pub avg_progress: Option<f64>,
    pub completed_pct: Option<f64>,
    pub goal_count: usize,
}

impl GoalAchievement {
    pub fn summarize(goals: &[GoalRecord]) -> Self {
        if goals.is_empty() {
            return Self {
                avg_progress: None,
                completed_pct: None,
                goal_count: 0,
            };
        }

        let total = goals.len() as f64;
        let progress: f64 = goals.iter().map(|goal| f64::from(goal.progress)).sum();
        let completed = goals
            .iter()
            .filter(|goal| goal.status == GoalStatus::Completed)
            .count();

        Self {
            avg_progress: Some(round_to(progress / total, GOAL_DIGITS)),
            completed_pct: Some(round_to(completed as f64 / total * 100.0, GOAL_DIGITS)),
            goal_count: goals.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoalAggregator;

impl GoalAggregator {
    pub fn goal_achievement<S>(
        &self,
        source: &S,
        subject: IdentityId,
        period: PeriodId,
    ) -> Result<GoalAchievement, SourceError>
    where
        S: RecordSource + ?Sized,
    {
        let goals = source.goals_for(subject, period)?;
        Ok(GoalAchievement::summarize(&goals))
    }
}
