use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of an evaluated subject or an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub u64);

/// Identifier of an evaluation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeriodId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GoalId(pub u64);

/// Organizational group (department) an identity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raised when a tag read at the record boundary is outside its closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Relationship of the reviewer to the subject.
///
/// Variant order doubles as the reporting order for score components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    Manager,
    #[serde(rename = "self")]
    SelfAssessment,
    Peer,
}

impl EvaluationKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Manager, Self::SelfAssessment, Self::Peer]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::SelfAssessment => "self",
            Self::Peer => "peer",
        }
    }
}

impl FromStr for EvaluationKind {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Self::Manager),
            "self" => Ok(Self::SelfAssessment),
            "peer" => Ok(Self::Peer),
            _ => Err(UnknownVariant::new("evaluation kind", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
}

impl FromStr for EvaluationStatus {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            _ => Err(UnknownVariant::new("evaluation status", raw)),
        }
    }
}

/// Criterion a single rating scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Technical,
    Communication,
    Leadership,
    Goals,
}

impl Criterion {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Technical,
            Self::Communication,
            Self::Leadership,
            Self::Goals,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Communication => "communication",
            Self::Leadership => "leadership",
            Self::Goals => "goals",
        }
    }
}

impl FromStr for Criterion {
    type Err = UnknownVariant;

    /// Accepts the canonical tags plus the long-form headings used by import sheets.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "technical" | "technical skills" => Ok(Self::Technical),
            "communication" => Ok(Self::Communication),
            "leadership" => Ok(Self::Leadership),
            "goals" | "goal achievement" => Ok(Self::Goals),
            _ => Err(UnknownVariant::new("criterion", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Active,
    Closed,
}

impl FromStr for PeriodStatus {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(UnknownVariant::new("period status", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl FromStr for GoalStatus {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownVariant::new("goal status", raw)),
        }
    }
}

/// Person who can be evaluated or evaluate others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub group: GroupId,
    #[serde(default)]
    pub manager: Option<IdentityId>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Bounded span over which evaluations and goals are collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
}

/// Single criterion score inside an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub criterion: Criterion,
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Rating {
    pub fn new(criterion: Criterion, value: i32) -> Self {
        Self {
            criterion,
            value,
            comments: None,
        }
    }
}

/// One reviewer's assessment of one subject for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub subject: IdentityId,
    pub evaluator: IdentityId,
    pub period: PeriodId,
    pub kind: EvaluationKind,
    pub status: EvaluationStatus,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Goal tracked for a subject within a period. Progress is a percentage in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub id: GoalId,
    pub subject: IdentityId,
    pub period: PeriodId,
    #[serde(default)]
    pub description: String,
    pub progress: i32,
    pub status: GoalStatus,
    #[serde(default)]
    pub is_deleted: bool,
}
