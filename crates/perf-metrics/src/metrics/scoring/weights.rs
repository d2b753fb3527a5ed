use serde::{Deserialize, Serialize};

use super::super::domain::EvaluationKind;

/// Base weight of each evaluation kind before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindWeights {
    pub manager: f64,
    #[serde(rename = "self")]
    pub self_assessment: f64,
    pub peer: f64,
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            manager: 0.5,
            self_assessment: 0.3,
            peer: 0.2,
        }
    }
}

impl KindWeights {
    pub fn base(&self, kind: EvaluationKind) -> f64 {
        match kind {
            EvaluationKind::Manager => self.manager,
            EvaluationKind::SelfAssessment => self.self_assessment,
            EvaluationKind::Peer => self.peer,
        }
    }

    /// Rescale the base weights of the kinds present so they sum to one.
    ///
    /// When none of the present kinds carries weight every kind gets `1 / |present|`.
    pub fn normalized(&self, present: &[EvaluationKind]) -> Vec<(EvaluationKind, f64)> {
        if present.is_empty() {
            return Vec::new();
        }

        let total: f64 = present.iter().map(|kind| self.base(*kind)).sum();
        if total == 0.0 {
            let equal = 1.0 / present.len() as f64;
            return present.iter().map(|kind| (*kind, equal)).collect();
        }

        present
            .iter()
            .map(|kind| (*kind, self.base(*kind) / total))
            .collect()
    }
}
