use anyhow::{Context, Result};
use base::entities::{SessionId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::navigation::NavigationState;
use crate::steps::WizardStep;
use crate::validation::StepValidation;

/// Serializable form of a wizard session. Validations are kept as a list of pairs
/// so the JSON stays an array instead of an object keyed by step names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub session_id: SessionId,
    pub saved_at: Timestamp,
    pub navigation: NavigationState,
    pub validations: Vec<(WizardStep, StepValidation)>,
    #[serde(default)]
    pub active_validation: bool,
}

impl WizardSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .with_context(|| format!("can't serialize snapshot of session {}", self.session_id))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("can't deserialize wizard snapshot")
    }
}
