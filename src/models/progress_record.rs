use crate::errors::AppResult;
use serde::{Deserialize, Serialize};

/// Persisted state of a multi-step flow. Survives process restarts but is
/// discarded by the reset policy when the login session changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub flow_name: String,
    pub current_step: String,
    pub step_history: Vec<String>,
    /// Marker of the session this record was created under.
    pub session_marker: String,
}

/// The serialized step payload stored in the `progress` table. Must
/// round-trip exactly: same current step, same history order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSteps {
    pub current_step: String,
    pub step_history: Vec<String>,
}

impl ProgressRecord {
    pub fn to_stored(&self) -> StoredSteps {
        StoredSteps {
            current_step: self.current_step.clone(),
            step_history: self.step_history.clone(),
        }
    }

    pub fn from_stored(flow_name: &str, marker: &str, stored: StoredSteps) -> Self {
        Self {
            flow_name: flow_name.to_string(),
            current_step: stored.current_step,
            step_history: stored.step_history,
            session_marker: marker.to_string(),
        }
    }

    pub fn serialize_steps(&self) -> AppResult<String> {
        Ok(serde_json::to_string(&self.to_stored())?)
    }

    pub fn deserialize_steps(flow_name: &str, marker: &str, raw: &str) -> AppResult<Self> {
        let stored: StoredSteps = serde_json::from_str(raw)?;
        Ok(Self::from_stored(flow_name, marker, stored))
    }
}
