//! Attempts - the record of one executed action and its outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ActionOutcome;

/// Record of a single action attempted during an iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Iteration that dispatched the action (1-indexed)
    pub iteration: u32,

    /// Which actuator executed it (actuator name)
    pub action_type: String,

    /// The action string as dispatched, truncated for storage
    pub action_detail: String,

    /// How it went
    pub outcome: ActionOutcome,

    /// Captured output, if any
    pub result: Option<String>,

    /// Error text reported by the actuator
    pub failure_reason: Option<String>,

    /// Hint for future planning on how to avoid repeating this failure
    pub avoidance_hint: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl Attempt {
    pub fn new(
        iteration: u32,
        action_type: impl Into<String>,
        action_detail: impl Into<String>,
        outcome: ActionOutcome,
    ) -> Self {
        Self {
            iteration,
            action_type: action_type.into(),
            action_detail: action_detail.into(),
            outcome,
            result: None,
            failure_reason: None,
            avoidance_hint: None,
            timestamp: Utc::now(),
        }
    }
}
