//! Action outcome classification shared by actuators and attempts.

use serde::{Deserialize, Serialize};

/// Possible outcomes of a single dispatched action.
///
/// Expected failure modes (command failure, automation timeout) are values
/// here, never raised errors: the decider judges them, the engine records
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The action completed and did what it was asked
    Success,
    /// The action ran and reported failure
    Failure,
    /// The action did not complete within its time budget
    Timeout,
    /// The action completed but only partially satisfied the request
    Partial,
}

impl ActionOutcome {
    /// Returns true for the outcome that counts toward consecutive failures
    pub fn is_failure(&self) -> bool {
        matches!(self, ActionOutcome::Failure)
    }

    /// String tag matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionOutcome::Success => "success",
            ActionOutcome::Failure => "failure",
            ActionOutcome::Timeout => "timeout",
            ActionOutcome::Partial => "partial",
        }
    }
}

impl std::fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
