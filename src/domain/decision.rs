//! Decisions - the continue-or-terminate judgment closing each iteration.

use serde::{Deserialize, Serialize};

/// Types of decisions the loop can make.
///
/// Every `Stop*` variant is terminal; the rest hand control to the next
/// iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    Continue,
    ChangeStrategy,
    AskClarification,
    StopSuccess,
    StopFailure,
    StopMaxIterations,
    StopLowConfidence,
    StopUserInterrupt,
}

impl DecisionType {
    /// Returns true if this decision terminates the loop
    pub fn is_stop(&self) -> bool {
        matches!(
            self,
            DecisionType::StopSuccess
                | DecisionType::StopFailure
                | DecisionType::StopMaxIterations
                | DecisionType::StopLowConfidence
                | DecisionType::StopUserInterrupt
        )
    }

    /// String tag matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Continue => "continue",
            DecisionType::ChangeStrategy => "change_strategy",
            DecisionType::AskClarification => "ask_clarification",
            DecisionType::StopSuccess => "stop_success",
            DecisionType::StopFailure => "stop_failure",
            DecisionType::StopMaxIterations => "stop_max_iterations",
            DecisionType::StopLowConfidence => "stop_low_confidence",
            DecisionType::StopUserInterrupt => "stop_user_interrupt",
        }
    }
}

impl std::fmt::Display for DecisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of the Decide phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub decision_type: DecisionType,

    /// Why this decision was made, in plain language
    pub reasoning: String,

    /// Suggested next action (advisory; the planner has the final word)
    pub next_action: Option<String>,

    pub confidence: f64,
}

impl Decision {
    pub fn new(decision_type: DecisionType, reasoning: impl Into<String>) -> Self {
        Self {
            decision_type,
            reasoning: reasoning.into(),
            next_action: None,
            confidence: 1.0,
        }
    }

    pub fn with_next_action(mut self, action: impl Into<String>) -> Self {
        self.next_action = Some(action.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Returns true if this decision terminates the loop
    pub fn is_stop(&self) -> bool {
        self.decision_type.is_stop()
    }
}
