//! Actuators - external systems that execute actions.
//!
//! Actuators are purely mechanical. They execute exactly what they are
//! told and report results. No reasoning, no retries, no judgment.
//! Expected failure modes (command failure, timeout) map to
//! `ActionOutcome` values; `execute` never returns an error.

mod shell;

pub use shell::ShellActuator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ActionOutcome;

/// Options passed through to an actuator for one execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteOptions {
    /// Time budget override; None uses the actuator's default
    pub timeout_ms: Option<u64>,
}

impl ExecuteOptions {
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout_ms: Some(timeout_ms),
        }
    }
}

/// Result from an actuator execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub outcome: ActionOutcome,
    pub output: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub metadata: Value,
}

impl ActionResult {
    pub fn success(output: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            outcome: ActionOutcome::Success,
            output: Some(output.into()),
            error: None,
            duration_ms,
            metadata: Value::Null,
        }
    }

    pub fn failure(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            outcome: ActionOutcome::Failure,
            output: None,
            error: Some(error.into()),
            duration_ms,
            metadata: Value::Null,
        }
    }

    pub fn timeout(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            outcome: ActionOutcome::Timeout,
            output: None,
            error: Some(error.into()),
            duration_ms,
            metadata: Value::Null,
        }
    }

    pub fn partial(output: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            outcome: ActionOutcome::Partial,
            output: Some(output.into()),
            error: None,
            duration_ms,
            metadata: Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Capability contract for execution backends.
///
/// Any backend satisfying this contract is interchangeable; the engine is
/// actuator-agnostic. `execute` performs exactly one mechanical action and
/// applies no internal retry or interpretation of output. Genuinely
/// unexpected internal faults surface as `outcome = failure` with `error`
/// populated, never as a panic.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Human-readable name of this actuator
    fn name(&self) -> &str;

    /// Execute one action and report the result
    async fn execute(&self, action: &str, options: &ExecuteOptions) -> ActionResult;

    /// Check if the actuator is ready to execute
    fn is_available(&self) -> bool;
}
