//! Pluggable phase strategies and their default heuristics.
//!
//! The planner, normalizer, and decider are the three judgment seams of
//! the loop. Each is a named interface injected at construction and
//! independently testable against canned state. The defaults here are
//! deliberately non-learned; callers replace them with smarter (e.g.
//! model-backed) implementations without touching the engine.

use crate::actuator::ActionResult;
use crate::domain::{Decision, DecisionType, Fact, FactType, LoopState};
use crate::error::Result;
use crate::memory::Memory;

use super::EngineConfig;

/// Produces exactly one action string for the Execute phase.
pub trait Planner: Send + Sync {
    fn plan(&self, state: &LoopState, memory: &Memory) -> Result<String>;
}

/// Turns a raw observation into zero or more structured facts.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, observation: &str, state: &LoopState) -> Result<Vec<Fact>>;
}

/// Inspects state + result + memory and closes the iteration with a decision.
pub trait Decider: Send + Sync {
    fn decide(&self, state: &LoopState, result: &ActionResult, memory: &Memory) -> Result<Decision>;
}

/// Default planner: returns the objective unchanged every time.
///
/// All adaptive behavior is deferred to an injected planner; repetition of
/// a failed action is therefore a deliberate planning decision, never an
/// engine default.
pub struct ObjectivePlanner;

impl Planner for ObjectivePlanner {
    fn plan(&self, state: &LoopState, _memory: &Memory) -> Result<String> {
        Ok(state.objective.clone())
    }
}

/// Default normalizer: wraps the raw observation into one observation fact.
pub struct ObservationNormalizer;

const MAX_FACT_CONTENT_CHARS: usize = 1000;

impl Normalizer for ObservationNormalizer {
    fn normalize(&self, observation: &str, state: &LoopState) -> Result<Vec<Fact>> {
        let content: String = observation.chars().take(MAX_FACT_CONTENT_CHARS).collect();
        Ok(vec![Fact::new(
            FactType::Observation,
            content,
            format!("iteration-{}", state.iteration),
        )])
    }
}

/// Default decider: threshold checks in fixed order.
///
/// Stops on low confidence, then on an exhausted failure streak, then on
/// any success outcome; otherwise continues.
pub struct ThresholdDecider {
    pub confidence_threshold: f64,
    pub max_consecutive_failures: u32,
}

impl ThresholdDecider {
    pub fn new(confidence_threshold: f64, max_consecutive_failures: u32) -> Self {
        Self {
            confidence_threshold,
            max_consecutive_failures,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.confidence_threshold, config.max_consecutive_failures)
    }
}

impl Decider for ThresholdDecider {
    fn decide(&self, state: &LoopState, result: &ActionResult, _memory: &Memory) -> Result<Decision> {
        if state.confidence < self.confidence_threshold {
            return Ok(Decision::new(
                DecisionType::StopLowConfidence,
                format!("confidence dropped to {:.2}", state.confidence),
            ));
        }

        if state.consecutive_failures >= self.max_consecutive_failures {
            return Ok(Decision::new(
                DecisionType::StopFailure,
                format!("failed {} times consecutively", state.consecutive_failures),
            ));
        }

        if result.outcome == crate::domain::ActionOutcome::Success {
            return Ok(Decision::new(
                DecisionType::StopSuccess,
                "action completed successfully",
            ));
        }

        let mut decision =
            Decision::new(DecisionType::Continue, "no stop condition met, continuing")
                .with_confidence(state.confidence);
        if let Some(plan) = &state.current_plan {
            decision = decision.with_next_action(plan.clone());
        }
        Ok(decision)
    }
}
