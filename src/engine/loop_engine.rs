//! The core execution-loop engine.
//!
//! A closed feedback loop with append-only memory. Each iteration:
//! 1. Observes reality
//! 2. Normalizes observations into structured facts
//! 3. Updates append-only memory
//! 4. Plans exactly one next action
//! 5. Executes that action
//! 6. Waits for results and captures them
//! 7. Decides whether and how to continue
//!
//! Invariants:
//! - One iteration produces exactly one actuator invocation
//! - Every iteration ends with a decision
//! - State is never discarded; memory is append-only
//! - Failure is first-class and explicitly recorded
//! - Control flow is centralized here, never delegated to strategies

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::actuator::{ActionResult, Actuator, ExecuteOptions};
use crate::domain::{ActionOutcome, Attempt, DecisionType, IterationNarrative, LoopState};
use crate::error::{GyreError, Result};
use crate::memory::{EntryType, Memory, MemoryEntry};

use super::strategy::{Decider, Normalizer, ObjectivePlanner, ObservationNormalizer, Planner, ThresholdDecider};
use super::{EngineConfig, EngineHooks};

const MAX_ACTION_DETAIL_CHARS: usize = 500;
const MAX_RESULT_CHARS: usize = 1000;
const MAX_NARRATIVE_FIELD_CHARS: usize = 200;
const MAX_HINT_CHARS: usize = 150;

/// Cloneable handle for requesting a cooperative stop.
///
/// The flag is consulted only at iteration boundaries; an in-flight
/// actuator call is never aborted.
#[derive(Clone, Default)]
pub struct StopHandle {
    inner: Arc<StopInner>,
}

#[derive(Default)]
struct StopInner {
    requested: AtomicBool,
    reason: Mutex<Option<String>>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop, taking effect at the next iteration boundary
    pub fn stop(&self, reason: impl Into<String>) {
        if let Ok(mut slot) = self.inner.reason.lock() {
            slot.get_or_insert(reason.into());
        }
        self.inner.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    fn reason(&self) -> String {
        self.inner
            .reason
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .unwrap_or_else(|| "user interrupt".to_string())
    }
}

/// The loop engine. Owns state and memory for one run and drives the
/// seven-phase cycle until a terminal decision.
pub struct LoopEngine {
    config: EngineConfig,
    actuator: Arc<dyn Actuator>,
    planner: Box<dyn Planner>,
    normalizer: Box<dyn Normalizer>,
    decider: Box<dyn Decider>,
    hooks: EngineHooks,
    execute_options: ExecuteOptions,
    state: LoopState,
    memory: Memory,
    narratives: Vec<IterationNarrative>,
    stop_handle: StopHandle,
}

impl LoopEngine {
    /// Create an engine with the default heuristics bound to `config`.
    pub fn new(objective: impl Into<String>, actuator: Arc<dyn Actuator>, config: EngineConfig) -> Self {
        let state = LoopState::new(objective);
        let memory = Memory::new(&state.loop_id);
        let decider = ThresholdDecider::from_config(&config);

        Self {
            config,
            actuator,
            planner: Box::new(ObjectivePlanner),
            normalizer: Box::new(ObservationNormalizer),
            decider: Box::new(decider),
            hooks: EngineHooks::default(),
            execute_options: ExecuteOptions::default(),
            state,
            memory,
            narratives: Vec::new(),
            stop_handle: StopHandle::new(),
        }
    }

    pub fn with_planner(mut self, planner: impl Planner + 'static) -> Self {
        self.planner = Box::new(planner);
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_decider(mut self, decider: impl Decider + 'static) -> Self {
        self.decider = Box::new(decider);
        self
    }

    pub fn with_constraints(mut self, constraints: Vec<String>) -> Self {
        self.state.constraints = constraints;
        self
    }

    pub fn with_hooks(mut self, hooks: EngineHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_execute_options(mut self, options: ExecuteOptions) -> Self {
        self.execute_options = options;
        self
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// All iteration narratives recorded so far, in order
    pub fn get_narratives(&self) -> &[IterationNarrative] {
        &self.narratives
    }

    /// Handle for stopping the loop from another task or thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// Request a cooperative stop at the next iteration boundary
    pub fn stop(&self, reason: impl Into<String>) {
        self.stop_handle.stop(reason);
    }

    /// Execute the loop until a stop condition is met. Returns the final
    /// state, with `final_summary` populated.
    pub async fn run(&mut self) -> Result<LoopState> {
        if !self.actuator.is_available() {
            return Err(GyreError::ActuatorUnavailable(self.actuator.name().to_string()));
        }

        tracing::info!(
            loop_id = %self.state.loop_id,
            objective = %self.state.objective,
            max_iterations = self.config.max_iterations,
            "loop starting"
        );

        while !self.state.stopped {
            self.run_iteration().await?;

            if !self.state.stopped && self.config.iteration_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.iteration_delay_ms)).await;
            }
        }

        self.finalize();
        Ok(self.state.clone())
    }

    /// Run exactly one iteration (useful for step-by-step debugging).
    pub async fn run_single_iteration(&mut self) -> Result<&LoopState> {
        if !self.actuator.is_available() {
            return Err(GyreError::ActuatorUnavailable(self.actuator.name().to_string()));
        }
        if self.state.stopped {
            return Ok(&self.state);
        }
        self.run_iteration().await?;
        if self.state.stopped {
            self.finalize();
        }
        Ok(&self.state)
    }

    /// One pass through all seven phases, guarded at the boundary.
    async fn run_iteration(&mut self) -> Result<()> {
        // Boundary guardrails: external stop first, then the hard cap.
        // Both fire before phase 1 and before the counter moves.
        if self.stop_handle.is_requested() {
            let reason = self.stop_handle.reason();
            self.transition_stopped(DecisionType::StopUserInterrupt, &reason);
            return Ok(());
        }
        if self.state.iteration >= self.config.max_iterations {
            self.transition_stopped(DecisionType::StopMaxIterations, "maximum iterations reached");
            return Ok(());
        }

        self.state.iteration += 1;
        let iteration = self.state.iteration;

        tracing::info!(
            loop_id = %self.state.loop_id,
            iteration,
            max_iterations = self.config.max_iterations,
            "iteration starting"
        );

        if let Some(hook) = &self.hooks.on_iteration_start {
            hook(iteration, &self.state);
        }

        // Phase 1: Observe. Capture the previous action's output (or the
        // objective on iteration 1) exactly as it occurred. No reasoning.
        let observation = self
            .state
            .last_observation
            .clone()
            .unwrap_or_else(|| format!("Starting: {}", self.state.objective));
        self.memory.record_observation(iteration, &observation);

        // Phase 2: Normalize. Convert the observation into structured facts.
        let facts = self.normalizer.normalize(&observation, &self.state)?;
        tracing::debug!(loop_id = %self.state.loop_id, iteration, fact_count = facts.len(), "normalized");
        for fact in facts {
            self.memory.record_fact(iteration, &fact.content, fact.fact_type);
            self.state.add_fact(fact);
        }

        // Phase 3: Update memory. Happens inside every record_* call above
        // and below; nothing separate to do here.

        // Phase 4: Plan. Exactly one action.
        let action = self.planner.plan(&self.state, &self.memory)?;
        self.state.current_plan = Some(action.clone());
        self.memory.record_plan(iteration, &action);
        tracing::debug!(loop_id = %self.state.loop_id, iteration, action = %action, "planned");

        // Phase 5: Execute. Dispatch the action. No retries, no branching.
        self.memory.record_action(iteration, &action, self.actuator.name());
        let result = self.actuator.execute(&action, &self.execute_options).await;

        if let Some(hook) = &self.hooks.on_action {
            hook(&action, &result);
        }

        // Phase 6: Wait and capture. Record what happened and fold it into
        // state as the next iteration's observation.
        let result_content = result
            .output
            .clone()
            .or_else(|| result.error.clone())
            .unwrap_or_else(|| "no output".to_string());
        self.memory.record_result(
            iteration,
            &truncate_chars(&result_content, MAX_RESULT_CHARS),
            result.outcome,
            result.duration_ms,
        );
        self.state.last_observation = Some(result_content.clone());

        let attempt = self.build_attempt(iteration, &action, &result);
        self.state.add_attempt(attempt);

        if matches!(result.outcome, ActionOutcome::Failure | ActionOutcome::Timeout) {
            let error_text = result.error.as_deref().unwrap_or("action did not complete");
            self.memory.record_error(iteration, error_text);
        }

        tracing::info!(
            loop_id = %self.state.loop_id,
            iteration,
            outcome = %result.outcome,
            duration_ms = result.duration_ms,
            "action finished"
        );

        // Phase 7: Decide. The single judgment that closes the iteration.
        let decision = self.decider.decide(&self.state, &result, &self.memory)?;
        self.state.last_decision = Some(decision.clone());
        self.memory
            .record_decision(iteration, &decision.reasoning, decision.decision_type);

        let narrative = IterationNarrative::new(
            iteration,
            truncate_chars(&action, MAX_NARRATIVE_FIELD_CHARS),
            self.state
                .current_plan
                .as_deref()
                .map(|p| truncate_chars(p, MAX_NARRATIVE_FIELD_CHARS))
                .unwrap_or_else(|| "initial action".to_string()),
            format!(
                "{}: {}",
                result.outcome,
                truncate_chars(&result_content, MAX_NARRATIVE_FIELD_CHARS)
            ),
            truncate_chars(&decision.reasoning, MAX_NARRATIVE_FIELD_CHARS),
        );
        self.narratives.push(narrative);

        if decision.is_stop() {
            self.transition_stopped(decision.decision_type, &decision.reasoning);
        }

        if let Some(hook) = &self.hooks.on_iteration_end {
            hook(iteration, &self.state);
        }

        Ok(())
    }

    fn build_attempt(&self, iteration: u32, action: &str, result: &ActionResult) -> Attempt {
        let mut attempt = Attempt::new(
            iteration,
            self.actuator.name(),
            truncate_chars(action, MAX_ACTION_DETAIL_CHARS),
            result.outcome,
        );
        attempt.result = result.output.as_deref().map(|o| truncate_chars(o, MAX_RESULT_CHARS));
        attempt.failure_reason = result.error.clone();
        if result.outcome.is_failure() {
            // Derive the hint from the error text; fall back to the action
            // itself when the actuator reported nothing usable.
            let basis = result.error.as_deref().unwrap_or(action);
            attempt.avoidance_hint = Some(format!("avoid: {}", truncate_chars(basis, MAX_HINT_CHARS)));
        }
        attempt
    }

    fn transition_stopped(&mut self, decision_type: DecisionType, message: &str) {
        if self.state.stopped {
            return;
        }
        self.state.stopped = true;
        self.state.stop_reason = Some(format!("{}: {}", decision_type, message));
        tracing::info!(
            loop_id = %self.state.loop_id,
            iterations = self.state.iteration,
            reason = %self.state.stop_reason.as_deref().unwrap_or(""),
            "loop stopped"
        );
    }

    /// Populate the final summary and fire the stop hook, exactly once.
    fn finalize(&mut self) {
        if self.state.final_summary.is_some() {
            return;
        }
        let summary = self.build_summary();
        self.memory.append(MemoryEntry::new(
            EntryType::Summary,
            self.state.iteration,
            "summary",
            &summary,
            Value::Null,
        ));
        self.state.final_summary = Some(summary);

        if let Some(hook) = &self.hooks.on_stop {
            hook(&self.state);
        }
    }

    fn build_summary(&self) -> String {
        let mut lines = vec![
            "=== loop summary ===".to_string(),
            format!("id: {}", self.state.loop_id),
            format!("objective: {}", self.state.objective),
            format!("iterations: {}", self.state.iteration),
            format!(
                "outcome: {}",
                self.state.stop_reason.as_deref().unwrap_or("not stopped")
            ),
        ];

        if !self.state.attempts.is_empty() {
            lines.push(String::new());
            lines.push("attempts:".to_string());
            let skip = self.state.attempts.len().saturating_sub(5);
            for attempt in &self.state.attempts[skip..] {
                lines.push(format!(
                    "  [{}] #{} {}",
                    attempt.outcome,
                    attempt.iteration,
                    truncate_chars(&attempt.action_detail, 60)
                ));
            }
        }

        let errors = self.memory.get_errors();
        if !errors.is_empty() {
            lines.push(String::new());
            lines.push(format!("errors ({}):", errors.len()));
            for error in errors.iter().rev().take(3).rev() {
                lines.push(format!("  - {}", truncate_chars(&error.content, 80)));
            }
        }

        if !self.state.avoid_list.is_empty() {
            lines.push(String::new());
            lines.push("avoid list:".to_string());
            let skip = self.state.avoid_list.len().saturating_sub(5);
            for hint in &self.state.avoid_list[skip..] {
                lines.push(format!("  - {}", truncate_chars(hint, 60)));
            }
        }

        lines.join("\n")
    }
}

/// Char-boundary-safe truncation
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
