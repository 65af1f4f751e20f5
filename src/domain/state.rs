//! Loop state - the complete, append-only state of one engine run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attempt, Decision, Fact};
use crate::id::generate_loop_id;

/// Complete state of a single loop run.
///
/// Created once per invocation with a fresh id, mutated exclusively by the
/// engine, and discarded by the caller when no longer needed. Knowledge
/// collections only grow; superseded facts are marked, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopState {
    //=== Identity ===
    pub loop_id: String,
    pub created_at: DateTime<Utc>,

    //=== Objective ===
    pub objective: String,
    pub constraints: Vec<String>,

    //=== Knowledge (append-only) ===
    pub facts: Vec<Fact>,
    pub attempts: Vec<Attempt>,
    pub avoid_list: Vec<String>,
    pub pending_questions: Vec<String>,

    //=== Current position ===
    /// Current iteration number (0 before the first cycle)
    pub iteration: u32,
    pub current_plan: Option<String>,
    pub last_observation: Option<String>,
    pub last_decision: Option<Decision>,

    //=== Metrics ===
    pub confidence: f64,
    pub consecutive_failures: u32,

    //=== Status ===
    pub stopped: bool,
    pub stop_reason: Option<String>,
    pub final_summary: Option<String>,
}

impl LoopState {
    /// Create fresh state for a new run
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            loop_id: generate_loop_id(),
            created_at: Utc::now(),
            objective: objective.into(),
            constraints: Vec::new(),
            facts: Vec::new(),
            attempts: Vec::new(),
            avoid_list: Vec::new(),
            pending_questions: Vec::new(),
            iteration: 0,
            current_plan: None,
            last_observation: None,
            last_decision: None,
            confidence: 1.0,
            consecutive_failures: 0,
            stopped: false,
            stop_reason: None,
            final_summary: None,
        }
    }

    /// Append a fact to the knowledge base
    pub fn add_fact(&mut self, fact: Fact) {
        self.facts.push(fact);
    }

    /// Record an attempt, updating the failure streak and avoid list.
    ///
    /// Any non-failure outcome resets `consecutive_failures`; a failure
    /// increments it and carries its avoidance hint into `avoid_list`.
    pub fn add_attempt(&mut self, attempt: Attempt) {
        if attempt.outcome.is_failure() {
            self.consecutive_failures += 1;
            if let Some(hint) = &attempt.avoidance_hint {
                self.avoid_list.push(hint.clone());
            }
        } else {
            self.consecutive_failures = 0;
        }
        self.attempts.push(attempt);
    }

    /// Mark the fact at `index` superseded and append its replacement.
    ///
    /// Returns the new fact, or None if the index is out of bounds. The
    /// old fact keeps its place in the log with a pointer to the source
    /// that replaced it.
    pub fn supersede_fact(
        &mut self,
        index: usize,
        new_content: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<&Fact> {
        let source = source.into();
        let (fact_type, confidence) = {
            let old = self.facts.get_mut(index)?;
            old.superseded = true;
            old.superseded_by = Some(source.clone());
            (old.fact_type, old.confidence)
        };

        let replacement = Fact::with_confidence(fact_type, new_content, source, confidence);
        self.facts.push(replacement);
        self.facts.last()
    }

    /// All facts not yet superseded
    pub fn active_facts(&self) -> Vec<&Fact> {
        self.facts.iter().filter(|f| !f.superseded).collect()
    }

    /// All failed attempts, for avoidance-aware planning
    pub fn failed_attempts(&self) -> Vec<&Attempt> {
        self.attempts.iter().filter(|a| a.outcome.is_failure()).collect()
    }

    /// Serialize the full state for transport to a remote observer
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionOutcome, FactType};

    #[test]
    fn test_new_state_defaults() {
        let state = LoopState::new("echo hello");
        assert!(state.loop_id.starts_with("gyre-"));
        assert_eq!(state.objective, "echo hello");
        assert_eq!(state.iteration, 0);
        assert_eq!(state.confidence, 1.0);
        assert_eq!(state.consecutive_failures, 0);
        assert!(!state.stopped);
        assert!(state.stop_reason.is_none());
        assert!(state.facts.is_empty());
        assert!(state.attempts.is_empty());
    }

    #[test]
    fn test_fresh_id_per_state() {
        let a = LoopState::new("x");
        let b = LoopState::new("x");
        assert_ne!(a.loop_id, b.loop_id);
    }

    #[test]
    fn test_add_attempt_failure_increments_streak() {
        let mut state = LoopState::new("task");

        let mut failed = Attempt::new(1, "shell", "make", ActionOutcome::Failure);
        failed.avoidance_hint = Some("avoid: missing Makefile".to_string());
        state.add_attempt(failed);

        assert_eq!(state.consecutive_failures, 1);
        assert_eq!(state.avoid_list, vec!["avoid: missing Makefile"]);

        let mut failed2 = Attempt::new(2, "shell", "make", ActionOutcome::Failure);
        failed2.avoidance_hint = Some("avoid: missing Makefile again".to_string());
        state.add_attempt(failed2);

        assert_eq!(state.consecutive_failures, 2);
        assert_eq!(state.avoid_list.len(), 2);
    }

    #[test]
    fn test_add_attempt_non_failure_resets_streak() {
        let mut state = LoopState::new("task");
        state.add_attempt(Attempt::new(1, "shell", "make", ActionOutcome::Failure));
        state.add_attempt(Attempt::new(2, "shell", "make", ActionOutcome::Failure));
        assert_eq!(state.consecutive_failures, 2);

        state.add_attempt(Attempt::new(3, "shell", "make", ActionOutcome::Partial));
        assert_eq!(state.consecutive_failures, 0);

        state.add_attempt(Attempt::new(4, "shell", "make", ActionOutcome::Failure));
        assert_eq!(state.consecutive_failures, 1);

        state.add_attempt(Attempt::new(5, "shell", "make", ActionOutcome::Timeout));
        assert_eq!(state.consecutive_failures, 0);
    }

    #[test]
    fn test_supersede_fact_marks_and_appends() {
        let mut state = LoopState::new("task");
        state.add_fact(Fact::new(FactType::Assumption, "port 8080 is free", "iteration-1"));

        let new_fact = state
            .supersede_fact(0, "port 8080 is taken by nginx", "iteration-3")
            .cloned();

        let new_fact = new_fact.unwrap();
        assert_eq!(new_fact.content, "port 8080 is taken by nginx");
        assert_eq!(new_fact.fact_type, FactType::Assumption);
        assert!(!new_fact.superseded);

        assert_eq!(state.facts.len(), 2);
        assert!(state.facts[0].superseded);
        assert_eq!(state.facts[0].superseded_by.as_deref(), Some("iteration-3"));
    }

    #[test]
    fn test_supersede_fact_bad_index() {
        let mut state = LoopState::new("task");
        assert!(state.supersede_fact(7, "x", "y").is_none());
        assert!(state.facts.is_empty());
    }

    #[test]
    fn test_active_facts_excludes_superseded() {
        let mut state = LoopState::new("task");
        state.add_fact(Fact::new(FactType::Observation, "a", "iteration-1"));
        state.add_fact(Fact::new(FactType::Observation, "b", "iteration-1"));
        state.supersede_fact(0, "a-revised", "iteration-2");

        let active = state.active_facts();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|f| !f.superseded));
        assert!(active.iter().any(|f| f.content == "a-revised"));
        assert!(active.iter().any(|f| f.content == "b"));
    }

    #[test]
    fn test_failed_attempts_filter() {
        let mut state = LoopState::new("task");
        state.add_attempt(Attempt::new(1, "shell", "a", ActionOutcome::Failure));
        state.add_attempt(Attempt::new(2, "shell", "b", ActionOutcome::Success));
        state.add_attempt(Attempt::new(3, "shell", "c", ActionOutcome::Timeout));

        let failed = state.failed_attempts();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].action_detail, "a");
    }

    #[test]
    fn test_state_serialization_roundtrip_preserves_knowledge() {
        let mut state = LoopState::new("round trip");
        state.iteration = 4;
        state.add_fact(Fact::new(FactType::Constraint, "no network access", "caller"));
        let mut attempt = Attempt::new(1, "shell", "cargo build", ActionOutcome::Failure);
        attempt.failure_reason = Some("linker error".to_string());
        state.add_attempt(attempt);

        let json = state.to_json().unwrap();
        let restored: LoopState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.iteration, 4);
        assert_eq!(restored.loop_id, state.loop_id);
        assert_eq!(restored.facts.len(), 1);
        assert_eq!(restored.facts[0].content, "no network access");
        assert_eq!(restored.attempts.len(), 1);
        assert_eq!(restored.attempts[0].failure_reason.as_deref(), Some("linker error"));
        assert_eq!(restored.consecutive_failures, state.consecutive_failures);
    }
}
