//! Per-iteration audit narratives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Human-auditable summary of one iteration.
///
/// Emitted every iteration regardless of callbacks, so long-running loop
/// behavior stays inspectable after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationNarrative {
    pub iteration: u32,
    pub what_was_tried: String,
    pub why_it_was_chosen: String,
    pub what_happened: String,
    pub what_comes_next: String,
    pub timestamp: DateTime<Utc>,
}

impl IterationNarrative {
    pub fn new(
        iteration: u32,
        what_was_tried: impl Into<String>,
        why_it_was_chosen: impl Into<String>,
        what_happened: impl Into<String>,
        what_comes_next: impl Into<String>,
    ) -> Self {
        Self {
            iteration,
            what_was_tried: what_was_tried.into(),
            why_it_was_chosen: why_it_was_chosen.into(),
            what_happened: what_happened.into(),
            what_comes_next: what_comes_next.into(),
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Display for IterationNarrative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Iteration {}]\nTRIED: {}\nWHY: {}\nRESULT: {}\nNEXT: {}",
            self.iteration,
            self.what_was_tried,
            self.why_it_was_chosen,
            self.what_happened,
            self.what_comes_next
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let narrative = IterationNarrative::new(
            2,
            "cargo test",
            "objective asks for passing tests",
            "failure: 3 tests failed",
            "continue with targeted fix",
        );

        let text = narrative.to_string();
        assert!(text.starts_with("[Iteration 2]"));
        assert!(text.contains("TRIED: cargo test"));
        assert!(text.contains("WHY: objective asks for passing tests"));
        assert!(text.contains("RESULT: failure: 3 tests failed"));
        assert!(text.contains("NEXT: continue with targeted fix"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let narrative = IterationNarrative::new(1, "a", "b", "c", "d");
        let json = serde_json::to_string(&narrative).unwrap();
        let restored: IterationNarrative = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.iteration, 1);
        assert_eq!(restored.what_was_tried, "a");
        assert_eq!(restored.what_comes_next, "d");
    }
}
