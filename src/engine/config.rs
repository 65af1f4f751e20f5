//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a single loop run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard iteration cap, checked before phase 1 of every new iteration
    pub max_iterations: u32,

    /// Below this confidence the default decider stops the loop
    pub confidence_threshold: f64,

    /// Failure streak at which the default decider stops the loop
    pub max_consecutive_failures: u32,

    /// Pause between iterations
    pub iteration_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            confidence_threshold: 0.3,
            max_consecutive_failures: 3,
            iteration_delay_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.confidence_threshold, 0.3);
        assert_eq!(config.max_consecutive_failures, 3);
        assert_eq!(config.iteration_delay_ms, 500);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: EngineConfig = serde_yaml::from_str("max_iterations: 5").unwrap();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.max_consecutive_failures, 3);
    }
}
