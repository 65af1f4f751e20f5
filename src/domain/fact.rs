//! Facts - typed, attributable units of derived knowledge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactType {
    Observation,
    Error,
    Contradiction,
    Assumption,
    Constraint,
    OpenQuestion,
}

/// A structured piece of knowledge derived from observation.
///
/// Facts are never deleted. A fact that turns out to be wrong is marked
/// superseded and a replacement is appended alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// What kind of knowledge this is
    pub fact_type: FactType,

    /// The knowledge itself
    pub content: String,

    /// Which iteration/phase produced this (e.g. "iteration-3")
    pub source: String,

    /// How much to trust it, 0.0 to 1.0
    pub confidence: f64,

    /// True once replaced by a newer fact; never queried as active knowledge
    pub superseded: bool,

    /// Source of the fact that replaced this one
    pub superseded_by: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl Fact {
    /// Create an active fact with full confidence
    pub fn new(fact_type: FactType, content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            fact_type,
            content: content.into(),
            source: source.into(),
            confidence: 1.0,
            superseded: false,
            superseded_by: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a fact with an explicit confidence, clamped to [0, 1]
    pub fn with_confidence(
        fact_type: FactType,
        content: impl Into<String>,
        source: impl Into<String>,
        confidence: f64,
    ) -> Self {
        let mut fact = Self::new(fact_type, content, source);
        fact.confidence = confidence.clamp(0.0, 1.0);
        fact
    }
}
