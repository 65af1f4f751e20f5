//! Append-only loop memory.
//!
//! Memory is read at the start of each iteration and written by every
//! phase. It informs planning but never controls execution directly; its
//! role is to prevent repetition, improve decisions, and explain behavior.
//! Entries are immutable once appended and exact duplicates are dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::domain::{ActionOutcome, DecisionType, FactType};

/// Types of memory entries, one per recording phase plus error/summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Observation,
    NormalizedFact,
    Plan,
    Action,
    Result,
    Decision,
    Error,
    Summary,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Observation => "observation",
            EntryType::NormalizedFact => "normalized_fact",
            EntryType::Plan => "plan",
            EntryType::Action => "action",
            EntryType::Result => "result",
            EntryType::Decision => "decision",
            EntryType::Error => "error",
            EntryType::Summary => "summary",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single memory entry. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub entry_type: EntryType,
    pub iteration: u32,
    /// Phase that produced the entry (e.g. "observe", "wait_capture")
    pub phase: String,
    pub content: String,
    pub metadata: Value,
    pub timestamp: DateTime<Utc>,
    /// Content hash used for deduplication, derived from `(type, content)`
    pub dedup_hash: String,
}

impl MemoryEntry {
    pub fn new(
        entry_type: EntryType,
        iteration: u32,
        phase: impl Into<String>,
        content: impl Into<String>,
        metadata: Value,
    ) -> Self {
        let content = content.into();
        let dedup_hash = dedup_hash(entry_type, &content);
        Self {
            entry_type,
            iteration,
            phase: phase.into(),
            content,
            metadata,
            timestamp: Utc::now(),
            dedup_hash,
        }
    }
}

/// Hash of `(type, content)` for global deduplication
fn dedup_hash(entry_type: EntryType, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entry_type.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(content.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

/// Append-only memory store for one loop run.
///
/// Deduplication is global across the whole run: an entry whose
/// `(type, content)` pair was seen in any earlier iteration is silently
/// dropped and `append` reports it.
#[derive(Debug, Serialize)]
pub struct Memory {
    pub loop_id: String,
    entries: Vec<MemoryEntry>,
    #[serde(skip)]
    seen_hashes: HashSet<String>,
}

impl<'de> Deserialize<'de> for Memory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            loop_id: String,
            entries: Vec<MemoryEntry>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Memory::from_entries(raw.loop_id, raw.entries))
    }
}

impl Memory {
    pub fn new(loop_id: impl Into<String>) -> Self {
        Self {
            loop_id: loop_id.into(),
            entries: Vec::new(),
            seen_hashes: HashSet::new(),
        }
    }

    /// Rebuild a memory log from previously dumped entries.
    ///
    /// The dedup index is reconstructed so later appends still honor
    /// duplicates from before the dump.
    pub fn from_entries(loop_id: impl Into<String>, entries: Vec<MemoryEntry>) -> Self {
        let seen_hashes = entries.iter().map(|e| e.dedup_hash.clone()).collect();
        Self {
            loop_id: loop_id.into(),
            entries,
            seen_hashes,
        }
    }

    /// Append an entry. Returns false if it duplicates an existing
    /// `(type, content)` pair, in which case the log is unchanged.
    pub fn append(&mut self, entry: MemoryEntry) -> bool {
        if self.seen_hashes.contains(&entry.dedup_hash) {
            tracing::debug!(
                loop_id = %self.loop_id,
                entry_type = %entry.entry_type,
                "duplicate memory entry dropped"
            );
            return false;
        }
        self.seen_hashes.insert(entry.dedup_hash.clone());
        self.entries.push(entry);
        true
    }

    pub fn record_observation(&mut self, iteration: u32, content: &str) -> MemoryEntry {
        let entry = MemoryEntry::new(
            EntryType::Observation,
            iteration,
            "observe",
            content,
            Value::Null,
        );
        self.append(entry.clone());
        entry
    }

    pub fn record_fact(&mut self, iteration: u32, content: &str, fact_type: FactType) -> MemoryEntry {
        let entry = MemoryEntry::new(
            EntryType::NormalizedFact,
            iteration,
            "normalize",
            content,
            json!({ "fact_type": fact_type }),
        );
        self.append(entry.clone());
        entry
    }

    pub fn record_plan(&mut self, iteration: u32, content: &str) -> MemoryEntry {
        let entry = MemoryEntry::new(EntryType::Plan, iteration, "plan", content, Value::Null);
        self.append(entry.clone());
        entry
    }

    pub fn record_action(&mut self, iteration: u32, content: &str, actuator: &str) -> MemoryEntry {
        let entry = MemoryEntry::new(
            EntryType::Action,
            iteration,
            "execute",
            content,
            json!({ "actuator": actuator }),
        );
        self.append(entry.clone());
        entry
    }

    pub fn record_result(
        &mut self,
        iteration: u32,
        content: &str,
        outcome: ActionOutcome,
        duration_ms: u64,
    ) -> MemoryEntry {
        let entry = MemoryEntry::new(
            EntryType::Result,
            iteration,
            "wait_capture",
            content,
            json!({ "outcome": outcome, "duration_ms": duration_ms }),
        );
        self.append(entry.clone());
        entry
    }

    pub fn record_decision(
        &mut self,
        iteration: u32,
        content: &str,
        decision_type: DecisionType,
    ) -> MemoryEntry {
        let entry = MemoryEntry::new(
            EntryType::Decision,
            iteration,
            "decide",
            content,
            json!({ "decision_type": decision_type }),
        );
        self.append(entry.clone());
        entry
    }

    pub fn record_error(&mut self, iteration: u32, content: &str) -> MemoryEntry {
        let entry = MemoryEntry::new(EntryType::Error, iteration, "error", content, Value::Null);
        self.append(entry.clone());
        entry
    }

    /// All entries for a specific iteration
    pub fn get_iteration(&self, iteration: u32) -> Vec<&MemoryEntry> {
        self.entries.iter().filter(|e| e.iteration == iteration).collect()
    }

    /// All entries of a specific type
    pub fn get_by_type(&self, entry_type: EntryType) -> Vec<&MemoryEntry> {
        self.entries.iter().filter(|e| e.entry_type == entry_type).collect()
    }

    /// All error entries
    pub fn get_errors(&self) -> Vec<&MemoryEntry> {
        self.get_by_type(EntryType::Error)
    }

    /// The N most recent entries, oldest first
    pub fn get_recent(&self, n: usize) -> &[MemoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable report: per-type counts plus the last three errors
    pub fn summarize(&self) -> String {
        let mut lines = vec![
            format!("Memory for loop {}:", self.loop_id),
            format!("Total entries: {}", self.entries.len()),
        ];

        let mut by_type: Vec<(EntryType, usize)> = Vec::new();
        for entry in &self.entries {
            match by_type.iter_mut().find(|(t, _)| *t == entry.entry_type) {
                Some((_, count)) => *count += 1,
                None => by_type.push((entry.entry_type, 1)),
            }
        }

        for (entry_type, count) in &by_type {
            lines.push(format!("  {}: {}", entry_type, count));
        }

        let errors = self.get_errors();
        if !errors.is_empty() {
            lines.push(format!("Errors ({}):", errors.len()));
            for error in errors.iter().rev().take(3).rev() {
                lines.push(format!("  - [{}] {}", error.iteration, error.content));
            }
        }

        lines.join("\n")
    }

    /// Serialize the full log for transport to a remote observer
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
