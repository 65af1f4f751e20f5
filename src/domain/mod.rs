//! Domain types for gyre
//!
//! Knowledge records (Fact, Attempt, Decision), the per-run LoopState, and
//! the per-iteration audit narrative. Records are immutable once created;
//! the only sanctioned mutation is marking a fact superseded, which always
//! pairs with appending its replacement.

mod attempt;
mod decision;
mod fact;
mod narrative;
mod outcome;
mod state;

pub use attempt::Attempt;
pub use decision::{Decision, DecisionType};
pub use fact::{Fact, FactType};
pub use narrative::IterationNarrative;
pub use outcome::ActionOutcome;
pub use state::LoopState;
