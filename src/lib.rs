//! Gyre - an autonomous execution-loop engine
//!
//! Gyre drives a seven-phase observe/normalize/remember/plan/execute/
//! capture/decide cycle against a pluggable actuator, accumulating
//! append-only knowledge until a stop condition is met.

pub mod actuator;
pub mod domain;
pub mod engine;
pub mod error;
pub mod id;
pub mod memory;

pub use error::{GyreError, Result};
