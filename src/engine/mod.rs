//! The loop engine - seven-phase iteration cycle, guardrails, hooks.

mod config;
mod hooks;
mod loop_engine;
mod strategy;

pub use config::EngineConfig;
pub use hooks::{ActionHook, EngineHooks, IterationHook, StopHook};
pub use loop_engine::{LoopEngine, StopHandle};
pub use strategy::{
    Decider, Normalizer, ObjectivePlanner, ObservationNormalizer, Planner, ThresholdDecider,
};
