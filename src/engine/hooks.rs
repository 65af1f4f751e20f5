//! Optional observability callbacks.
//!
//! Hooks fire at iteration start, iteration end, after each action, and at
//! loop termination. They must tolerate being invoked from whatever
//! context drives the loop, hence the Send + Sync bounds.

use crate::actuator::ActionResult;
use crate::domain::LoopState;

pub type IterationHook = Box<dyn Fn(u32, &LoopState) + Send + Sync>;
pub type ActionHook = Box<dyn Fn(&str, &ActionResult) + Send + Sync>;
pub type StopHook = Box<dyn Fn(&LoopState) + Send + Sync>;

/// The four optional event callbacks an embedder can register.
#[derive(Default)]
pub struct EngineHooks {
    pub on_iteration_start: Option<IterationHook>,
    pub on_iteration_end: Option<IterationHook>,
    pub on_action: Option<ActionHook>,
    pub on_stop: Option<StopHook>,
}

impl EngineHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_iteration_start(mut self, hook: impl Fn(u32, &LoopState) + Send + Sync + 'static) -> Self {
        self.on_iteration_start = Some(Box::new(hook));
        self
    }

    pub fn on_iteration_end(mut self, hook: impl Fn(u32, &LoopState) + Send + Sync + 'static) -> Self {
        self.on_iteration_end = Some(Box::new(hook));
        self
    }

    pub fn on_action(mut self, hook: impl Fn(&str, &ActionResult) + Send + Sync + 'static) -> Self {
        self.on_action = Some(Box::new(hook));
        self
    }

    pub fn on_stop(mut self, hook: impl Fn(&LoopState) + Send + Sync + 'static) -> Self {
        self.on_stop = Some(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for EngineHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHooks")
            .field("on_iteration_start", &self.on_iteration_start.is_some())
            .field("on_iteration_end", &self.on_iteration_end.is_some())
            .field("on_action", &self.on_action.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .finish()
    }
}
