//! Scripted steps shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::steps::{Guidance, Step, UnfailingStep};
use crate::time::GameTime;

pub fn tick(ms: u64) -> TickContext {
    TickContext::at(GameTime::from_millis(ms))
}

/// Commands are told apart by their throttle value.
pub fn cmd(throttle: f32) -> ControlCommand {
    ControlCommand::new().with_throttle(throttle)
}

/// Shared evaluation counter that survives the step being moved into a plan.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Produces `throttle` for the first `commands` evaluations, then declines
/// with `after` forever.
pub struct ScriptedStep {
    name: &'static str,
    throttle: f32,
    commands: usize,
    after: Guidance,
    interruptible: bool,
    calls: CallCounter,
}

impl ScriptedStep {
    pub fn commands_then(name: &'static str, throttle: f32, commands: usize, after: Guidance) -> Self {
        Self { name, throttle, commands, after, interruptible: true, calls: CallCounter::default() }
    }

    pub fn always(name: &'static str, throttle: f32) -> Self {
        Self::commands_then(name, throttle, usize::MAX, Guidance::Continue)
    }

    pub fn never(name: &'static str, after: Guidance) -> Self {
        Self::commands_then(name, 0.0, 0, after)
    }

    pub fn uninterruptible(mut self) -> Self {
        self.interruptible = false;
        self
    }

    pub fn counter(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl Step for ScriptedStep {
    fn evaluate(&mut self, _ctx: &TickContext) -> Option<ControlCommand> {
        self.calls.bump();
        if self.calls.get() <= self.commands {
            Some(cmd(self.throttle))
        } else {
            None
        }
    }

    fn guidance(&self) -> Guidance {
        self.after
    }

    fn can_interrupt(&self) -> bool {
        self.interruptible
    }

    fn situation(&self) -> String {
        self.name.to_string()
    }
}

pub struct ConstantFallback {
    throttle: f32,
    calls: CallCounter,
}

impl ConstantFallback {
    pub fn new(throttle: f32) -> Self {
        Self { throttle, calls: CallCounter::default() }
    }

    pub fn counter(&self) -> CallCounter {
        self.calls.clone()
    }
}

impl UnfailingStep for ConstantFallback {
    fn evaluate(&mut self, _ctx: &TickContext) -> ControlCommand {
        self.calls.bump();
        cmd(self.throttle)
    }

    fn situation(&self) -> String {
        "Constant fallback".to_string()
    }
}
