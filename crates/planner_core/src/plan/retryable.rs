//! Retryable fallback plans
//!
//! Composed of:
//! 1. preferred steps, which can finish or fail, in order of preference
//! 2. a fallback step, which cannot fail
//!
//! Per tick, in order:
//!
//! 1. **Termination**: a complete plan yields nothing. If the validity
//!    predicate fails and the step at the cursor allows interruption, the
//!    plan is canceled and yields nothing. An uninterruptible step defers the
//!    abort until it allows it.
//! 2. **Fallback window**: while `now <= expiration` the fallback's command
//!    is returned. Past the expiration the window is cleared and this same
//!    tick falls through to the preferred steps.
//! 3. **Preferred sweep**: the first step yielding a command wins and keeps
//!    the cursor. A declining step with terminal guidance ends the plan; the
//!    fallback never catches a deliberate stop. When every step declines
//!    with [`Guidance::Continue`](crate::Guidance::Continue), the cursor
//!    resets to 0, the window reopens for `fallback_duration` and the
//!    fallback answers.
//!
//! Preferred steps are only retried when the window closes, so borderline
//! conditions do not make the agent thrash between the two.

use std::time::Duration;

use super::{Plan, PlanOutcome, Sweep};
use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::steps::UnfailingStep;
use crate::time::GameTime;

pub const DEFAULT_FALLBACK_DURATION: Duration = Duration::from_millis(500);

/// Per-tick check deciding whether a plan is still worth pursuing.
pub type ValidityPredicate = Box<dyn Fn(&TickContext) -> bool + Send>;

/// Fallback step, validity predicate and fallback timer of a retryable plan.
pub struct RetryableFallback {
    fallback: Box<dyn UnfailingStep>,
    still_valid: ValidityPredicate,
    duration: Duration,
    expiration: Option<GameTime>,
}

impl RetryableFallback {
    pub(super) fn new(fallback: Box<dyn UnfailingStep>, still_valid: ValidityPredicate) -> Self {
        Self { fallback, still_valid, duration: DEFAULT_FALLBACK_DURATION, expiration: None }
    }

    pub(super) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn expiration(&self) -> Option<GameTime> {
        self.expiration
    }

    pub(super) fn fallback_situation(&self) -> String {
        self.fallback.situation()
    }

    fn is_valid(&self, ctx: &TickContext) -> bool {
        (self.still_valid)(ctx)
    }

    /// Returns the fallback command while the window is open. Clears an
    /// expired window and returns `None`.
    fn within_window(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        let expiration = self.expiration?;
        if ctx.time > expiration {
            log::debug!("Fallback window closed at {}, retrying preferred steps", ctx.time);
            self.expiration = None;
            return None;
        }
        Some(self.fallback.evaluate(ctx))
    }

    fn engage(&mut self, ctx: &TickContext) -> ControlCommand {
        let expiration = ctx.time.plus(self.duration);
        log::debug!(
            "No preferred step applies at {}, falling back to '{}' until {}",
            ctx.time,
            self.fallback.situation(),
            expiration
        );
        self.expiration = Some(expiration);
        self.fallback.evaluate(ctx)
    }
}

impl Plan {
    pub(super) fn evaluate_retryable(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        if self.is_complete() {
            return None;
        }

        let valid = self.retry.as_ref().map_or(true, |retry| retry.is_valid(ctx));
        if !valid && self.can_interrupt() {
            self.terminate(PlanOutcome::Invalidated, ctx.time);
            return None;
        }

        if let Some(command) = self.retry.as_mut().and_then(|retry| retry.within_window(ctx)) {
            return Some(command);
        }

        match self.sweep(ctx) {
            Sweep::Command(command) => Some(command),
            Sweep::Terminated => None,
            Sweep::Exhausted => {
                self.cursor = 0;
                let retry = self.retry.as_mut()?;
                Some(retry.engage(ctx))
            }
        }
    }
}
