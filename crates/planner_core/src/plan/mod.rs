//! Plans: ordered, cursor-tracked sequences of fallible steps
//!
//! A bare [`Plan`] walks its steps in order. The first step that yields a
//! command keeps the cursor and owns every following tick until it declines.
//! Once the cursor runs off the end the plan is complete and stays complete.
//!
//! [`Plan::retryable`] builds the retryable fallback variant: a guaranteed
//! [`UnfailingStep`] covers ticks where no preferred step applies, and a
//! validity predicate may abort the plan between ticks (see [`retryable`]).
//!
//! The cursor, the canceled flag and the fallback timer are the whole of a
//! plan's persisted state. They change only inside [`Plan::evaluate`].

mod posture;
pub mod retryable;

use std::fmt;
use std::time::Duration;

pub use posture::Posture;
pub use retryable::{RetryableFallback, ValidityPredicate, DEFAULT_FALLBACK_DURATION};

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::steps::{Guidance, Step, UnfailingStep};
use crate::time::GameTime;

/// Why a plan stopped. Informational only; evaluation never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// A step declined with [`Guidance::Succeeded`].
    Succeeded,
    /// A step declined with [`Guidance::Cancel`].
    Canceled,
    /// The validity predicate failed while the current step allowed it.
    Invalidated,
    /// A bare plan ran out of steps.
    Exhausted,
}

impl fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            PlanOutcome::Succeeded => "succeeded",
            PlanOutcome::Canceled => "canceled",
            PlanOutcome::Invalidated => "invalidated",
            PlanOutcome::Exhausted => "exhausted",
        };
        f.write_str(text)
    }
}

/// Result of one pass over the preferred steps.
enum Sweep {
    Command(ControlCommand),
    Terminated,
    Exhausted,
}

pub struct Plan {
    posture: Posture,
    steps: Vec<Box<dyn Step>>,
    cursor: usize,
    canceled: bool,
    outcome: Option<PlanOutcome>,
    retry: Option<RetryableFallback>,
}

impl Plan {
    pub fn new(posture: Posture) -> Self {
        Self { posture, steps: Vec::new(), cursor: 0, canceled: false, outcome: None, retry: None }
    }

    /// Plan with a guaranteed fallback and a per-tick validity check.
    pub fn retryable(
        posture: Posture,
        fallback: impl UnfailingStep + 'static,
        still_valid: impl Fn(&TickContext) -> bool + Send + 'static,
    ) -> Self {
        let mut plan = Self::new(posture);
        plan.retry = Some(RetryableFallback::new(Box::new(fallback), Box::new(still_valid)));
        plan
    }

    pub fn with_step(self, step: impl Step + 'static) -> Self {
        self.with_boxed_step(Box::new(step))
    }

    pub fn with_boxed_step(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    /// No effect on a bare plan.
    pub fn with_fallback_duration(mut self, duration: Duration) -> Self {
        if let Some(retry) = self.retry.as_mut() {
            retry.set_duration(duration);
        }
        self
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Produce this tick's command, or `None` when the plan has nothing to
    /// contribute. Callers treat `None` as "pick something else".
    pub fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        if self.retry.is_some() {
            return self.evaluate_retryable(ctx);
        }

        if self.is_complete() {
            return None;
        }

        match self.sweep(ctx) {
            Sweep::Command(command) => Some(command),
            Sweep::Terminated => None,
            Sweep::Exhausted => {
                self.outcome = Some(PlanOutcome::Exhausted);
                log::debug!("{} plan exhausted its {} steps", self.posture, self.steps.len());
                None
            }
        }
    }

    /// Walk forward from the cursor until a step yields a command or asks
    /// the plan to stop. Declining steps with [`Guidance::Continue`] advance
    /// the cursor within the same tick.
    fn sweep(&mut self, ctx: &TickContext) -> Sweep {
        while let Some(step) = self.steps.get_mut(self.cursor) {
            if let Some(command) = step.evaluate(ctx) {
                return Sweep::Command(command);
            }

            match step.guidance() {
                Guidance::Succeeded => {
                    self.terminate(PlanOutcome::Succeeded, ctx.time);
                    return Sweep::Terminated;
                }
                Guidance::Cancel => {
                    self.terminate(PlanOutcome::Canceled, ctx.time);
                    return Sweep::Terminated;
                }
                Guidance::Continue => {
                    log::trace!("{} plan advancing past step {}", self.posture, self.cursor);
                    self.cursor += 1;
                }
            }
        }
        Sweep::Exhausted
    }

    /// Once canceled, a plan never un-cancels.
    fn terminate(&mut self, outcome: PlanOutcome, time: GameTime) {
        self.canceled = true;
        self.outcome = Some(outcome);
        let step = self.current_step().map(|s| s.situation()).unwrap_or_default();
        log::info!("{} plan {} at {} ({})", self.posture, outcome, time, step);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Canceled, or a bare plan whose cursor has passed the last step.
    pub fn is_complete(&self) -> bool {
        self.canceled || (self.retry.is_none() && self.cursor >= self.steps.len())
    }

    /// Whether the step at the cursor lets the plan be abandoned right now.
    /// An empty cursor position never blocks interruption.
    pub fn can_interrupt(&self) -> bool {
        self.current_step().map_or(true, |step| step.can_interrupt())
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_retryable(&self) -> bool {
        self.retry.is_some()
    }

    /// When the fallback window closes, if it is engaged.
    pub fn fallback_expiration(&self) -> Option<GameTime> {
        self.retry.as_ref().and_then(|retry| retry.expiration())
    }

    pub fn outcome(&self) -> Option<PlanOutcome> {
        self.outcome
    }

    fn current_step(&self) -> Option<&dyn Step> {
        self.steps.get(self.cursor).map(|step| step.as_ref())
    }

    /// Human-readable description for debug output.
    pub fn situation(&self) -> String {
        if self.is_complete() {
            return "Dead plan".to_string();
        }

        let step = self.current_step().map(|s| s.situation()).unwrap_or_default();
        let position = format!("({}/{})", self.cursor + 1, self.steps.len());
        match &self.retry {
            Some(retry) if retry.expiration().is_some() => {
                format!("{} RetryableFallback {} - fallback: {}", self.posture, position, retry.fallback_situation())
            }
            Some(_) => format!("{} RetryableFallback {} - {}", self.posture, position, step),
            None => format!("{} {} - {}", self.posture, position, step),
        }
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("posture", &self.posture)
            .field("steps", &self.steps.len())
            .field("cursor", &self.cursor)
            .field("canceled", &self.canceled)
            .field("outcome", &self.outcome)
            .field("fallback_expiration", &self.fallback_expiration())
            .finish()
    }
}
