//! Step contracts
//!
//! A step is the atomic unit of behavior for one tick. Two flavours exist:
//!
//! - [`Step`]: fallible. May decline (return `None`) and then tells its owning
//!   plan what to do next through [`Step::guidance`].
//! - [`UnfailingStep`]: total. Always produces a command, which is what makes
//!   it usable as a plan's fallback. Totality is enforced by the signature,
//!   not by convention.

pub mod nested;

use crate::context::TickContext;
use crate::output::ControlCommand;

/// Signal a [`Step`] gives after it declined to produce a command.
///
/// Only meaningful immediately after an absent result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Guidance {
    /// Nothing applies right now; the plan should move on to the next step.
    #[default]
    Continue,
    /// The course of action is no longer viable.
    Cancel,
    /// The step finished its contribution; the plan is done.
    Succeeded,
}

impl Guidance {
    pub fn is_terminal(self) -> bool {
        matches!(self, Guidance::Cancel | Guidance::Succeeded)
    }
}

/// Fallible unit of behavior.
pub trait Step: Send {
    /// Produce this tick's command, or decline.
    fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand>;

    /// Queried only right after [`Step::evaluate`] returned `None`.
    fn guidance(&self) -> Guidance {
        Guidance::Continue
    }

    /// Whether an external validity failure may abort the plan while this
    /// step holds the cursor.
    fn can_interrupt(&self) -> bool {
        true
    }

    fn situation(&self) -> String;
}

/// Unit of behavior that always produces a command.
///
/// Never asked for guidance or interruption permission.
pub trait UnfailingStep: Send {
    fn evaluate(&mut self, ctx: &TickContext) -> ControlCommand;

    fn situation(&self) -> String;
}

impl<S: Step + ?Sized> Step for Box<S> {
    fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        (**self).evaluate(ctx)
    }

    fn guidance(&self) -> Guidance {
        (**self).guidance()
    }

    fn can_interrupt(&self) -> bool {
        (**self).can_interrupt()
    }

    fn situation(&self) -> String {
        (**self).situation()
    }
}

impl<U: UnfailingStep + ?Sized> UnfailingStep for Box<U> {
    fn evaluate(&mut self, ctx: &TickContext) -> ControlCommand {
        (**self).evaluate(ctx)
    }

    fn situation(&self) -> String {
        (**self).situation()
    }
}

/// Lets an [`UnfailingStep`] occupy a slot in a plan's preferred sequence.
///
/// Since it never declines, every step after it is unreachable.
pub struct Unfailing<U>(pub U);

impl<U: UnfailingStep> Step for Unfailing<U> {
    fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        Some(self.0.evaluate(ctx))
    }

    fn situation(&self) -> String {
        self.0.situation()
    }
}
