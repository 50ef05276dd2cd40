//! Steps that own a sub-plan
//!
//! A [`NestedPlanStep`] wraps a [`PlanLeaf`], the step's own computation, and
//! at most one child [`Plan`]. While the child is running, the leaf is not
//! consulted. When there is no child, or the child has just finished, the leaf
//! runs and may either answer directly or start a new child through
//! [`ChildPlan::start`], which evaluates it on the spot so the first tick of a
//! fresh sub-plan is not wasted.
//!
//! Nesting depth is unbounded; in practice it stays shallow.

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::plan::{Plan, PlanOutcome};
use crate::steps::{Guidance, Step};

/// Direct computation of a [`NestedPlanStep`].
pub trait PlanLeaf: Send {
    /// Runs when no child plan is active. Either returns a command or starts
    /// a child through `child` (and usually returns what it produced).
    fn compute(&mut self, ctx: &TickContext, child: &mut ChildPlan) -> Option<ControlCommand>;

    fn local_situation(&self) -> String;

    /// Interruption permission while no child is active.
    fn can_interrupt(&self) -> bool {
        true
    }
}

/// The child slot handed to a [`PlanLeaf`].
#[derive(Debug, Default)]
pub struct ChildPlan {
    plan: Option<Box<Plan>>,
    guidance: Guidance,
    last_outcome: Option<PlanOutcome>,
}

impl ChildPlan {
    /// Attach `plan`, superseding any current child, and evaluate it now.
    pub fn start(&mut self, plan: Plan, ctx: &TickContext) -> Option<ControlCommand> {
        if let Some(previous) = self.plan.take() {
            log::debug!("Superseding child plan: {}", previous.situation());
        }
        log::debug!("Starting child {} plan at {}", plan.posture(), ctx.time);
        let plan = self.plan.insert(Box::new(plan));
        let command = plan.evaluate(ctx);
        if command.is_none() {
            self.finish();
        }
        command
    }

    /// Guidance the enclosing plan sees if this evaluation yields nothing.
    pub fn signal(&mut self, guidance: Guidance) {
        self.guidance = guidance;
    }

    pub fn is_active(&self) -> bool {
        self.plan.as_ref().is_some_and(|plan| !plan.is_complete())
    }

    /// How the most recently finished child ended.
    pub fn last_outcome(&self) -> Option<PlanOutcome> {
        self.last_outcome
    }

    fn finish(&mut self) {
        if let Some(plan) = self.plan.take() {
            self.last_outcome = plan.outcome();
        }
    }

    fn active_plan(&self) -> Option<&Plan> {
        self.plan.as_deref().filter(|plan| !plan.is_complete())
    }
}

/// A [`Step`] that delegates to a child plan when it has one.
pub struct NestedPlanStep<L> {
    leaf: L,
    child: ChildPlan,
}

impl<L: PlanLeaf> NestedPlanStep<L> {
    pub fn new(leaf: L) -> Self {
        Self { leaf, child: ChildPlan::default() }
    }

    pub fn leaf(&self) -> &L {
        &self.leaf
    }

    pub fn child(&self) -> &ChildPlan {
        &self.child
    }
}

impl<L: PlanLeaf> Step for NestedPlanStep<L> {
    fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        self.child.guidance = Guidance::Continue;

        if let Some(plan) = self.child.plan.as_mut() {
            if !plan.is_complete() {
                if let Some(command) = plan.evaluate(ctx) {
                    return Some(command);
                }
            }
            // Child just completed: the leaf takes over this same tick.
            self.child.finish();
        }

        self.leaf.compute(ctx, &mut self.child)
    }

    fn guidance(&self) -> Guidance {
        self.child.guidance
    }

    fn can_interrupt(&self) -> bool {
        match self.child.active_plan() {
            Some(plan) => plan.can_interrupt(),
            None => self.leaf.can_interrupt(),
        }
    }

    fn situation(&self) -> String {
        match self.child.active_plan() {
            Some(plan) => plan.situation(),
            None => self.leaf.local_situation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Posture;
    use crate::test_support::{cmd, tick, CallCounter, ScriptedStep};

    /// Leaf that starts a child plan of `child_ticks` commands on every call
    /// and records how often it ran.
    struct Spawner {
        child_ticks: usize,
        runs: usize,
        child_calls: Vec<CallCounter>,
    }

    impl Spawner {
        fn new(child_ticks: usize) -> Self {
            Self { child_ticks, runs: 0, child_calls: Vec::new() }
        }
    }

    impl PlanLeaf for Spawner {
        fn compute(&mut self, ctx: &TickContext, child: &mut ChildPlan) -> Option<ControlCommand> {
            self.runs += 1;
            let step = ScriptedStep::commands_then("child step", 0.4, self.child_ticks, Guidance::Succeeded);
            self.child_calls.push(step.counter());
            child.start(Plan::new(Posture::Defensive).with_step(step), ctx)
        }

        fn local_situation(&self) -> String {
            "spawning".into()
        }
    }

    #[test]
    fn test_child_runs_without_reinvoking_leaf() {
        let mut step = NestedPlanStep::new(Spawner::new(4));

        // Tick N: leaf attaches the child and its first tick is used at once.
        assert_eq!(step.evaluate(&tick(0)), Some(cmd(0.4)));
        assert_eq!(step.leaf().runs, 1);
        assert_eq!(step.leaf().child_calls[0].get(), 1);

        // Ticks N+1..M: child still running, leaf untouched.
        for ms in [16, 32, 48] {
            assert_eq!(step.evaluate(&tick(ms)), Some(cmd(0.4)));
            assert_eq!(step.leaf().runs, 1);
        }
        assert!(step.child().is_active());

        // Tick M+1: the child finishes and the leaf runs again.
        assert_eq!(step.evaluate(&tick(64)), Some(cmd(0.4)));
        assert_eq!(step.leaf().runs, 2);
        assert_eq!(step.child().last_outcome(), Some(PlanOutcome::Succeeded));
    }

    struct Direct {
        runs: usize,
    }

    impl PlanLeaf for Direct {
        fn compute(&mut self, _ctx: &TickContext, child: &mut ChildPlan) -> Option<ControlCommand> {
            self.runs += 1;
            if self.runs > 2 {
                child.signal(Guidance::Succeeded);
                return None;
            }
            Some(cmd(0.1))
        }

        fn local_situation(&self) -> String {
            "direct".into()
        }
    }

    #[test]
    fn test_leaf_without_child_computes_every_tick() {
        let mut step = NestedPlanStep::new(Direct { runs: 0 });
        assert_eq!(step.evaluate(&tick(0)), Some(cmd(0.1)));
        assert_eq!(step.evaluate(&tick(16)), Some(cmd(0.1)));
        assert!(!step.child().is_active());
        assert_eq!(step.situation(), "direct");

        assert_eq!(step.evaluate(&tick(32)), None);
        assert_eq!(step.guidance(), Guidance::Succeeded);
    }

    #[test]
    fn test_leaf_guidance_ends_enclosing_plan() {
        let mut plan = Plan::new(Posture::Offensive)
            .with_step(NestedPlanStep::new(Direct { runs: 0 }))
            .with_step(ScriptedStep::always("never reached", 1.0));

        plan.evaluate(&tick(0));
        plan.evaluate(&tick(16));
        assert_eq!(plan.evaluate(&tick(32)), None);
        assert_eq!(plan.outcome(), Some(PlanOutcome::Succeeded));
    }

    struct Silent;

    impl PlanLeaf for Silent {
        fn compute(&mut self, _ctx: &TickContext, _child: &mut ChildPlan) -> Option<ControlCommand> {
            None
        }

        fn local_situation(&self) -> String {
            "silent".into()
        }
    }

    #[test]
    fn test_default_guidance_lets_enclosing_plan_advance() {
        let mut plan = Plan::new(Posture::Offensive)
            .with_step(NestedPlanStep::new(Silent))
            .with_step(ScriptedStep::always("next", 0.9));

        assert_eq!(plan.evaluate(&tick(0)), Some(cmd(0.9)));
        assert_eq!(plan.cursor(), 1);
    }

    struct Stubborn;

    impl PlanLeaf for Stubborn {
        fn compute(&mut self, ctx: &TickContext, child: &mut ChildPlan) -> Option<ControlCommand> {
            let step = ScriptedStep::always("committed", 0.2).uninterruptible();
            child.start(Plan::new(Posture::Save).with_step(step), ctx)
        }

        fn local_situation(&self) -> String {
            "stubborn".into()
        }
    }

    #[test]
    fn test_interruption_and_situation_follow_active_child() {
        let mut step = NestedPlanStep::new(Stubborn);
        assert!(step.can_interrupt());
        assert_eq!(step.situation(), "stubborn");

        step.evaluate(&tick(0));
        assert!(!step.can_interrupt());
        assert_eq!(step.situation(), "SAVE (1/1) - committed");
    }

    #[test]
    fn test_nested_two_levels_deep() {
        struct Outer;
        impl PlanLeaf for Outer {
            fn compute(&mut self, ctx: &TickContext, child: &mut ChildPlan) -> Option<ControlCommand> {
                let inner = NestedPlanStep::new(Spawner::new(2));
                child.start(Plan::new(Posture::Offensive).with_step(inner), ctx)
            }
            fn local_situation(&self) -> String {
                "outer".into()
            }
        }

        let mut step = NestedPlanStep::new(Outer);
        assert_eq!(step.evaluate(&tick(0)), Some(cmd(0.4)));
        assert_eq!(step.situation(), "OFFENSIVE (1/1) - DEFENSIVE (1/1) - child step");
    }

    #[test]
    fn test_start_with_immediately_finished_plan() {
        let mut child = ChildPlan::default();
        let plan = Plan::new(Posture::Neutral).with_step(ScriptedStep::never("nope", Guidance::Cancel));
        assert_eq!(child.start(plan, &tick(0)), None);
        assert!(!child.is_active());
        assert_eq!(child.last_outcome(), Some(PlanOutcome::Canceled));
    }
}
