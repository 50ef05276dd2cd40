//! Caller-side control loop
//!
//! Holds the single top-level [`Plan`] a decision module has committed to and
//! turns each incoming [`TickContext`] into exactly one [`ControlCommand`].
//!
//! Per tick:
//! 1. No plan held (or it is complete): adopt the [`Tactician`]'s proposal.
//!    A held plan is only replaced by a proposal with a more urgent posture,
//!    and only while it allows interruption.
//! 2. Evaluate the held plan. A command goes straight out.
//! 3. Absent: the plan is dropped and the tactician's default safe command
//!    covers this tick. A fresh plan is chosen on the next tick.

mod stats;

pub use stats::RunnerStats;

use serde::Serialize;

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::plan::Plan;
use crate::time::GameTime;

/// Higher-level decision logic that chooses what the agent commits to.
pub trait Tactician: Send {
    /// Suggest a plan for this tick. `current` is the plan still held, if
    /// any; returning `None` keeps it.
    fn propose(&mut self, ctx: &TickContext, current: Option<&Plan>) -> Option<Plan>;

    /// Safe command used whenever no plan produces one.
    fn default_command(&self, ctx: &TickContext) -> ControlCommand;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Plan,
    Default,
}

/// What happened on one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub time: GameTime,
    pub command: ControlCommand,
    pub source: CommandSource,
    pub situation: String,
}

pub struct PlanRunner<T> {
    tactician: T,
    current: Option<Plan>,
    stats: RunnerStats,
}

impl<T: Tactician> PlanRunner<T> {
    pub fn new(tactician: T) -> Self {
        Self { tactician, current: None, stats: RunnerStats::default() }
    }

    pub fn tick(&mut self, ctx: &TickContext) -> TickReport {
        self.stats.ticks += 1;
        self.consider_proposal(ctx);

        if let Some(plan) = self.current.as_mut() {
            if let Some(command) = plan.evaluate(ctx) {
                self.stats.plan_ticks += 1;
                return TickReport {
                    time: ctx.time,
                    command,
                    source: CommandSource::Plan,
                    situation: plan.situation(),
                };
            }
        }

        if let Some(finished) = self.current.take() {
            self.stats.record_finished(finished.outcome());
            log::info!(
                "{} plan finished at {} ({})",
                finished.posture(),
                ctx.time,
                finished.outcome().map(|o| o.to_string()).unwrap_or_else(|| "no outcome".to_string())
            );
        }

        self.stats.default_ticks += 1;
        TickReport {
            time: ctx.time,
            command: self.tactician.default_command(ctx),
            source: CommandSource::Default,
            situation: "Default command".to_string(),
        }
    }

    fn consider_proposal(&mut self, ctx: &TickContext) {
        if self.current.as_ref().is_some_and(|plan| plan.is_complete()) {
            if let Some(finished) = self.current.take() {
                self.stats.record_finished(finished.outcome());
            }
        }

        let Some(proposal) = self.tactician.propose(ctx, self.current.as_ref()) else {
            return;
        };

        match self.current.as_ref() {
            None => {
                log::info!("Adopting {} plan at {}: {}", proposal.posture(), ctx.time, proposal.situation());
                self.adopt(proposal);
            }
            Some(held) if held.posture().less_urgent_than(proposal.posture()) && held.can_interrupt() => {
                log::info!(
                    "Replacing {} plan with more urgent {} plan at {}: was {}",
                    held.posture(),
                    proposal.posture(),
                    ctx.time,
                    held.situation()
                );
                self.stats.record_replaced(held.posture());
                self.adopt(proposal);
            }
            Some(_) => {}
        }
    }

    fn adopt(&mut self, plan: Plan) {
        self.stats.plans_adopted += 1;
        *self.stats.postures.entry(plan.posture()).or_default() += 1;
        self.current = Some(plan);
    }

    pub fn current_plan(&self) -> Option<&Plan> {
        self.current.as_ref()
    }

    /// Forget the held plan, e.g. after a goal reset.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    pub fn tactician(&self) -> &T {
        &self.tactician
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PlanOutcome, Posture};
    use crate::steps::Guidance;
    use crate::test_support::{cmd, tick, ScriptedStep};

    const DEFAULT: f32 = -0.1;

    /// Proposes one queued plan per tick.
    struct Queue(Vec<Plan>);

    impl Tactician for Queue {
        fn propose(&mut self, _ctx: &TickContext, _current: Option<&Plan>) -> Option<Plan> {
            if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0))
            }
        }

        fn default_command(&self, _ctx: &TickContext) -> ControlCommand {
            cmd(DEFAULT)
        }
    }

    #[test]
    fn test_idle_runner_uses_default_command() {
        let mut runner = PlanRunner::new(Queue(Vec::new()));
        let report = runner.tick(&tick(0));
        assert_eq!(report.source, CommandSource::Default);
        assert_eq!(report.command, cmd(DEFAULT));
        assert_eq!(runner.stats().default_ticks, 1);
    }

    #[test]
    fn test_absent_drops_plan_and_waits_a_tick() {
        let plan = Plan::new(Posture::Offensive)
            .with_step(ScriptedStep::commands_then("short", 0.5, 1, Guidance::Succeeded));
        let mut runner = PlanRunner::new(Queue(vec![plan]));

        let first = runner.tick(&tick(0));
        assert_eq!(first.source, CommandSource::Plan);
        assert_eq!(first.command, cmd(0.5));

        let second = runner.tick(&tick(16));
        assert_eq!(second.source, CommandSource::Default);
        assert!(runner.current_plan().is_none());
        assert_eq!(runner.stats().finished(PlanOutcome::Succeeded), 1);
    }

    #[test]
    fn test_more_urgent_proposal_replaces_interruptible_plan() {
        let calm = Plan::new(Posture::Offensive).with_step(ScriptedStep::always("calm", 0.1));
        let urgent = Plan::new(Posture::Save).with_step(ScriptedStep::always("urgent", 0.9));
        let mut runner = PlanRunner::new(Queue(vec![calm, urgent]));

        assert_eq!(runner.tick(&tick(0)).command, cmd(0.1));
        assert_eq!(runner.tick(&tick(16)).command, cmd(0.9));
        assert_eq!(runner.current_plan().map(|p| p.posture()), Some(Posture::Save));
        assert_eq!(runner.stats().plans_replaced, 1);
        assert_eq!(runner.stats().replaced.get(&Posture::Offensive), Some(&1));
        assert_eq!(runner.stats().replaced.get(&Posture::Save), None);
    }

    #[test]
    fn test_uninterruptible_plan_is_kept() {
        let committed =
            Plan::new(Posture::Offensive).with_step(ScriptedStep::always("committed", 0.3).uninterruptible());
        let urgent = Plan::new(Posture::Save).with_step(ScriptedStep::always("urgent", 0.9));
        let mut runner = PlanRunner::new(Queue(vec![committed, urgent]));

        runner.tick(&tick(0));
        assert_eq!(runner.tick(&tick(16)).command, cmd(0.3));
        assert_eq!(runner.current_plan().map(|p| p.posture()), Some(Posture::Offensive));
    }

    #[test]
    fn test_less_urgent_proposal_is_ignored() {
        let held = Plan::new(Posture::Defensive).with_step(ScriptedStep::always("held", 0.3));
        let calm = Plan::new(Posture::Neutral).with_step(ScriptedStep::always("calm", 0.1));
        let mut runner = PlanRunner::new(Queue(vec![held, calm]));

        runner.tick(&tick(0));
        let report = runner.tick(&tick(16));
        assert_eq!(report.command, cmd(0.3));
        assert_eq!(report.situation, "DEFENSIVE (1/1) - held");
        assert_eq!(runner.stats().plans_adopted, 1);
    }
}
