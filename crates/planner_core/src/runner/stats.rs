use std::collections::BTreeMap;

use serde::Serialize;

use crate::plan::{PlanOutcome, Posture};

/// Running totals kept by [`super::PlanRunner`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunnerStats {
    pub ticks: u64,
    /// Ticks answered by the held plan.
    pub plan_ticks: u64,
    /// Ticks answered by the tactician's default command.
    pub default_ticks: u64,
    pub plans_adopted: u64,
    pub plans_replaced: u64,
    pub postures: BTreeMap<Posture, u64>,
    /// Postures of plans abandoned for a more urgent proposal.
    pub replaced: BTreeMap<Posture, u64>,
    pub succeeded: u64,
    pub canceled: u64,
    pub invalidated: u64,
    pub exhausted: u64,
}

impl RunnerStats {
    pub(super) fn record_replaced(&mut self, abandoned: Posture) {
        self.plans_replaced += 1;
        *self.replaced.entry(abandoned).or_default() += 1;
    }

    pub(super) fn record_finished(&mut self, outcome: Option<PlanOutcome>) {
        match outcome {
            Some(PlanOutcome::Succeeded) => self.succeeded += 1,
            Some(PlanOutcome::Canceled) => self.canceled += 1,
            Some(PlanOutcome::Invalidated) => self.invalidated += 1,
            Some(PlanOutcome::Exhausted) => self.exhausted += 1,
            None => {}
        }
    }

    pub fn finished(&self, outcome: PlanOutcome) -> u64 {
        match outcome {
            PlanOutcome::Succeeded => self.succeeded,
            PlanOutcome::Canceled => self.canceled,
            PlanOutcome::Invalidated => self.invalidated,
            PlanOutcome::Exhausted => self.exhausted,
        }
    }

    /// Share of ticks a plan (rather than the default command) answered.
    pub fn plan_coverage(&self) -> f32 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.plan_ticks as f32 / self.ticks as f32
    }
}
