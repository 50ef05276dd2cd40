//! Reference decision module
//!
//! Chooses among four plans:
//! - **Landing** (bare): airborne without wheel contact
//! - **Kickoff** (bare): ball resting at the center spot; line up where the
//!   [`KickoffAdvisor`] says, then drive through
//! - **Defensive** (retryable): the enemy reaches the ball first, so
//!   challenge; valid while an enemy contact is predicted
//! - **Offensive** (retryable): otherwise intercept toward the enemy goal;
//!   valid until the enemy is expected to beat us to the ball
//!
//! Both retryable plans fall back to [`GetOnDefenseStep`], which is also the
//! default command when no plan answers.
//!
//! The advisor sees every tick so it can grade the last kickoff it advised.

use crate::config::{PlannerConfig, TacticsConfig};
use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::plan::{Plan, Posture};
use crate::runner::Tactician;
use crate::steps::nested::NestedPlanStep;
use crate::tactics::goal::Goal;
use crate::tactics::kickoff::{KickoffAdvisor, LearningKickoffAdvisor};
use crate::tactics::steps::{
    ChallengeStep, DriveToPointStep, GetOnDefenseStep, InterceptStep, LandMindlesslyStep,
};

use nalgebra::{Vector2, Vector3};
use std::time::Duration;

const INTERCEPT_OFFSET: f32 = 1.5;
/// Ball resting within this distance of the center spot means kickoff.
const KICKOFF_RADIUS: f32 = 12.0;
/// Seed of the advisor [`DefaultTactician::new`] builds.
const ADVISOR_SEED: u64 = 0;

pub struct DefaultTactician {
    tactics: TacticsConfig,
    fallback_duration: Duration,
    defense: GetOnDefenseStep,
    advisor: Box<dyn KickoffAdvisor>,
}

impl DefaultTactician {
    pub fn new(config: &PlannerConfig) -> Self {
        Self::with_advisor(config, LearningKickoffAdvisor::seeded(ADVISOR_SEED))
    }

    pub fn with_advisor(config: &PlannerConfig, advisor: impl KickoffAdvisor + 'static) -> Self {
        Self {
            tactics: config.tactics.clone(),
            fallback_duration: config.planning.fallback_duration(),
            defense: GetOnDefenseStep::default(),
            advisor: Box::new(advisor),
        }
    }

    fn is_airborne(&self, ctx: &TickContext) -> bool {
        !ctx.car.has_wheel_contact && ctx.car.position.z > self.tactics.airborne_height
    }

    fn is_kickoff(&self, ctx: &TickContext) -> bool {
        ctx.ball.velocity.norm() < 0.01 && ctx.ball.position.xy().norm() < KICKOFF_RADIUS
    }

    fn enemy_gets_there_first(&self, ctx: &TickContext) -> bool {
        ctx.tactical.as_ref().is_some_and(|t| {
            t.expected_enemy_contact.is_some()
                && t.ball_advantage_secs < self.tactics.challenge_advantage_threshold_secs
        })
    }

    fn landing_plan(&self) -> Plan {
        Plan::new(Posture::Landing).with_step(LandMindlesslyStep)
    }

    fn kickoff_plan(&mut self, ctx: &TickContext) -> Plan {
        let advice = self.advisor.advise(ctx);
        let toward_own_goal = (Goal::own(ctx.team).center - ctx.ball.position)
            .xy()
            .try_normalize(1.0e-6)
            .unwrap_or_else(Vector2::zeros);
        // Right-hand side when facing away from our goal.
        let right = Vector2::new(-toward_own_goal.y, toward_own_goal.x);
        let approach = ctx.ball.position.xy()
            + toward_own_goal * advice.approach_distance
            + right * advice.lateral_offset;

        Plan::new(Posture::Kickoff)
            .with_step(DriveToPointStep::new(approach, self.tactics.arrival_radius).as_waypoint())
            .with_step(InterceptStep::new(Vector3::zeros()))
    }

    fn challenge_plan(&self) -> Plan {
        Plan::retryable(Posture::Defensive, self.defense, |ctx: &TickContext| {
            ctx.tactical.as_ref().is_some_and(|t| t.expected_enemy_contact.is_some())
        })
        .with_step(NestedPlanStep::new(ChallengeStep::new(self.tactics.min_defensive_node_distance)))
        .with_fallback_duration(self.fallback_duration)
    }

    fn attack_plan(&self, ctx: &TickContext) -> Plan {
        // Sit behind the ball relative to the enemy goal so the touch sends it there.
        let enemy_goal = Goal::enemy(ctx.team);
        let offset = (ctx.ball.position - enemy_goal.center)
            .try_normalize(1.0e-6)
            .unwrap_or_else(Vector3::zeros)
            * INTERCEPT_OFFSET;
        let threshold = self.tactics.challenge_advantage_threshold_secs;

        Plan::retryable(Posture::Offensive, self.defense, move |ctx: &TickContext| {
            ctx.tactical
                .as_ref()
                .map_or(true, |t| t.expected_enemy_contact.is_none() || t.ball_advantage_secs >= threshold)
        })
        .with_step(InterceptStep::new(offset))
        .with_fallback_duration(self.fallback_duration)
    }
}

impl Tactician for DefaultTactician {
    fn propose(&mut self, ctx: &TickContext, current: Option<&Plan>) -> Option<Plan> {
        self.advisor.grade(ctx);

        if self.is_airborne(ctx) {
            let already_landing = current.is_some_and(|plan| plan.posture() == Posture::Landing);
            return (!already_landing).then(|| self.landing_plan());
        }

        if self.is_kickoff(ctx) {
            let already_kicking_off = current.is_some_and(|plan| plan.posture() == Posture::Kickoff);
            return (!already_kicking_off).then(|| self.kickoff_plan(ctx));
        }

        if current.is_some() {
            return None;
        }

        if self.enemy_gets_there_first(ctx) {
            Some(self.challenge_plan())
        } else {
            Some(self.attack_plan(ctx))
        }
    }

    fn default_command(&self, ctx: &TickContext) -> ControlCommand {
        self.defense.command(ctx)
    }
}
