//! Challenge: contest a ball the enemy will reach first
//!
//! Holds a defensive node on the line between the enemy's expected contact
//! and our goal. When the ball is already behind us, or we are close enough
//! to the node, it hands over to an intercept sub-plan.

use nalgebra::{Vector2, Vector3};

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::plan::{Plan, Posture};
use crate::steps::nested::{ChildPlan, PlanLeaf};
use crate::steps::Guidance;
use crate::tactics::goal::Goal;
use crate::tactics::steps::InterceptStep;
use crate::tactics::{arena, steering};
use crate::time::GameTime;

/// Past this advantage (s) a shot is on; the challenge is pointless.
const SHOT_ADVANTAGE_SECS: f32 = 2.0;
const INTERCEPT_OFFSET: f32 = 1.5;

#[derive(Debug)]
pub struct ChallengeStep {
    min_defensive_node_distance: f32,
    /// Latest touch time seen on the first computation (outer `None` until then).
    touch_baseline: Option<Option<GameTime>>,
    latest_defensive_node: Option<Vector2<f32>>,
}

impl ChallengeStep {
    pub fn new(min_defensive_node_distance: f32) -> Self {
        Self { min_defensive_node_distance, touch_baseline: None, latest_defensive_node: None }
    }

    pub fn latest_defensive_node(&self) -> Option<Vector2<f32>> {
        self.latest_defensive_node
    }

    fn ball_touched_since_start(&mut self, ctx: &TickContext) -> bool {
        let touch = ctx.latest_touch.map(|t| t.time);
        match self.touch_baseline {
            None => {
                self.touch_baseline = Some(touch);
                false
            }
            Some(baseline) => baseline != touch,
        }
    }
}

impl PlanLeaf for ChallengeStep {
    fn compute(&mut self, ctx: &TickContext, child: &mut ChildPlan) -> Option<ControlCommand> {
        if self.ball_touched_since_start(ctx) {
            log::debug!("Ball has been touched, quitting challenge (player {})", ctx.player_index);
            child.signal(Guidance::Succeeded);
            return None;
        }

        let tactical = ctx.tactical.as_ref()?;
        let advantage = tactical.ball_advantage_secs;
        if advantage > SHOT_ADVANTAGE_SECS {
            log::debug!("Shot is on with {:.2}s advantage, abandoning challenge", advantage);
            child.signal(Guidance::Cancel);
            return None;
        }
        let enemy_contact = tactical.expected_enemy_contact?;

        let car = &ctx.car;
        let own_goal = Goal::own(ctx.team);
        let enemy_shot_line = own_goal.nearest_entrance(&enemy_contact.space, 2.0) - enemy_contact.space;

        let node_distance = (advantage * -20.0).max(self.min_defensive_node_distance);
        let shot_direction = enemy_shot_line.xy().try_normalize(1.0e-6).unwrap_or_else(Vector2::zeros);
        let defensive_node = arena::clamp_position(enemy_contact.space.xy() + shot_direction * node_distance, 3.0);
        self.latest_defensive_node = Some(defensive_node);

        let distance_to_node = (car.flat_position() - defensive_node).norm();

        if tactical.distance_ball_is_behind_us > 0.0 && advantage > -0.2 {
            let away_from_goal = (own_goal.center - ctx.ball.position)
                .try_normalize(1.0e-6)
                .unwrap_or_else(Vector3::zeros)
                * INTERCEPT_OFFSET;
            let plan = Plan::new(Posture::Defensive).with_step(InterceptStep::new(away_from_goal));
            if let Some(command) = child.start(plan, ctx) {
                return Some(command);
            }
        }

        // Too low an advantage here and kickoffs fall apart.
        if distance_to_node < self.min_defensive_node_distance + 15.0 && advantage > -0.3 {
            let offset = enemy_shot_line.try_normalize(1.0e-6).unwrap_or_else(Vector3::zeros) * INTERCEPT_OFFSET;
            let plan = Plan::new(Posture::Defensive).with_step(InterceptStep::new(offset));
            if let Some(command) = child.start(plan, ctx) {
                return Some(command);
            }
        }

        Some(steering::steer_toward_ground_position(car, defensive_node))
    }

    fn local_situation(&self) -> String {
        "Working on challenge".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BallTouch, CarState, SpaceTime, TacticalSituation, Team};
    use crate::steps::nested::NestedPlanStep;
    use crate::steps::Step;

    const NODE_DISTANCE: f32 = 18.0;

    fn contested(ms: u64, car_y: f32) -> TickContext {
        let enemy_contact = SpaceTime::new(Vector3::new(0.0, -40.0, 1.86), GameTime::from_millis(ms + 800));
        let our_contact = SpaceTime::new(Vector3::new(0.0, -40.0, 1.86), GameTime::from_millis(ms + 900));
        let car = CarState { position: Vector3::new(0.0, car_y, 0.0), ..CarState::default() };
        TickContext::at(GameTime::from_millis(ms)).with_team(Team::Blue).with_car(car).with_tactical(
            TacticalSituation {
                ball_advantage_secs: 0.0,
                expected_contact: Some(our_contact),
                expected_enemy_contact: Some(enemy_contact),
                distance_ball_is_behind_us: 0.0,
            },
        )
    }

    #[test]
    fn test_declines_without_telemetry() {
        let mut step = NestedPlanStep::new(ChallengeStep::new(NODE_DISTANCE));
        assert!(step.evaluate(&TickContext::at(GameTime::ZERO)).is_none());
    }

    #[test]
    fn test_far_from_node_steers_there() {
        let mut step = NestedPlanStep::new(ChallengeStep::new(NODE_DISTANCE));
        assert!(step.evaluate(&contested(0, 30.0)).is_some());
        assert!(!step.child().is_active());

        let node = step.leaf().latest_defensive_node().unwrap();
        assert!((node - Vector2::new(0.0, -58.0)).norm() < 1.0e-3);
    }

    #[test]
    fn test_near_node_starts_intercept_plan() {
        let mut step = NestedPlanStep::new(ChallengeStep::new(NODE_DISTANCE));
        assert!(step.evaluate(&contested(0, -50.0)).is_some());
        assert!(step.child().is_active());
        assert_eq!(step.situation(), "DEFENSIVE (1/1) - Intercepting");
    }

    #[test]
    fn test_new_touch_ends_challenge() {
        let mut step = NestedPlanStep::new(ChallengeStep::new(NODE_DISTANCE));
        assert!(step.evaluate(&contested(0, 30.0)).is_some());

        let mut touched = contested(16, 30.0);
        touched.latest_touch =
            Some(BallTouch { time: GameTime::from_millis(10), position: Vector3::new(0.0, -40.0, 1.86), player_index: 1 });
        assert!(step.evaluate(&touched).is_none());
        assert_eq!(step.guidance(), Guidance::Succeeded);
    }

    #[test]
    fn test_touch_completes_retryable_challenge_plan() {
        use crate::plan::{Plan, PlanOutcome, Posture};
        use crate::tactics::steps::GetOnDefenseStep;

        let mut plan = Plan::retryable(Posture::Defensive, GetOnDefenseStep::default(), |ctx: &TickContext| {
            ctx.tactical.as_ref().is_some_and(|t| t.expected_enemy_contact.is_some())
        })
        .with_step(NestedPlanStep::new(ChallengeStep::new(NODE_DISTANCE)));

        assert!(plan.evaluate(&contested(0, 30.0)).is_some());

        let touch = BallTouch { time: GameTime::from_millis(10), position: Vector3::new(0.0, -40.0, 1.86), player_index: 1 };
        let mut ms = 16;
        while ms <= 5_000 {
            let mut ctx = contested(ms, 30.0);
            ctx.latest_touch = Some(touch);
            plan.evaluate(&ctx);
            ms += 16;
        }

        assert!(plan.is_complete());
        assert_eq!(plan.outcome(), Some(PlanOutcome::Succeeded));
        assert_eq!(plan.fallback_expiration(), None);
    }

    #[test]
    fn test_big_advantage_declines() {
        let mut step = NestedPlanStep::new(ChallengeStep::new(NODE_DISTANCE));
        let mut ctx = contested(0, 30.0);
        if let Some(tactical) = ctx.tactical.as_mut() {
            tactical.ball_advantage_secs = 3.0;
        }
        assert!(step.evaluate(&ctx).is_none());
        assert_eq!(step.guidance(), Guidance::Cancel);
    }
}
