//! Kickoff advice
//!
//! The tactician asks a [`KickoffAdvisor`] how to line up for each kickoff and
//! lets it watch every tick afterwards. The advisor is opaque to the planner:
//! it only hands out [`KickoffAdvice`] and updates itself in [`KickoffAdvisor::grade`].
//!
//! [`LearningKickoffAdvisor`] explores random approaches per [`KickoffKind`]
//! and remembers the ones that worked:
//! - we score before the enemy does: keep it
//! - the enemy scores first: forget it
//! - neither within [`GRADE_DELAY`]: keep it only if the ball sits in the
//!   enemy half by then

use std::collections::HashMap;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::context::TickContext;
use crate::tactics::goal::Goal;
use crate::time::GameTime;

/// How long after kickoff an undecided attempt is judged by ball position.
pub const GRADE_DELAY: Duration = Duration::from_secs(6);

/// Half-width of the lane counted as a straight-on kickoff.
const CENTER_LANE: f32 = 4.0;

/// Kickoff spawn, relative to the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KickoffKind {
    Center,
    Left,
    Right,
}

impl KickoffKind {
    pub fn classify(ctx: &TickContext) -> Self {
        let dx = ctx.car.position.x - ctx.ball.position.x;
        if dx.abs() < CENTER_LANE {
            KickoffKind::Center
        } else if dx < 0.0 {
            KickoffKind::Left
        } else {
            KickoffKind::Right
        }
    }
}

/// Where to line up before driving through the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickoffAdvice {
    pub kind: KickoffKind,
    /// Distance behind the ball (toward our goal) of the approach point.
    pub approach_distance: f32,
    /// Sideways shift of the approach point, positive to the right when
    /// facing the enemy goal.
    pub lateral_offset: f32,
}

pub trait KickoffAdvisor: Send {
    /// Called once per kickoff plan.
    fn advise(&mut self, ctx: &TickContext) -> KickoffAdvice;

    /// Called every tick; judges the advice most recently given.
    fn grade(&mut self, ctx: &TickContext);
}

#[derive(Debug, Clone, Copy)]
struct Attempt {
    advice: KickoffAdvice,
    started_at: GameTime,
    our_score: u32,
    enemy_score: u32,
}

pub struct LearningKickoffAdvisor {
    rng: ChaCha8Rng,
    proven: HashMap<KickoffKind, KickoffAdvice>,
    under_scrutiny: Option<Attempt>,
}

impl LearningKickoffAdvisor {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), proven: HashMap::new(), under_scrutiny: None }
    }

    fn explore(&mut self, kind: KickoffKind) -> KickoffAdvice {
        KickoffAdvice {
            kind,
            approach_distance: self.rng.gen_range(6.0..10.0),
            lateral_offset: self.rng.gen_range(-2.0..2.0),
        }
    }

    fn keep(&mut self, advice: KickoffAdvice) {
        self.proven.insert(advice.kind, advice);
    }

    fn forget(&mut self, advice: KickoffAdvice) {
        self.proven.remove(&advice.kind);
    }
}

impl KickoffAdvisor for LearningKickoffAdvisor {
    fn advise(&mut self, ctx: &TickContext) -> KickoffAdvice {
        let kind = KickoffKind::classify(ctx);
        let advice = match self.proven.get(&kind).copied() {
            Some(advice) => advice,
            None => {
                let advice = self.explore(kind);
                log::info!("Trying new {:?} kickoff: {:?}", kind, advice);
                advice
            }
        };

        self.under_scrutiny = Some(Attempt {
            advice,
            started_at: ctx.time,
            our_score: ctx.our_score(),
            enemy_score: ctx.enemy_score(),
        });
        advice
    }

    fn grade(&mut self, ctx: &TickContext) {
        let Some(attempt) = self.under_scrutiny else {
            return;
        };

        if ctx.our_score() > attempt.our_score {
            log::info!("Scored off the {:?} kickoff, keeping it", attempt.advice.kind);
            self.keep(attempt.advice);
        } else if ctx.enemy_score() > attempt.enemy_score {
            log::info!("Conceded off the {:?} kickoff, dropping it", attempt.advice.kind);
            self.forget(attempt.advice);
        } else if ctx.time.since(attempt.started_at) > GRADE_DELAY {
            let enemy_half = ctx.ball.position.y * Goal::enemy(ctx.team).center.y > 0.0;
            if enemy_half {
                log::debug!("{:?} kickoff seems decent, keeping it", attempt.advice.kind);
                self.keep(attempt.advice);
            } else {
                log::debug!("{:?} kickoff was shabby, dropping it", attempt.advice.kind);
                self.forget(attempt.advice);
            }
        } else {
            return;
        }

        self.under_scrutiny = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BallState, Scoreboard, Team};
    use nalgebra::Vector3;

    fn kickoff_at(ms: u64, blue: u32, orange: u32) -> TickContext {
        TickContext::at(GameTime::from_millis(ms))
            .with_team(Team::Blue)
            .with_scores(Scoreboard { blue, orange })
    }

    fn ball_at_y(ctx: TickContext, y: f32) -> TickContext {
        ctx.with_ball(BallState { position: Vector3::new(0.0, y, 1.86), velocity: Vector3::zeros() })
    }

    #[test]
    fn test_classify_by_spawn_offset() {
        use crate::context::CarState;
        let car_at = |x: f32| {
            TickContext::at(GameTime::ZERO)
                .with_car(CarState { position: Vector3::new(x, -50.0, 0.0), ..CarState::default() })
        };
        assert_eq!(KickoffKind::classify(&car_at(0.0)), KickoffKind::Center);
        assert_eq!(KickoffKind::classify(&car_at(-20.0)), KickoffKind::Left);
        assert_eq!(KickoffKind::classify(&car_at(20.0)), KickoffKind::Right);
    }

    #[test]
    fn test_our_goal_keeps_advice() {
        let mut advisor = LearningKickoffAdvisor::seeded(1);
        let first = advisor.advise(&kickoff_at(0, 0, 0));
        assert!((6.0..10.0).contains(&first.approach_distance));

        advisor.grade(&kickoff_at(2_000, 1, 0));
        assert_eq!(advisor.proven.get(&KickoffKind::Center), Some(&first));
        assert_eq!(advisor.advise(&kickoff_at(3_000, 1, 0)), first);
    }

    #[test]
    fn test_enemy_goal_drops_proven_advice() {
        let mut advisor = LearningKickoffAdvisor::seeded(2);
        let first = advisor.advise(&kickoff_at(0, 0, 0));
        advisor.grade(&kickoff_at(1_000, 1, 0));

        let reused = advisor.advise(&kickoff_at(2_000, 1, 0));
        assert_eq!(reused, first);
        advisor.grade(&kickoff_at(3_000, 1, 1));
        assert!(advisor.proven.is_empty());

        let fresh = advisor.advise(&kickoff_at(4_000, 1, 1));
        assert_ne!(fresh, first);
    }

    #[test]
    fn test_undecided_attempt_waits_for_grade_delay() {
        let mut advisor = LearningKickoffAdvisor::seeded(3);
        advisor.advise(&kickoff_at(0, 0, 0));

        advisor.grade(&ball_at_y(kickoff_at(6_000, 0, 0), 40.0));
        assert!(advisor.proven.is_empty(), "6s is not yet past the grading moment");
        assert!(advisor.under_scrutiny.is_some());

        advisor.grade(&ball_at_y(kickoff_at(6_001, 0, 0), 40.0));
        assert!(advisor.proven.contains_key(&KickoffKind::Center));
        assert!(advisor.under_scrutiny.is_none());
    }

    #[test]
    fn test_ball_in_our_half_tosses_attempt() {
        let mut advisor = LearningKickoffAdvisor::seeded(4);
        advisor.advise(&kickoff_at(0, 0, 0));
        advisor.grade(&ball_at_y(kickoff_at(7_000, 0, 0), -30.0));
        assert!(advisor.proven.is_empty());
        assert!(advisor.under_scrutiny.is_none());
    }

    #[test]
    fn test_grade_without_advice_is_a_no_op() {
        let mut advisor = LearningKickoffAdvisor::seeded(5);
        advisor.grade(&kickoff_at(10_000, 3, 0));
        assert!(advisor.proven.is_empty());
    }
}
