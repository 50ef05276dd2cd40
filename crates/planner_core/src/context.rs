//! Per-frame world snapshot handed to the engine
//!
//! A [`TickContext`] is built by the control loop once per frame and only
//! ever borrowed by plans and steps. Tactical telemetry is optional: when the
//! upstream analysis has nothing for this frame it is `None`, never a value
//! left over from an earlier tick.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::time::GameTime;

// ============================================================================
// Teams & score
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    Blue,
    Orange,
}

impl Team {
    pub fn opposite(self) -> Self {
        match self {
            Team::Blue => Team::Orange,
            Team::Orange => Team::Blue,
        }
    }

    /// Sign of the y axis pointing at this team's own goal.
    pub fn own_side_sign(self) -> f32 {
        match self {
            Team::Blue => -1.0,
            Team::Orange => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub blue: u32,
    pub orange: u32,
}

impl Scoreboard {
    pub fn team_score(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue,
            Team::Orange => self.orange,
        }
    }
}

// ============================================================================
// Physical state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    /// Heading in radians, 0 = +x, counter-clockwise positive.
    pub yaw: f32,
    /// 0..=100
    pub boost: f32,
    pub has_wheel_contact: bool,
}

impl CarState {
    pub fn flat_position(&self) -> Vector2<f32> {
        self.position.xy()
    }

    pub fn facing(&self) -> Vector2<f32> {
        Vector2::new(self.yaw.cos(), self.yaw.sin())
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

impl Default for CarState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            yaw: 0.0,
            boost: 33.0,
            has_wheel_contact: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
}

impl Default for BallState {
    fn default() -> Self {
        Self { position: Vector3::new(0.0, 0.0, 1.86), velocity: Vector3::zeros() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallTouch {
    pub time: GameTime,
    pub position: Vector3<f32>,
    pub player_index: usize,
}

// ============================================================================
// Tactical telemetry
// ============================================================================

/// A predicted position at a predicted moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceTime {
    pub space: Vector3<f32>,
    pub time: GameTime,
}

impl SpaceTime {
    pub fn new(space: Vector3<f32>, time: GameTime) -> Self {
        Self { space, time }
    }
}

/// Derived tactical read of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TacticalSituation {
    /// Seconds we are expected to reach the ball before the enemy
    /// (negative when the enemy gets there first).
    pub ball_advantage_secs: f32,
    pub expected_contact: Option<SpaceTime>,
    pub expected_enemy_contact: Option<SpaceTime>,
    /// Positive when the ball is between us and our own goal.
    pub distance_ball_is_behind_us: f32,
}

// ============================================================================
// TickContext
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickContext {
    pub time: GameTime,
    pub player_index: usize,
    pub team: Team,
    pub car: CarState,
    pub ball: BallState,
    #[serde(default)]
    pub scores: Scoreboard,
    #[serde(default)]
    pub latest_touch: Option<BallTouch>,
    #[serde(default)]
    pub tactical: Option<TacticalSituation>,
}

impl TickContext {
    /// Neutral snapshot at `time`: car at the origin, ball at kickoff spot.
    pub fn at(time: GameTime) -> Self {
        Self { time, ..Self::default() }
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.team = team;
        self
    }

    pub fn with_car(mut self, car: CarState) -> Self {
        self.car = car;
        self
    }

    pub fn with_ball(mut self, ball: BallState) -> Self {
        self.ball = ball;
        self
    }

    pub fn with_scores(mut self, scores: Scoreboard) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_tactical(mut self, tactical: TacticalSituation) -> Self {
        self.tactical = Some(tactical);
        self
    }

    pub fn our_score(&self) -> u32 {
        self.scores.team_score(self.team)
    }

    pub fn enemy_score(&self) -> u32 {
        self.scores.team_score(self.team.opposite())
    }
}
