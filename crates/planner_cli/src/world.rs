//! Seeded synthetic world
//!
//! A crude 1v1 field: the ball rolls with friction, one enemy drives straight
//! at it, and our car follows whatever command the runner returns. It exists
//! to push the planner through its postures, not to be physics.
//!
//! Same seed, same tick length, same commands: same sequence of snapshots.

use std::time::Duration;

use nalgebra::{Vector2, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use planner_core::context::{
    BallState, BallTouch, CarState, Scoreboard, SpaceTime, TacticalSituation, Team, TickContext,
};
use planner_core::tactics::arena::{self, BALL_RADIUS, BACK_WALL, SIDE_WALL};
use planner_core::tactics::goal::{Goal, EXTENT};
use planner_core::tactics::steering;
use planner_core::{ControlCommand, GameTime};

const OUR_INDEX: usize = 0;
const ENEMY_INDEX: usize = 1;

const MAX_CAR_SPEED: f32 = 46.0;
const THROTTLE_ACCEL: f32 = 32.0;
const BOOST_ACCEL: f32 = 20.0;
const BOOST_DRAIN_PER_SEC: f32 = 33.0;
const COAST_DECEL: f32 = 5.0;
const TURN_RATE: f32 = 3.0;
const GRAVITY: f32 = 13.0;

const BALL_FRICTION: f32 = 0.35;
const TOUCH_RADIUS: f32 = 3.5;
/// Per-tick chance of being bumped into the air while grounded.
const LAUNCH_CHANCE: f64 = 0.004;
/// Beyond this many seconds out the enemy is not considered committed.
const ENEMY_COMMIT_SECS: f32 = 3.0;
/// Speed used for arrival estimates when the car is slower than this.
const ESTIMATE_SPEED_FLOOR: f32 = 25.0;

/// Something worth printing that happened during [`SyntheticWorld::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    Touch { player_index: usize },
    Goal { scorer: Team },
    Launched,
}

pub struct SyntheticWorld {
    rng: ChaCha8Rng,
    tick: Duration,
    time: GameTime,
    team: Team,
    car: CarState,
    ball: BallState,
    enemy: Vector3<f32>,
    enemy_speed: f32,
    scores: Scoreboard,
    latest_touch: Option<BallTouch>,
}

impl SyntheticWorld {
    pub fn new(seed: u64, tick: Duration) -> Self {
        let mut world = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick,
            time: GameTime::ZERO,
            team: Team::Blue,
            car: CarState::default(),
            ball: BallState::default(),
            enemy: Vector3::zeros(),
            enemy_speed: 0.0,
            scores: Scoreboard::default(),
            latest_touch: None,
        };
        world.kickoff();
        world
    }

    pub fn time(&self) -> GameTime {
        self.time
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    /// Snapshot handed to the planner this tick.
    pub fn context(&self) -> TickContext {
        TickContext {
            time: self.time,
            player_index: OUR_INDEX,
            team: self.team,
            car: self.car,
            ball: self.ball,
            scores: self.scores,
            latest_touch: self.latest_touch,
            tactical: Some(self.tactical()),
        }
    }

    /// Apply `command` to our car and move everything forward one tick.
    pub fn advance(&mut self, command: &ControlCommand) -> Vec<WorldEvent> {
        let dt = self.tick.as_secs_f32();
        let mut events = Vec::new();

        if self.drive_car(command, dt) {
            events.push(WorldEvent::Launched);
        }
        self.drive_enemy(dt);
        self.time = self.time.plus(self.tick);

        if let Some(player_index) = self.resolve_touches() {
            events.push(WorldEvent::Touch { player_index });
        }
        if let Some(scorer) = self.roll_ball(dt) {
            events.push(WorldEvent::Goal { scorer });
        }
        events
    }

    // ========================================================================
    // Setup
    // ========================================================================

    fn kickoff(&mut self) {
        let own_sign = self.team.own_side_sign();
        let x: f32 = self.rng.gen_range(-30.0..30.0);
        self.car = CarState {
            position: Vector3::new(x, own_sign * 50.0, 0.0),
            yaw: -own_sign * std::f32::consts::FRAC_PI_2,
            ..CarState::default()
        };
        self.ball = BallState {
            position: Vector3::new(self.rng.gen_range(-10.0..10.0), self.rng.gen_range(-10.0..10.0), BALL_RADIUS),
            velocity: Vector3::zeros(),
        };
        self.enemy = Vector3::new(-x, -own_sign * 50.0, 0.0);
        self.reroll_enemy_speed();
        self.latest_touch = None;
    }

    fn reroll_enemy_speed(&mut self) {
        self.enemy_speed = self.rng.gen_range(18.0..38.0);
    }

    // ========================================================================
    // Motion
    // ========================================================================

    /// Returns true when the car was bumped airborne this tick.
    fn drive_car(&mut self, command: &ControlCommand, dt: f32) -> bool {
        let car = &mut self.car;

        if !car.has_wheel_contact {
            car.velocity.z -= GRAVITY * dt;
            car.position += car.velocity * dt;
            if car.position.z <= 0.0 {
                car.position.z = 0.0;
                car.velocity.z = 0.0;
                car.has_wheel_contact = true;
            }
            return false;
        }

        car.yaw = steering::wrap_angle(car.yaw - command.steer * TURN_RATE * dt);

        let forward_speed = car.velocity.xy().dot(&car.facing());
        let boosting = command.boost && car.boost > 0.0;
        let speed = if command.throttle == 0.0 && !boosting {
            forward_speed - (COAST_DECEL * dt).min(forward_speed.abs()) * forward_speed.signum()
        } else {
            let mut accel = command.throttle * THROTTLE_ACCEL;
            if boosting {
                accel += BOOST_ACCEL;
                car.boost = (car.boost - BOOST_DRAIN_PER_SEC * dt).max(0.0);
            }
            forward_speed + accel * dt
        }
        .clamp(-MAX_CAR_SPEED / 2.0, MAX_CAR_SPEED);
        let velocity = car.facing() * speed;
        car.velocity = Vector3::new(velocity.x, velocity.y, 0.0);

        let moved = arena::clamp_position(car.flat_position() + velocity * dt, 1.0);
        car.position = Vector3::new(moved.x, moved.y, 0.0);

        if self.rng.gen_bool(LAUNCH_CHANCE) {
            self.car.velocity.z = self.rng.gen_range(8.0..14.0);
            self.car.position.z = 0.1;
            self.car.has_wheel_contact = false;
            return true;
        }
        false
    }

    fn drive_enemy(&mut self, dt: f32) {
        let to_ball = self.ball.position.xy() - self.enemy.xy();
        let distance = to_ball.norm();
        if distance > 0.0001 {
            let step = to_ball / distance * (self.enemy_speed * dt).min(distance);
            self.enemy += Vector3::new(step.x, step.y, 0.0);
        }
    }

    /// Returns the index of the player who touched the ball, if anyone did.
    fn resolve_touches(&mut self) -> Option<usize> {
        let ball = self.ball.position;

        if (self.car.position - ball).norm() < TOUCH_RADIUS {
            let direction = (ball - self.car.position).xy().try_normalize(1.0e-6).unwrap_or_else(|| self.car.facing());
            let speed = self.car.speed() + 10.0;
            self.kick(direction * speed, OUR_INDEX);
            return Some(OUR_INDEX);
        }

        if (self.enemy - ball).norm() < TOUCH_RADIUS {
            let target = Goal::own(self.team).center.xy() + Vector2::new(self.rng.gen_range(-EXTENT..EXTENT), 0.0);
            let direction = (target - ball.xy()).try_normalize(1.0e-6).unwrap_or_else(Vector2::zeros);
            let speed: f32 = self.rng.gen_range(20.0..40.0);
            self.kick(direction * speed, ENEMY_INDEX);
            self.reroll_enemy_speed();
            // Back off so the enemy does not dribble forever.
            self.enemy -= Vector3::new(direction.x, direction.y, 0.0) * 15.0;
            return Some(ENEMY_INDEX);
        }

        None
    }

    fn kick(&mut self, velocity: Vector2<f32>, player_index: usize) {
        self.ball.velocity = Vector3::new(velocity.x, velocity.y, 0.0);
        self.latest_touch = Some(BallTouch { time: self.time, position: self.ball.position, player_index });
    }

    /// Returns the scoring team when the ball crosses a goal line.
    fn roll_ball(&mut self, dt: f32) -> Option<Team> {
        let travel = self.ball.velocity * dt;
        self.ball.position += travel;
        self.ball.velocity *= (-BALL_FRICTION * dt).exp();

        let max_x = SIDE_WALL - BALL_RADIUS;
        if self.ball.position.x.abs() > max_x {
            self.ball.position.x = self.ball.position.x.clamp(-max_x, max_x);
            self.ball.velocity.x = -self.ball.velocity.x;
        }

        let in_goal_mouth = self.ball.position.x.abs() < EXTENT;
        let goal_line = Goal::own(Team::Orange).center.y;
        if in_goal_mouth && self.ball.position.y.abs() > goal_line {
            // Orange defends positive y.
            let scorer = if self.ball.position.y > 0.0 { Team::Blue } else { Team::Orange };
            match scorer {
                Team::Blue => self.scores.blue += 1,
                Team::Orange => self.scores.orange += 1,
            }
            self.kickoff();
            return Some(scorer);
        }

        let max_y = BACK_WALL - BALL_RADIUS;
        if !in_goal_mouth && self.ball.position.y.abs() > max_y {
            self.ball.position.y = self.ball.position.y.clamp(-max_y, max_y);
            self.ball.velocity.y = -self.ball.velocity.y;
        }
        None
    }

    // ========================================================================
    // Tactical estimate
    // ========================================================================

    fn tactical(&self) -> TacticalSituation {
        let ball = self.ball.position.xy();
        let our_speed = self.car.speed().max(ESTIMATE_SPEED_FLOOR);
        let our_secs = (ball - self.car.flat_position()).norm() / our_speed;
        let enemy_secs = (ball - self.enemy.xy()).norm() / self.enemy_speed.max(1.0);

        let contact = |secs: f32| SpaceTime::new(self.predict_ball(secs), self.time.plus(Duration::from_secs_f32(secs)));
        let expected_enemy_contact = (enemy_secs < ENEMY_COMMIT_SECS).then(|| contact(enemy_secs));

        let own_sign = self.team.own_side_sign();
        TacticalSituation {
            ball_advantage_secs: enemy_secs - our_secs,
            expected_contact: Some(contact(our_secs)),
            expected_enemy_contact,
            distance_ball_is_behind_us: (self.ball.position.y - self.car.position.y) * own_sign,
        }
    }

    /// Ball position `secs` from now under friction alone.
    fn predict_ball(&self, secs: f32) -> Vector3<f32> {
        let travel = (1.0 - (-BALL_FRICTION * secs).exp()) / BALL_FRICTION;
        let position = self.ball.position + self.ball.velocity * travel;
        let flat = arena::clamp_position(position.xy(), BALL_RADIUS);
        Vector3::new(flat.x, flat.y, position.z.max(BALL_RADIUS))
    }
}
