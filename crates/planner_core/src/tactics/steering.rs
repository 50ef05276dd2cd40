//! Ground steering helpers
//!
//! These turn "get to this point" into a [`ControlCommand`]. Steering sign
//! convention: positive `steer` turns clockwise (right), matching a car whose
//! yaw grows counter-clockwise.

use std::f32::consts::{FRAC_PI_2, PI};

use nalgebra::Vector2;

use crate::context::CarState;
use crate::output::ControlCommand;

/// Heading error (rad) at which steering saturates.
const FULL_LOCK_ANGLE: f32 = 0.5;
/// Heading error (rad) beyond which we powerslide.
const SLIDE_ANGLE: f32 = 1.9;
/// Heading error (rad) under which boosting is worthwhile.
const BOOST_ANGLE: f32 = 0.2;
const BOOST_DISTANCE: f32 = 40.0;
/// Distance over which throttle ramps down when arriving.
const SLOWING_DISTANCE: f32 = 10.0;

/// Signed angle (rad) from `from` to `to`, counter-clockwise positive.
pub fn signed_angle(from: &Vector2<f32>, to: &Vector2<f32>) -> f32 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.dot(to);
    cross.atan2(dot)
}

/// Arrive: full throttle far away, slowing inside `slowing_distance`.
pub fn arrive_throttle(distance: f32, slowing_distance: f32) -> f32 {
    if distance < 0.0001 {
        return 0.0;
    }
    if slowing_distance <= 0.0 {
        return 1.0;
    }
    (distance / slowing_distance).clamp(0.0, 1.0)
}

/// Drive toward `target` on the ground at full pace.
pub fn steer_toward_ground_position(car: &CarState, target: Vector2<f32>) -> ControlCommand {
    let to_target = target - car.flat_position();
    let distance = to_target.norm();
    if distance < 0.0001 {
        return ControlCommand::new();
    }

    let error = signed_angle(&car.facing(), &to_target);
    let steer = -(error / FULL_LOCK_ANGLE);
    let throttle = if error.abs() > FRAC_PI_2 { 0.5 } else { 1.0 };

    ControlCommand::new()
        .with_steer(steer)
        .with_throttle(throttle)
        .with_slide(error.abs() > SLIDE_ANGLE && car.speed() > 10.0)
        .with_boost(error.abs() < BOOST_ANGLE && distance > BOOST_DISTANCE && car.boost > 0.0)
}

/// Like [`steer_toward_ground_position`] but eases off near the target.
pub fn arrive_at_ground_position(car: &CarState, target: Vector2<f32>) -> ControlCommand {
    let distance = (target - car.flat_position()).norm();
    let command = steer_toward_ground_position(car, target);
    let throttle = command.throttle * arrive_throttle(distance, SLOWING_DISTANCE);
    command.with_throttle(throttle).with_boost(false)
}

/// Wrap an angle into (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    let mut wrapped = angle % (2.0 * PI);
    if wrapped <= -PI {
        wrapped += 2.0 * PI;
    } else if wrapped > PI {
        wrapped -= 2.0 * PI;
    }
    wrapped
}
