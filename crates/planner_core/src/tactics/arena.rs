//! Field dimensions (game units, origin at center spot, z up)

use nalgebra::{Vector2, Vector3};

pub const SIDE_WALL: f32 = 81.92;
pub const BACK_WALL: f32 = 102.4;
pub const CEILING: f32 = 40.88;
pub const BALL_RADIUS: f32 = 1.8555;

/// Center of the diagonal corner surfaces.
pub const CORNER_ANGLE_CENTER: (f32, f32) = (70.5, 90.2);

/// Keep a ground point at least `padding` away from the side and back walls.
pub fn clamp_position(point: Vector2<f32>, padding: f32) -> Vector2<f32> {
    let max_x = (SIDE_WALL - padding).max(0.0);
    let max_y = (BACK_WALL - padding).max(0.0);
    Vector2::new(point.x.clamp(-max_x, max_x), point.y.clamp(-max_y, max_y))
}

pub fn is_near_wall(position: &Vector3<f32>) -> bool {
    position.x.abs() > SIDE_WALL - 2.0
        || position.y.abs() > BACK_WALL - 2.0
        || position.x.abs() + position.y.abs() > CORNER_ANGLE_CENTER.0 + CORNER_ANGLE_CENTER.1 - 2.0
}
