//! Goal geometry
//!
//! Blue defends the goal at negative y, orange the one at positive y.

use nalgebra::Vector3;

use crate::context::Team;
use crate::tactics::arena::BALL_RADIUS;

const GOAL_DISTANCE: f32 = 102.0;
pub const GOAL_HEIGHT: f32 = 12.8555;
/// Half-width of the goal mouth.
pub const EXTENT: f32 = 17.8555;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub center: Vector3<f32>,
}

impl Goal {
    fn on_side(sign: f32) -> Self {
        Self { center: Vector3::new(0.0, GOAL_DISTANCE * sign, 0.0) }
    }

    pub fn own(team: Team) -> Self {
        Self::on_side(team.own_side_sign())
    }

    pub fn enemy(team: Team) -> Self {
        Self::own(team.opposite())
    }

    /// Closest point of the goal mouth a ball at `ball_position` could enter
    /// through, shrunk by `padding`.
    pub fn nearest_entrance(&self, ball_position: &Vector3<f32>, padding: f32) -> Vector3<f32> {
        let adjusted_extent = (EXTENT - BALL_RADIUS - padding).max(0.0);
        let adjusted_height = (GOAL_HEIGHT - BALL_RADIUS - padding).max(BALL_RADIUS);
        let x = ball_position.x.clamp(-adjusted_extent, adjusted_extent);
        let z = ball_position.z.clamp(BALL_RADIUS, adjusted_height);
        Vector3::new(x, self.center.y, z)
    }
}
