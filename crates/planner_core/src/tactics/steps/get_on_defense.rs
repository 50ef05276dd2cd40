use nalgebra::Vector2;

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::steps::UnfailingStep;
use crate::tactics::goal::{self, Goal};
use crate::tactics::steering;

/// Distance in front of the goal line the car retreats to.
const DEFAULT_DEPTH: f32 = 10.0;

/// Retreat to a spot in front of our own goal, shaded toward the ball.
///
/// Total over every context, which makes it the usual fallback.
#[derive(Debug, Clone, Copy)]
pub struct GetOnDefenseStep {
    depth: f32,
}

impl GetOnDefenseStep {
    pub fn new(depth: f32) -> Self {
        Self { depth }
    }

    pub fn defensive_spot(&self, ctx: &TickContext) -> Vector2<f32> {
        let own_goal = Goal::own(ctx.team);
        let toward_field = -ctx.team.own_side_sign();
        let x = ctx.ball.position.x.clamp(-goal::EXTENT, goal::EXTENT) * 0.5;
        Vector2::new(x, own_goal.center.y + toward_field * self.depth)
    }

    pub fn command(&self, ctx: &TickContext) -> ControlCommand {
        steering::arrive_at_ground_position(&ctx.car, self.defensive_spot(ctx))
    }
}

impl Default for GetOnDefenseStep {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl UnfailingStep for GetOnDefenseStep {
    fn evaluate(&mut self, ctx: &TickContext) -> ControlCommand {
        self.command(ctx)
    }

    fn situation(&self) -> String {
        "Getting on defense".to_string()
    }
}
