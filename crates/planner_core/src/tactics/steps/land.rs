use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::steps::Step;
use crate::tactics::arena;

/// Keeps the wheels spinning until the car is back on a surface.
#[derive(Debug, Default)]
pub struct LandMindlesslyStep;

impl Step for LandMindlesslyStep {
    fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        let car = &ctx.car;
        if car.has_wheel_contact
            || car.position.z < 0.4
            || (arena::is_near_wall(&car.position) && car.position.z < 5.0)
        {
            return None;
        }
        Some(ControlCommand::new().with_throttle(1.0))
    }

    fn situation(&self) -> String {
        "Waiting to land".to_string()
    }
}
