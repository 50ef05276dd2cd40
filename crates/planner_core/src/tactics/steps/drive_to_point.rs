use nalgebra::Vector2;

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::steps::{Guidance, Step};
use crate::tactics::steering;

/// Drive to a fixed ground point; succeeds on arrival.
#[derive(Debug)]
pub struct DriveToPointStep {
    target: Vector2<f32>,
    arrival_radius: f32,
    arrived: bool,
    on_arrival: Guidance,
}

impl DriveToPointStep {
    pub fn new(target: Vector2<f32>, arrival_radius: f32) -> Self {
        Self { target, arrival_radius, arrived: false, on_arrival: Guidance::Succeeded }
    }

    /// Arriving hands over to the next step instead of ending the plan.
    pub fn as_waypoint(mut self) -> Self {
        self.on_arrival = Guidance::Continue;
        self
    }
}

impl Step for DriveToPointStep {
    fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        if (self.target - ctx.car.flat_position()).norm() <= self.arrival_radius {
            self.arrived = true;
            return None;
        }
        Some(steering::arrive_at_ground_position(&ctx.car, self.target))
    }

    fn guidance(&self) -> Guidance {
        if self.arrived {
            self.on_arrival
        } else {
            Guidance::Continue
        }
    }

    fn situation(&self) -> String {
        format!("Driving to ({:.1}, {:.1})", self.target.x, self.target.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CarState;
    use crate::time::GameTime;
    use nalgebra::Vector3;

    #[test]
    fn test_succeeds_on_arrival() {
        let mut step = DriveToPointStep::new(Vector2::new(20.0, 0.0), 3.0);
        let start = TickContext::at(GameTime::ZERO);
        assert!(step.evaluate(&start).is_some());
        assert_eq!(step.guidance(), Guidance::Continue);

        let car = CarState { position: Vector3::new(18.5, 0.5, 0.0), ..CarState::default() };
        let there = TickContext::at(GameTime::from_millis(900)).with_car(car);
        assert!(step.evaluate(&there).is_none());
        assert_eq!(step.guidance(), Guidance::Succeeded);
    }

    #[test]
    fn test_waypoint_hands_over_on_arrival() {
        use crate::plan::{Plan, Posture};
        use crate::test_support::{cmd, ScriptedStep};

        let car = CarState { position: Vector3::new(9.0, 0.0, 0.0), ..CarState::default() };
        let ctx = TickContext::at(GameTime::ZERO).with_car(car);
        let mut plan = Plan::new(Posture::Kickoff)
            .with_step(DriveToPointStep::new(Vector2::new(10.0, 0.0), 3.0).as_waypoint())
            .with_step(ScriptedStep::always("next", 0.6));

        assert_eq!(plan.evaluate(&ctx), Some(cmd(0.6)));
        assert_eq!(plan.cursor(), 1);
    }
}
