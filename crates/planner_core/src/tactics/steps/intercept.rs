use nalgebra::Vector3;

use crate::context::TickContext;
use crate::output::ControlCommand;
use crate::steps::{Guidance, Step};
use crate::tactics::{arena, steering};
use crate::time::GameTime;

/// Drive to where we expect to meet the ball, displaced by `offset`.
///
/// Declines (continue) when there is no contact prediction this tick and
/// succeeds once anyone touches the ball after the step started.
#[derive(Debug)]
pub struct InterceptStep {
    offset: Vector3<f32>,
    started_at: Option<GameTime>,
    touched: bool,
}

impl InterceptStep {
    pub fn new(offset: Vector3<f32>) -> Self {
        Self { offset, started_at: None, touched: false }
    }
}

impl Step for InterceptStep {
    fn evaluate(&mut self, ctx: &TickContext) -> Option<ControlCommand> {
        let started_at = *self.started_at.get_or_insert(ctx.time);

        if ctx.latest_touch.is_some_and(|touch| touch.time > started_at) {
            self.touched = true;
            return None;
        }

        let contact = ctx.tactical.as_ref()?.expected_contact?;
        let target = arena::clamp_position((contact.space + self.offset).xy(), 1.0);
        Some(steering::steer_toward_ground_position(&ctx.car, target))
    }

    fn guidance(&self) -> Guidance {
        if self.touched {
            Guidance::Succeeded
        } else {
            Guidance::Continue
        }
    }

    fn situation(&self) -> String {
        "Intercepting".to_string()
    }
}
