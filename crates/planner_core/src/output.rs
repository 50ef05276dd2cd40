//! Control command produced for one tick
//!
//! The engine passes these through untouched; only steps build them and only
//! the control loop consumes them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlCommand {
    pub throttle: f32,
    pub steer: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub jump: bool,
    pub boost: bool,
    pub slide: bool,
}

impl ControlCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throttle(mut self, throttle: f32) -> Self {
        self.throttle = clamp_axis(throttle);
        self
    }

    pub fn with_steer(mut self, steer: f32) -> Self {
        self.steer = clamp_axis(steer);
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = clamp_axis(pitch);
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = clamp_axis(yaw);
        self
    }

    pub fn with_roll(mut self, roll: f32) -> Self {
        self.roll = clamp_axis(roll);
        self
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    pub fn with_boost(mut self, boost: bool) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_slide(mut self, slide: bool) -> Self {
        self.slide = slide;
        self
    }
}

#[inline]
fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
