//! Game clock
//!
//! Timestamps are milliseconds since kickoff, carried in by every
//! [`crate::TickContext`]. Nothing in the engine reads a wall clock.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A point on the game clock (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameTime(u64);

impl GameTime {
    pub const ZERO: GameTime = GameTime(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Negative and non-finite inputs clamp to zero.
    pub fn from_secs_f32(secs: f32) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self((secs * 1000.0).round() as u64)
    }

    pub const fn millis(self) -> u64 {
        self.0
    }

    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }

    pub fn plus(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: GameTime) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f32())
    }
}
