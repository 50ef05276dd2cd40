//! # planner_core - Tick-driven Plan/Step Execution Engine
//!
//! Every simulation frame the agent must hand back a control command (or
//! explicitly decline to) for a snapshot of the world. This crate holds the
//! machinery that turns a committed course of action into that command:
//!
//! - [`steps`]: the [`Step`] and [`UnfailingStep`] contracts plus
//!   [`NestedPlanStep`] for recursive sub-planning
//! - [`plan`]: cursor-tracked [`Plan`]s and the retryable fallback variant
//! - [`runner`]: the caller-side loop that holds one top-level plan
//! - [`tactics`]: reference tactical collaborators (steering, goals, steps)
//!
//! ## Features
//! - Deterministic: time only ever comes from [`TickContext::time`]
//! - Bounded per-tick cost: at most one sweep over a plan's steps per tick
//! - No errors on the tick path; failure is modeled as absence + [`Guidance`]

// Tactical helpers take many scalar parameters, mirroring the physics they model
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod plan;
pub mod runner;
pub mod steps;
pub mod tactics;
pub mod time;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{PlannerConfig, PlanningConfig, TacticsConfig};
pub use context::{
    BallState, BallTouch, CarState, Scoreboard, SpaceTime, TacticalSituation, Team, TickContext,
};
pub use error::{ConfigError, Result};
pub use output::ControlCommand;
pub use plan::{Plan, PlanOutcome, Posture, DEFAULT_FALLBACK_DURATION};
pub use runner::{CommandSource, PlanRunner, RunnerStats, Tactician, TickReport};
pub use steps::nested::{ChildPlan, NestedPlanStep, PlanLeaf};
pub use steps::{Guidance, Step, Unfailing, UnfailingStep};
pub use time::GameTime;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
