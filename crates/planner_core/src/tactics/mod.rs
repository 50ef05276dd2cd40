//! Reference tactical collaborators
//!
//! The engine only needs "compute a command given a context" and "compute a
//! target point". This module supplies a small, plain set of
//! those so the engine can be exercised end to end:
//!
//! - [`arena`] / [`goal`]: field geometry
//! - [`kickoff`]: kickoff approach advice that learns from the score
//! - [`steering`]: ground steering toward a target point
//! - [`steps`]: concrete [`crate::Step`]s, one [`crate::UnfailingStep`] and
//!   one [`crate::PlanLeaf`]
//! - [`tactician`]: a [`crate::Tactician`] choosing between them

pub mod arena;
pub mod goal;
pub mod kickoff;
pub mod steering;
pub mod steps;
pub mod tactician;

pub use goal::Goal;
pub use kickoff::{KickoffAdvice, KickoffAdvisor, KickoffKind, LearningKickoffAdvisor};
pub use tactician::DefaultTactician;
