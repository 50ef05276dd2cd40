//! Concrete steps built on the tactical helpers

mod challenge;
mod drive_to_point;
mod get_on_defense;
mod intercept;
mod land;

pub use challenge::ChallengeStep;
pub use drive_to_point::DriveToPointStep;
pub use get_on_defense::GetOnDefenseStep;
pub use intercept::InterceptStep;
pub use land::LandMindlesslyStep;
