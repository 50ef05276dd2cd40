use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification tag carried by a [`super::Plan`].
///
/// The engine stores it and never looks at it; the runner uses the urgency
/// rank to decide whether a newly proposed plan may replace the held one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    #[default]
    Neutral,
    Offensive,
    Defensive,
    Landing,
    Save,
    Kickoff,
    Override,
}

impl Posture {
    pub fn urgency(self) -> u8 {
        match self {
            Posture::Neutral => 0,
            Posture::Offensive => 1,
            Posture::Defensive => 5,
            Posture::Landing => 8,
            Posture::Save => 9,
            Posture::Kickoff => 12,
            Posture::Override => 20,
        }
    }

    pub fn less_urgent_than(self, other: Posture) -> bool {
        self.urgency() < other.urgency()
    }

    pub fn name(self) -> &'static str {
        match self {
            Posture::Neutral => "NEUTRAL",
            Posture::Offensive => "OFFENSIVE",
            Posture::Defensive => "DEFENSIVE",
            Posture::Landing => "LANDING",
            Posture::Save => "SAVE",
            Posture::Kickoff => "KICKOFF",
            Posture::Override => "OVERRIDE",
        }
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_ordering() {
        assert!(Posture::Neutral.less_urgent_than(Posture::Offensive));
        assert!(Posture::Offensive.less_urgent_than(Posture::Defensive));
        assert!(Posture::Defensive.less_urgent_than(Posture::Landing));
        assert!(!Posture::Kickoff.less_urgent_than(Posture::Save));
        assert!(!Posture::Defensive.less_urgent_than(Posture::Defensive));
    }
}
