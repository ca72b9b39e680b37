//! Swipe decision enum.

use serde::{Deserialize, Serialize};

/// The binary outcome of a swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDecision {
    /// Swiped right.
    Like,
    /// Swiped left. Older clients sent `dislike`.
    #[serde(alias = "dislike")]
    Pass,
}

impl SwipeDecision {
    /// Whether this decision is a like.
    #[must_use]
    pub const fn is_like(self) -> bool {
        matches!(self, Self::Like)
    }

    /// Horizontal direction of the decision: `1.0` for like, `-1.0` for pass.
    #[must_use]
    pub const fn direction(self) -> f64 {
        match self {
            Self::Like => 1.0,
            Self::Pass => -1.0,
        }
    }
}

impl std::fmt::Display for SwipeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Like => write!(f, "like"),
            Self::Pass => write!(f, "pass"),
        }
    }
}

impl std::str::FromStr for SwipeDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "pass" | "dislike" => Ok(Self::Pass),
            _ => Err(format!("invalid swipe decision: {s}")),
        }
    }
}
