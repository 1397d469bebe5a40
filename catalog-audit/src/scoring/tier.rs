//! Quality tiers for bullet scores
//!
//! | tier     | score        |
//! |----------|--------------|
//! | Good     | s ≥ 4        |
//! | Fair     | 3 ≤ s < 4    |
//! | Weak     | 2 ≤ s < 3    |
//! | Critical | s < 2        |
//!
//! Boundary values resolve to the higher tier. Non-finite scores are Critical.

use serde::Serialize;
use std::fmt;

/// Coarse quality bucket derived from a 1-5 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    Critical,
    Weak,
    Fair,
    Good,
}

impl Tier {
    pub const GOOD_MIN: f64 = 4.0;
    pub const FAIR_MIN: f64 = 3.0;
    pub const WEAK_MIN: f64 = 2.0;

    /// Map a score to exactly one tier
    pub fn from_score(score: f64) -> Self {
        if !score.is_finite() {
            return Self::Critical;
        }
        if score >= Self::GOOD_MIN {
            Self::Good
        } else if score >= Self::FAIR_MIN {
            Self::Fair
        } else if score >= Self::WEAK_MIN {
            Self::Weak
        } else {
            Self::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Weak => "Weak",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
