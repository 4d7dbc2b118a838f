use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::question::Operator;

/// Controls operand ranges and which operators may appear
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Inclusive range both operands are drawn from
    pub fn operand_range(self) -> RangeInclusive<i64> {
        match self {
            Difficulty::Easy => 1..=10,
            Difficulty::Medium => 10..=50,
            Difficulty::Hard => 50..=100,
        }
    }

    pub fn operators(self) -> &'static [Operator] {
        match self {
            Difficulty::Easy => &[Operator::Add, Operator::Sub],
            Difficulty::Medium | Difficulty::Hard => &Operator::ALL,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    // Tokens are matched exactly, the way they arrive from the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::InvalidDifficulty(other.to_string())),
        }
    }
}
