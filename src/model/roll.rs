//! Dice results: the D20 resolution shown to both views.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// How a roll is resolved from its two dice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollMode {
    /// First die only.
    #[default]
    Normal,

    /// Higher of the two dice.
    Advantage,

    /// Lower of the two dice.
    Disadvantage,
}

impl RollMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Advantage => "advantage",
            Self::Disadvantage => "disadvantage",
        }
    }
}

impl fmt::Display for RollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single, immutable dice resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Final value, 1 through 20.
    pub value: u8,

    #[serde(rename = "type")]
    pub mode: RollMode,

    /// Human-readable account of the underlying dice.
    pub details: String,

    /// When the roll was made.
    pub timestamp: Timestamp,
}
