use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SeatError;

/// Display sizing preset for seat cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Small,
    #[default]
    Medium,
    Large,
}

impl Density {
    pub fn as_str(self) -> &'static str {
        match self {
            Density::Small => "small",
            Density::Medium => "medium",
            Density::Large => "large",
        }
    }

    /// Minimum seat cell height in pixels
    pub fn seat_min_height(self, wrap: bool) -> u32 {
        match (self, wrap) {
            (Density::Small, false) => 60,
            (Density::Small, true) => 78,
            (Density::Medium, false) => 75,
            (Density::Medium, true) => 98,
            (Density::Large, false) => 90,
            (Density::Large, true) => 118,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Density {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "small" => Ok(Density::Small),
            "medium" => Ok(Density::Medium),
            "large" => Ok(Density::Large),
            other => Err(SeatError::InvalidDensity(other.to_string())),
        }
    }
}

/// Board settings. Each field persists in its own slot and none of them
/// take part in undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Edit PIN; empty means editing is never gated
    pub pin: String,
    /// Whether the edit gate is engaged
    pub locked: bool,
    /// Blackboard drawn above the grid (true) or below it
    pub board_top: bool,
    pub density: Density,
    /// Wrap long owner/tenant names instead of truncating
    pub wrap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pin: String::new(),
            locked: true,
            board_top: true,
            density: Density::Medium,
            wrap: false,
        }
    }
}

/// Encode a flag the way it is persisted
pub fn encode_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Decode a persisted flag; anything other than the two literals yields `default`
pub fn decode_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}

/// Decode a persisted density, falling back to the default preset
pub fn decode_density(raw: Option<&str>) -> Density {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}
