use crate::error::ParseModeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which regulation architecture is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulationMode {
    /// Mirrors stress back as narration; nothing damps it.
    #[default]
    #[serde(alias = "unregulated")]
    Reactive,
    /// Engages a decay controller once stress crosses the threshold.
    #[serde(alias = "stoic")]
    Regulated,
}

impl RegulationMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Reactive => "Raw Emotional",
            Self::Regulated => "Metacognitive",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reactive => "reactive",
            Self::Regulated => "regulated",
        }
    }
}

impl std::fmt::Display for RegulationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegulationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reactive" | "unregulated" => Ok(Self::Reactive),
            "regulated" | "stoic" => Ok(Self::Regulated),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
