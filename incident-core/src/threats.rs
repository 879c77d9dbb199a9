//! Active-threat feed shown next to the incident list.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the feed: how often a threat type was seen and where it is heading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatTrend {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
    pub trend: Trend,
}

impl ThreatTrend {
    pub fn new(id: u32, kind: impl Into<String>, count: u32, trend: Trend) -> Self {
        Self {
            id,
            kind: kind.into(),
            count,
            trend,
        }
    }
}
