//! Curse targeting tables: the method roll and the offset roll.

use serde::{Deserialize, Serialize};

use super::RangeEntry;

/// How a target curse picks its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetMethod {
    /// Most recent available track.
    Previous,
    /// Least recent available track.
    Oldest,
    /// The player names the loudest track.
    Loudest,
    /// The player names the quietest track.
    Quietest,
    /// The player picks freely.
    PlayerChoice,
    /// Resolve the method twice more.
    TwoTargets,
}

impl TargetMethod {
    /// Whether this method needs the player to name a track.
    pub fn needs_player(self) -> bool {
        matches!(self, Self::Loudest | Self::Quietest | Self::PlayerChoice)
    }
}

impl std::fmt::Display for TargetMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Previous => write!(f, "Previous Track"),
            Self::Oldest => write!(f, "Oldest Track"),
            Self::Loudest => write!(f, "Loudest Track"),
            Self::Quietest => write!(f, "Quietest Track"),
            Self::PlayerChoice => write!(f, "Player's Choice"),
            Self::TwoTargets => write!(f, "Two Targets"),
        }
    }
}

const fn method(min: u32, max: u32, value: TargetMethod) -> RangeEntry<TargetMethod> {
    RangeEntry { min, max, value }
}

const fn offset(min: u32, max: u32, value: i32) -> RangeEntry<i32> {
    RangeEntry { min, max, value }
}

/// First targeting roll: which method picks the anchor track.
pub static METHOD_TABLE: [RangeEntry<TargetMethod>; 6] = [
    method(1, 30, TargetMethod::Previous),
    method(31, 50, TargetMethod::Oldest),
    method(51, 65, TargetMethod::Loudest),
    method(66, 80, TargetMethod::Quietest),
    method(81, 92, TargetMethod::PlayerChoice),
    method(93, 100, TargetMethod::TwoTargets),
];

/// Second targeting roll: how far the target shifts from the anchor.
pub static OFFSET_TABLE: [RangeEntry<i32>; 3] =
    [offset(1, 25, -1), offset(26, 75, 0), offset(76, 100, 1)];
