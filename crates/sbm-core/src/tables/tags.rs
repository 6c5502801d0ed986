//! End-of-run tags the player can pin on a finished run.

use serde::{Deserialize, Serialize};

use crate::error::{SbmError, SbmResult};

/// A label describing how a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunTag {
    /// No curse landed on a surviving track.
    CleanSweep,
    /// Five or more curses.
    CursedCrown,
    /// Finished with a deleted track behind you.
    Survivor,
    /// Beat a room timer.
    Speedrunner,
    /// Ended holding three or more power-ups.
    PowerHoarder,
    /// Used One Last Breath.
    Phoenix,
    /// Embraced every mutation.
    GlitchArtist,
    /// Finished every forced room.
    Completionist,
}

/// Every tag with its description, in display order.
pub static RUN_TAGS: [(RunTag, &str); 8] = [
    (RunTag::CleanSweep, "No curse landed on a surviving track."),
    (RunTag::CursedCrown, "Collected five or more curses."),
    (RunTag::Survivor, "Finished despite losing a track."),
    (RunTag::Speedrunner, "Beat a room timer."),
    (RunTag::PowerHoarder, "Ended the run holding three or more Power-Ups."),
    (RunTag::Phoenix, "Took One Last Breath."),
    (RunTag::GlitchArtist, "Kept every mutation you rolled."),
    (RunTag::Completionist, "Played out every forced room."),
];

impl RunTag {
    /// Parse a tag from its display name or kebab-case name.
    pub fn parse(s: &str) -> SbmResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        RUN_TAGS
            .iter()
            .map(|(tag, _)| *tag)
            .find(|tag| {
                tag.to_string()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_lowercase()
                    == key
            })
            .ok_or_else(|| SbmError::UnknownTag(s.to_string()))
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        RUN_TAGS
            .iter()
            .find(|(tag, _)| *tag == self)
            .map_or("", |(_, desc)| desc)
    }
}

impl std::fmt::Display for RunTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CleanSweep => write!(f, "Clean Sweep"),
            Self::CursedCrown => write!(f, "Cursed Crown"),
            Self::Survivor => write!(f, "Survivor"),
            Self::Speedrunner => write!(f, "Speedrunner"),
            Self::PowerHoarder => write!(f, "Power Hoarder"),
            Self::Phoenix => write!(f, "Phoenix"),
            Self::GlitchArtist => write!(f, "Glitch Artist"),
            Self::Completionist => write!(f, "Completionist"),
        }
    }
}
