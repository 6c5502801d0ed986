//! Tracks, curses and mutations: the records a run accumulates.

use serde::{Deserialize, Serialize};

use crate::tables::curses::{MixCurseId, TargetCurseId, mix_curse_entry, target_curse_entry};
use crate::tables::mutations::{MutationId, NO_MUTATION_TEXT};

/// The track a room produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Room that produced the track.
    pub room: u32,
    /// Current track type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Type before a reselect or copy override.
    pub original_type: Option<String>,
    /// Mutation texts applied to the track, oldest first.
    pub mutations: Vec<String>,
    /// Curse texts applied to the track, oldest first.
    pub curses: Vec<String>,
    /// Soft-delete flag. Deleted tracks stay in history.
    pub deleted: bool,
}

impl Track {
    /// A fresh track for a room.
    pub fn new(room: u32, kind: impl Into<String>) -> Self {
        Self {
            room,
            kind: kind.into(),
            original_type: None,
            mutations: Vec::new(),
            curses: Vec::new(),
            deleted: false,
        }
    }

    /// Replace the type, remembering the first original.
    pub fn override_type(&mut self, kind: impl Into<String>) {
        let previous = std::mem::replace(&mut self.kind, kind.into());
        if self.original_type.is_none() {
            self.original_type = Some(previous);
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Room {}: {}", self.room, self.kind)?;
        if let Some(orig) = &self.original_type {
            write!(f, " (was {orig})")?;
        }
        if self.deleted {
            write!(f, " [DELETED]")?;
        }
        Ok(())
    }
}

/// Whether a curse strikes tracks or the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurseKind {
    /// Strikes one or more tracks.
    Target,
    /// Changes run-level rules.
    Mix,
}

impl std::fmt::Display for CurseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target => write!(f, "Target Curse"),
            Self::Mix => write!(f, "Mix Curse"),
        }
    }
}

/// Which table row produced a curse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "table", content = "id")]
pub enum CurseSource {
    /// A target curse row.
    Target(TargetCurseId),
    /// A mix curse row.
    Mix(MixCurseId),
    /// Copy of an earlier curse's text. Carries no mechanics.
    Echo,
}

/// A rolled curse. The landing fields are filled in when it is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curse {
    /// Target or mix.
    pub kind: CurseKind,
    /// The d100 roll that produced it.
    pub roll: u32,
    /// Display text.
    pub effect: String,
    /// Originating table row.
    pub source: CurseSource,
    /// Track indices the curse landed on.
    #[serde(default)]
    pub targets: Vec<usize>,
    /// Landed at half strength.
    #[serde(default)]
    pub half_strength: bool,
}

impl Curse {
    /// A curse from a target curse row.
    pub fn target(roll: u32, id: TargetCurseId) -> Self {
        Self {
            kind: CurseKind::Target,
            roll,
            effect: target_curse_entry(id).text.to_string(),
            source: CurseSource::Target(id),
            targets: Vec::new(),
            half_strength: false,
        }
    }

    /// A curse from a mix curse row.
    pub fn mix(roll: u32, id: MixCurseId) -> Self {
        Self {
            kind: CurseKind::Mix,
            roll,
            effect: mix_curse_entry(id).text.to_string(),
            source: CurseSource::Mix(id),
            targets: Vec::new(),
            half_strength: false,
        }
    }

    /// Text written onto each target track.
    pub fn track_text(&self) -> String {
        if self.half_strength {
            format!("{} (Half Strength)", self.effect)
        } else {
            self.effect.clone()
        }
    }

    /// A target curse repeating earlier text.
    pub fn echo(roll: u32, effect: impl Into<String>) -> Self {
        Self {
            kind: CurseKind::Target,
            roll,
            effect: effect.into(),
            source: CurseSource::Echo,
            targets: Vec::new(),
            half_strength: false,
        }
    }
}

impl std::fmt::Display for Curse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.roll, self.effect)
    }
}

/// Outcome of mutation resolution.
///
/// Control signals are variants, so no display text can be mistaken for
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "effect")]
pub enum MutationEffect {
    /// A constraint to apply to the track.
    Normal {
        /// Display text.
        text: String,
        /// Rows whose mechanics apply on acceptance.
        entries: Vec<MutationId>,
    },
    /// Nothing changes.
    NoMutation,
    /// The track is deleted.
    DeleteTrack,
    /// The mutation is replaced by a target curse.
    TakeCurseInstead,
}

impl MutationEffect {
    /// A plain constraint from one table row.
    pub fn normal(text: impl Into<String>, id: MutationId) -> Self {
        Self::Normal {
            text: text.into(),
            entries: vec![id],
        }
    }

    /// Merge two outcomes rolled together.
    ///
    /// A curse swap wins over a deletion, which wins over constraints;
    /// constraint texts join with "AND".
    pub fn combine(self, other: Self) -> Self {
        use MutationEffect::*;
        match (self, other) {
            (TakeCurseInstead, _) | (_, TakeCurseInstead) => TakeCurseInstead,
            (DeleteTrack, _) | (_, DeleteTrack) => DeleteTrack,
            (NoMutation, x) | (x, NoMutation) => x,
            (
                Normal {
                    text: a,
                    entries: mut ea,
                },
                Normal {
                    text: b,
                    entries: eb,
                },
            ) => {
                ea.extend(eb);
                Normal {
                    text: format!("{a} AND {b}"),
                    entries: ea,
                }
            }
        }
    }

    /// Display text.
    pub fn text(&self) -> &str {
        match self {
            Self::Normal { text, .. } => text,
            Self::NoMutation => NO_MUTATION_TEXT,
            Self::DeleteTrack => "Delete Track.",
            Self::TakeCurseInstead => "Take a Target Curse instead.",
        }
    }
}

/// A rolled mutation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// The d100 roll that produced it (first roll when several combined).
    pub roll: u32,
    /// Resolved outcome.
    pub effect: MutationEffect,
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mutation ({}): {}", self.roll, self.effect.text())
    }
}

/// One pre-rolled room of a seeded run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRoom {
    /// Planned track type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Planned mutation row.
    pub mutation: MutationId,
}
