//! The run aggregate and the records it owns.
//!
//! A [`Run`] is the whole state of one play session. The engine is the
//! only writer; views read it and persistence serialises it whole.

pub mod log;
pub mod track;

pub use log::LogEntry;
pub use track::{Curse, CurseKind, CurseSource, Mutation, MutationEffect, SeededRoom, Track};

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RunConfig;
use crate::error::{SbmError, SbmResult};
use crate::tables::{RunTag, TargetMethod};

/// Rule variant chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Standard rules.
    Normal,
    /// No-effect results are re-rolled.
    Hard,
    /// The first curse is ignored and harsh mutations re-rolled.
    Casual,
    /// Every curse check is a curse.
    Cursed,
    /// Track types for the first rooms are pre-rolled.
    Seeded,
    /// The run is a single room.
    Quick,
}

impl GameMode {
    /// Every mode, in menu order.
    pub fn all() -> &'static [Self] {
        &[
            Self::Normal,
            Self::Hard,
            Self::Casual,
            Self::Cursed,
            Self::Seeded,
            Self::Quick,
        ]
    }

    /// Parse a mode name (case-insensitive).
    pub fn parse(s: &str) -> SbmResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            "casual" => Ok(Self::Casual),
            "cursed" => Ok(Self::Cursed),
            "seeded" => Ok(Self::Seeded),
            "quick" => Ok(Self::Quick),
            _ => Err(SbmError::UnknownMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Hard => write!(f, "Hard"),
            Self::Casual => write!(f, "Casual"),
            Self::Cursed => write!(f, "Cursed"),
            Self::Seeded => write!(f, "Seeded"),
            Self::Quick => write!(f, "Quick"),
        }
    }
}

/// Where the room state machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Choose or roll the track type.
    TrackType,
    /// A mutation forced the player to pick another type.
    TrackTypeReselect,
    /// Roll to see whether the room is cursed.
    CurseCheck,
    /// The player names a track for a target curse.
    CurseTargetSelect,
    /// The player names a track for an echoed curse.
    CurseApplyLastSelect,
    /// The player names a second track for Split the Wound.
    SplitWoundSelect,
    /// The player names the track to protect with Room Lock.
    RoomLockSelect,
    /// A curse awaits acceptance.
    CurseResult,
    /// Roll the room's mutation.
    Mutation,
    /// A mutation awaits acceptance.
    MutationResult,
    /// The player composes the track.
    Compose,
    /// Roll for power-ups.
    #[serde(rename = "powerup-roll")]
    PowerUpRoll,
    /// Advance to the next room.
    NextRoom,
}

impl Phase {
    /// Whether power-ups may be activated in this phase.
    pub fn allows_power_ups(self) -> bool {
        matches!(self, Self::CurseCheck | Self::Mutation | Self::CurseResult)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TrackType => "track-type",
            Self::TrackTypeReselect => "track-type-reselect",
            Self::CurseCheck => "curse-check",
            Self::CurseTargetSelect => "curse-target-select",
            Self::CurseApplyLastSelect => "curse-apply-last-select",
            Self::SplitWoundSelect => "split-wound-select",
            Self::RoomLockSelect => "room-lock-select",
            Self::CurseResult => "curse-result",
            Self::Mutation => "mutation",
            Self::MutationResult => "mutation-result",
            Self::Compose => "compose",
            Self::PowerUpRoll => "powerup-roll",
            Self::NextRoom => "next-room",
        };
        f.write_str(name)
    }
}

/// Working set between a curse roll and its acceptance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCurse {
    /// Resolved target track indices, without repeats.
    pub targets: Vec<usize>,
    /// Method waiting on a player choice.
    pub method: Option<TargetMethod>,
    /// Stage-one roll that produced `method`.
    pub method_roll: Option<u32>,
    /// Targeting methods still to resolve for this curse.
    pub remaining_methods: u32,
    /// Inside a two-targets expansion.
    pub nested: bool,
    /// Target curses still owed by the current chain.
    pub queued_target_curses: u32,
    /// Target curse resolutions so far in the current chain.
    pub chain_depth: u32,
}

/// One play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Run identity.
    pub id: Uuid,
    /// When the run started.
    pub created_at: DateTime<Utc>,
    /// Seed of the run's dice.
    pub seed: u64,
    /// Rule variant.
    pub mode: GameMode,
    /// The player picks track types by hand.
    pub manual_track_type: bool,
    /// Current room, starting at 1.
    pub room: u32,
    /// Current phase.
    pub phase: Phase,
    /// Power-ups held.
    pub power_ups: u32,
    /// A power-up was used this room.
    pub used_power_up_this_room: bool,
    /// Index of the room-locked track.
    pub room_lock_track: Option<usize>,
    /// Room Lock has been spent.
    pub used_room_lock: bool,
    /// One Last Breath has been spent.
    pub used_one_last_breath: bool,
    /// Extra rooms owed by curses.
    pub forced_rooms: u32,
    /// Finalised tracks, oldest first.
    pub tracks: Vec<Track>,
    /// Accepted curses, oldest first.
    pub curses: Vec<Curse>,
    /// Accepted mutations, oldest first.
    pub mutations: Vec<Mutation>,
    /// Run log, oldest first.
    pub log: Vec<LogEntry>,
    /// Track being made this room.
    pub current_track: Option<Track>,
    /// Mutation awaiting acceptance.
    pub current_mutation: Option<Mutation>,
    /// Curse awaiting acceptance.
    pub current_curse: Option<Curse>,
    /// Pre-rolled rooms (seeded mode).
    pub seeded_rooms: Vec<SeededRoom>,
    /// Casual mode has spent its ignored curse.
    pub casual_first_curse_ignored: bool,
    /// This room is the final room.
    pub is_last_room: bool,
    /// The next room becomes the final room.
    pub final_room_pending: bool,
    /// Next room rolls two mutations.
    pub double_mutation_next_room: bool,
    /// This room rolls two mutations.
    pub double_mutation_this_room: bool,
    /// Track every target curse is drawn to.
    pub curse_target_track: Option<usize>,
    /// Composing deadline for this room.
    pub timer_ends_at: Option<DateTime<Utc>>,
    /// A mutation asked for a new track type.
    pub pending_track_type_reselect: bool,
    /// Curse targeting working set.
    pub pending_curse: PendingCurse,
    /// Split the Wound is halving the current curse.
    pub split_wound_active: bool,
    /// Pain Shift skips this room's mutation.
    pub pain_shift_active: bool,
    /// A mutation was swapped for a curse this room.
    pub mutation_skipped: bool,
    /// Phase to return to after a room-lock selection.
    pub resume_phase: Option<Phase>,
    /// A conditional power-up is held and must be used this room.
    pub conditional_power_up_active: bool,
    /// A conditional power-up was earned this room.
    pub conditional_power_up_earned: bool,
    /// The run is over.
    pub finished: bool,
    /// Tags pinned on the finished run.
    pub tags: BTreeSet<RunTag>,
}

impl Run {
    /// A fresh run in room 1.
    pub fn new(config: &RunConfig, seed: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            seed,
            mode: config.mode,
            manual_track_type: config.manual_track_type,
            room: 1,
            phase: Phase::TrackType,
            power_ups: 0,
            used_power_up_this_room: false,
            room_lock_track: None,
            used_room_lock: false,
            used_one_last_breath: false,
            forced_rooms: 0,
            tracks: Vec::new(),
            curses: Vec::new(),
            mutations: Vec::new(),
            log: Vec::new(),
            current_track: None,
            current_mutation: None,
            current_curse: None,
            seeded_rooms: Vec::new(),
            casual_first_curse_ignored: false,
            is_last_room: false,
            final_room_pending: false,
            double_mutation_next_room: false,
            double_mutation_this_room: false,
            curse_target_track: None,
            timer_ends_at: None,
            pending_track_type_reselect: false,
            pending_curse: PendingCurse::default(),
            split_wound_active: false,
            pain_shift_active: false,
            mutation_skipped: false,
            resume_phase: None,
            conditional_power_up_active: false,
            conditional_power_up_earned: false,
            finished: false,
            tags: BTreeSet::new(),
        }
    }

    /// Append a line to the run log.
    pub fn log(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        ::log::debug!("room {}: {msg}", self.room);
        self.log.push(LogEntry {
            room: self.room,
            msg,
            time: Utc::now(),
        });
    }

    /// Whether a committed track can be hit by curses.
    ///
    /// Deleted and room-locked tracks are never available.
    pub fn is_available(&self, index: usize) -> bool {
        self.tracks.get(index).is_some_and(|t| !t.deleted) && self.room_lock_track != Some(index)
    }

    /// Indices of every committed track a curse may hit, oldest first.
    pub fn available_tracks(&self) -> Vec<usize> {
        (0..self.tracks.len())
            .filter(|i| self.is_available(*i))
            .collect()
    }

    /// Time left on the room timer, if one is running.
    pub fn timer_remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.timer_ends_at
            .map(|end| (end - now).max(chrono::Duration::zero()))
    }

    /// The most recent committed track.
    pub fn previous_track(&self) -> Option<&Track> {
        self.tracks.last()
    }
}
