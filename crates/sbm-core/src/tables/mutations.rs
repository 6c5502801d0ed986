//! Mutation table (sparse d100 breakpoints).
//!
//! Behaviour is keyed by [`MutationId`], never by display text.

use serde::{Deserialize, Serialize};

use super::{Breakpoint, resolve_breakpoint};

/// Stable identity of a mutation table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationId {
    /// Nothing happens.
    NoMutation,
    /// Half-time feel.
    HalfTime,
    /// Reverse a sound.
    ReverseSound,
    /// Mono only.
    MonoOnly,
    /// Three sounds maximum.
    ThreeSounds,
    /// No drums.
    NoDrums,
    /// Single root note.
    OneRoot,
    /// Sample your own voice.
    OwnVoice,
    /// Resample the previous track.
    ResamplePrevious,
    /// Repeat the last mutation.
    RepeatLast,
    /// Bitcrush the main element.
    Bitcrush,
    /// Odd time signature.
    OddMeter,
    /// Ten-minute timer.
    TenMinuteTimer,
    /// Abandon the track type.
    AbandonType,
    /// Copy the previous track's type.
    CopyPreviousType,
    /// A second no-effect entry.
    NothingChanges,
    /// Roll twice and apply both.
    RollTwice,
    /// Five-minute timer.
    FiveMinuteTimer,
    /// Record in one take.
    OneTake,
    /// Secondary roll may delete the track.
    DeleteGamble,
    /// Take a target curse instead of a mutation.
    TakeCurse,
    /// Include silence.
    Silence,
    /// Flip the genre.
    GenreFlip,
    /// Track under one minute.
    OneMinute,
    /// Roll twice, harsher variant.
    ChaosRoom,
}

/// Special handling when an entry is rolled in room one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomOneRule {
    /// Roll again.
    Reroll,
    /// Treat as no mutation.
    NoMutation,
}

/// Non-textual behaviour attached to a mutation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationMechanics {
    /// Room-one override.
    pub room_one: Option<RoomOneRule>,
    /// The entry changes nothing (hard mode re-rolls these).
    pub no_effect: bool,
    /// Roll two mutations and apply both.
    pub roll_twice: bool,
    /// Copy the previous track's most recent mutation.
    pub repeat_last_mutation: bool,
    /// Roll again; at or above this value the track is deleted.
    pub delete_if_high_roll: Option<u32>,
    /// Replace the mutation with a target curse.
    pub take_curse_instead: bool,
    /// Force the player to pick a different track type.
    pub abandon_track_type: bool,
    /// Use the previous track's type.
    pub copy_previous_type: bool,
    /// Start a composing countdown of this many minutes.
    pub timer_minutes: Option<u32>,
}

impl MutationMechanics {
    /// No special behaviour.
    pub const NONE: Self = Self {
        room_one: None,
        no_effect: false,
        roll_twice: false,
        repeat_last_mutation: false,
        delete_if_high_roll: None,
        take_curse_instead: false,
        abandon_track_type: false,
        copy_previous_type: false,
        timer_minutes: None,
    };
}

/// One row of the mutation table.
#[derive(Debug, Clone, Copy)]
pub struct MutationEntry {
    /// Lowest roll this entry answers.
    pub at: u32,
    /// Stable identity.
    pub id: MutationId,
    /// Display text.
    pub text: &'static str,
    /// Special behaviour.
    pub mechanics: MutationMechanics,
}

impl Breakpoint for MutationEntry {
    fn breakpoint(&self) -> u32 {
        self.at
    }
}

const fn plain(at: u32, id: MutationId, text: &'static str) -> MutationEntry {
    MutationEntry {
        at,
        id,
        text,
        mechanics: MutationMechanics::NONE,
    }
}

/// Text shown when a room gets no mutation.
pub const NO_MUTATION_TEXT: &str = "No Mutation.";

/// Every mutation, ordered by breakpoint.
pub static MUTATIONS: [MutationEntry; 25] = [
    MutationEntry {
        at: 1,
        id: MutationId::NoMutation,
        text: NO_MUTATION_TEXT,
        mechanics: MutationMechanics {
            no_effect: true,
            ..MutationMechanics::NONE
        },
    },
    plain(
        6,
        MutationId::HalfTime,
        "Half-time: the groove must feel half the tempo of the last track.",
    ),
    plain(10, MutationId::ReverseSound, "Reverse at least one sound."),
    plain(14, MutationId::MonoOnly, "Mono only. No stereo width."),
    plain(18, MutationId::ThreeSounds, "Use no more than three sounds."),
    plain(22, MutationId::NoDrums, "No percussive elements allowed."),
    plain(26, MutationId::OneRoot, "Stay on a single root note."),
    plain(30, MutationId::OwnVoice, "Include a sample of your own voice."),
    MutationEntry {
        at: 34,
        id: MutationId::ResamplePrevious,
        text: "Resample a piece of the previous track.",
        mechanics: MutationMechanics {
            room_one: Some(RoomOneRule::Reroll),
            ..MutationMechanics::NONE
        },
    },
    MutationEntry {
        at: 38,
        id: MutationId::RepeatLast,
        text: "Repeat the last mutation.",
        mechanics: MutationMechanics {
            repeat_last_mutation: true,
            ..MutationMechanics::NONE
        },
    },
    plain(42, MutationId::Bitcrush, "Bitcrush the main element."),
    plain(46, MutationId::OddMeter, "Write in an odd time signature."),
    MutationEntry {
        at: 50,
        id: MutationId::TenMinuteTimer,
        text: "Ten-minute timer: finish this room in 10 minutes.",
        mechanics: MutationMechanics {
            timer_minutes: Some(10),
            ..MutationMechanics::NONE
        },
    },
    MutationEntry {
        at: 54,
        id: MutationId::AbandonType,
        text: "Abandon the track type: choose a different one.",
        mechanics: MutationMechanics {
            abandon_track_type: true,
            ..MutationMechanics::NONE
        },
    },
    MutationEntry {
        at: 58,
        id: MutationId::CopyPreviousType,
        text: "Same type as the previous track.",
        mechanics: MutationMechanics {
            room_one: Some(RoomOneRule::NoMutation),
            copy_previous_type: true,
            ..MutationMechanics::NONE
        },
    },
    MutationEntry {
        at: 62,
        id: MutationId::NothingChanges,
        text: "Nothing changes. No Mutation.",
        mechanics: MutationMechanics {
            no_effect: true,
            ..MutationMechanics::NONE
        },
    },
    MutationEntry {
        at: 66,
        id: MutationId::RollTwice,
        text: "Roll twice and apply both.",
        mechanics: MutationMechanics {
            roll_twice: true,
            ..MutationMechanics::NONE
        },
    },
    MutationEntry {
        at: 72,
        id: MutationId::FiveMinuteTimer,
        text: "Speedrun: finish this room in 5 minutes.",
        mechanics: MutationMechanics {
            timer_minutes: Some(5),
            ..MutationMechanics::NONE
        },
    },
    plain(76, MutationId::OneTake, "Record every part in one take. No edits."),
    MutationEntry {
        at: 80,
        id: MutationId::DeleteGamble,
        text: "Roll again: on 50 or higher, delete this track.",
        mechanics: MutationMechanics {
            delete_if_high_roll: Some(50),
            ..MutationMechanics::NONE
        },
    },
    MutationEntry {
        at: 84,
        id: MutationId::TakeCurse,
        text: "Refuse the mutation: take a Target Curse instead.",
        mechanics: MutationMechanics {
            room_one: Some(RoomOneRule::Reroll),
            take_curse_instead: true,
            ..MutationMechanics::NONE
        },
    },
    plain(88, MutationId::Silence, "Include four bars of total silence."),
    plain(92, MutationId::GenreFlip, "Flip the genre to its opposite scene."),
    plain(96, MutationId::OneMinute, "The track must be under one minute."),
    MutationEntry {
        at: 99,
        id: MutationId::ChaosRoom,
        text: "Chaos Room: roll twice and apply both.",
        mechanics: MutationMechanics {
            room_one: Some(RoomOneRule::NoMutation),
            roll_twice: true,
            ..MutationMechanics::NONE
        },
    },
];

/// Look up the mutation answering a roll.
pub fn mutation_for_roll(roll: u32) -> &'static MutationEntry {
    resolve_breakpoint(&MUTATIONS, roll)
}

/// Look up a mutation entry by identity.
pub fn mutation_entry(id: MutationId) -> &'static MutationEntry {
    MUTATIONS
        .iter()
        .find(|e| e.id == id)
        .unwrap_or(&MUTATIONS[0])
}

#[cfg(test)]
mod tests {
    use super::super::breakpoint_span;
    use super::*;

    #[test]
    fn breakpoints_ascend_from_one() {
        assert_eq!(MUTATIONS[0].at, 1);
        for pair in MUTATIONS.windows(2) {
            assert!(pair[0].at < pair[1].at, "{:?} out of order", pair[1].id);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for e in &MUTATIONS {
            assert!(seen.insert(e.id), "duplicate {:?}", e.id);
        }
    }

    #[test]
    fn lookup_by_roll() {
        assert_eq!(mutation_for_roll(1).id, MutationId::NoMutation);
        assert_eq!(mutation_for_roll(5).id, MutationId::NoMutation);
        assert_eq!(mutation_for_roll(6).id, MutationId::HalfTime);
        assert_eq!(mutation_for_roll(98).id, MutationId::OneMinute);
        assert_eq!(mutation_for_roll(100).id, MutationId::ChaosRoom);
    }

    #[test]
    fn last_entry_reaches_100() {
        let last = &MUTATIONS[MUTATIONS.len() - 1];
        assert_eq!(breakpoint_span(&MUTATIONS, last), (99, 100));
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(mutation_entry(MutationId::TakeCurse).at, 84);
        assert!(mutation_entry(MutationId::TakeCurse).mechanics.take_curse_instead);
    }

    #[test]
    fn text_never_drives_behaviour() {
        // "Nothing changes. No Mutation." contains the no-mutation text but is
        // its own entry.
        let e = mutation_for_roll(62);
        assert_eq!(e.id, MutationId::NothingChanges);
        assert!(e.mechanics.no_effect);
        assert!(!mutation_for_roll(6).mechanics.no_effect);
    }
}
