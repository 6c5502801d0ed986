//! Target curse and mix curse tables (sparse d100 breakpoints).

use serde::{Deserialize, Serialize};

use super::{Breakpoint, resolve_breakpoint};

/// Stable identity of a target curse entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetCurseId {
    /// The curse fizzles.
    Fizzle,
    /// Mute an element.
    MuteElement,
    /// Lo-fi filter.
    LoFi,
    /// Pitch down an octave.
    PitchDown,
    /// Detune the lead.
    Detune,
    /// Strip to two elements.
    StripDown,
    /// Force an extra room.
    ForceRoom,
    /// Coin flip for an extra room.
    CoinFlipRoom,
    /// Two mutations next room.
    DoubleMutation,
    /// Target becomes the permanent curse target.
    CurseMagnet,
    /// Reverse the target track.
    ReverseTrack,
    /// Apply the previous curse again.
    ApplyLast,
    /// Two curses strike.
    DoubleCurse,
    /// Halve the target's length.
    HalveLength,
    /// Delete the target track.
    DeleteTrack,
}

/// Non-textual behaviour attached to a target curse entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCurseMechanics {
    /// The curse changes nothing (hard mode re-rolls it once).
    pub no_effect: bool,
    /// Roll for two independent curses instead.
    pub reroll_twice: bool,
    /// Copy the most recent curse onto a chosen track.
    pub apply_last_curse: bool,
    /// Mark the target deleted.
    pub delete_track: bool,
    /// Add a forced room.
    pub force_room: bool,
    /// Percent chance of a forced room.
    pub force_room_chance: Option<u32>,
    /// Next room rolls two mutations.
    pub double_mutation_next_room: bool,
    /// Every later target curse hits this target.
    pub becomes_curse_target: bool,
}

impl TargetCurseMechanics {
    /// No special behaviour.
    pub const NONE: Self = Self {
        no_effect: false,
        reroll_twice: false,
        apply_last_curse: false,
        delete_track: false,
        force_room: false,
        force_room_chance: None,
        double_mutation_next_room: false,
        becomes_curse_target: false,
    };
}

/// One row of the target curse table.
#[derive(Debug, Clone, Copy)]
pub struct TargetCurseEntry {
    /// Lowest roll this entry answers.
    pub at: u32,
    /// Stable identity.
    pub id: TargetCurseId,
    /// Display text.
    pub text: &'static str,
    /// Special behaviour.
    pub mechanics: TargetCurseMechanics,
}

impl Breakpoint for TargetCurseEntry {
    fn breakpoint(&self) -> u32 {
        self.at
    }
}

const fn target(at: u32, id: TargetCurseId, text: &'static str) -> TargetCurseEntry {
    TargetCurseEntry {
        at,
        id,
        text,
        mechanics: TargetCurseMechanics::NONE,
    }
}

/// Every target curse, ordered by breakpoint.
pub static TARGET_CURSES: [TargetCurseEntry; 15] = [
    TargetCurseEntry {
        at: 1,
        id: TargetCurseId::Fizzle,
        text: "The curse fizzles. Ignore it.",
        mechanics: TargetCurseMechanics {
            no_effect: true,
            ..TargetCurseMechanics::NONE
        },
    },
    target(8, TargetCurseId::MuteElement, "Mute one element of the track."),
    target(16, TargetCurseId::LoFi, "Run the whole track through a lo-fi filter."),
    target(24, TargetCurseId::PitchDown, "Pitch the track down an octave."),
    target(32, TargetCurseId::Detune, "Detune the track's lead element."),
    target(40, TargetCurseId::StripDown, "Strip the track down to two elements."),
    TargetCurseEntry {
        at: 48,
        id: TargetCurseId::ForceRoom,
        text: "Force a Room: the run gains an extra room.",
        mechanics: TargetCurseMechanics {
            force_room: true,
            ..TargetCurseMechanics::NONE
        },
    },
    TargetCurseEntry {
        at: 56,
        id: TargetCurseId::CoinFlipRoom,
        text: "Coin flip: 50% chance to force another Room.",
        mechanics: TargetCurseMechanics {
            force_room_chance: Some(50),
            ..TargetCurseMechanics::NONE
        },
    },
    TargetCurseEntry {
        at: 62,
        id: TargetCurseId::DoubleMutation,
        text: "Double Mutation next Room.",
        mechanics: TargetCurseMechanics {
            double_mutation_next_room: true,
            ..TargetCurseMechanics::NONE
        },
    },
    TargetCurseEntry {
        at: 68,
        id: TargetCurseId::CurseMagnet,
        text: "Curse Magnet: every future Target Curse hits this track.",
        mechanics: TargetCurseMechanics {
            becomes_curse_target: true,
            ..TargetCurseMechanics::NONE
        },
    },
    target(74, TargetCurseId::ReverseTrack, "Reverse the entire track."),
    TargetCurseEntry {
        at: 80,
        id: TargetCurseId::ApplyLast,
        text: "Echo: apply the last curse again to a track of your choice.",
        mechanics: TargetCurseMechanics {
            apply_last_curse: true,
            ..TargetCurseMechanics::NONE
        },
    },
    TargetCurseEntry {
        at: 86,
        id: TargetCurseId::DoubleCurse,
        text: "Roll twice: two curses strike.",
        mechanics: TargetCurseMechanics {
            reroll_twice: true,
            ..TargetCurseMechanics::NONE
        },
    },
    target(92, TargetCurseId::HalveLength, "Cut the track to half its length."),
    TargetCurseEntry {
        at: 97,
        id: TargetCurseId::DeleteTrack,
        text: "Delete Track.",
        mechanics: TargetCurseMechanics {
            delete_track: true,
            ..TargetCurseMechanics::NONE
        },
    },
];

/// Stable identity of a mix curse entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixCurseId {
    /// All remaining tracks share a tempo.
    OneTempo,
    /// All remaining tracks share a key.
    OneKey,
    /// Mono master.
    MonoMaster,
    /// Roll two target curses.
    TwinTargets,
    /// Force an extra room.
    ExtraRoom,
    /// Saturated master bus.
    SaturatedBus,
    /// Roll three target curses.
    TripleTargets,
    /// This is the final room.
    LastRoom,
}

/// Non-textual behaviour attached to a mix curse entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixCurseMechanics {
    /// Re-roll once when rolled before this room.
    pub min_room: Option<u32>,
    /// The current room becomes the run's final room.
    pub last_room: bool,
    /// Chain this many target curses after acceptance.
    pub roll_target_curses: u32,
    /// Add a forced room.
    pub force_room: bool,
}

impl MixCurseMechanics {
    /// No special behaviour.
    pub const NONE: Self = Self {
        min_room: None,
        last_room: false,
        roll_target_curses: 0,
        force_room: false,
    };
}

/// One row of the mix curse table.
#[derive(Debug, Clone, Copy)]
pub struct MixCurseEntry {
    /// Lowest roll this entry answers.
    pub at: u32,
    /// Stable identity.
    pub id: MixCurseId,
    /// Display text.
    pub text: &'static str,
    /// Special behaviour.
    pub mechanics: MixCurseMechanics,
}

impl Breakpoint for MixCurseEntry {
    fn breakpoint(&self) -> u32 {
        self.at
    }
}

const fn mix(at: u32, id: MixCurseId, text: &'static str) -> MixCurseEntry {
    MixCurseEntry {
        at,
        id,
        text,
        mechanics: MixCurseMechanics::NONE,
    }
}

/// Every mix curse, ordered by breakpoint.
pub static MIX_CURSES: [MixCurseEntry; 8] = [
    mix(1, MixCurseId::OneTempo, "Every remaining track must share one tempo."),
    mix(15, MixCurseId::OneKey, "Every remaining track must share one key."),
    mix(30, MixCurseId::MonoMaster, "The final mix is summed to mono."),
    MixCurseEntry {
        at: 45,
        id: MixCurseId::TwinTargets,
        text: "Roll two Target Curses.",
        mechanics: MixCurseMechanics {
            roll_target_curses: 2,
            ..MixCurseMechanics::NONE
        },
    },
    MixCurseEntry {
        at: 60,
        id: MixCurseId::ExtraRoom,
        text: "Force a Room: the run gains an extra room.",
        mechanics: MixCurseMechanics {
            force_room: true,
            ..MixCurseMechanics::NONE
        },
    },
    mix(75, MixCurseId::SaturatedBus, "The master bus gets heavy saturation."),
    MixCurseEntry {
        at: 85,
        id: MixCurseId::TripleTargets,
        text: "Roll three Target Curses.",
        mechanics: MixCurseMechanics {
            roll_target_curses: 3,
            ..MixCurseMechanics::NONE
        },
    },
    MixCurseEntry {
        at: 92,
        id: MixCurseId::LastRoom,
        text: "This is the last Room. The run ends after it.",
        mechanics: MixCurseMechanics {
            min_room: Some(3),
            last_room: true,
            ..MixCurseMechanics::NONE
        },
    },
];

/// Look up the target curse answering a roll.
pub fn target_curse_for_roll(roll: u32) -> &'static TargetCurseEntry {
    resolve_breakpoint(&TARGET_CURSES, roll)
}

/// Look up the mix curse answering a roll.
pub fn mix_curse_for_roll(roll: u32) -> &'static MixCurseEntry {
    resolve_breakpoint(&MIX_CURSES, roll)
}

/// Look up a target curse entry by identity.
pub fn target_curse_entry(id: TargetCurseId) -> &'static TargetCurseEntry {
    TARGET_CURSES
        .iter()
        .find(|e| e.id == id)
        .unwrap_or(&TARGET_CURSES[0])
}

/// Look up a mix curse entry by identity.
pub fn mix_curse_entry(id: MixCurseId) -> &'static MixCurseEntry {
    MIX_CURSES
        .iter()
        .find(|e| e.id == id)
        .unwrap_or(&MIX_CURSES[0])
}
