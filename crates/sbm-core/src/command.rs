//! Engine commands and their text form.

use crate::engine::PowerUpKind;
use crate::error::{SbmError, SbmResult};
use crate::run::Phase;
use crate::tables::RunTag;
use crate::tables::track_types::find_track_type;

/// One player action. Track indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Roll the track type for this room.
    RollTrackType,
    /// Pick the track type by hand.
    SelectTrackType(String),
    /// Replace an abandoned track type.
    ReselectTrackType(String),
    /// Roll to see whether the room is cursed.
    RollCurseCheck,
    /// Name the track a target curse hits.
    SelectCurseTarget(usize),
    /// Name the track an echoed curse hits.
    SelectApplyLastCurseTarget(usize),
    /// Name the second track for Split the Wound.
    SelectSplitWoundTarget(usize),
    /// Name the track Room Lock protects.
    SelectRoomLockTarget(usize),
    /// Accept the current curse.
    AcceptCurse,
    /// Roll the room's mutation.
    RollMutation,
    /// Accept the current mutation.
    AcceptMutation,
    /// Commit the composed track.
    FinalizeRoom,
    /// Roll for power-ups.
    RollPowerUp,
    /// Move on to the next room.
    NextRoom,
    /// Spend a power-up.
    UsePowerUp(PowerUpKind),
    /// Finish the run now.
    EndRun,
    /// Pin or unpin a tag on a finished run.
    ToggleTag(RunTag),
}

impl Command {
    /// Parse a line of player input.
    ///
    /// Generic verbs (`roll`, `accept`, `pick <n>`) resolve against the
    /// current phase. Track numbers in text are one-based.
    pub fn parse(input: &str, phase: Phase) -> SbmResult<Self> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "roll" => match rest.to_lowercase().as_str() {
                "" => roll_for(phase),
                "type" => Ok(Self::RollTrackType),
                "curse" => Ok(Self::RollCurseCheck),
                "mutation" => Ok(Self::RollMutation),
                "power" | "powerup" => Ok(Self::RollPowerUp),
                other => Err(SbmError::InvalidChoice(format!("cannot roll '{other}'"))),
            },
            "type" => Ok(Self::SelectTrackType(track_type(rest)?)),
            "reselect" => Ok(Self::ReselectTrackType(track_type(rest)?)),
            "target" => Ok(Self::SelectCurseTarget(track_number(rest)?)),
            "echo" => Ok(Self::SelectApplyLastCurseTarget(track_number(rest)?)),
            "split" => Ok(Self::SelectSplitWoundTarget(track_number(rest)?)),
            "lock" => Ok(Self::SelectRoomLockTarget(track_number(rest)?)),
            "pick" => select_for(phase, track_number(rest)?),
            "accept" => match phase {
                Phase::CurseResult => Ok(Self::AcceptCurse),
                Phase::MutationResult => Ok(Self::AcceptMutation),
                _ => Err(SbmError::InvalidChoice(format!(
                    "nothing to accept during {phase}"
                ))),
            },
            "finalize" | "done" => Ok(Self::FinalizeRoom),
            "next" => Ok(Self::NextRoom),
            "power" | "use" => Ok(Self::UsePowerUp(PowerUpKind::parse(rest)?)),
            "end" => Ok(Self::EndRun),
            "tag" => Ok(Self::ToggleTag(RunTag::parse(rest)?)),
            "" => Err(SbmError::InvalidChoice("empty command".to_string())),
            _ => Err(SbmError::UnknownCommand(trimmed.to_string())),
        }
    }
}

fn roll_for(phase: Phase) -> SbmResult<Command> {
    match phase {
        Phase::TrackType => Ok(Command::RollTrackType),
        Phase::CurseCheck => Ok(Command::RollCurseCheck),
        Phase::Mutation => Ok(Command::RollMutation),
        Phase::PowerUpRoll => Ok(Command::RollPowerUp),
        _ => Err(SbmError::InvalidChoice(format!(
            "nothing to roll during {phase}"
        ))),
    }
}

fn select_for(phase: Phase, index: usize) -> SbmResult<Command> {
    match phase {
        Phase::CurseTargetSelect => Ok(Command::SelectCurseTarget(index)),
        Phase::CurseApplyLastSelect => Ok(Command::SelectApplyLastCurseTarget(index)),
        Phase::SplitWoundSelect => Ok(Command::SelectSplitWoundTarget(index)),
        Phase::RoomLockSelect => Ok(Command::SelectRoomLockTarget(index)),
        _ => Err(SbmError::InvalidChoice(format!(
            "no track to pick during {phase}"
        ))),
    }
}

fn track_type(name: &str) -> SbmResult<String> {
    find_track_type(name)
        .map(str::to_string)
        .ok_or_else(|| SbmError::UnknownTrackType(name.to_string()))
}

fn track_number(s: &str) -> SbmResult<usize> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(SbmError::InvalidChoice(format!(
            "expected a track number, got '{s}'"
        ))),
    }
}
