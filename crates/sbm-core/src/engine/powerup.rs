//! The five power-ups and the shared pool they draw from.

use serde::{Deserialize, Serialize};

use crate::error::{SbmError, SbmResult};
use crate::run::{CurseKind, PendingCurse, Phase};

use super::Turn;

/// A power-up the player can spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerUpKind {
    /// Discard the current curse and roll the curse check again.
    Redirect,
    /// Protect one track from curses for the rest of the run.
    Lock,
    /// Skip the mutation and take a Target Curse.
    PainShift,
    /// Share the current curse with a second track at half strength.
    Split,
    /// Undo the last curse; the next room is the last.
    Breath,
}

impl PowerUpKind {
    /// Every power-up, in menu order.
    pub fn all() -> &'static [Self] {
        &[
            Self::Redirect,
            Self::Lock,
            Self::PainShift,
            Self::Split,
            Self::Breath,
        ]
    }

    /// Parse a power-up name (case-insensitive).
    pub fn parse(s: &str) -> SbmResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "redirect" => Ok(Self::Redirect),
            "lock" | "room lock" | "room-lock" => Ok(Self::Lock),
            "painshift" | "pain shift" | "pain-shift" => Ok(Self::PainShift),
            "split" | "split the wound" => Ok(Self::Split),
            "breath" | "one last breath" => Ok(Self::Breath),
            _ => Err(SbmError::UnknownPowerUp(s.to_string())),
        }
    }

    /// One-line rules text.
    pub fn description(self) -> &'static str {
        match self {
            Self::Redirect => "Discard the current curse and re-roll the curse check.",
            Self::Lock => "Protect a track from curses and deletion. Once per run.",
            Self::PainShift => "Skip the mutation and take a Target Curse now. After room 3.",
            Self::Split => "Share the current Target Curse with another track at half strength.",
            Self::Breath => "Undo the last curse. The next room is the final room. Once per run.",
        }
    }
}

impl std::fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redirect => write!(f, "Redirect"),
            Self::Lock => write!(f, "Room Lock"),
            Self::PainShift => write!(f, "Pain Shift"),
            Self::Split => write!(f, "Split the Wound"),
            Self::Breath => write!(f, "One Last Breath"),
        }
    }
}

/// Pain Shift is only allowed after this room.
const PAIN_SHIFT_MIN_ROOM: u32 = 3;

impl Turn<'_> {
    pub(super) fn use_power_up(&mut self, kind: PowerUpKind) {
        let run = &self.run;
        if run.power_ups == 0 || run.used_power_up_this_room || !run.phase.allows_power_ups() {
            log::debug!("{kind} refused in {} (power-ups {})", run.phase, run.power_ups);
            return;
        }
        let used = match kind {
            PowerUpKind::Redirect => self.redirect(),
            PowerUpKind::Lock => self.room_lock(),
            PowerUpKind::PainShift => self.pain_shift(),
            PowerUpKind::Split => self.split_wound(),
            PowerUpKind::Breath => self.last_breath(),
        };
        if !used {
            log::debug!("{kind} refused: requirements not met");
            return;
        }
        self.run.power_ups -= 1;
        self.run.used_power_up_this_room = true;
        self.run.conditional_power_up_active = false;
        self.run.log(format!("{kind} used ({} Power-Ups left)", self.run.power_ups));
    }

    fn redirect(&mut self) -> bool {
        if self.run.phase != Phase::CurseResult {
            return false;
        }
        self.run.log("Redirect: the curse is discarded");
        self.run.current_curse = None;
        self.run.split_wound_active = false;
        self.run.phase = Phase::CurseCheck;
        true
    }

    fn room_lock(&mut self) -> bool {
        if self.run.used_room_lock || self.run.tracks.iter().all(|t| t.deleted) {
            return false;
        }
        self.run.resume_phase = Some(self.run.phase);
        self.run.phase = Phase::RoomLockSelect;
        self.run.log("Room Lock: choose a track to protect");
        true
    }

    fn pain_shift(&mut self) -> bool {
        if self.run.room <= PAIN_SHIFT_MIN_ROOM {
            return false;
        }
        self.run.pain_shift_active = true;
        self.run.log("Pain Shift: the mutation is skipped for a Target Curse");
        match self.run.phase {
            Phase::CurseResult => {
                self.run.pending_curse.queued_target_curses += 1;
            }
            _ => {
                self.run.current_curse = None;
                self.run.pending_curse = PendingCurse::default();
                self.resolve_target_curse();
            }
        }
        true
    }

    fn split_wound(&mut self) -> bool {
        let run = &self.run;
        let is_target = run
            .current_curse
            .as_ref()
            .is_some_and(|c| c.kind == CurseKind::Target);
        let other = run
            .available_tracks()
            .into_iter()
            .any(|i| !run.pending_curse.targets.contains(&i));
        if run.phase != Phase::CurseResult || !is_target || !other {
            return false;
        }
        self.run.phase = Phase::SplitWoundSelect;
        self.run.log("Split the Wound: choose a second track");
        true
    }

    fn last_breath(&mut self) -> bool {
        if self.run.used_one_last_breath {
            return false;
        }
        match self.run.curses.pop() {
            Some(curse) => {
                let text = curse.track_text();
                for &index in &curse.targets {
                    if let Some(track) = self.run.tracks.get_mut(index) {
                        if let Some(at) = track.curses.iter().rposition(|c| *c == text) {
                            track.curses.remove(at);
                        }
                    }
                }
                self.run.log(format!("One Last Breath: {curse} reversed"));
            }
            None => self.run.log("One Last Breath: no curse to reverse"),
        }
        self.run.used_one_last_breath = true;
        self.run.final_room_pending = true;
        self.run.log("The next room is the final room");
        true
    }

    pub(super) fn select_room_lock_target(&mut self, index: usize) {
        if self.run.phase != Phase::RoomLockSelect || self.run.used_room_lock {
            return;
        }
        if !self.run.tracks.get(index).is_some_and(|t| !t.deleted) {
            return;
        }
        self.run.room_lock_track = Some(index);
        self.run.used_room_lock = true;
        self.run.pending_curse.targets.retain(|t| *t != index);
        self.run.log(format!("Room Lock: track {} is protected", index + 1));
        self.run.phase = self.run.resume_phase.take().unwrap_or(Phase::CurseCheck);
    }
}
