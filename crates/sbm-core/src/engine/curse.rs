//! Curse check, target and mix curse resolution, and curse acceptance.

use crate::run::{Curse, CurseSource, GameMode, PendingCurse, Phase};
use crate::tables::curses::{
    mix_curse_entry, mix_curse_for_roll, target_curse_entry, target_curse_for_roll,
};
use crate::tables::D100;
use crate::targeting::{self, TargetingStep};

use super::{MAX_CURSE_DEPTH, Turn};

/// Lowest curse check roll that brings a curse.
const CURSE_THRESHOLD: u32 = 71;

/// Lowest curse check roll that brings a mix curse.
const MIX_CURSE_THRESHOLD: u32 = 99;

impl Turn<'_> {
    pub(super) fn roll_curse_check(&mut self) {
        if self.run.phase != Phase::CurseCheck || self.run.current_track.is_none() {
            return;
        }
        self.run.pending_curse = PendingCurse::default();
        self.run.current_curse = None;
        self.run.split_wound_active = false;

        if self.run.is_last_room {
            self.run.log("Final Room: Target Curse guaranteed");
            self.resolve_target_curse();
            return;
        }

        let mut roll = self.dice.roll(D100);
        self.run.log(format!("Curse Check Roll: {roll}"));
        match self.run.mode {
            GameMode::Cursed => {
                roll = CURSE_THRESHOLD;
                self.run.log(format!("Cursed Mode: roll forced to {roll}"));
            }
            GameMode::Casual if roll >= CURSE_THRESHOLD && !self.run.casual_first_curse_ignored => {
                self.run.casual_first_curse_ignored = true;
                roll = 1;
                self.run.log("Casual Mode: first curse ignored");
            }
            _ => {}
        }

        if roll < CURSE_THRESHOLD {
            self.run.log("No curse this room");
            self.finish_curses();
        } else if roll < MIX_CURSE_THRESHOLD {
            self.resolve_target_curse();
        } else {
            self.resolve_mix_curse();
        }
    }

    /// Roll one target curse and work out what it hits.
    pub(super) fn resolve_target_curse(&mut self) {
        self.run.pending_curse.chain_depth += 1;
        if self.run.pending_curse.chain_depth > MAX_CURSE_DEPTH {
            log::warn!(
                "curse chain in room {} passed {MAX_CURSE_DEPTH} resolutions",
                self.run.room
            );
            self.run.log(format!("Curse chain stopped after {MAX_CURSE_DEPTH} curses"));
            self.run.pending_curse.queued_target_curses = 0;
            self.run.current_curse = None;
            self.finish_curses();
            return;
        }

        let mut roll = self.dice.roll(D100);
        let mut entry = target_curse_for_roll(roll);
        if self.run.mode == GameMode::Hard && entry.mechanics.no_effect {
            self.run.log(format!("Hard Mode: re-rolling '{}' ({roll})", entry.text));
            roll = self.dice.roll(D100);
            entry = target_curse_for_roll(roll);
        }
        self.run.log(format!("Target Curse Roll: {roll} → {}", entry.text));

        if entry.mechanics.reroll_twice {
            self.run.pending_curse.queued_target_curses += 1;
            self.resolve_target_curse();
            return;
        }

        if entry.mechanics.apply_last_curse {
            let Some(last) = self.run.curses.last() else {
                self.run.log("No previous curse to apply");
                self.next_in_chain();
                return;
            };
            let echo = Curse::echo(roll, last.effect.clone());
            self.run.log(format!("Apply Last Curse: {}", echo.effect));
            self.run.current_curse = Some(echo);
            self.run.pending_curse.targets.clear();
            if self.run.available_tracks().is_empty() {
                self.run.log("No track available for the curse");
                self.run.phase = Phase::CurseResult;
            } else {
                self.run.phase = Phase::CurseApplyLastSelect;
            }
            return;
        }

        self.run.current_curse = Some(Curse::target(roll, entry.id));
        let magnet = self
            .run
            .curse_target_track
            .filter(|t| self.run.is_available(*t));
        if let Some(track) = magnet {
            self.run.pending_curse.targets = vec![track];
            self.run.log(format!("Curse Magnet: track {} is the target", track + 1));
            self.run.phase = Phase::CurseResult;
            return;
        }

        targeting::begin(&mut self.run.pending_curse);
        let available = self.run.available_tracks();
        let mut notes = Vec::new();
        let step = targeting::advance(
            &available,
            &mut *self.dice,
            &mut self.run.pending_curse,
            &mut notes,
        );
        self.land_targeting(notes, step);
    }

    fn land_targeting(&mut self, notes: Vec<String>, step: TargetingStep) {
        for note in notes {
            self.run.log(note);
        }
        match step {
            TargetingStep::Resolved => {
                if self.run.pending_curse.targets.is_empty() {
                    self.run.log("No track available for the curse");
                }
                self.run.phase = Phase::CurseResult;
            }
            TargetingStep::AwaitingChoice(method) => {
                self.run.log(format!("{method}: choose a track"));
                self.run.phase = Phase::CurseTargetSelect;
            }
        }
    }

    fn resolve_mix_curse(&mut self) {
        let mut roll = self.dice.roll(D100);
        let mut entry = mix_curse_for_roll(roll);
        if let Some(min_room) = entry.mechanics.min_room {
            if self.run.room < min_room {
                self.run.log(format!(
                    "'{}' needs room {min_room}: re-rolling ({roll})",
                    entry.text
                ));
                roll = self.dice.roll(D100);
                entry = mix_curse_for_roll(roll);
            }
        }
        self.run.log(format!("Mix Curse Roll: {roll} → {}", entry.text));
        if entry.mechanics.last_room {
            self.run.is_last_room = true;
            self.run.log("This is now the final room");
        }
        self.run.current_curse = Some(Curse::mix(roll, entry.id));
        self.run.pending_curse.targets.clear();
        self.run.phase = Phase::CurseResult;
    }

    pub(super) fn select_curse_target(&mut self, index: usize) {
        if self.run.phase != Phase::CurseTargetSelect {
            return;
        }
        let available = self.run.available_tracks();
        let mut notes = Vec::new();
        let step = targeting::choose(
            &available,
            &mut *self.dice,
            &mut self.run.pending_curse,
            index,
            &mut notes,
        );
        if let Some(step) = step {
            self.land_targeting(notes, step);
        }
    }

    pub(super) fn select_apply_last_target(&mut self, index: usize) {
        if self.run.phase != Phase::CurseApplyLastSelect
            || self.run.current_curse.is_none()
            || !self.run.is_available(index)
        {
            return;
        }
        self.run.pending_curse.targets = vec![index];
        self.run.log(format!("Apply Last Curse: track {} chosen", index + 1));
        self.run.phase = Phase::CurseResult;
    }

    pub(super) fn select_split_wound_target(&mut self, index: usize) {
        if self.run.phase != Phase::SplitWoundSelect
            || !self.run.is_available(index)
            || self.run.pending_curse.targets.contains(&index)
        {
            return;
        }
        self.run.pending_curse.targets.push(index);
        self.run.split_wound_active = true;
        self.run.log(format!(
            "Split the Wound: track {} shares the curse at half strength",
            index + 1
        ));
        self.run.phase = Phase::CurseResult;
    }

    pub(super) fn accept_curse(&mut self) {
        if self.run.phase != Phase::CurseResult {
            return;
        }
        let Some(mut curse) = self.run.current_curse.take() else {
            return;
        };
        let targets = std::mem::take(&mut self.run.pending_curse.targets);
        let half = std::mem::take(&mut self.run.split_wound_active);
        self.run.pending_curse.method = None;
        self.run.pending_curse.method_roll = None;

        self.run.log(format!("Curse accepted: {curse}"));
        curse.half_strength = half;
        let text = curse.track_text();
        for &index in &targets {
            if let Some(track) = self.run.tracks.get_mut(index) {
                track.curses.push(text.clone());
                curse.targets.push(index);
                self.run.log(format!("Track {}: {text}", index + 1));
            }
        }

        match curse.source {
            CurseSource::Target(id) => {
                let m = target_curse_entry(id).mechanics;
                if m.delete_track {
                    if half {
                        self.run.log("Half strength: no track is deleted");
                    } else {
                        for &index in &targets {
                            if let Some(track) = self.run.tracks.get_mut(index) {
                                track.deleted = true;
                                self.run.log(format!("Track {} deleted", index + 1));
                            }
                        }
                    }
                }
                if m.force_room {
                    self.force_room();
                }
                if let Some(chance) = m.force_room_chance {
                    let roll = self.dice.roll(D100);
                    if roll > D100 - chance {
                        self.run.log(format!("Force Room Roll: {roll} → forced"));
                        self.force_room();
                    } else {
                        self.run.log(format!("Force Room Roll: {roll} → spared"));
                    }
                }
                if m.double_mutation_next_room {
                    self.run.double_mutation_next_room = true;
                    self.run.log("Next room rolls two mutations");
                }
                if m.becomes_curse_target && !half {
                    if let Some(&first) = targets.first() {
                        self.run.curse_target_track = Some(first);
                        self.run.log(format!("Track {} is now the curse target", first + 1));
                    }
                }
            }
            CurseSource::Mix(id) => {
                let m = mix_curse_entry(id).mechanics;
                if m.force_room {
                    self.force_room();
                }
                if m.roll_target_curses > 0 {
                    self.run.pending_curse.queued_target_curses += m.roll_target_curses;
                    self.run.log(format!("{} Target Curses to roll", m.roll_target_curses));
                }
            }
            CurseSource::Echo => {}
        }
        self.run.curses.push(curse);
        self.next_in_chain();
    }

    fn force_room(&mut self) {
        self.run.forced_rooms += 1;
        self.run.log(format!("Extra room forced ({} owed)", self.run.forced_rooms));
    }

    /// Resolve the next queued target curse, or leave the curse stage.
    fn next_in_chain(&mut self) {
        if self.run.pending_curse.queued_target_curses > 0 {
            self.run.pending_curse.queued_target_curses -= 1;
            self.resolve_target_curse();
        } else {
            self.finish_curses();
        }
    }

    fn finish_curses(&mut self) {
        if self.run.pain_shift_active || self.run.mutation_skipped {
            self.run.log("Mutation skipped: compose the track");
            self.run.phase = Phase::Compose;
        } else {
            self.run.phase = Phase::Mutation;
        }
    }
}
