//! Room lifecycle: track type, finalize, power-up roll, next room, run end.

use crate::run::{GameMode, PendingCurse, Phase, Track};
use crate::tables::{D100, RunTag, TRACK_TYPES, resolve_range};

use super::Turn;

impl Turn<'_> {
    pub(super) fn roll_track_type(&mut self) {
        if self.run.phase != Phase::TrackType {
            return;
        }
        let planned = self
            .run
            .room
            .checked_sub(1)
            .and_then(|i| self.run.seeded_rooms.get(i as usize))
            .map(|room| room.kind.clone());
        let kind = match planned {
            Some(kind) => {
                self.run.log(format!("Seeded Room {}: {kind}", self.run.room));
                kind
            }
            None => {
                let roll = self.dice.roll(D100);
                let kind = resolve_range(&TRACK_TYPES, roll).value;
                self.run.log(format!("Track Type Roll: {roll} → {kind}"));
                kind.to_string()
            }
        };
        self.begin_track(kind);
    }

    pub(super) fn select_track_type(&mut self, kind: String) {
        if self.run.phase != Phase::TrackType || !self.run.manual_track_type {
            return;
        }
        let kind = kind.trim().to_string();
        if kind.is_empty() {
            return;
        }
        self.run.log(format!("Track Type chosen: {kind}"));
        self.begin_track(kind);
    }

    fn begin_track(&mut self, kind: String) {
        self.run.current_track = Some(Track::new(self.run.room, kind));
        if self.run.room == 1 {
            self.run.log("Room 1: Skipping curse check");
            self.run.phase = Phase::Mutation;
        } else {
            self.run.phase = Phase::CurseCheck;
        }
    }

    pub(super) fn reselect_track_type(&mut self, kind: String) {
        if self.run.phase != Phase::TrackTypeReselect {
            return;
        }
        let kind = kind.trim().to_string();
        let Some(track) = self.run.current_track.as_mut() else {
            return;
        };
        if kind.is_empty() || kind == track.kind {
            return;
        }
        let old = track.kind.clone();
        track.override_type(kind.clone());
        self.run.pending_track_type_reselect = false;
        self.run.log(format!("Track Type abandoned: {old} → {kind}"));
        self.run.phase = Phase::Compose;
    }

    pub(super) fn finalize_room(&mut self) {
        if self.run.phase != Phase::Compose {
            return;
        }
        let Some(track) = self.run.current_track.take() else {
            return;
        };
        self.run.log(format!("Track finalized: {track}"));
        self.run.tracks.push(track);
        self.run.timer_ends_at = None;
        if self.run.used_power_up_this_room {
            self.run.log("Power-Up used this room: skipping power-up roll");
            self.run.phase = Phase::NextRoom;
            self.check_run_end();
        } else {
            self.run.phase = Phase::PowerUpRoll;
        }
    }

    pub(super) fn roll_power_up(&mut self) {
        if self.run.phase != Phase::PowerUpRoll {
            return;
        }
        if self.run.conditional_power_up_active {
            self.run.log("Power-Up roll blocked: conditional Power-Up still unused");
        } else {
            let roll = self.dice.roll(D100);
            match roll {
                98.. => {
                    self.run.power_ups += 2;
                    self.run.log(format!("Power-Up Roll: {roll} → +2 Power-Ups"));
                }
                86..=97 => {
                    self.run.power_ups += 1;
                    self.run.conditional_power_up_earned = true;
                    self.run.log(format!(
                        "Power-Up Roll: {roll} → +1 conditional Power-Up (use it next room or lose it)"
                    ));
                }
                76..=85 => {
                    self.run.power_ups += 1;
                    self.run.log(format!("Power-Up Roll: {roll} → +1 Power-Up"));
                }
                _ => self.run.log(format!("Power-Up Roll: {roll} → nothing")),
            }
        }
        self.run.phase = Phase::NextRoom;
        self.check_run_end();
    }

    /// End the run after a final room, unless a forced room is still owed.
    fn check_run_end(&mut self) {
        if self.run.mode != GameMode::Quick && !self.run.is_last_room {
            return;
        }
        if self.run.forced_rooms > 0 {
            self.run.forced_rooms -= 1;
            self.run.final_room_pending = true;
            self.run.log("Forced Room: one more room before the run ends");
            return;
        }
        self.finish("Run complete");
    }

    pub(super) fn next_room(&mut self) {
        if self.run.phase != Phase::NextRoom {
            return;
        }
        let run = &mut *self.run;
        if run.conditional_power_up_active {
            run.power_ups = run.power_ups.saturating_sub(1);
            run.conditional_power_up_active = false;
            run.log("Conditional Power-Up unused: clawed back");
        }
        run.conditional_power_up_active = std::mem::take(&mut run.conditional_power_up_earned);
        run.double_mutation_this_room = std::mem::take(&mut run.double_mutation_next_room);
        run.is_last_room = std::mem::take(&mut run.final_room_pending);

        run.current_track = None;
        run.current_mutation = None;
        run.current_curse = None;
        run.pending_curse = PendingCurse::default();
        run.timer_ends_at = None;
        run.pending_track_type_reselect = false;
        run.used_power_up_this_room = false;
        run.split_wound_active = false;
        run.pain_shift_active = false;
        run.mutation_skipped = false;
        run.resume_phase = None;

        run.room += 1;
        run.phase = Phase::TrackType;
        run.log(format!("--- Room {} ---", run.room));
        if run.is_last_room {
            run.log("Final Room: a Target Curse is guaranteed");
        }
        if run.conditional_power_up_active {
            run.log("Conditional Power-Up held: use it this room");
        }
    }

    pub(super) fn end_run(&mut self) {
        self.finish("Run ended");
    }

    fn finish(&mut self, msg: &str) {
        if self.run.finished {
            return;
        }
        self.run.finished = true;
        self.run.log(msg);
        log::info!("run {} finished in room {}", self.run.id, self.run.room);
    }

    pub(super) fn toggle_tag(&mut self, tag: RunTag) {
        if !self.run.finished {
            return;
        }
        if self.run.tags.remove(&tag) {
            self.run.log(format!("Tag removed: {tag}"));
        } else {
            self.run.tags.insert(tag);
            self.run.log(format!("Tag added: {tag}"));
        }
    }
}
