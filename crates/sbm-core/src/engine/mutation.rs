//! Mutation rolls and their acceptance.

use chrono::{Duration, Utc};

use crate::run::{GameMode, Mutation, MutationEffect, Phase};
use crate::tables::mutations::{mutation_entry, mutation_for_roll};
use crate::tables::{D100, RoomOneRule};

use super::{MAX_MUTATION_DEPTH, Turn};

/// Casual mode re-rolls mutation rolls at or above this value.
const CASUAL_CEILING: u32 = 90;

impl Turn<'_> {
    pub(super) fn roll_mutation(&mut self) {
        if self.run.phase != Phase::Mutation || self.run.current_track.is_none() {
            return;
        }
        let (roll, effect) = if self.run.double_mutation_this_room {
            self.run.log("Double Mutation: rolling twice");
            let (roll, first) = self.resolve_mutation(0);
            let (_, second) = self.resolve_mutation(0);
            (roll, first.combine(second))
        } else {
            self.resolve_mutation(0)
        };

        if effect == MutationEffect::TakeCurseInstead {
            self.run.log("Mutation refused: taking a Target Curse instead");
            self.run.mutation_skipped = true;
            self.run.pending_curse.chain_depth = 0;
            self.run.pending_curse.queued_target_curses = 0;
            self.resolve_target_curse();
            return;
        }
        self.run.current_mutation = Some(Mutation { roll, effect });
        self.run.phase = Phase::MutationResult;
    }

    /// Roll one mutation, following its mechanics.
    ///
    /// Returns the first d100 roll and the combined outcome.
    fn resolve_mutation(&mut self, depth: u32) -> (u32, MutationEffect) {
        if depth >= MAX_MUTATION_DEPTH {
            log::warn!(
                "mutation re-rolls in room {} passed depth {MAX_MUTATION_DEPTH}",
                self.run.room
            );
            self.run.log("Mutation re-rolls exhausted: No Mutation.");
            return (0, MutationEffect::NoMutation);
        }

        let mut roll = self.dice.roll(D100);
        if self.run.mode == GameMode::Casual && roll >= CASUAL_CEILING {
            let reroll = self.dice.roll(CASUAL_CEILING - 1);
            self.run.log(format!("Casual Mode: mutation roll {roll} re-rolled to {reroll}"));
            roll = reroll;
        }
        let entry = mutation_for_roll(roll);
        let m = entry.mechanics;

        if self.run.mode == GameMode::Hard && m.no_effect {
            self.run.log(format!("Hard Mode: re-rolling '{}' ({roll})", entry.text));
            return self.resolve_mutation(depth + 1);
        }
        self.run.log(format!("Mutation Roll: {roll} → {}", entry.text));

        if self.run.room == 1 {
            match m.room_one {
                Some(RoomOneRule::Reroll) => {
                    self.run.log("Room 1: re-rolling");
                    return self.resolve_mutation(depth + 1);
                }
                Some(RoomOneRule::NoMutation) => {
                    self.run.log("Room 1: No Mutation.");
                    return (roll, MutationEffect::NoMutation);
                }
                None => {}
            }
        }

        if m.no_effect {
            return (roll, MutationEffect::NoMutation);
        }
        if m.roll_twice {
            let (_, first) = self.resolve_mutation(depth + 1);
            let (_, second) = self.resolve_mutation(depth + 1);
            return (roll, first.combine(second));
        }
        if m.repeat_last_mutation {
            let last = self
                .run
                .previous_track()
                .and_then(|t| t.mutations.last())
                .cloned();
            return match last {
                Some(text) => {
                    self.run.log(format!("Repeating: {text}"));
                    (
                        roll,
                        MutationEffect::Normal {
                            text,
                            entries: Vec::new(),
                        },
                    )
                }
                None => {
                    self.run.log("Nothing to repeat: No Mutation.");
                    (roll, MutationEffect::NoMutation)
                }
            };
        }
        if let Some(threshold) = m.delete_if_high_roll {
            let second = self.dice.roll(D100);
            return if second >= threshold {
                self.run.log(format!("Delete Roll: {second} → the track is deleted"));
                (roll, MutationEffect::DeleteTrack)
            } else {
                self.run.log(format!("Delete Roll: {second} → the track survives"));
                (roll, MutationEffect::NoMutation)
            };
        }
        if m.take_curse_instead {
            return (roll, MutationEffect::TakeCurseInstead);
        }
        (roll, MutationEffect::normal(entry.text, entry.id))
    }

    pub(super) fn accept_mutation(&mut self) {
        if self.run.phase != Phase::MutationResult || self.run.current_track.is_none() {
            return;
        }
        let Some(mutation) = self.run.current_mutation.take() else {
            return;
        };
        let previous_kind = self.run.previous_track().map(|t| t.kind.clone());

        match &mutation.effect {
            MutationEffect::Normal { text, entries } => {
                if let Some(track) = self.run.current_track.as_mut() {
                    track.mutations.push(text.clone());
                }
                self.run.log(format!("Mutation accepted: {text}"));
                for id in entries {
                    let m = mutation_entry(*id).mechanics;
                    if m.abandon_track_type {
                        self.run.pending_track_type_reselect = true;
                        self.run.log("Choose a different track type");
                    }
                    if m.copy_previous_type {
                        match previous_kind.clone() {
                            Some(kind) => {
                                if let Some(track) = self.run.current_track.as_mut() {
                                    track.override_type(kind.clone());
                                }
                                self.run.log(format!("Track Type copied: {kind}"));
                            }
                            None => self.run.log("No previous track type to copy"),
                        }
                    }
                    if let Some(minutes) = m.timer_minutes {
                        let ends = Utc::now() + Duration::minutes(i64::from(minutes));
                        self.run.timer_ends_at = Some(ends);
                        self.run.log(format!("Timer started: {minutes} minutes"));
                    }
                }
            }
            MutationEffect::NoMutation => self.run.log("No Mutation."),
            MutationEffect::DeleteTrack => {
                if let Some(track) = self.run.current_track.as_mut() {
                    track.deleted = true;
                }
                self.run.log("This room's track is deleted");
            }
            MutationEffect::TakeCurseInstead => {}
        }
        self.run.mutations.push(mutation);
        self.run.phase = if self.run.pending_track_type_reselect {
            Phase::TrackTypeReselect
        } else {
            Phase::Compose
        };
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, play_quiet, quiet_rolls, script};
    use crate::command::Command;
    use crate::engine::{Engine, MAX_MUTATION_DEPTH};
    use crate::run::{CurseSource, GameMode, MutationEffect, Phase};
    use crate::tables::{MutationId, TargetCurseId};

    /// An engine in room `rooms + 1`, mutation pending, then `rolls`.
    fn at_mutation(mode: GameMode, rooms: u32, rolls: &[u32]) -> Engine {
        let head: &[u32] = if rooms == 0 { &[5] } else { &[5, 10] };
        let mut e = engine(mode, script(&[&quiet_rolls(rooms), head, rolls]));
        play_quiet(&mut e, rooms);
        e.apply(Command::RollTrackType);
        if rooms > 0 {
            e.apply(Command::RollCurseCheck);
        }
        assert_eq!(e.phase(), Phase::Mutation);
        e
    }

    fn effect(e: &Engine) -> MutationEffect {
        e.run().unwrap().current_mutation.clone().unwrap().effect
    }

    #[test]
    fn plain_mutation_is_applied() {
        let mut e = at_mutation(GameMode::Normal, 1, &[42]);
        e.apply(Command::RollMutation);
        assert_eq!(
            effect(&e),
            MutationEffect::normal("Bitcrush the main element.", MutationId::Bitcrush)
        );
        e.apply(Command::AcceptMutation);
        let run = e.run().unwrap();
        assert_eq!(run.phase, Phase::Compose);
        assert_eq!(
            run.current_track.as_ref().unwrap().mutations,
            vec!["Bitcrush the main element."]
        );
        assert_eq!(run.mutations.len(), 1);
    }

    #[test]
    fn room_one_rules() {
        // resample-previous re-rolls in room 1
        let mut e = at_mutation(GameMode::Normal, 0, &[34, 42]);
        e.apply(Command::RollMutation);
        assert!(matches!(effect(&e), MutationEffect::Normal { .. }));

        // copy-previous-type is no mutation in room 1
        let mut e = at_mutation(GameMode::Normal, 0, &[58]);
        e.apply(Command::RollMutation);
        assert_eq!(effect(&e), MutationEffect::NoMutation);
    }

    #[test]
    fn casual_rerolls_high_mutations() {
        let mut e = at_mutation(GameMode::Casual, 1, &[95, 42]);
        let lines = e.apply(Command::RollMutation);
        assert!(lines.iter().any(|l| l.contains("Casual")));
        assert_eq!(
            effect(&e),
            MutationEffect::normal("Bitcrush the main element.", MutationId::Bitcrush)
        );
    }

    #[test]
    fn hard_rerolls_no_effect() {
        let mut e = at_mutation(GameMode::Hard, 1, &[1, 62, 42]);
        e.apply(Command::RollMutation);
        assert!(matches!(effect(&e), MutationEffect::Normal { .. }));
    }

    #[test]
    fn hard_rerolls_are_bounded() {
        let rolls = vec![1; MAX_MUTATION_DEPTH as usize + 2];
        let mut e = at_mutation(GameMode::Hard, 1, &rolls);
        e.apply(Command::RollMutation);
        assert_eq!(effect(&e), MutationEffect::NoMutation);
    }

    #[test]
    fn roll_twice_joins_texts() {
        let mut e = at_mutation(GameMode::Normal, 1, &[66, 42, 76]);
        e.apply(Command::RollMutation);
        match effect(&e) {
            MutationEffect::Normal { text, entries } => {
                assert!(text.contains(" AND "));
                assert_eq!(entries, vec![MutationId::Bitcrush, MutationId::OneTake]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn repeat_last_copies_previous_track() {
        // the quiet room gave track 1 Half-Time
        let mut e = at_mutation(GameMode::Normal, 1, &[38]);
        e.apply(Command::RollMutation);
        match effect(&e) {
            MutationEffect::Normal { text, entries } => {
                assert!(text.starts_with("Half-time"));
                assert!(entries.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn delete_gamble() {
        let mut e = at_mutation(GameMode::Normal, 1, &[80, 50]);
        e.apply(Command::RollMutation);
        assert_eq!(effect(&e), MutationEffect::DeleteTrack);
        e.apply(Command::AcceptMutation);
        e.apply(Command::FinalizeRoom);
        assert!(e.run().unwrap().tracks[1].deleted);

        let mut e = at_mutation(GameMode::Normal, 1, &[80, 49]);
        e.apply(Command::RollMutation);
        assert_eq!(effect(&e), MutationEffect::NoMutation);
    }

    #[test]
    fn take_curse_instead_skips_the_mutation() {
        // take-curse, then lo-fi on the previous track
        let mut e = at_mutation(GameMode::Normal, 1, &[84, 20, 10, 50]);
        e.apply(Command::RollMutation);
        let run = e.run().unwrap();
        assert_eq!(run.phase, Phase::CurseResult);
        assert!(run.current_mutation.is_none());
        assert_eq!(
            run.current_curse.as_ref().unwrap().source,
            CurseSource::Target(TargetCurseId::LoFi)
        );
        e.apply(Command::AcceptCurse);
        let run = e.run().unwrap();
        assert_eq!(run.phase, Phase::Compose);
        assert!(run.mutations.is_empty());
    }

    #[test]
    fn abandon_type_forces_reselect() {
        let mut e = at_mutation(GameMode::Normal, 1, &[54]);
        e.apply(Command::RollMutation);
        e.apply(Command::AcceptMutation);
        assert_eq!(e.phase(), Phase::TrackTypeReselect);

        e.apply(Command::ReselectTrackType("Drums".into()));
        assert_eq!(e.phase(), Phase::TrackTypeReselect);
        e.apply(Command::ReselectTrackType("Bass".into()));
        let run = e.run().unwrap();
        assert_eq!(run.phase, Phase::Compose);
        let track = run.current_track.as_ref().unwrap();
        assert_eq!(track.kind, "Bass");
        assert_eq!(track.original_type.as_deref(), Some("Drums"));
    }

    #[test]
    fn copy_previous_type() {
        // room 2 rolls Bass, then copies track 1's Drums
        let rolls = script(&[&quiet_rolls(1), &[15, 10, 58]]);
        let mut e = engine(GameMode::Normal, rolls);
        play_quiet(&mut e, 1);
        e.apply(Command::RollTrackType);
        e.apply(Command::RollCurseCheck);
        e.apply(Command::RollMutation);
        e.apply(Command::AcceptMutation);
        let track = e.run().unwrap().current_track.clone().unwrap();
        assert_eq!(track.kind, "Drums");
        assert_eq!(track.original_type.as_deref(), Some("Bass"));
    }

    #[test]
    fn timer_mutation_sets_deadline() {
        let mut e = at_mutation(GameMode::Normal, 1, &[72]);
        e.apply(Command::RollMutation);
        e.apply(Command::AcceptMutation);
        let run = e.run().unwrap();
        let left = run.timer_remaining(chrono::Utc::now()).unwrap();
        assert!(left <= chrono::Duration::minutes(5));
        assert!(left > chrono::Duration::minutes(4));
        assert_eq!(run.phase, Phase::Compose);
    }

    #[test]
    fn double_mutation_room_rolls_twice() {
        let mut e = at_mutation(GameMode::Normal, 1, &[42, 76]);
        e.run_mut().double_mutation_this_room = true;
        e.apply(Command::RollMutation);
        match effect(&e) {
            MutationEffect::Normal { entries, .. } => assert_eq!(entries.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
