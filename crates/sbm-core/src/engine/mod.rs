//! The phase engine: owns the run and advances it one command at a time.
//!
//! Every command is a reducer step over the [`Run`]. A command that does
//! not fit the current phase, or that needs state the run does not have,
//! changes nothing and returns no log lines.

mod curse;
mod mutation;
mod powerup;
mod room;

pub use powerup::PowerUpKind;

use crate::command::Command;
use crate::config::RunConfig;
use crate::dice::{RollSource, SeededDice};
use crate::run::{GameMode, Run, SeededRoom};
use crate::tables::mutations::mutation_for_roll;
use crate::tables::{D100, TRACK_TYPES, resolve_range};

/// Most target curse resolutions a single curse chain may perform.
pub const MAX_CURSE_DEPTH: u32 = 10;

/// Deepest nesting of mutation re-rolls before giving up.
pub const MAX_MUTATION_DEPTH: u32 = 10;

/// Most rooms a seeded run pre-rolls.
pub const MAX_SEEDED_ROOMS: u32 = 10;

/// Owns the active run and the dice that drive it.
pub struct Engine {
    run: Option<Run>,
    dice: Box<dyn RollSource>,
    reseed: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine that seeds its dice from each new run.
    pub fn new() -> Self {
        Self {
            run: None,
            dice: Box::new(SeededDice::new(0)),
            reseed: true,
        }
    }

    /// An engine that always rolls with the given dice.
    pub fn with_dice(dice: Box<dyn RollSource>) -> Self {
        Self {
            run: None,
            dice,
            reseed: false,
        }
    }

    /// The active run.
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// Remove and return the active run.
    pub fn take_run(&mut self) -> Option<Run> {
        self.run.take()
    }

    /// Replace the active run with a saved one.
    pub fn load_run(&mut self, run: Run) {
        if self.reseed {
            let offset = run.log.len() as u64;
            self.dice = Box::new(SeededDice::new(run.seed.wrapping_add(offset)));
        }
        log::debug!("loaded run {} in room {}", run.id, run.room);
        self.run = Some(run);
    }

    /// Start a fresh run, discarding any active one.
    pub fn start_run(&mut self, config: &RunConfig) -> Vec<String> {
        let seed = config.resolve_seed();
        if self.reseed {
            self.dice = Box::new(SeededDice::new(seed));
        }
        let mut run = Run::new(config, seed);
        run.log(format!("Run started: {} mode (seed {seed})", run.mode));
        if run.mode == GameMode::Seeded {
            plan_seeded_rooms(&mut run, self.dice.as_mut());
        }
        let lines = run.log.iter().map(|e| e.msg.clone()).collect();
        log::info!("started run {} ({} mode)", run.id, run.mode);
        self.run = Some(run);
        lines
    }

    /// Apply a command and return the log lines it wrote.
    pub fn apply(&mut self, command: Command) -> Vec<String> {
        let Some(run) = self.run.as_mut() else {
            log::debug!("ignored {command:?}: no active run");
            return Vec::new();
        };
        if run.finished && !matches!(command, Command::ToggleTag(_)) {
            log::debug!("ignored {command:?}: run is finished");
            return Vec::new();
        }
        let before = run.log.len();
        Turn {
            run: &mut *run,
            dice: self.dice.as_mut(),
        }
        .dispatch(command);
        run.log[before..].iter().map(|e| e.msg.clone()).collect()
    }

    /// Headline numbers for the active run.
    pub fn summary(&self) -> Option<RunSummary> {
        self.run.as_ref().map(RunSummary::of)
    }
}

fn plan_seeded_rooms(run: &mut Run, dice: &mut dyn RollSource) {
    let count = dice.roll(MAX_SEEDED_ROOMS);
    for _ in 0..count {
        let kind = resolve_range(&TRACK_TYPES, dice.roll(D100)).value;
        let mutation = mutation_for_roll(dice.roll(D100));
        run.seeded_rooms.push(SeededRoom {
            kind: kind.to_string(),
            mutation: mutation.id,
        });
    }
    run.log(format!("Seeded Run: {count} rooms pre-rolled"));
    let plan: Vec<String> = run
        .seeded_rooms
        .iter()
        .enumerate()
        .map(|(i, room)| {
            format!(
                "Seeded Room {}: {} / {}",
                i + 1,
                room.kind,
                crate::tables::mutations::mutation_entry(room.mutation).text
            )
        })
        .collect();
    for line in plan {
        run.log(line);
    }
}

/// Headline numbers for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rule variant.
    pub mode: GameMode,
    /// Current (or last) room.
    pub rooms: u32,
    /// Finalised tracks, deleted ones included.
    pub tracks: usize,
    /// Finalised tracks still alive.
    pub alive_tracks: usize,
    /// Deleted tracks.
    pub deleted_tracks: usize,
    /// Accepted curses.
    pub curses: usize,
    /// Accepted mutations.
    pub mutations: usize,
    /// Power-ups held.
    pub power_ups: u32,
    /// Extra rooms still owed.
    pub forced_rooms: u32,
    /// Whether the run is over.
    pub finished: bool,
}

impl RunSummary {
    /// Summarise a run.
    pub fn of(run: &Run) -> Self {
        let deleted = run.tracks.iter().filter(|t| t.deleted).count();
        Self {
            mode: run.mode,
            rooms: run.room,
            tracks: run.tracks.len(),
            alive_tracks: run.tracks.len() - deleted,
            deleted_tracks: deleted,
            curses: run.curses.len(),
            mutations: run.mutations.len(),
            power_ups: run.power_ups,
            forced_rooms: run.forced_rooms,
            finished: run.finished,
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} run, room {}{}",
            self.mode,
            self.rooms,
            if self.finished { " (finished)" } else { "" }
        )?;
        writeln!(
            f,
            "Tracks: {} ({} alive, {} deleted)",
            self.tracks, self.alive_tracks, self.deleted_tracks
        )?;
        writeln!(f, "Curses: {}  Mutations: {}", self.curses, self.mutations)?;
        write!(
            f,
            "Power-Ups: {}  Forced rooms owed: {}",
            self.power_ups, self.forced_rooms
        )
    }
}

/// One command's view of the engine: the run plus the dice.
struct Turn<'a> {
    run: &'a mut Run,
    dice: &'a mut dyn RollSource,
}

impl Turn<'_> {
    fn dispatch(&mut self, command: Command) {
        match command {
            Command::RollTrackType => self.roll_track_type(),
            Command::SelectTrackType(kind) => self.select_track_type(kind),
            Command::ReselectTrackType(kind) => self.reselect_track_type(kind),
            Command::RollCurseCheck => self.roll_curse_check(),
            Command::SelectCurseTarget(index) => self.select_curse_target(index),
            Command::SelectApplyLastCurseTarget(index) => self.select_apply_last_target(index),
            Command::SelectSplitWoundTarget(index) => self.select_split_wound_target(index),
            Command::SelectRoomLockTarget(index) => self.select_room_lock_target(index),
            Command::AcceptCurse => self.accept_curse(),
            Command::RollMutation => self.roll_mutation(),
            Command::AcceptMutation => self.accept_mutation(),
            Command::FinalizeRoom => self.finalize_room(),
            Command::RollPowerUp => self.roll_power_up(),
            Command::NextRoom => self.next_room(),
            Command::UsePowerUp(kind) => self.use_power_up(kind),
            Command::EndRun => self.end_run(),
            Command::ToggleTag(tag) => self.toggle_tag(tag),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::run::{CurseKind, Phase};
    use crate::tables::RunTag;

    /// An engine with a normal-mode run driven by scripted rolls.
    pub(crate) fn engine(mode: GameMode, rolls: Vec<u32>) -> Engine {
        let mut engine = Engine::with_dice(Box::new(ScriptedDice::new(rolls)));
        engine.start_run(&RunConfig::default().with_mode(mode).with_seed(7));
        engine
    }

    /// Rolls for `n` uneventful rooms starting at room 1: Drums, no curse,
    /// Half-Time, no power-up.
    pub(crate) fn quiet_rolls(n: u32) -> Vec<u32> {
        let mut rolls = Vec::new();
        for room in 1..=n {
            if room == 1 {
                rolls.extend([5, 6, 1]);
            } else {
                rolls.extend([5, 10, 6, 1]);
            }
        }
        rolls
    }

    /// Play `n` uneventful rooms scripted by [`quiet_rolls`].
    pub(crate) fn play_quiet(engine: &mut Engine, n: u32) {
        for _ in 0..n {
            engine.apply(Command::RollTrackType);
            if engine.phase() == Phase::CurseCheck {
                engine.apply(Command::RollCurseCheck);
            }
            engine.apply(Command::RollMutation);
            engine.apply(Command::AcceptMutation);
            engine.apply(Command::FinalizeRoom);
            engine.apply(Command::RollPowerUp);
            engine.apply(Command::NextRoom);
        }
    }

    pub(crate) fn script(parts: &[&[u32]]) -> Vec<u32> {
        parts.iter().flat_map(|p| p.iter().copied()).collect()
    }

    impl Engine {
        pub(crate) fn phase(&self) -> Phase {
            self.run.as_ref().map_or(Phase::TrackType, |r| r.phase)
        }

        pub(crate) fn run_mut(&mut self) -> &mut Run {
            self.run.as_mut().expect("active run")
        }
    }

    #[test]
    fn commands_without_a_run_do_nothing() {
        let mut engine = Engine::with_dice(Box::new(ScriptedDice::new([5])));
        assert!(engine.apply(Command::RollTrackType).is_empty());
        assert!(engine.run().is_none());
        assert!(engine.summary().is_none());
    }

    #[test]
    fn first_room_skips_curse_check() {
        let mut e = engine(GameMode::Normal, vec![5, 6]);
        let lines = e.apply(Command::RollTrackType);
        assert!(lines.iter().any(|l| l.contains("Drums")));
        assert_eq!(e.phase(), Phase::Mutation);

        e.apply(Command::RollMutation);
        assert_eq!(e.phase(), Phase::MutationResult);
        e.apply(Command::AcceptMutation);
        assert_eq!(e.phase(), Phase::Compose);
        e.apply(Command::FinalizeRoom);

        let run = e.run().unwrap();
        assert_eq!(run.tracks.len(), 1);
        assert_eq!(run.phase, Phase::PowerUpRoll);
        assert!(run.tracks[0].mutations[0].starts_with("Half-time"));
    }

    #[test]
    fn out_of_phase_commands_leave_state_unchanged() {
        let mut e = engine(GameMode::Normal, vec![5, 6]);
        e.apply(Command::RollTrackType);
        e.apply(Command::RollMutation);
        let before = e.run().unwrap().clone();
        for cmd in [
            Command::AcceptCurse,
            Command::RollTrackType,
            Command::RollCurseCheck,
            Command::FinalizeRoom,
            Command::RollPowerUp,
            Command::NextRoom,
            Command::SelectCurseTarget(0),
            Command::SelectRoomLockTarget(0),
            Command::ReselectTrackType("Bass".into()),
            Command::ToggleTag(RunTag::Phoenix),
        ] {
            assert!(e.apply(cmd).is_empty());
        }
        assert_eq!(e.run().unwrap(), &before);
    }

    #[test]
    fn rooms_strictly_increase() {
        let mut e = engine(GameMode::Normal, quiet_rolls(4));
        let mut last = e.run().unwrap().room;
        for _ in 0..4 {
            play_quiet(&mut e, 1);
            let room = e.run().unwrap().room;
            assert_eq!(room, last + 1);
            last = room;
        }
        assert_eq!(e.run().unwrap().tracks.len(), 4);
    }

    #[test]
    fn cursed_mode_forces_a_target_curse() {
        // room 2: Drums, curse check 3 (forced to 71), Lo-Fi, previous, +0
        let rolls = script(&[&quiet_rolls(1), &[5, 3, 20, 10, 50]]);
        let mut e = engine(GameMode::Cursed, rolls);
        play_quiet(&mut e, 1);
        e.apply(Command::RollTrackType);
        let lines = e.apply(Command::RollCurseCheck);
        assert!(lines.iter().any(|l| l.contains("71")));

        let run = e.run().unwrap();
        assert_eq!(run.phase, Phase::CurseResult);
        let curse = run.current_curse.as_ref().unwrap();
        assert_eq!(curse.kind, CurseKind::Target);
        assert_eq!(run.pending_curse.targets, vec![0]);
    }

    #[test]
    fn casual_mode_ignores_only_the_first_curse() {
        let rolls = script(&[
            &quiet_rolls(1),
            &[5, 80, 6, 1],
            &[5, 80, 20, 10, 50],
        ]);
        let mut e = engine(GameMode::Casual, rolls);
        play_quiet(&mut e, 1);

        e.apply(Command::RollTrackType);
        e.apply(Command::RollCurseCheck);
        assert_eq!(e.phase(), Phase::Mutation);
        assert!(e.run().unwrap().casual_first_curse_ignored);
        e.apply(Command::RollMutation);
        e.apply(Command::AcceptMutation);
        e.apply(Command::FinalizeRoom);
        e.apply(Command::RollPowerUp);
        e.apply(Command::NextRoom);

        e.apply(Command::RollTrackType);
        e.apply(Command::RollCurseCheck);
        assert_eq!(e.phase(), Phase::CurseResult);
    }

    #[test]
    fn one_last_breath_makes_next_room_final() {
        let rolls = script(&[
            &quiet_rolls(1),
            // room 2: target curse Lo-Fi on track 1, then Half-Time
            &[5, 80, 20, 10, 50, 6],
            // room 3: Drums, forced target curse, Half-Time, no power-up
            &[5, 20, 10, 50, 6, 1],
        ]);
        let mut e = engine(GameMode::Normal, rolls);
        play_quiet(&mut e, 1);
        e.apply(Command::RollTrackType);
        e.apply(Command::RollCurseCheck);
        e.apply(Command::AcceptCurse);
        assert_eq!(e.run().unwrap().curses.len(), 1);
        assert_eq!(e.phase(), Phase::Mutation);

        e.run_mut().power_ups = 1;
        e.apply(Command::UsePowerUp(PowerUpKind::Breath));
        let run = e.run().unwrap();
        assert!(run.curses.is_empty());
        assert!(run.used_one_last_breath);
        assert!(!run.is_last_room);
        assert_eq!(run.power_ups, 0);

        e.apply(Command::RollMutation);
        e.apply(Command::AcceptMutation);
        e.apply(Command::FinalizeRoom);
        assert_eq!(e.phase(), Phase::NextRoom);
        assert!(!e.run().unwrap().finished);
        e.apply(Command::NextRoom);
        assert!(e.run().unwrap().is_last_room);

        e.apply(Command::RollTrackType);
        let lines = e.apply(Command::RollCurseCheck);
        assert!(lines.iter().any(|l| l.contains("Final Room")));
        assert_eq!(e.phase(), Phase::CurseResult);
        assert_eq!(
            e.run().unwrap().current_curse.as_ref().unwrap().kind,
            CurseKind::Target
        );

        e.apply(Command::AcceptCurse);
        e.apply(Command::RollMutation);
        e.apply(Command::AcceptMutation);
        e.apply(Command::FinalizeRoom);
        e.apply(Command::RollPowerUp);
        assert!(e.run().unwrap().finished);
    }

    #[test]
    fn quick_mode_is_one_room() {
        let mut e = engine(GameMode::Quick, quiet_rolls(1));
        play_quiet(&mut e, 1);
        let run = e.run().unwrap();
        assert!(run.finished);
        assert_eq!(run.room, 1);
        assert_eq!(run.tracks.len(), 1);
    }

    #[test]
    fn forced_room_postpones_the_end() {
        let mut e = engine(GameMode::Quick, quiet_rolls(2));
        e.run_mut().forced_rooms = 1;
        play_quiet(&mut e, 1);
        let run = e.run().unwrap();
        assert!(!run.finished);
        assert_eq!(run.room, 2);
        assert!(run.is_last_room);
        assert_eq!(run.forced_rooms, 0);
    }

    #[test]
    fn finished_runs_only_take_tags() {
        let mut e = engine(GameMode::Normal, vec![5]);
        let lines = e.apply(Command::EndRun);
        assert_eq!(lines, vec!["Run ended".to_string()]);
        assert!(e.apply(Command::RollTrackType).is_empty());
        assert!(e.apply(Command::EndRun).is_empty());

        e.apply(Command::ToggleTag(RunTag::Phoenix));
        assert!(e.run().unwrap().tags.contains(&RunTag::Phoenix));
        e.apply(Command::ToggleTag(RunTag::Phoenix));
        assert!(e.run().unwrap().tags.is_empty());
    }

    #[test]
    fn seeded_mode_plans_rooms() {
        // 3 rooms: Bass/Half-Time, Pad/Bitcrush, Lead/One-Take
        let rolls = vec![3, 15, 6, 60, 42, 70, 76];
        let mut e = engine(GameMode::Seeded, rolls);
        let run = e.run().unwrap();
        assert_eq!(run.seeded_rooms.len(), 3);
        assert_eq!(run.seeded_rooms[1].kind, "Pad");

        let lines = e.apply(Command::RollTrackType);
        assert!(lines.iter().any(|l| l.contains("Seeded")));
        assert_eq!(e.run().unwrap().current_track.as_ref().unwrap().kind, "Bass");
    }

    #[test]
    fn summary_counts_tracks() {
        let mut e = engine(GameMode::Normal, quiet_rolls(2));
        play_quiet(&mut e, 2);
        e.run_mut().tracks[0].deleted = true;
        let summary = e.summary().unwrap();
        assert_eq!(summary.tracks, 2);
        assert_eq!(summary.alive_tracks, 1);
        assert_eq!(summary.deleted_tracks, 1);
        assert_eq!(summary.rooms, 3);
        assert!(summary.to_string().contains("Normal run, room 3"));
    }

    #[test]
    fn start_run_reseeds_from_config() {
        let mut a = Engine::new();
        let mut b = Engine::new();
        let config = RunConfig::default().with_seed(1234);
        a.start_run(&config);
        b.start_run(&config);
        a.apply(Command::RollTrackType);
        b.apply(Command::RollTrackType);
        assert_eq!(
            a.run().unwrap().current_track,
            b.run().unwrap().current_track
        );
        assert_eq!(a.run().unwrap().seed, 1234);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn any_command() -> impl Strategy<Value = Command> {
            prop_oneof![
                Just(Command::RollTrackType),
                Just(Command::RollCurseCheck),
                (0usize..6).prop_map(Command::SelectCurseTarget),
                (0usize..6).prop_map(Command::SelectApplyLastCurseTarget),
                (0usize..6).prop_map(Command::SelectSplitWoundTarget),
                (0usize..6).prop_map(Command::SelectRoomLockTarget),
                Just(Command::ReselectTrackType("Wildcard".into())),
                Just(Command::AcceptCurse),
                Just(Command::RollMutation),
                Just(Command::AcceptMutation),
                Just(Command::FinalizeRoom),
                Just(Command::RollPowerUp),
                Just(Command::NextRoom),
                Just(Command::UsePowerUp(PowerUpKind::Redirect)),
                Just(Command::UsePowerUp(PowerUpKind::Lock)),
                Just(Command::UsePowerUp(PowerUpKind::PainShift)),
                Just(Command::UsePowerUp(PowerUpKind::Split)),
                Just(Command::UsePowerUp(PowerUpKind::Breath)),
            ]
        }

        proptest! {
            #[test]
            fn run_invariants_hold(
                seed in any::<u64>(),
                mode in prop::sample::select(GameMode::all().to_vec()),
                power_ups in 0u32..4,
                commands in prop::collection::vec(any_command(), 1..200),
            ) {
                let mut e = Engine::new();
                e.start_run(&RunConfig::default().with_mode(mode).with_seed(seed));
                e.run_mut().power_ups = power_ups;
                let mut lock: Option<usize> = None;

                for cmd in commands {
                    let before = e.run().unwrap().clone();
                    e.apply(cmd.clone());
                    let run = e.run().unwrap();

                    prop_assert!(run.room >= before.room);
                    prop_assert!(run.room <= before.room + 1);
                    prop_assert!(run.tracks.len() >= before.tracks.len());
                    if let Command::UsePowerUp(_) = cmd {
                        prop_assert!(run.power_ups + 1 >= before.power_ups);
                        if before.power_ups == 0 {
                            prop_assert_eq!(run.power_ups, 0);
                        }
                    }
                    for (i, track) in before.tracks.iter().enumerate() {
                        if track.deleted {
                            prop_assert!(run.tracks[i].deleted);
                            prop_assert!(!run.available_tracks().contains(&i));
                        }
                    }
                    if let Some(locked) = lock {
                        prop_assert_eq!(run.room_lock_track, Some(locked));
                    }
                    lock = run.room_lock_track;
                    let mut targets = run.pending_curse.targets.clone();
                    targets.sort_unstable();
                    targets.dedup();
                    prop_assert_eq!(targets.len(), run.pending_curse.targets.len());
                }
            }
        }
    }
}
