//! Text rendering of a run for the terminal.

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use sbm_core::{Phase, PowerUpKind, Run, RunSummary};

/// Prompt showing where the run stands.
pub fn prompt(run: &Run) -> String {
    format!("[room {} | {}] > ", run.room, run.phase)
}

/// Short label for the current phase, or a note when no run is loaded.
pub fn phase_label(run: Option<&Run>) -> String {
    match run {
        Some(run) if run.finished => "the run is finished".to_string(),
        Some(run) => format!("not available during {}", run.phase),
        None => "no active run".to_string(),
    }
}

/// What the player can do next.
pub fn hint(run: &Run) -> String {
    let next = match run.phase {
        Phase::TrackType if run.manual_track_type => {
            "Pick a track type: 'type <name>' (or 'roll')."
        }
        Phase::TrackType => "Roll the track type: 'roll'.",
        Phase::TrackTypeReselect => "Pick a different track type: 'reselect <name>'.",
        Phase::CurseCheck => "Roll the curse check: 'roll'.",
        Phase::CurseTargetSelect => "Name the curse's target: 'pick <track>'.",
        Phase::CurseApplyLastSelect => "Name the track for the echoed curse: 'pick <track>'.",
        Phase::SplitWoundSelect => "Name the second track: 'pick <track>'.",
        Phase::RoomLockSelect => "Name the track to protect: 'pick <track>'.",
        Phase::CurseResult => "Accept the curse: 'accept'.",
        Phase::Mutation => "Roll the mutation: 'roll'.",
        Phase::MutationResult => "Accept the mutation: 'accept'.",
        Phase::Compose => "Make the track, then 'finalize'.",
        Phase::PowerUpRoll => "Roll for power-ups: 'roll'.",
        Phase::NextRoom => "Move on: 'next'.",
    };
    let mut out = next.to_string();
    if let Some(curse) = &run.current_curse {
        out = format!("{curse}\n{out}");
    }
    if let Some(mutation) = &run.current_mutation {
        out = format!("{mutation}\n{out}");
    }
    if let Some(left) = run.timer_remaining(chrono::Utc::now()) {
        out.push_str(&format!(
            "\nTimer: {}:{:02} left",
            left.num_minutes(),
            left.num_seconds() % 60
        ));
    }
    if run.power_ups > 0 && run.phase.allows_power_ups() && !run.used_power_up_this_room {
        out.push_str(&format!(
            "\nPower-Ups: {} ('power <name>', 'powerups' to list)",
            run.power_ups
        ));
    }
    out
}

/// Headline status of the run.
pub fn status(run: &Run) -> String {
    let summary = RunSummary::of(run);
    let mut out = format!("{}\n{summary}", "Super Beatmaker".bold());
    if let Some(track) = &run.current_track {
        out.push_str(&format!("\nCurrent track: {track}"));
    }
    if run.is_last_room {
        out.push_str("\nThis is the final room.");
    }
    if let Some(lock) = run.room_lock_track {
        out.push_str(&format!("\nRoom Lock: track {}", lock + 1));
    }
    if let Some(magnet) = run.curse_target_track {
        out.push_str(&format!("\nCurse target: track {}", magnet + 1));
    }
    if !run.tags.is_empty() {
        let tags: Vec<String> = run.tags.iter().map(ToString::to_string).collect();
        out.push_str(&format!("\nTags: {}", tags.join(", ")));
    }
    out
}

/// Every committed track as a table.
pub fn tracks_table(run: &Run) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Room", "Type", "Mutations", "Curses", "State"]);
    for (i, track) in run.tracks.iter().enumerate() {
        let kind = match &track.original_type {
            Some(orig) => format!("{} (was {orig})", track.kind),
            None => track.kind.clone(),
        };
        let state = if track.deleted {
            "deleted"
        } else if run.room_lock_track == Some(i) {
            "locked"
        } else {
            ""
        };
        table.add_row(vec![
            (i + 1).to_string(),
            track.room.to_string(),
            kind,
            join_or_dash(&track.mutations),
            join_or_dash(&track.curses),
            state.to_string(),
        ]);
    }
    table
}

/// The power-ups and their rules.
pub fn power_up_list(run: &Run) -> String {
    let mut out = format!("Power-Ups held: {}\n", run.power_ups);
    for kind in PowerUpKind::all() {
        out.push_str(&format!("  {:<16} {}\n", kind.to_string(), kind.description()));
    }
    out.trim_end().to_string()
}

/// Command reference.
pub fn help() -> String {
    [
        "roll                 roll for the current phase",
        "type <name>          choose the track type (manual mode)",
        "reselect <name>      replace an abandoned track type",
        "pick <n>             choose track n when asked",
        "accept               accept the current curse or mutation",
        "finalize             commit the composed track",
        "next                 go to the next room",
        "power <name>         use a power-up (redirect, lock, painshift, split, breath)",
        "end                  end the run",
        "tag <name>           toggle a tag on a finished run",
        "status | tracks | log | log md | powerups",
        "quit                 save and exit",
    ]
    .join("\n")
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join("\n")
    }
}
