//! The run log: a chronological record of what the engine did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single line of the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Room the line was written in.
    pub room: u32,
    /// Human-readable message.
    pub msg: String,
    /// When it was written.
    pub time: DateTime<Utc>,
}

/// Render log entries as plain text, oldest first.
pub fn export_text(entries: &[LogEntry]) -> String {
    let mut out = String::from("Super Beatmaker Run Log\n=======================\n\n");
    let mut room = 0;
    for entry in entries {
        if entry.room != room {
            room = entry.room;
            out.push_str(&format!("--- Room {room} ---\n"));
        }
        out.push_str(&format!("[{}] {}\n", entry.time.format("%H:%M:%S"), entry.msg));
    }
    out
}

/// Render log entries as markdown, oldest first.
pub fn export_markdown(entries: &[LogEntry]) -> String {
    let mut out = String::from("# Super Beatmaker Run Log\n");
    let mut room = 0;
    for entry in entries {
        if entry.room != room {
            room = entry.room;
            out.push_str(&format!("\n## Room {room}\n\n"));
        }
        out.push_str(&format!("- {}\n", entry.msg));
    }
    out
}
