//! Read-only rule tables and roll resolution.
//!
//! Two table shapes exist. Range tables list contiguous `[min, max]` bands
//! (track types, curse targeting). Breakpoint tables key each entry by the
//! lowest roll it answers; an entry covers every roll up to the next
//! breakpoint, and the highest breakpoint extends to 100.

pub mod curses;
pub mod mutations;
pub mod tags;
pub mod targeting;
pub mod track_types;

pub use curses::{
    MIX_CURSES, MixCurseEntry, MixCurseId, MixCurseMechanics, TARGET_CURSES, TargetCurseEntry,
    TargetCurseId, TargetCurseMechanics,
};
pub use mutations::{MUTATIONS, MutationEntry, MutationId, MutationMechanics, RoomOneRule};
pub use tags::{RUN_TAGS, RunTag};
pub use targeting::{METHOD_TABLE, OFFSET_TABLE, TargetMethod};
pub use track_types::{TRACK_TYPES, track_type_names};

/// Highest value a d100 can show.
pub const D100: u32 = 100;

/// One contiguous band of a range table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeEntry<T> {
    /// Lowest roll (inclusive).
    pub min: u32,
    /// Highest roll (inclusive).
    pub max: u32,
    /// Outcome for rolls in the band.
    pub value: T,
}

/// Find the band containing `roll`.
///
/// Complete tables always match. An incomplete table falls back to its
/// last band.
pub fn resolve_range<T>(table: &[RangeEntry<T>], roll: u32) -> &RangeEntry<T> {
    table
        .iter()
        .find(|e| (e.min..=e.max).contains(&roll))
        .unwrap_or_else(|| &table[table.len() - 1])
}

/// An entry of a sparse breakpoint table.
pub trait Breakpoint {
    /// The lowest roll this entry answers.
    fn breakpoint(&self) -> u32;
}

/// Find the entry whose breakpoint is the greatest one not above `roll`.
///
/// Table order does not matter. A roll below every breakpoint falls back
/// to the highest entry.
pub fn resolve_breakpoint<E: Breakpoint>(table: &[E], roll: u32) -> &E {
    let below = table
        .iter()
        .filter(|e| e.breakpoint() <= roll)
        .max_by_key(|e| e.breakpoint());
    match below {
        Some(entry) => entry,
        None => table
            .iter()
            .max_by_key(|e| e.breakpoint())
            .unwrap_or_else(|| &table[0]),
    }
}

/// The `[low, high]` span an entry of a breakpoint table covers.
pub fn breakpoint_span<E: Breakpoint>(table: &[E], entry: &E) -> (u32, u32) {
    let low = entry.breakpoint();
    let high = table
        .iter()
        .map(Breakpoint::breakpoint)
        .filter(|b| *b > low)
        .min()
        .map_or(D100, |next| next - 1);
    (low, high)
}
