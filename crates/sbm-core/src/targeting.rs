//! Curse targeting: which committed track(s) a target curse strikes.
//!
//! Targeting mirrors two physical dice. The first roll picks a method that
//! names an anchor track; the second nudges the anchor by one track either
//! way. Methods the dice cannot settle (loudest, quietest, player's choice)
//! pause resolution until the player names a track.

use crate::dice::RollSource;
use crate::run::PendingCurse;
use crate::tables::{METHOD_TABLE, OFFSET_TABLE, TargetMethod, resolve_range};

/// Where targeting stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetingStep {
    /// Every method is resolved; the pending targets are final.
    Resolved,
    /// The player must name a track for this method.
    AwaitingChoice(TargetMethod),
}

/// Reset the working set for a new target curse.
pub fn begin(pending: &mut PendingCurse) {
    pending.targets.clear();
    pending.method = None;
    pending.method_roll = None;
    pending.remaining_methods = 1;
    pending.nested = false;
}

/// Resolve methods until done or until the player must choose.
///
/// `available` lists the indices of tracks a curse may hit, oldest first.
/// Log lines describing each roll are appended to `notes`.
pub fn advance(
    available: &[usize],
    dice: &mut dyn RollSource,
    pending: &mut PendingCurse,
    notes: &mut Vec<String>,
) -> TargetingStep {
    while pending.remaining_methods > 0 {
        pending.remaining_methods -= 1;
        let roll = dice.d100();
        let mut method = resolve_range(&METHOD_TABLE, roll).value;
        notes.push(format!("Curse Target Roll: {roll} → {method}"));

        if method == TargetMethod::TwoTargets {
            if pending.nested {
                method = TargetMethod::Previous;
                notes.push("Nested Two Targets: using Previous Track".to_string());
            } else {
                pending.nested = true;
                pending.remaining_methods += 2;
                continue;
            }
        }

        if method.needs_player() {
            if available.is_empty() {
                notes.push("No track available to choose".to_string());
                continue;
            }
            pending.method = Some(method);
            pending.method_roll = Some(roll);
            return TargetingStep::AwaitingChoice(method);
        }

        let anchor = match method {
            TargetMethod::Oldest => available.first(),
            _ => available.last(),
        };
        match anchor {
            Some(&anchor) => {
                let target = apply_offset(available, dice, anchor, notes);
                push_unique(&mut pending.targets, target);
            }
            None => notes.push("No track available for the curse".to_string()),
        }
    }
    TargetingStep::Resolved
}

/// Supply the player's choice for a paused method and keep resolving.
///
/// Returns `None` when nothing is awaiting a choice or the chosen track is
/// not available; the working set is left untouched in that case.
pub fn choose(
    available: &[usize],
    dice: &mut dyn RollSource,
    pending: &mut PendingCurse,
    chosen: usize,
    notes: &mut Vec<String>,
) -> Option<TargetingStep> {
    let method = pending.method?;
    if !available.contains(&chosen) {
        log::debug!("rejected curse target {chosen}: not available");
        return None;
    }
    notes.push(format!("{method}: track {} chosen", chosen + 1));
    pending.method = None;
    pending.method_roll = None;
    let target = apply_offset(available, dice, chosen, notes);
    push_unique(&mut pending.targets, target);
    Some(advance(available, dice, pending, notes))
}

/// Stage two: shift the anchor by the offset roll.
///
/// An offset that leaves the available tracks is discarded and the anchor
/// itself is used.
fn apply_offset(
    available: &[usize],
    dice: &mut dyn RollSource,
    anchor: usize,
    notes: &mut Vec<String>,
) -> usize {
    let roll = dice.d100();
    let offset = resolve_range(&OFFSET_TABLE, roll).value;
    let shifted = anchor
        .checked_add_signed(offset as isize)
        .filter(|i| available.contains(i));
    match shifted {
        Some(target) => {
            notes.push(format!("Offset Roll: {roll} → {offset:+} (track {})", target + 1));
            target
        }
        None => {
            notes.push(format!(
                "Offset Roll: {roll} → {offset:+} unavailable, staying on track {}",
                anchor + 1
            ));
            anchor
        }
    }
}

fn push_unique(targets: &mut Vec<usize>, index: usize) {
    if !targets.contains(&index) {
        targets.push(index);
    }
}
