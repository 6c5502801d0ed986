//! The import/export port.

use sbm_core::Run;

use crate::error::{StoreError, StoreResult};

/// Serialise a run as pretty-printed JSON.
pub fn export_run(run: &Run) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(run).map_err(|e| StoreError::Serialize(e.to_string()))
}

/// Parse a run exported by [`export_run`].
///
/// Nothing is returned unless the whole document parses and describes a
/// playable run.
pub fn import_run(bytes: &[u8]) -> StoreResult<Run> {
    decode_run(bytes).inspect_err(|e| log::debug!("import rejected: {e}"))
}

/// Parse and check a snapshot.
pub(crate) fn decode_run(bytes: &[u8]) -> StoreResult<Run> {
    let run: Run =
        serde_json::from_slice(bytes).map_err(|e| StoreError::InvalidFile(e.to_string()))?;
    check_run(&run)?;
    Ok(run)
}

/// Reject snapshots whose indices point outside the run.
fn check_run(run: &Run) -> StoreResult<()> {
    let invalid = |msg: &str| Err(StoreError::InvalidFile(msg.to_string()));
    if run.room == 0 {
        return invalid("room must be at least 1");
    }
    let tracks = run.tracks.len();
    let in_range = |index: Option<usize>| index.is_none_or(|i| i < tracks);
    if !in_range(run.room_lock_track) {
        return invalid("locked track does not exist");
    }
    if !in_range(run.curse_target_track) {
        return invalid("curse target track does not exist");
    }
    if run.pending_curse.targets.iter().any(|&i| i >= tracks) {
        return invalid("pending curse target does not exist");
    }
    Ok(())
}
