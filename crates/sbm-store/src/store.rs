//! The load/save port and its implementations.

use std::path::{Path, PathBuf};

use sbm_core::Run;

use crate::error::{StoreError, StoreResult};
use crate::transfer::decode_run;

/// Keeps one run snapshot. The last save wins.
pub trait RunStore {
    /// The saved run. Missing or unreadable data is `None`.
    fn load(&self) -> Option<Run>;

    /// Replace the saved run.
    fn save(&mut self, run: &Run) -> StoreResult<()>;

    /// Forget the saved run.
    fn clear(&mut self) -> StoreResult<()>;

    /// Whether a run is saved.
    fn has_saved(&self) -> bool {
        self.load().is_some()
    }
}

/// Snapshot kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Default snapshot file name.
    pub const DEFAULT_FILE: &'static str = "superbeatmaker.json";

    /// A store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunStore for FileStore {
    fn load(&self) -> Option<Run> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("cannot read {}: {e}", self.path.display());
                return None;
            }
        };
        match decode_run(&bytes) {
            Ok(run) => Some(run),
            Err(e) => {
                log::warn!("ignoring corrupt save {}: {e}", self.path.display());
                None
            }
        }
    }

    fn save(&mut self, run: &Run) -> StoreResult<()> {
        let json = serde_json::to_vec(run).map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        log::debug!("saved run {} to {}", run.id, self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Snapshot kept in memory, serialised like the file store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Option<String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the raw snapshot text.
    #[cfg(test)]
    pub(crate) fn set_raw(&mut self, raw: impl Into<String>) {
        self.data = Some(raw.into());
    }
}

impl RunStore for MemoryStore {
    fn load(&self) -> Option<Run> {
        let raw = self.data.as_deref()?;
        decode_run(raw.as_bytes())
            .map_err(|e| log::warn!("ignoring corrupt snapshot: {e}"))
            .ok()
    }

    fn save(&mut self, run: &Run) -> StoreResult<()> {
        let json =
            serde_json::to_string(run).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.data = Some(json);
        Ok(())
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.data = None;
        Ok(())
    }
}
