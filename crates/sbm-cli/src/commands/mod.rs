pub mod export;
pub mod import;
pub mod new;
pub mod play;
pub mod status;
pub mod tables;

use std::path::Path;

use sbm_core::Run;
use sbm_store::{FileStore, RunStore};

/// Load the saved run or explain how to start one.
fn load_saved(save: &Path) -> Result<Run, String> {
    FileStore::new(save).load().ok_or_else(|| {
        format!(
            "no saved run in {}. Start one with: sbm new",
            save.display()
        )
    })
}
