use std::path::Path;

use sbm_store::{FileStore, RunStore, import_run};

pub fn run(save: &Path, file: &Path) -> Result<(), String> {
    let bytes =
        std::fs::read(file).map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let run = import_run(&bytes).map_err(|e| e.to_string())?;

    FileStore::new(save)
        .save(&run)
        .map_err(|e| format!("cannot save to {}: {e}", save.display()))?;
    println!(
        "  Imported {} run (room {}) into {}",
        run.mode,
        run.room,
        save.display()
    );
    Ok(())
}
