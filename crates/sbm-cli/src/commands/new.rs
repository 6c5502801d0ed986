use std::path::Path;

use colored::Colorize;

use sbm_core::{Engine, GameMode, RunConfig};
use sbm_store::{FileStore, RunStore};

pub fn run(save: &Path, mode: &str, manual: bool, seed: Option<u64>) -> Result<(), String> {
    let mode = GameMode::parse(mode).map_err(|e| e.to_string())?;
    let mut config = RunConfig::default()
        .with_mode(mode)
        .with_manual_track_type(manual);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut store = FileStore::new(save);
    if store.has_saved() {
        println!(
            "{}",
            format!("Replacing the saved run in {}.", save.display()).dimmed()
        );
    }

    let mut engine = Engine::new();
    let lines = engine.start_run(&config);
    for line in &lines {
        println!("  {line}");
    }

    if let Some(run) = engine.run() {
        store
            .save(run)
            .map_err(|e| format!("cannot save to {}: {e}", save.display()))?;
    }
    super::play::run(&mut engine, &mut store)
}
