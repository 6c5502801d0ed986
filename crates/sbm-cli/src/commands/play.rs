use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use sbm_core::run::log::{export_markdown, export_text};
use sbm_core::{Command, Engine};
use sbm_store::{FileStore, RunStore};

use crate::view;

/// Continue the saved run.
pub fn resume(save: &Path) -> Result<(), String> {
    let saved = super::load_saved(save)?;
    if saved.finished {
        return Err("the saved run is finished. Start a new one with: sbm new".into());
    }
    let mut engine = Engine::new();
    engine.load_run(saved);
    let mut store = FileStore::new(save);
    run(&mut engine, &mut store)
}

/// The interactive loop. Saves after every command.
pub fn run(engine: &mut Engine, store: &mut FileStore) -> Result<(), String> {
    println!("  {} Super Beatmaker", "Playing".bold());
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    if let Some(run) = engine.run() {
        println!("{}\n", view::hint(run).dimmed());
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        let prompt = engine
            .run()
            .map(view::prompt)
            .unwrap_or_else(|| "> ".to_string());
        print!("{prompt}");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let Some(run) = engine.run() else {
            break;
        };

        match input.to_lowercase().as_str() {
            "quit" | "q" => {
                println!("Run saved to {}.", store.path().display());
                break;
            }
            "help" => {
                println!("{}\n", view::help());
                continue;
            }
            "status" => {
                println!("{}\n", view::status(run));
                continue;
            }
            "tracks" => {
                println!("{}\n", view::tracks_table(run));
                continue;
            }
            "log" => {
                println!("{}", export_text(&run.log));
                continue;
            }
            "log md" => {
                println!("{}", export_markdown(&run.log));
                continue;
            }
            "powerups" => {
                println!("{}\n", view::power_up_list(run));
                continue;
            }
            _ => {}
        }

        let command = match Command::parse(input, run.phase) {
            Ok(command) => command,
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
                continue;
            }
        };
        let lines = engine.apply(command);
        if lines.is_empty() {
            println!(
                "{}\n",
                format!("Nothing happened ({}).", view::phase_label(engine.run())).yellow()
            );
            continue;
        }
        for line in &lines {
            println!("  {line}");
        }

        if let Some(run) = engine.run() {
            store
                .save(run)
                .map_err(|e| format!("cannot save to {}: {e}", store.path().display()))?;
            log::debug!(
                "snapshot saved to {} ({} log entries)",
                store.path().display(),
                run.log.len()
            );
            if run.finished {
                println!("\n{}", view::status(run));
                println!("{}", "Tag the run with 'tag <name>' or 'quit'.".dimmed());
            } else {
                println!("\n{}\n", view::hint(run).dimmed());
            }
        }
    }

    Ok(())
}
