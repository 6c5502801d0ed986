//! CLI frontend for the Super Beatmaker roguelike companion.

mod commands;
mod view;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sbm",
    about = "Super Beatmaker: a beatmaking roguelike companion",
    version,
    propagate_version = true
)]
struct Cli {
    /// Snapshot file holding the current run
    #[arg(long, global = true, default_value = "superbeatmaker.json")]
    save: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new run and play it interactively
    New {
        /// Game mode: normal, hard, casual, cursed, seeded, quick
        #[arg(short, long, default_value = "normal")]
        mode: String,

        /// Choose track types by hand instead of rolling
        #[arg(long)]
        manual: bool,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Continue the saved run
    Continue,

    /// Show the saved run
    Status,

    /// Export the saved run
    Export {
        /// Output format: json, text, markdown
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a run from an exported JSON file, replacing the saved run
    Import {
        /// Exported run file
        file: PathBuf,
    },

    /// Print the rule tables
    Tables,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::New { mode, manual, seed } => commands::new::run(&cli.save, &mode, manual, seed),
        Commands::Continue => commands::play::resume(&cli.save),
        Commands::Status => commands::status::run(&cli.save),
        Commands::Export { format, output } => {
            commands::export::run(&cli.save, &format, output.as_deref())
        }
        Commands::Import { file } => commands::import::run(&cli.save, &file),
        Commands::Tables => commands::tables::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
