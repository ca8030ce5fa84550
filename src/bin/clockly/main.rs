//! clockly - alert tone player
//!
//! Run with: cargo run -- [ui|list|play|render|info]

mod app;
mod logging;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use std::path::PathBuf;

use app::Clockly;
use clockly_tones::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to config TOML
    #[arg(long, global = true, default_value = "clockly.toml")]
    config: PathBuf,

    /// Write logs to this file (the terminal UI logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse and play sounds in the terminal (default)
    Ui,
    /// Print every sound name
    List {
        /// Group names by category
        #[arg(long)]
        categories: bool,
    },
    /// Play one sound and wait for it to finish
    Play {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Render one sound to a 16-bit mono WAV file
    Render {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Print catalog metadata
    Info,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config = AppConfig::load_or_default(&args.config)
        .wrap_err_with(|| format!("failed to load {}", args.config.display()))?;

    let command = args.command.unwrap_or(Command::Ui);
    let interactive = matches!(command, Command::Ui);
    logging::init(&config.log.filter, args.log_file.as_deref(), interactive)?;

    let clockly = Clockly::new(config);
    match command {
        Command::Ui => clockly.run_ui(),
        Command::List { categories } => {
            clockly.list(categories);
            Ok(())
        }
        Command::Play { name } => clockly.play(&name),
        Command::Render { name, out } => clockly.render(&name, &out),
        Command::Info => {
            clockly.info();
            Ok(())
        }
    }
}
