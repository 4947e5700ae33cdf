//! Development tasks for the loadout engine
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Encumbrance, ReadProfile};

/// Development tasks for the loadout engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for loadouts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Read and inspect a saved loadout profile
    ReadProfile(ReadProfile),

    /// Report carried mass and bulk against capacity for every agent
    Encumbrance(Encumbrance),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for LOADOUT_DATA_DIR and other env vars)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::ReadProfile(cmd) => cmd.execute(),
        Command::Encumbrance(cmd) => cmd.execute(),
    }
}
