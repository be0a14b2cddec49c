//! Gear planner command-line driver.
//!
//! Composition root that assembles:
//! 1. Static item content (`gear-content`) from the data directory
//! 2. A file repository for gearsets in the save directory
//! 3. The resolution runtime (`gear-runtime`) over both
//!
//! Configuration comes from the environment (and `.env`), see
//! [`config::CliConfig::from_env`].
//!
//! # Examples
//!
//! ```bash
//! # Import the bundled scenario and resolve it
//! cargo run -p gear-cli -- resolve --reset
//!
//! # What is still missing?
//! cargo run -p gear-cli -- needs
//! ```

mod commands;
mod config;
mod dirs;
mod logging;
mod report;

use anyhow::Result;
use clap::Parser;

use commands::{Clean, Context, Mark, Needs, Resolve};
use config::CliConfig;

/// Track gearsets and resolve them against an inventory
#[derive(Parser)]
#[command(name = "gearplan")]
#[command(about = "Gearset requirement tracker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Resolve gearsets against a scenario inventory
    Resolve(Resolve),

    /// List outstanding requirements
    Needs(Needs),

    /// Manually mark progress
    Mark(Mark),

    /// Delete saved gearsets
    Clean(Clean),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = CliConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    let context = Context::load(config)?;

    match cli.command {
        Command::Resolve(cmd) => cmd.execute(&context).await,
        Command::Needs(cmd) => cmd.execute(&context).await,
        Command::Mark(cmd) => cmd.execute(&context).await,
        Command::Clean(cmd) => cmd.execute(&context),
    }
}
