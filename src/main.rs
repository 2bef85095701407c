//! Draftspace CLI - Hierarchy Core Inspector
//!
//! Command-line interface for inspecting and initializing workspace
//! snapshot directories.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use draftspace::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Draftspace v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Init { path } => commands::init(&path)
            .with_context(|| format!("failed to initialize workspace at {}", path.display())),
        Commands::Tree { path } => commands::tree(&path)
            .with_context(|| format!("failed to read workspace at {}", path.display())),
        Commands::Levels { path } => commands::levels(&path)
            .with_context(|| format!("failed to read workspace at {}", path.display())),
        Commands::Check { path } => commands::check(&path)
            .with_context(|| format!("failed to read workspace at {}", path.display())),
        Commands::Summary { path } => commands::summary(&path)
            .with_context(|| format!("failed to read workspace at {}", path.display())),
    }
}
