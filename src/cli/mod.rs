//! CLI Module
//!
//! Command-line inspection tooling for a workspace snapshot directory.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Draftspace - hierarchy core inspection tool
#[derive(Parser, Debug)]
#[command(name = "draftspace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a workspace directory with the default layer set
    #[command(name = "init")]
    Init {
        /// Workspace directory
        path: PathBuf,
    },

    /// Print the layer tree
    #[command(name = "tree")]
    Tree {
        /// Workspace directory
        path: PathBuf,
    },

    /// List sites, buildings and levels
    #[command(name = "levels")]
    Levels {
        /// Workspace directory
        path: PathBuf,
    },

    /// Report overlapping level ranges per building
    #[command(name = "check")]
    Check {
        /// Workspace directory
        path: PathBuf,
    },

    /// Print workspace summary statistics
    #[command(name = "summary")]
    Summary {
        /// Workspace directory
        path: PathBuf,
    },
}
