//! CLI argument definitions using clap
//!
//! Commands:
//! - smiledb compile --config <path>
//! - smiledb tables --config <path>
//! - smiledb build --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// smiledb - compile experiment schemas into SQLite tables and seed them
#[derive(Parser, Debug)]
#[command(name = "smiledb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile all tables and print the DDL script
    Compile {
        /// Path to configuration file
        #[arg(long, default_value = "./smile.json")]
        config: PathBuf,
    },

    /// Print the compiled table models as JSON
    Tables {
        /// Path to configuration file
        #[arg(long, default_value = "./smile.json")]
        config: PathBuf,
    },

    /// Compile, recreate the database and seed stimuli
    Build {
        /// Path to configuration file
        #[arg(long, default_value = "./smile.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
