//! Command-line argument definitions for the Pentimento CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the two snapshot definitions, the
//! output directory, configuration file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Pentimento diff tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the snapshot definition for the earlier model version
    #[arg(help = "Path to the \"before\" snapshot definition (JSON)")]
    pub before: String,

    /// Path to the snapshot definition for the later model version
    #[arg(help = "Path to the \"after\" snapshot definition (JSON)")]
    pub after: String,

    /// Directory where the .dot graph files are written
    #[arg(short, long, default_value = "out")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
