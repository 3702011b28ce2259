//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};

/// landsat-cog - Landsat archive to COG batch worker
#[derive(Parser, Debug)]
#[command(name = "landsat-cog")]
#[command(version, about, long_about = None)]
#[command(author = "Landsat COG Contributors")]
pub struct Cli {
    /// Path to configuration file
    ///
    /// If the default file is missing, configuration comes from the
    /// environment alone.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "LANDSAT_COG_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LANDSAT_COG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process queued archives until the queue is empty
    Run(commands::run::RunArgs),

    /// Process a single queued archive, or a given key
    ProcessOne(commands::process_one::ProcessOneArgs),

    /// Add archive keys from the source bucket to the queue
    Enqueue(commands::enqueue::EnqueueArgs),

    /// Show how many messages are waiting
    Status(commands::status::StatusArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
