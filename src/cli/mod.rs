//! CLI module for TrackMux
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// TrackMux
///
/// Reconciles the track layout of a batch of episodes into one template and
/// remuxes every episode to match it.
#[derive(Parser, Debug)]
#[command(name = "trackmux")]
#[command(about = "TrackMux - Consistent track order, flags and languages across a season")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error) [default: info]
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Logging format [default: pretty]
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file
    #[arg(long, env = "TRACKMUX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a track template interactively and remux every episode to it
    Remux(args::RemuxArgs),
    /// Rewrite track properties in place without changing track order
    Edit(args::EditArgs),
    /// Extract audio or subtitle tracks to sidecar files
    Extract(args::ExtractArgs),
    /// Validate containers with mkvalidator
    Verify(args::VerifyArgs),
    /// Print the normalized tracks of one file
    Inspect(args::InspectArgs),
}
