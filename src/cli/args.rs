//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Needful - run the steps a project needs, each at most once.
#[derive(Debug, Parser)]
#[command(name = "needful")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the plan file (overrides needful.yml discovery)
    #[arg(long, global = true, env = "NEEDFUL_PLAN")]
    pub plan: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging and group trace records
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run steps of the plan (default if no command specified)
    Run(RunArgs),

    /// List the plan's groups and steps
    List(ListArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Steps to run; `group:step` and `group:` entries are accepted
    pub steps: Vec<String>,

    /// Group to run the steps in (defaults to the plan's default group)
    #[arg(short, long)]
    pub group: Option<String>,

    /// Tolerate failing steps instead of stopping at the first one
    #[arg(long)]
    pub soft: bool,

    /// Argument passed to every step, replacing the group's defaults
    #[arg(short = 'a', long = "arg", value_name = "ARG")]
    pub args: Vec<String>,

    /// Treat step names as full identifiers (skip prefix/suffix)
    #[arg(long)]
    pub full_name: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Show only steps
    #[arg(long, conflicts_with = "groups_only")]
    pub steps_only: bool,

    /// Show only groups
    #[arg(long)]
    pub groups_only: bool,
}
