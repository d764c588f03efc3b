//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`].
//!
//! # Exit codes
//!
//! - `0` - Success
//! - `1` - A step failed (or returned `false` under `--soft`)
//! - `2` - The plan could not be loaded, or a group or step lookup failed

pub mod dispatcher;
pub mod list;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
