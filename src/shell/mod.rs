//! Shell command execution for plan steps.

pub mod command;

pub use command::{execute, CommandOptions, CommandResult};
