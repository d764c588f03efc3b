//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] writing styled lines to the terminal
//! - [`MockUI`] capturing output for tests
//! - [`NeedfulTheme`] colors and icons

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, NeedfulTheme};

/// Abstraction over where command output goes.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Show a plain message.
    fn message(&mut self, msg: &str);

    /// Show a success message.
    fn success(&mut self, msg: &str);

    /// Show a warning.
    fn warning(&mut self, msg: &str);

    /// Show an error.
    fn error(&mut self, msg: &str);

    /// Theme used to style messages.
    fn theme(&self) -> &NeedfulTheme;
}
