//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, NeedfulTheme, UserInterface};

/// Writes messages to stdout and errors to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: NeedfulTheme,
}

impl TerminalUI {
    /// Create a terminal UI, picking colors from the environment.
    pub fn new() -> Self {
        let theme = if should_use_colors() {
            NeedfulTheme::new()
        } else {
            NeedfulTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn theme(&self) -> &NeedfulTheme {
        &self.theme
    }
}
