//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::error::{NeedfulError, Result};
use crate::plan::{load_project_plan, PlanConfig};
use crate::ui::UserInterface;

use super::list::ListCommand;
use super::run::RunCommand;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// The exit code as a process status; codes outside `0..=255` become 1.
    pub fn exit_status(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Exit code for an error that ended a command.
pub fn exit_code_for(err: &NeedfulError) -> i32 {
    match err {
        NeedfulError::StepFailed { .. }
        | NeedfulError::StepCycle { .. }
        | NeedfulError::CommandFailed { .. } => 1,
        _ => 2,
    }
}

/// Load the project's plan, reporting plan errors through `ui`.
///
/// Returns `None` when the plan is missing or invalid; other errors are
/// propagated.
pub(super) fn load_plan(
    project_root: &Path,
    plan: Option<&Path>,
    ui: &mut dyn UserInterface,
) -> Result<Option<(PathBuf, PlanConfig)>> {
    match load_project_plan(project_root, plan) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(NeedfulError::PlanNotFound { path }) => {
            ui.error(&format!(
                "No plan found at {}. Create a needful.yml or pass --plan.",
                path.display()
            ));
            Ok(None)
        }
        Err(e @ (NeedfulError::PlanParse { .. } | NeedfulError::PlanValidation { .. })) => {
            ui.error(&e.to_string());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    plan: Option<PathBuf>,
    debug: bool,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            plan: None,
            debug: false,
        }
    }

    /// Use an explicit plan file instead of discovery.
    pub fn with_plan(mut self, plan: Option<PathBuf>) -> Self {
        self.plan = plan;
        self
    }

    /// Force group trace records on.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let plan = self.plan.as_deref();
        match &cli.command {
            Some(Commands::Run(args)) => {
                RunCommand::new(&self.project_root, plan, args.clone())
                    .with_debug(self.debug)
                    .execute(ui)
            }
            Some(Commands::List(args)) => {
                ListCommand::new(&self.project_root, plan, args.clone()).execute(ui)
            }
            // Default to run with no steps: bootstrap the plan's groups.
            None => RunCommand::new(&self.project_root, plan, RunArgs::default())
                .with_debug(self.debug)
                .execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn exit_status_fits_a_process_status() {
        assert_eq!(CommandResult::success().exit_status(), 0);
        assert_eq!(CommandResult::failure(2).exit_status(), 2);
        assert_eq!(CommandResult::failure(256).exit_status(), 1);
        assert_eq!(CommandResult::failure(-1).exit_status(), 1);
    }

    #[test]
    fn exit_codes_split_step_and_lookup_errors() {
        let failed = NeedfulError::step_failed("a", anyhow::anyhow!("boom"));
        assert_eq!(exit_code_for(&failed), 1);
        assert_eq!(
            exit_code_for(&NeedfulError::StepCycle {
                cycle: "a -> a".to_string()
            }),
            1
        );
        assert_eq!(
            exit_code_for(&NeedfulError::UnknownGroup {
                id: "x".to_string()
            }),
            2
        );
        assert_eq!(
            exit_code_for(&NeedfulError::NoSuchStep {
                step: "x".to_string()
            }),
            2
        );
    }

    #[test]
    fn load_plan_reports_missing_plan() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut ui = crate::ui::MockUI::new();
        let loaded = load_plan(temp.path(), None, &mut ui).unwrap();
        assert!(loaded.is_none());
        assert!(ui.has_error("No plan found"));
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"))
            .with_plan(Some(PathBuf::from("ci.yml")))
            .with_debug(true);
        assert_eq!(dispatcher.project_root(), Path::new("/test"));
        assert_eq!(dispatcher.plan.as_deref(), Some(Path::new("ci.yml")));
        assert!(dispatcher.debug);
    }
}
