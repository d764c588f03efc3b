//! Run command implementation.
//!
//! The `needful run` command bootstraps the plan's groups, then requests the
//! given steps on the selected group and prints what each group ran.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::json;

use crate::cli::args::RunArgs;
use crate::deps::{HasDeps, Outcome, RunOptions, StepRequest};
use crate::error::Result;
use crate::plan::PlanRunner;
use crate::ui::UserInterface;

use super::dispatcher::{exit_code_for, load_plan, Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    plan: Option<PathBuf>,
    args: RunArgs,
    debug: bool,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, plan: Option<&Path>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            plan: plan.map(Path::to_path_buf),
            args,
            debug: false,
        }
    }

    /// Force group trace records on, whatever the plan says.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn run_options(&self) -> RunOptions {
        let options = if self.args.soft {
            RunOptions::wants()
        } else {
            RunOptions::needs()
        };
        options.full_name(self.args.full_name)
    }

    fn run_plan(&self, runner: &PlanRunner) -> Result<Option<Outcome>> {
        runner.bootstrap()?;

        if let Some(group) = &self.args.group {
            runner.use_dep_group(group)?;
        }

        if self.args.steps.is_empty() {
            return Ok(None);
        }

        let request = StepRequest::from(self.args.steps.clone());
        runner
            .run_deps(request, &self.args.args, self.run_options())
            .map(Some)
    }

    fn print_report(&self, ui: &mut dyn UserInterface, runner: &PlanRunner) {
        let theme = ui.theme().clone();
        for group in runner.dep_groups().groups() {
            let called = group.called();
            if called.is_empty() {
                continue;
            }
            ui.message(&format!("{}", theme.key.apply_to(format!("{}:", group.id()))));
            for (step, ok) in called {
                ui.message(&format!("  {}", theme.format_outcome(&step, ok)));
            }
        }
    }

    fn print_json(
        &self,
        ui: &mut dyn UserInterface,
        runner: &PlanRunner,
        outcome: Option<&Outcome>,
        error: Option<String>,
        success: bool,
    ) -> Result<()> {
        let groups: IndexMap<String, IndexMap<String, bool>> = runner
            .dep_groups()
            .groups()
            .iter()
            .map(|g| (g.id().to_string(), g.called()))
            .collect();

        let report = json!({
            "success": success,
            "outcome": outcome,
            "groups": groups,
            "executed": runner.executed(),
            "error": error,
        });
        let text = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
        ui.message(&text);
        Ok(())
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some((path, mut plan)) = load_plan(&self.project_root, self.plan.as_deref(), ui)? else {
            return Ok(CommandResult::failure(2));
        };

        if self.debug {
            plan.settings.debug = true;
        }

        tracing::debug!(plan = %path.display(), steps = ?self.args.steps, "Running plan");

        let runner = PlanRunner::new(plan, &self.project_root).capture_output(self.args.json);
        let (outcome, error) = match self.run_plan(&runner) {
            Ok(outcome) => (outcome, None),
            Err(e) => (None, Some(e)),
        };

        let success = error.is_none() && outcome.as_ref().map_or(true, Outcome::is_success);

        if self.args.json {
            let message = error.as_ref().map(ToString::to_string);
            self.print_json(ui, &runner, outcome.as_ref(), message, success)?;
        } else {
            self.print_report(ui, &runner);
        }

        if let Some(err) = error {
            ui.error(&err.to_string());
            return Ok(CommandResult::failure(exit_code_for(&err)));
        }

        if !success {
            let failed = outcome.map(|o| o.failures()).unwrap_or_default();
            ui.warning(&format!("Failed steps: {}", failed.join(", ")));
            return Ok(CommandResult::failure(1));
        }

        Ok(CommandResult::success())
    }
}
