//! Running a plan through dep groups.
//!
//! [`PlanRunner`] is the owner of the plan's groups. Its invoker looks the
//! full step identifier up in the plan, runs the step's `needs` and `wants`
//! against the current group, then the step's command.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::deps::{DepGroups, DepsSettings, GroupOptions, HasDeps};
use crate::error::{NeedfulError, Result};
use crate::plan::schema::{GroupConfig, PlanConfig, StepConfig};
use crate::shell::{execute, CommandOptions};

/// Group created when a plan declares none.
pub const DEFAULT_GROUP: &str = "main";

/// Environment variable holding the full identifier of the running step.
pub const STEP_ENV_VAR: &str = "NEEDFUL_STEP";

/// Owner of a plan's dep groups.
pub struct PlanRunner {
    config: PlanConfig,
    project_root: PathBuf,
    capture_output: bool,
    executed: RefCell<Vec<String>>,
    outputs: RefCell<IndexMap<String, String>>,
    deps: OnceCell<DepGroups<PlanRunner, String>>,
}

impl PlanRunner {
    /// Create a runner; commands run in `project_root`.
    pub fn new(config: PlanConfig, project_root: &Path) -> Self {
        Self {
            config,
            project_root: project_root.to_path_buf(),
            capture_output: false,
            executed: RefCell::new(Vec::new()),
            outputs: RefCell::new(IndexMap::new()),
            deps: OnceCell::new(),
        }
    }

    /// Capture command output instead of inheriting the terminal.
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// The plan being run.
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Full identifiers of the steps that completed, in completion order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    /// Captured stdout per step, when output capture is on.
    pub fn outputs(&self) -> IndexMap<String, String> {
        self.outputs.borrow().clone()
    }

    /// Create every group of the plan in declaration order.
    ///
    /// Groups with an initial list run it as they are created; the first
    /// hard failure stops the bootstrap. Afterwards the plan's default group,
    /// if any, is made current.
    pub fn bootstrap(&self) -> Result<()> {
        if self.config.groups.is_empty() {
            self.dep_group(DEFAULT_GROUP, self.group_options(&GroupConfig::default()).auto_run(false))?;
        } else {
            for (id, group) in &self.config.groups {
                self.dep_group(id, self.group_options(group))?;
            }
        }

        if let Some(default) = &self.config.settings.default_group {
            self.use_dep_group(default)?;
        }

        Ok(())
    }

    fn group_options(&self, group: &GroupConfig) -> GroupOptions<Self, String> {
        let mut options = GroupOptions::new()
            .invoker(run_plan_step)
            .prefix(group.prefix.clone())
            .suffix(group.suffix.clone())
            .args(group.args.iter().cloned())
            .auto_run(group.auto_run);

        if let Some(steps) = &group.steps {
            options = options.steps(steps.iter().cloned());
        }
        if let Some(list) = &group.steps_from {
            options = options.steps_field(list.clone());
        }
        if let Some(debug) = group.debug {
            options = options.debug(debug);
        }
        options
    }

    /// Find a step by exact name, then ASCII case-insensitively, since
    /// discovery rebuilds names with the group's prefix and suffix casing.
    fn find_step(&self, step: &str) -> Option<(&String, &StepConfig)> {
        self.config.steps.get_key_value(step).or_else(|| {
            self.config
                .steps
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(step))
        })
    }

    fn run_step(&self, step: &str, args: &[String]) -> Result<()> {
        let (step, config) = self.find_step(step).ok_or_else(|| NeedfulError::NoSuchStep {
            step: step.to_string(),
        })?;

        if !config.needs.is_empty() {
            self.needs(config.needs.clone())?;
        }
        if !config.wants.is_empty() {
            self.wants(config.wants.clone())?;
        }

        if let Some(command) = &config.command {
            self.run_command(step, command, args)?;
        }

        tracing::info!(step, "Step complete");
        self.executed.borrow_mut().push(step.to_string());
        Ok(())
    }

    fn run_command(&self, step: &str, command: &str, args: &[String]) -> Result<()> {
        let mut env: HashMap<String, String> = self.config.settings.env.clone();
        env.insert(STEP_ENV_VAR.to_string(), step.to_string());

        let options = CommandOptions {
            cwd: Some(self.project_root.clone()),
            env,
            args: args.to_vec(),
            capture_stdout: self.capture_output,
            capture_stderr: self.capture_output,
        };

        let result = execute(command, &options).map_err(|e| NeedfulError::step_failed(step, e))?;
        tracing::debug!(
            step,
            exit_code = ?result.exit_code,
            duration_ms = result.duration.as_millis() as u64,
            "Command finished"
        );

        if self.capture_output {
            self.outputs
                .borrow_mut()
                .insert(step.to_string(), result.stdout.clone());
        }

        if !result.success {
            return Err(NeedfulError::step_failed(
                step,
                NeedfulError::CommandFailed {
                    command: command.to_string(),
                    code: result.exit_code,
                },
            ));
        }
        Ok(())
    }
}

fn run_plan_step(runner: &PlanRunner, step: &str, args: &[String]) -> Result<()> {
    runner.run_step(step, args)
}

impl HasDeps<String> for PlanRunner {
    fn dep_cell(&self) -> &OnceCell<DepGroups<Self, String>> {
        &self.deps
    }

    fn deps_settings(&self) -> DepsSettings {
        DepsSettings::with_debug(self.config.settings.debug)
    }

    fn step_names(&self) -> Vec<String> {
        self.config.steps.keys().cloned().collect()
    }

    fn step_list(&self, field: &str) -> Option<Vec<String>> {
        self.config.lists.get(field).cloned()
    }
}
