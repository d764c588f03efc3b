//! List command implementation.
//!
//! The `needful list` command shows the plan's groups and steps without
//! running anything.

use std::path::{Path, PathBuf};

use crate::cli::args::ListArgs;
use crate::deps::discover_steps;
use crate::error::Result;
use crate::plan::{GroupConfig, PlanConfig, DEFAULT_GROUP};
use crate::ui::{NeedfulTheme, UserInterface};

use super::dispatcher::{load_plan, Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    project_root: PathBuf,
    plan: Option<PathBuf>,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(project_root: &Path, plan: Option<&Path>, args: ListArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            plan: plan.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }

    fn show_groups(&self, ui: &mut dyn UserInterface, theme: &NeedfulTheme, plan: &PlanConfig) -> Result<()> {
        ui.message(&format!("  {}", theme.key.apply_to("Groups:")));

        if plan.groups.is_empty() {
            ui.message(&format!(
                "    {} {}",
                theme.highlight.apply_to(DEFAULT_GROUP),
                theme.dim.apply_to("(implicit)")
            ));
            return Ok(());
        }

        let names: Vec<String> = plan.steps.keys().cloned().collect();
        for (id, group) in &plan.groups {
            let mut detail = Vec::new();
            if plan.settings.default_group.as_deref() == Some(id.as_str()) {
                detail.push("default".to_string());
            }
            if !group.prefix.is_empty() {
                detail.push(format!("prefix: {}", group.prefix));
            }
            if !group.suffix.is_empty() {
                detail.push(format!("suffix: {}", group.suffix));
            }
            if !group.auto_run {
                detail.push("manual".to_string());
            }

            let detail = if detail.is_empty() {
                String::new()
            } else {
                format!(" {}", theme.dim.apply_to(format!("({})", detail.join(", "))))
            };
            ui.message(&format!("    {}{}", theme.highlight.apply_to(id), detail));

            if let Some(initial) = initial_list(plan, group, &names)? {
                ui.message(&format!(
                    "      {} {}",
                    theme.dim.apply_to("└── runs:"),
                    theme.dim.apply_to(initial.join(" → "))
                ));
            }
        }
        Ok(())
    }

    fn show_steps(&self, ui: &mut dyn UserInterface, theme: &NeedfulTheme, plan: &PlanConfig) {
        ui.message(&format!("  {}", theme.key.apply_to("Steps:")));

        for (name, step) in &plan.steps {
            let detail = match &step.command {
                Some(cmd) => format!(" {} {}", theme.dim.apply_to("-"), theme.command.apply_to(cmd)),
                None => String::new(),
            };
            ui.message(&format!("    {}{}", theme.highlight.apply_to(name), detail));

            if let Some(desc) = &step.description {
                ui.message(&format!("      {}", theme.dim.apply_to(desc)));
            }
            if !step.needs.is_empty() {
                ui.message(&format!(
                    "      {} {}",
                    theme.dim.apply_to("└── needs:"),
                    theme.dim.apply_to(step.needs.join(", "))
                ));
            }
            if !step.wants.is_empty() {
                ui.message(&format!(
                    "      {} {}",
                    theme.dim.apply_to("└── wants:"),
                    theme.dim.apply_to(step.wants.join(", "))
                ));
            }
        }
    }
}

/// The list a group runs when it is created, with the same priority the
/// registry applies: explicit steps, then a named list, then discovery.
fn initial_list(plan: &PlanConfig, group: &GroupConfig, names: &[String]) -> Result<Option<Vec<String>>> {
    if let Some(steps) = &group.steps {
        return Ok(Some(steps.clone()));
    }
    if let Some(list) = group.steps_from.as_ref().and_then(|l| plan.lists.get(l)) {
        return Ok(Some(list.clone()));
    }
    if group.prefix.is_empty() && group.suffix.is_empty() {
        return Ok(None);
    }
    let found = discover_steps(names, &group.prefix, &group.suffix)?;
    Ok(Some(found))
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some((_, plan)) = load_plan(&self.project_root, self.plan.as_deref(), ui)? else {
            return Ok(CommandResult::failure(2));
        };

        let theme = ui.theme().clone();

        if !self.args.steps_only {
            self.show_groups(ui, &theme, &plan)?;
            if !self.args.groups_only {
                ui.message("");
            }
        }

        if !self.args.groups_only {
            self.show_steps(ui, &theme, &plan);
        }

        Ok(CommandResult::success())
    }
}
