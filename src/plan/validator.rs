//! Plan validation rules.
//!
//! - Step names must be non-empty and free of the group separator
//! - `settings.default_group` must name a group
//! - `steps_from` must name an entry of `lists`
//! - `group:` references in `needs`/`wants`, `lists` and group `steps` must
//!   name a group
//!
//! A plan without groups defines only the implicit [`DEFAULT_GROUP`].

use crate::deps::{Entry, GROUP_SEPARATOR};
use crate::error::{NeedfulError, Result};
use crate::plan::runner::DEFAULT_GROUP;
use crate::plan::schema::PlanConfig;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a plan and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_plan(plan: &PlanConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_steps(plan));
    errors.extend(validate_groups(plan));
    errors.extend(validate_references(plan));

    errors
}

/// Validate and turn the collected errors into a single `PlanValidation`.
pub fn ensure_valid(plan: &PlanConfig) -> Result<()> {
    let errors = validate_plan(plan);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(NeedfulError::PlanValidation { message })
}

fn defines_group(plan: &PlanConfig, id: &str) -> bool {
    if plan.groups.is_empty() {
        id == DEFAULT_GROUP
    } else {
        plan.groups.contains_key(id)
    }
}

fn validate_steps(plan: &PlanConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for name in plan.steps.keys() {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-step-name",
                "Step names must not be empty".to_string(),
            ));
        } else if name.contains(GROUP_SEPARATOR) {
            errors.push(ValidationError::new(
                "separator-in-step-name",
                format!(
                    "Step '{}' must not contain '{}'",
                    name, GROUP_SEPARATOR
                ),
            ));
        }
    }

    errors
}

fn validate_groups(plan: &PlanConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(default) = &plan.settings.default_group {
        if !defines_group(plan, default) {
            errors.push(ValidationError::new(
                "unknown-default-group",
                format!("Default group '{}' is not defined", default),
            ));
        }
    }

    for (id, group) in &plan.groups {
        if let Some(list) = &group.steps_from {
            if !plan.lists.contains_key(list) {
                errors.push(ValidationError::new(
                    "unknown-list",
                    format!("Group '{}' reads steps from unknown list '{}'", id, list),
                ));
            }
        }
    }

    errors
}

fn validate_references(plan: &PlanConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, step) in &plan.steps {
        let owner = format!("Step '{}'", name);
        check_entries(plan, &owner, step.needs.iter().chain(&step.wants), &mut errors);
    }

    let mut lists: Vec<_> = plan.lists.iter().collect();
    lists.sort_by_key(|(name, _)| name.as_str());
    for (name, entries) in lists {
        let owner = format!("List '{}'", name);
        check_entries(plan, &owner, entries, &mut errors);
    }

    for (id, group) in &plan.groups {
        if let Some(steps) = &group.steps {
            let owner = format!("Group '{}'", id);
            check_entries(plan, &owner, steps, &mut errors);
        }
    }

    errors
}

fn check_entries<'a>(
    plan: &PlanConfig,
    owner: &str,
    entries: impl IntoIterator<Item = &'a String>,
    errors: &mut Vec<ValidationError>,
) {
    for entry in entries {
        if let Some(group) = Entry::parse(entry).group() {
            if !defines_group(plan, group) {
                errors.push(ValidationError::new(
                    "unknown-group-reference",
                    format!(
                        "{} references '{}' but group '{}' is not defined",
                        owner, entry, group
                    ),
                ));
            }
        }
    }
}
