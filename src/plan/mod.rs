//! YAML plans of shell steps.
//!
//! A plan declares steps (a command plus the steps it `needs` and `wants`)
//! and the dep groups they run in. [`PlanRunner`] owns the groups and turns
//! every step invocation into a shell command.
//!
//! - [`schema`] - Plan file structs
//! - [`loader`] - Finding, parsing and validating plan files
//! - [`validator`] - Reference checks run at load time
//! - [`runner`] - The owner that runs plan steps

pub mod loader;
pub mod runner;
pub mod schema;
pub mod validator;

pub use loader::{find_plan, load_plan_file, load_project_plan, parse_plan, PLAN_FILE_NAMES};
pub use runner::{PlanRunner, DEFAULT_GROUP, STEP_ENV_VAR};
pub use schema::{GroupConfig, PlanConfig, Settings, StepConfig};
pub use validator::{ensure_valid, validate_plan, ValidationError};
