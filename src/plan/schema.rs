//! Plan file schema.
//!
//! These structs map to the YAML plan format. Maps are ordered: groups are
//! created in declaration order, and step declaration order is the order
//! prefix/suffix discovery returns steps in.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root of a plan file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Global settings.
    pub settings: Settings,

    /// Named step lists, usable as a group's initial list via `steps_from`.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub lists: HashMap<String, Vec<String>>,

    /// Group definitions, created in this order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub groups: IndexMap<String, GroupConfig>,

    /// Step definitions, keyed by full step identifier.
    pub steps: IndexMap<String, StepConfig>,
}

/// Settings that apply to the whole plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Emit trace records for every group and run.
    #[serde(skip_serializing_if = "is_false")]
    pub debug: bool,

    /// Group that steps requested on the command line run in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_group: Option<String>,

    /// Extra environment for every command.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
}

/// One group of the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Prepended to short step names.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,

    /// Appended to short step names.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub suffix: String,

    /// Default arguments, passed to commands as `$1`, `$2`, ...
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Run the initial list when the group is created.
    pub auto_run: bool,

    /// Explicit initial list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,

    /// Name of an entry in `lists` to use as the initial list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_from: Option<String>,

    /// Override `settings.debug` for this group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            args: Vec::new(),
            auto_run: true,
            steps: None,
            steps_from: None,
            debug: None,
        }
    }
}

/// One step of the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Human readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Shell command. A step without one only runs its requirements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Steps that must succeed before the command runs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,

    /// Steps that are attempted before the command runs; failures are ignored.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wants: Vec<String>,
}

fn is_false(b: &bool) -> bool {
    !b
}
