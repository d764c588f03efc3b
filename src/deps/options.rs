//! Settings and options for registries, groups and runs.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::invoker::StepInvoker;

/// Registry-wide settings, fixed when the registry is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepsSettings {
    /// Emit a trace record for every group construction and run.
    pub debug: bool,
}

impl DepsSettings {
    /// Settings with tracing switched on or off.
    pub fn with_debug(debug: bool) -> Self {
        Self { debug }
    }
}

/// What to do when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Propagate the error and leave the step unrecorded (`needs`).
    #[default]
    Abort,
    /// Record the step as failed and carry on (`wants`).
    Tolerate,
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureMode::Abort => write!(f, "abort"),
            FailureMode::Tolerate => write!(f, "tolerate"),
        }
    }
}

/// Per-call flags for [`Group::run`](super::Group::run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Names are already full identifiers; skip prefix/suffix.
    pub full_name: bool,
    /// Failure handling.
    pub failure: FailureMode,
}

impl RunOptions {
    /// Hard-fail options, as used by `needs`.
    pub fn needs() -> Self {
        Self {
            full_name: false,
            failure: FailureMode::Abort,
        }
    }

    /// Soft-fail options, as used by `wants`.
    pub fn wants() -> Self {
        Self {
            full_name: false,
            failure: FailureMode::Tolerate,
        }
    }

    /// Same options with `full_name` set.
    pub fn full_name(mut self, full_name: bool) -> Self {
        self.full_name = full_name;
        self
    }

    /// Whether failures are tolerated.
    pub fn tolerates_failure(&self) -> bool {
        self.failure == FailureMode::Tolerate
    }
}

/// Options a group is created with.
///
/// Everything except the invoker has a sensible default; `auto_run` is on.
pub struct GroupOptions<O, A> {
    /// Performs the steps. Required; the `HasDeps` facade falls back to the
    /// owner's step table.
    pub invoker: Option<Rc<dyn StepInvoker<O, A>>>,
    /// Prepended to short step names.
    pub prefix: String,
    /// Appended to short step names.
    pub suffix: String,
    /// Default arguments for runs that pass none.
    pub args: Vec<A>,
    /// Run an initial list of steps right after creation.
    pub auto_run: bool,
    /// Explicit initial list.
    pub steps: Option<Vec<String>>,
    /// Name of an owner-provided list to use as the initial list.
    pub steps_field: Option<String>,
    /// Override the registry's debug setting for this group.
    pub debug: Option<bool>,
}

impl<O, A> GroupOptions<O, A> {
    /// Default options.
    pub fn new() -> Self {
        Self {
            invoker: None,
            prefix: String::new(),
            suffix: String::new(),
            args: Vec::new(),
            auto_run: true,
            steps: None,
            steps_field: None,
            debug: None,
        }
    }

    /// Set the invoker.
    pub fn invoker(mut self, invoker: impl StepInvoker<O, A> + 'static) -> Self {
        let invoker: Rc<dyn StepInvoker<O, A>> = Rc::new(invoker);
        self.invoker = Some(invoker);
        self
    }

    /// Set an already shared invoker.
    pub fn shared_invoker(mut self, invoker: Rc<dyn StepInvoker<O, A>>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Set the name prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the name suffix.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Append default arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = A>) -> Self {
        self.args.extend(args);
        self
    }

    /// Append one default argument.
    pub fn arg(mut self, arg: A) -> Self {
        self.args.push(arg);
        self
    }

    /// Turn the initial run on or off.
    pub fn auto_run(mut self, auto_run: bool) -> Self {
        self.auto_run = auto_run;
        self
    }

    /// Explicit initial list. Takes priority over `steps_field` and discovery.
    pub fn steps<S: Into<String>>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
        self.steps = Some(steps.into_iter().map(Into::into).collect());
        self
    }

    /// Read the initial list from a named owner list.
    pub fn steps_field(mut self, field: impl Into<String>) -> Self {
        self.steps_field = Some(field.into());
        self
    }

    /// Override tracing for this group.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }
}

impl<O, A> Default for GroupOptions<O, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, A: fmt::Debug> fmt::Debug for GroupOptions<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupOptions")
            .field("invoker", &self.invoker.as_ref().map(|_| "<invoker>"))
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("args", &self.args)
            .field("auto_run", &self.auto_run)
            .field("steps", &self.steps)
            .field("steps_field", &self.steps_field)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn group_options_defaults() {
        let opts: GroupOptions<(), i32> = GroupOptions::new();
        assert!(opts.invoker.is_none());
        assert!(opts.auto_run);
        assert!(opts.prefix.is_empty());
        assert!(opts.suffix.is_empty());
        assert!(opts.steps.is_none());
        assert!(opts.debug.is_none());
    }

    #[test]
    fn group_options_builder_chains() {
        let opts: GroupOptions<(), i32> = GroupOptions::new()
            .prefix("__construct_")
            .suffix("_task")
            .args([1, 2])
            .arg(3)
            .steps(["foo", "bar"])
            .steps_field("constructors")
            .auto_run(false)
            .debug(true)
            .invoker(|_: &(), _: &str, _: &[i32]| -> Result<()> { Ok(()) });

        assert_eq!(opts.prefix, "__construct_");
        assert_eq!(opts.suffix, "_task");
        assert_eq!(opts.args, vec![1, 2, 3]);
        assert_eq!(opts.steps, Some(vec!["foo".to_string(), "bar".to_string()]));
        assert_eq!(opts.steps_field.as_deref(), Some("constructors"));
        assert!(!opts.auto_run);
        assert_eq!(opts.debug, Some(true));
        assert!(opts.invoker.is_some());
    }

    #[test]
    fn run_options_presets() {
        assert_eq!(RunOptions::needs().failure, FailureMode::Abort);
        assert!(RunOptions::wants().tolerates_failure());
        assert!(RunOptions::needs().full_name(true).full_name);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: DepsSettings = serde_yaml::from_str("{}").unwrap();
        assert!(!settings.debug);
        let settings: DepsSettings = serde_yaml::from_str("debug: true").unwrap();
        assert!(settings.debug);
    }

    #[test]
    fn failure_mode_displays_lowercase() {
        assert_eq!(FailureMode::Tolerate.to_string(), "tolerate");
    }
}
