//! Step invokers and statically declared step tables.
//!
//! A [`StepInvoker`] performs the work behind a full step identifier. Any
//! `Fn(&O, &str, &[A]) -> Result<()>` closure is an invoker, and so is a
//! [`StepTable`], the list of step descriptors an owner declares up front.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{NeedfulError, Result};

/// Performs the work of a step on behalf of its owner.
pub trait StepInvoker<O, A> {
    /// Run the step identified by `step` (already prefixed/suffixed).
    fn invoke(&self, owner: &O, step: &str, args: &[A]) -> Result<()>;
}

impl<O, A, F> StepInvoker<O, A> for F
where
    F: Fn(&O, &str, &[A]) -> Result<()>,
{
    fn invoke(&self, owner: &O, step: &str, args: &[A]) -> Result<()> {
        self(owner, step, args)
    }
}

/// Body of a declared step.
pub type StepFn<O, A> = fn(&O, &[A]) -> anyhow::Result<()>;

/// A declared step: its full name, body and an optional description.
pub struct StepDescriptor<O, A> {
    name: String,
    run: StepFn<O, A>,
    description: Option<String>,
}

impl<O, A> StepDescriptor<O, A> {
    /// The full step name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable description, if one was declared.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl<O, A> Clone for StepDescriptor<O, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            run: self.run,
            description: self.description.clone(),
        }
    }
}

impl<O, A> fmt::Debug for StepDescriptor<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Statically declared steps of an owner, in declaration order.
///
/// Declaration order matters: prefix/suffix discovery returns matches in the
/// order steps were added here.
///
/// # Example
///
/// ```
/// use needful::deps::StepTable;
///
/// struct Service;
///
/// let table: StepTable<Service, ()> = StepTable::new()
///     .step("__construct_foo", |_svc, _args| Ok(()))
///     .step("__construct_bar", |_svc, _args| Ok(()));
///
/// assert_eq!(table.names(), vec!["__construct_foo", "__construct_bar"]);
/// ```
pub struct StepTable<O, A> {
    steps: IndexMap<String, StepDescriptor<O, A>>,
}

impl<O, A> StepTable<O, A> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            steps: IndexMap::new(),
        }
    }

    /// Declare a step. A later declaration with the same name replaces the
    /// body but keeps the original position.
    pub fn step(mut self, name: impl Into<String>, run: StepFn<O, A>) -> Self {
        self.insert(name.into(), run, None);
        self
    }

    /// Declare a step with a description.
    pub fn described(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        run: StepFn<O, A>,
    ) -> Self {
        self.insert(name.into(), run, Some(description.into()));
        self
    }

    fn insert(&mut self, name: String, run: StepFn<O, A>, description: Option<String>) {
        let descriptor = StepDescriptor {
            name: name.clone(),
            run,
            description,
        };
        self.steps.insert(name, descriptor);
    }

    /// All declared names, in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.steps.keys().cloned().collect()
    }

    /// Find a step by exact name, falling back to an ASCII case-insensitive match.
    pub fn get(&self, name: &str) -> Option<&StepDescriptor<O, A>> {
        self.steps.get(name).or_else(|| {
            self.steps
                .values()
                .find(|d| d.name.eq_ignore_ascii_case(name))
        })
    }

    /// Whether a step with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of declared steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step is declared.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over the descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor<O, A>> {
        self.steps.values()
    }
}

impl<O, A> Default for StepTable<O, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, A> Clone for StepTable<O, A> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
        }
    }
}

impl<O, A> fmt::Debug for StepTable<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.steps.keys()).finish()
    }
}

impl<O, A> StepInvoker<O, A> for StepTable<O, A> {
    fn invoke(&self, owner: &O, step: &str, args: &[A]) -> Result<()> {
        let descriptor = self.get(step).ok_or_else(|| NeedfulError::NoSuchStep {
            step: step.to_string(),
        })?;
        (descriptor.run)(owner, args).map_err(|e| NeedfulError::from_step_body(step, e))
    }
}
