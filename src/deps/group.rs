//! Groups: memoizing execution contexts for steps.
//!
//! A group owns one namespace of steps. Each full step identifier moves
//! through `Unseen -> Running -> {Succeeded, Failed}`; the terminal states
//! are recorded in the `called` table and never re-invoked. A failure under
//! [`FailureMode::Abort`] is not recorded, so the identifier goes back to
//! `Unseen` and a later run will try it again.

use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::invoker::StepInvoker;
use super::options::{FailureMode, GroupOptions, RunOptions};
use super::outcome::{Outcome, Report};
use super::registry::DepGroups;
use super::request::{Entry, StepRequest};
use crate::error::{NeedfulError, Result};

/// Tracing target for debug-mode trace records.
pub const TRACE_TARGET: &str = "needful::trace";

/// An execution and memoization context for one namespace of steps.
pub struct Group<O, A> {
    id: String,
    invoker: Rc<dyn StepInvoker<O, A>>,
    default_args: Vec<A>,
    prefix: String,
    suffix: String,
    debug: bool,
    called: RefCell<IndexMap<String, bool>>,
    running: RefCell<Vec<String>>,
}

impl<O, A: Clone + fmt::Debug> Group<O, A> {
    /// Build a group from its options.
    ///
    /// `inherited_debug` is the registry setting, used unless the options
    /// override it. Fails with `MissingInvoker` when no invoker is set.
    pub fn new(id: &str, options: &GroupOptions<O, A>, inherited_debug: bool) -> Result<Self> {
        let debug = options.debug.unwrap_or(inherited_debug);
        if debug {
            tracing::debug!(
                target: TRACE_TARGET,
                owner = type_name::<O>(),
                group = id,
                prefix = %options.prefix,
                suffix = %options.suffix,
                args = ?options.args,
                auto_run = options.auto_run,
                steps = ?options.steps,
                steps_field = ?options.steps_field,
                "Group::new"
            );
        }

        let invoker = options
            .invoker
            .clone()
            .ok_or_else(|| NeedfulError::MissingInvoker { id: id.to_string() })?;

        Ok(Self {
            id: id.to_string(),
            invoker,
            default_args: options.args.clone(),
            prefix: options.prefix.clone(),
            suffix: options.suffix.clone(),
            debug,
            called: RefCell::new(IndexMap::new()),
            running: RefCell::new(Vec::new()),
        })
    }

    /// Run a single step or a sequence of entries.
    ///
    /// `args` replaces the group's default arguments when non-empty. The
    /// resolved arguments are also what cross-group entries receive.
    pub fn run(
        &self,
        owner: &O,
        groups: &DepGroups<O, A>,
        request: &StepRequest,
        args: &[A],
        options: RunOptions,
    ) -> Result<Outcome> {
        let resolved = if args.is_empty() {
            self.default_args.as_slice()
        } else {
            args
        };

        if self.debug {
            tracing::debug!(
                target: TRACE_TARGET,
                owner = type_name::<O>(),
                group = %self.id,
                steps = %request,
                given_args = ?args,
                args = ?resolved,
                full_name = options.full_name,
                failure = %options.failure,
                "Group::run"
            );
        }

        match request {
            StepRequest::One(name) => self.run_step(owner, name, resolved, options).map(Outcome::Step),
            StepRequest::Many(entries) => self
                .run_sequence(owner, groups, entries, resolved, options)
                .map(Outcome::Batch),
        }
    }

    fn run_sequence(
        &self,
        owner: &O,
        groups: &DepGroups<O, A>,
        entries: &[String],
        args: &[A],
        options: RunOptions,
    ) -> Result<Report> {
        let mut report = Report::new();

        for (index, raw) in entries.iter().enumerate() {
            match Entry::parse(raw) {
                Entry::Local(name) => {
                    let request = StepRequest::One(name.to_string());
                    let outcome = self.run(owner, groups, &request, args, options)?;
                    report.insert(name.to_string(), outcome);
                }
                Entry::Remote { group, step } => {
                    let other = groups.get(group)?;
                    let request = StepRequest::One(step.to_string());
                    let outcome = other.run(owner, groups, &request, args, options)?;
                    report.insert(step.to_string(), outcome);
                }
                Entry::HandOff { group } => {
                    let other = groups.get(group)?;
                    let request = StepRequest::Many(entries[index + 1..].to_vec());
                    let outcome = other.run(owner, groups, &request, args, options)?;
                    report.insert(group.to_string(), outcome);
                    break;
                }
            }
        }

        Ok(report)
    }

    fn run_step(&self, owner: &O, name: &str, args: &[A], options: RunOptions) -> Result<bool> {
        let full = if options.full_name {
            name.to_string()
        } else {
            self.full_name(name)
        };

        if let Some(ok) = self.outcome(&full) {
            return Ok(ok);
        }

        self.enter(&full)?;
        let result = self.invoker.invoke(owner, &full, args);
        self.leave(&full);

        let ok = match result {
            Ok(()) => true,
            Err(err) => match options.failure {
                FailureMode::Tolerate => {
                    tracing::debug!(group = %self.id, step = %full, error = %err, "Tolerated step failure");
                    false
                }
                FailureMode::Abort => return Err(err),
            },
        };

        self.called.borrow_mut().insert(full, ok);
        Ok(ok)
    }

    /// Mark `full` as running, rejecting a step that is already on the stack.
    fn enter(&self, full: &str) -> Result<()> {
        let mut running = self.running.borrow_mut();
        if let Some(pos) = running.iter().position(|s| s == full) {
            let mut cycle: Vec<String> = running[pos..].to_vec();
            cycle.push(full.to_string());
            return Err(NeedfulError::StepCycle {
                cycle: cycle.join(" -> "),
            });
        }
        running.push(full.to_string());
        Ok(())
    }

    fn leave(&self, full: &str) {
        let mut running = self.running.borrow_mut();
        if let Some(pos) = running.iter().rposition(|s| s == full) {
            running.remove(pos);
        }
    }
}

impl<O, A> Group<O, A> {
    /// The group id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Prefix applied to short names.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Suffix applied to short names.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Arguments used when a run passes none.
    pub fn default_args(&self) -> &[A] {
        &self.default_args
    }

    /// Whether this group emits trace records.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Full identifier for a short step name.
    pub fn full_name(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }

    /// Recorded outcome for a full identifier, if the step has run.
    pub fn outcome(&self, full: &str) -> Option<bool> {
        self.called.borrow().get(full).copied()
    }

    /// Whether the short-named step has a recorded outcome.
    pub fn has_run(&self, name: &str) -> bool {
        self.outcome(&self.full_name(name)).is_some()
    }

    /// Snapshot of the memoization table, in the order steps finished.
    pub fn called(&self) -> IndexMap<String, bool> {
        self.called.borrow().clone()
    }

    /// Full identifiers currently executing, outermost first.
    pub fn running(&self) -> Vec<String> {
        self.running.borrow().clone()
    }
}

impl<O, A: fmt::Debug> fmt::Debug for Group<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("id", &self.id)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("default_args", &self.default_args)
            .field("debug", &self.debug)
            .field("called", &self.called.borrow())
            .finish()
    }
}
