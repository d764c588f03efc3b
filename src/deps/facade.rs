//! The `needs`/`wants` facade for owners of dep groups.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use super::group::Group;
use super::invoker::StepTable;
use super::options::{DepsSettings, GroupOptions, RunOptions};
use super::outcome::Outcome;
use super::registry::DepGroups;
use super::request::StepRequest;
use crate::error::Result;

/// Gives an owner dep groups and the `needs`/`wants` entry points.
///
/// Implementors only provide [`dep_cell`](HasDeps::dep_cell); the registry
/// is created in it on first use. Overriding
/// [`step_table`](HasDeps::step_table) gives groups a default invoker and
/// the names used for prefix/suffix discovery.
///
/// # Example
///
/// ```
/// use std::cell::{OnceCell, RefCell};
/// use needful::deps::{DepGroups, GroupOptions, HasDeps, StepTable};
///
/// #[derive(Default)]
/// struct Greeter {
///     name: RefCell<String>,
///     deps: OnceCell<DepGroups<Greeter, String>>,
/// }
///
/// impl HasDeps<String> for Greeter {
///     fn dep_cell(&self) -> &OnceCell<DepGroups<Self, String>> {
///         &self.deps
///     }
///
///     fn step_table(&self) -> StepTable<Self, String> {
///         StepTable::new().step("init_name", |g, args| {
///             *g.name.borrow_mut() = args.first().cloned().unwrap_or_default();
///             Ok(())
///         })
///     }
/// }
///
/// let greeter = Greeter::default();
/// greeter
///     .dep_group("init", GroupOptions::new().prefix("init_").arg("Bob".to_string()))
///     .unwrap();
/// assert_eq!(*greeter.name.borrow(), "Bob");
/// ```
pub trait HasDeps<A = serde_json::Value>: Sized + 'static
where
    A: Clone + fmt::Debug + 'static,
{
    /// Storage for the lazily created registry.
    fn dep_cell(&self) -> &OnceCell<DepGroups<Self, A>>;

    /// Settings for the registry when it gets created.
    fn deps_settings(&self) -> DepsSettings {
        DepsSettings::default()
    }

    /// Statically declared steps; the default invoker for new groups.
    fn step_table(&self) -> StepTable<Self, A> {
        StepTable::new()
    }

    /// Every step name this owner can run, in declaration order.
    fn step_names(&self) -> Vec<String> {
        self.step_table().names()
    }

    /// A named list of step names, for groups created with `steps_field`.
    fn step_list(&self, _field: &str) -> Option<Vec<String>> {
        None
    }

    /// The registry, created on first use.
    fn dep_groups(&self) -> &DepGroups<Self, A> {
        self.dep_cell()
            .get_or_init(|| DepGroups::new(self.deps_settings()))
    }

    /// Create a group. Without an invoker in `options`, the owner's step
    /// table is used.
    fn dep_group(&self, id: &str, mut options: GroupOptions<Self, A>) -> Result<Rc<Group<Self, A>>> {
        if options.invoker.is_none() {
            options = options.invoker(self.step_table());
        }
        self.dep_groups().create(self, id, options)
    }

    /// Create a group with `args` appended to the option's default args.
    fn dep_group_with(
        &self,
        id: &str,
        options: GroupOptions<Self, A>,
        args: Vec<A>,
    ) -> Result<Rc<Group<Self, A>>> {
        self.dep_group(id, options.args(args))
    }

    /// Look a group up and make it current.
    fn use_dep_group(&self, id: &str) -> Result<Rc<Group<Self, A>>> {
        self.dep_groups().set_current(id)
    }

    /// Look a group up without changing the current one.
    fn find_dep_group(&self, id: &str) -> Result<Rc<Group<Self, A>>> {
        self.dep_groups().get(id)
    }

    /// Run steps on the current group; any failure is returned as an error.
    fn needs<R: Into<StepRequest>>(&self, steps: R) -> Result<Outcome> {
        self.needs_with(steps, &[], false)
    }

    /// `needs` with explicit arguments and full-name flag.
    fn needs_with<R: Into<StepRequest>>(&self, steps: R, args: &[A], full_name: bool) -> Result<Outcome> {
        self.run_deps(steps.into(), args, RunOptions::needs().full_name(full_name))
    }

    /// Run steps on the current group; failures become `false` outcomes.
    fn wants<R: Into<StepRequest>>(&self, steps: R) -> Result<Outcome> {
        self.wants_with(steps, &[], false)
    }

    /// `wants` with explicit arguments and full-name flag.
    fn wants_with<R: Into<StepRequest>>(&self, steps: R, args: &[A], full_name: bool) -> Result<Outcome> {
        self.run_deps(steps.into(), args, RunOptions::wants().full_name(full_name))
    }

    /// Run a request on the current group with explicit options.
    fn run_deps(&self, request: StepRequest, args: &[A], options: RunOptions) -> Result<Outcome> {
        let groups = self.dep_groups();
        let group = groups.current()?;
        group.run(self, groups, &request, args, options)
    }
}
