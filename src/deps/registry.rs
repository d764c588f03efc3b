//! The per-owner registry of dep groups.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::discovery::discover_steps;
use super::facade::HasDeps;
use super::group::Group;
use super::options::{DepsSettings, GroupOptions, RunOptions};
use super::request::StepRequest;
use crate::error::{NeedfulError, Result};

/// Named groups belonging to one owner, plus the current (default) group.
///
/// Groups can be added but never removed or replaced. The current group is
/// held weakly; the registry itself keeps every group alive.
pub struct DepGroups<O, A> {
    settings: DepsSettings,
    groups: RefCell<IndexMap<String, Rc<Group<O, A>>>>,
    current: RefCell<Weak<Group<O, A>>>,
}

impl<O, A> DepGroups<O, A> {
    /// Create an empty registry.
    pub fn new(settings: DepsSettings) -> Self {
        Self {
            settings,
            groups: RefCell::new(IndexMap::new()),
            current: RefCell::new(Weak::new()),
        }
    }

    /// Registry settings.
    pub fn settings(&self) -> &DepsSettings {
        &self.settings
    }

    /// Look a group up by id.
    pub fn get(&self, id: &str) -> Result<Rc<Group<O, A>>> {
        self.groups
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| NeedfulError::UnknownGroup { id: id.to_string() })
    }

    /// Whether a group with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.groups.borrow().contains_key(id)
    }

    /// Group ids in creation order.
    pub fn ids(&self) -> Vec<String> {
        self.groups.borrow().keys().cloned().collect()
    }

    /// Groups in creation order.
    pub fn groups(&self) -> Vec<Rc<Group<O, A>>> {
        self.groups.borrow().values().cloned().collect()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.borrow().len()
    }

    /// Whether no group was created yet.
    pub fn is_empty(&self) -> bool {
        self.groups.borrow().is_empty()
    }

    /// Make the group with this id current.
    pub fn set_current(&self, id: &str) -> Result<Rc<Group<O, A>>> {
        let group = self.get(id)?;
        self.make_current(&group);
        Ok(group)
    }

    /// Make this group current, without looking it up.
    pub fn make_current(&self, group: &Rc<Group<O, A>>) {
        *self.current.borrow_mut() = Rc::downgrade(group);
    }

    /// Unset the current group.
    pub fn clear_current(&self) {
        *self.current.borrow_mut() = Weak::new();
    }

    /// The current group.
    pub fn current(&self) -> Result<Rc<Group<O, A>>> {
        self.current
            .borrow()
            .upgrade()
            .ok_or(NeedfulError::NoCurrentGroup)
    }

    /// Whether a group is current.
    pub fn has_current(&self) -> bool {
        self.current.borrow().upgrade().is_some()
    }

    fn insert(&self, group: Rc<Group<O, A>>) -> Result<()> {
        let mut groups = self.groups.borrow_mut();
        if groups.contains_key(group.id()) {
            return Err(NeedfulError::DuplicateGroup {
                id: group.id().to_string(),
            });
        }
        groups.insert(group.id().to_string(), group);
        Ok(())
    }
}

impl<O, A> DepGroups<O, A>
where
    O: HasDeps<A>,
    A: Clone + fmt::Debug + 'static,
{
    /// Create a group and add it to the registry.
    ///
    /// Unless `auto_run` is off, the initial list comes from, in order: the
    /// explicit `steps`, the owner's list named by `steps_field`, or the
    /// owner's step names matching the prefix/suffix. When a list is found
    /// the group is made current and the list runs with hard-fail semantics;
    /// a failure there is returned, but the group stays registered.
    pub fn create(&self, owner: &O, id: &str, options: GroupOptions<O, A>) -> Result<Rc<Group<O, A>>> {
        if self.contains(id) {
            return Err(NeedfulError::DuplicateGroup { id: id.to_string() });
        }

        let group = Rc::new(Group::new(id, &options, self.settings.debug)?);
        self.insert(Rc::clone(&group))?;

        let initial = if options.auto_run {
            initial_steps(owner, &options)?
        } else {
            None
        };

        match initial {
            Some(steps) => {
                tracing::debug!(group = id, steps = ?steps, "Running initial steps");
                self.make_current(&group);
                group.run(owner, self, &StepRequest::Many(steps), &[], RunOptions::needs())?;
            }
            None => {
                if !self.has_current() {
                    self.make_current(&group);
                }
            }
        }

        Ok(group)
    }
}

/// Pick the initial list for a new group. Sources are never merged.
fn initial_steps<O, A>(owner: &O, options: &GroupOptions<O, A>) -> Result<Option<Vec<String>>>
where
    O: HasDeps<A>,
    A: Clone + fmt::Debug + 'static,
{
    if let Some(steps) = &options.steps {
        return Ok(Some(steps.clone()));
    }

    if let Some(field) = &options.steps_field {
        if let Some(steps) = owner.step_list(field) {
            return Ok(Some(steps));
        }
        tracing::debug!(field = %field, "Owner has no step list with this name");
    }

    if !options.prefix.is_empty() || !options.suffix.is_empty() {
        let names = owner.step_names();
        let found = discover_steps(&names, &options.prefix, &options.suffix)?;
        return Ok(Some(found));
    }

    Ok(None)
}

impl<O, A> fmt::Debug for DepGroups<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.borrow().upgrade().map(|g| g.id().to_string());
        f.debug_struct("DepGroups")
            .field("settings", &self.settings)
            .field("groups", &self.ids())
            .field("current", &current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::invoker::StepTable;
    use std::cell::{OnceCell, RefCell};
    use std::collections::HashMap;

    #[derive(Default)]
    struct Owner {
        log: RefCell<Vec<String>>,
        lists: HashMap<String, Vec<String>>,
        deps: OnceCell<DepGroups<Owner, i32>>,
    }

    fn log(owner: &Owner, step: &str) -> anyhow::Result<()> {
        owner.log.borrow_mut().push(step.to_string());
        Ok(())
    }

    impl HasDeps<i32> for Owner {
        fn dep_cell(&self) -> &OnceCell<DepGroups<Self, i32>> {
            &self.deps
        }

        fn step_table(&self) -> StepTable<Self, i32> {
            StepTable::new()
                .step("__construct_foo", |o, _| log(o, "foo"))
                .step("__construct_bar", |o, _| log(o, "bar"))
                .step("zap_task", |o, _| log(o, "zap"))
                .step("__construct_broken", |_, _| anyhow::bail!("broken"))
        }

        fn step_list(&self, field: &str) -> Option<Vec<String>> {
            self.lists.get(field).cloned()
        }
    }

    fn owner_with_list(field: &str, steps: &[&str]) -> Owner {
        let mut owner = Owner::default();
        owner.lists.insert(
            field.to_string(),
            steps.iter().map(|s| s.to_string()).collect(),
        );
        owner
    }

    fn table_options() -> GroupOptions<Owner, i32> {
        GroupOptions::new().invoker(Owner::default().step_table())
    }

    #[test]
    fn duplicate_group_is_rejected_without_side_effects() {
        let owner = Owner::default();
        let groups = DepGroups::new(DepsSettings::default());

        let first = groups
            .create(&owner, "c", table_options().steps(["foo"]).prefix("__construct_"))
            .unwrap();
        let err = groups
            .create(&owner, "c", table_options().steps(["bar"]).prefix("__construct_"))
            .unwrap_err();

        assert!(matches!(err, NeedfulError::DuplicateGroup { ref id } if id == "c"));
        assert_eq!(*owner.log.borrow(), vec!["foo"]);
        assert!(Rc::ptr_eq(&first, &groups.get("c").unwrap()));
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn missing_invoker_is_rejected() {
        let owner = Owner::default();
        let groups: DepGroups<Owner, i32> = DepGroups::new(DepsSettings::default());
        let err = groups.create(&owner, "c", GroupOptions::new()).unwrap_err();
        assert!(matches!(err, NeedfulError::MissingInvoker { .. }));
        assert!(groups.is_empty());
    }

    #[test]
    fn unknown_group_lookups_fail() {
        let groups: DepGroups<Owner, i32> = DepGroups::new(DepsSettings::default());
        assert!(matches!(
            groups.get("nope").unwrap_err(),
            NeedfulError::UnknownGroup { .. }
        ));
        assert!(matches!(
            groups.set_current("nope").unwrap_err(),
            NeedfulError::UnknownGroup { .. }
        ));
    }

    #[test]
    fn current_starts_unset() {
        let groups: DepGroups<Owner, i32> = DepGroups::new(DepsSettings::default());
        assert!(matches!(
            groups.current().unwrap_err(),
            NeedfulError::NoCurrentGroup
        ));
    }

    #[test]
    fn explicit_list_wins_over_field_and_discovery() {
        let owner = owner_with_list("constructors", &["bar"]);
        let groups = DepGroups::new(DepsSettings::default());
        groups
            .create(
                &owner,
                "c",
                table_options()
                    .prefix("__construct_")
                    .steps(["foo"])
                    .steps_field("constructors"),
            )
            .unwrap();
        assert_eq!(*owner.log.borrow(), vec!["foo"]);
    }

    #[test]
    fn field_list_wins_over_discovery() {
        let owner = owner_with_list("constructors", &["bar"]);
        let groups = DepGroups::new(DepsSettings::default());
        groups
            .create(
                &owner,
                "c",
                table_options()
                    .prefix("__construct_")
                    .steps_field("constructors"),
            )
            .unwrap();
        assert_eq!(*owner.log.borrow(), vec!["bar"]);
    }

    #[test]
    fn missing_field_falls_back_to_discovery() {
        let owner = Owner::default();
        let groups = DepGroups::new(DepsSettings::default());
        let err = groups
            .create(
                &owner,
                "c",
                table_options()
                    .prefix("__construct_")
                    .steps_field("constructors"),
            )
            .unwrap_err();
        // Discovery picks up `broken` as well, after foo and bar.
        assert!(err.to_string().contains("broken"));
        assert_eq!(*owner.log.borrow(), vec!["foo", "bar"]);
        // The group stays registered and current.
        assert_eq!(groups.current().unwrap().id(), "c");
    }

    #[test]
    fn discovery_by_suffix() {
        let owner = Owner::default();
        let groups = DepGroups::new(DepsSettings::default());
        let group = groups
            .create(&owner, "tasks", table_options().suffix("_task"))
            .unwrap();
        assert_eq!(*owner.log.borrow(), vec!["zap"]);
        assert!(group.has_run("zap"));
    }

    #[test]
    fn auto_run_makes_group_current_and_keeps_it() {
        let owner = Owner::default();
        let groups = DepGroups::new(DepsSettings::default());
        groups
            .create(&owner, "first", table_options().auto_run(false))
            .unwrap();
        groups
            .create(&owner, "second", table_options().steps(Vec::<String>::new()))
            .unwrap();
        assert_eq!(groups.current().unwrap().id(), "second");
    }

    #[test]
    fn first_group_becomes_current_without_auto_run() {
        let owner = Owner::default();
        let groups = DepGroups::new(DepsSettings::default());
        groups.create(&owner, "a", table_options()).unwrap();
        groups.create(&owner, "b", table_options()).unwrap();
        // Neither ran anything: the first one stays current.
        assert_eq!(groups.current().unwrap().id(), "a");
        assert!(owner.log.borrow().is_empty());
    }

    #[test]
    fn auto_run_disabled_skips_initial_list() {
        let owner = Owner::default();
        let groups = DepGroups::new(DepsSettings::default());
        groups
            .create(
                &owner,
                "c",
                table_options().prefix("__construct_").steps(["foo"]).auto_run(false),
            )
            .unwrap();
        assert!(owner.log.borrow().is_empty());
    }

    #[test]
    fn set_and_clear_current() {
        let owner = Owner::default();
        let groups = DepGroups::new(DepsSettings::default());
        groups.create(&owner, "a", table_options()).unwrap();
        let b = groups.create(&owner, "b", table_options()).unwrap();

        groups.make_current(&b);
        assert_eq!(groups.current().unwrap().id(), "b");
        groups.set_current("a").unwrap();
        assert_eq!(groups.current().unwrap().id(), "a");
        groups.clear_current();
        assert!(!groups.has_current());
        assert_eq!(groups.ids(), vec!["a", "b"]);
    }
}
