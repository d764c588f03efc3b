//! Dependency-ordered, memoizing step groups.
//!
//! An owner declares named steps, registers them into one or more groups and
//! runs them on demand. Each step runs at most once per group; steps may
//! require other steps, in the same or another group, to have run first.
//!
//! - [`HasDeps`] - The owner-side facade: `needs`, `wants` and group creation
//! - [`DepGroups`] - Per-owner registry of named groups and the current one
//! - [`Group`] - Resolution, execution and memoization of steps
//! - [`StepTable`] - Statically declared steps, the default [`StepInvoker`]
//! - [`Outcome`] - Result of a run: one `bool`, or an ordered report
//!
//! # Hard and soft failures
//!
//! `needs` aborts on the first failing step and does not record it, so it
//! can be tried again later. `wants` records the failure as `false` and
//! carries on; that step is never invoked again by the same group.
//!
//! # Cross-group entries
//!
//! In a sequence, `"other:step"` runs `step` in group `other` and reports it
//! under `step`. A trailing separator, `"other:"`, hands every remaining
//! entry to `other` and reports them under `other`.

pub mod discovery;
pub mod facade;
pub mod group;
pub mod invoker;
pub mod options;
pub mod outcome;
pub mod registry;
pub mod request;

pub use discovery::discover_steps;
pub use facade::HasDeps;
pub use group::{Group, TRACE_TARGET};
pub use invoker::{StepDescriptor, StepFn, StepInvoker, StepTable};
pub use options::{DepsSettings, FailureMode, GroupOptions, RunOptions};
pub use outcome::{Outcome, Report};
pub use registry::DepGroups;
pub use request::{Entry, StepRequest, GROUP_SEPARATOR};
