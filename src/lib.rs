//! Needful - dependency-ordered, run-once steps.
//!
//! An owner declares named steps and runs them through groups. A group
//! resolves short names with its prefix and suffix, runs every step at most
//! once and lets steps require other steps, in the same group or another.
//! On top of that engine, needful runs YAML plans of shell steps.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`deps`] - Groups, the owner facade and step invocation
//! - [`error`] - Error types and result aliases
//! - [`plan`] - Plan file loading, validation and running
//! - [`shell`] - Shell command execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use needful::deps::{DepGroups, GroupOptions, HasDeps, StepTable};
//! use std::cell::{OnceCell, RefCell};
//!
//! #[derive(Default)]
//! struct Build {
//!     log: RefCell<Vec<&'static str>>,
//!     deps: OnceCell<DepGroups<Build, String>>,
//! }
//!
//! impl HasDeps<String> for Build {
//!     fn dep_cell(&self) -> &OnceCell<DepGroups<Self, String>> {
//!         &self.deps
//!     }
//!
//!     fn step_table(&self) -> StepTable<Self, String> {
//!         StepTable::new()
//!             .step("fetch", |b: &Build, _| {
//!                 b.log.borrow_mut().push("fetch");
//!                 Ok(())
//!             })
//!             .step("compile", |b: &Build, _| {
//!                 b.needs("fetch")?;
//!                 b.log.borrow_mut().push("compile");
//!                 Ok(())
//!             })
//!     }
//! }
//!
//! let build = Build::default();
//! build.dep_group("main", GroupOptions::new()).unwrap();
//! build.needs(["compile", "fetch"]).unwrap();
//! assert_eq!(*build.log.borrow(), ["fetch", "compile"]);
//! ```

pub mod cli;
pub mod deps;
pub mod error;
pub mod plan;
pub mod shell;
pub mod ui;

pub use error::{NeedfulError, Result};
