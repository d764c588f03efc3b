//! Error types for needful operations.
//!
//! This module defines [`NeedfulError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Group construction and lookup errors (`DuplicateGroup`, `UnknownGroup`,
//!   `NoCurrentGroup`, `MissingInvoker`) are always surfaced to the caller
//! - Step errors (`NoSuchStep`, `StepFailed`) abort a `needs` call, and are
//!   turned into a `false` outcome by `wants`
//! - Step bodies return `anyhow::Result<()>`; anything that is not already a
//!   `NeedfulError` gets wrapped into `StepFailed`

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error carried by [`NeedfulError::StepFailed`].
pub type StepSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for needful operations.
#[derive(Debug, Error)]
pub enum NeedfulError {
    /// A group with this id already exists in the registry.
    #[error("Dep group '{id}' already exists and cannot be overwritten")]
    DuplicateGroup { id: String },

    /// Referenced group id does not exist.
    #[error("Unknown dep group '{id}'")]
    UnknownGroup { id: String },

    /// `needs`/`wants` called before any group was made current.
    #[error("No current dep group to handle the call")]
    NoCurrentGroup,

    /// Group options carried no step invoker.
    #[error("Dep group '{id}' was created without a step invoker")]
    MissingInvoker { id: String },

    /// The invoker could not resolve the step identifier.
    #[error("No such step '{step}'")]
    NoSuchStep { step: String },

    /// The step ran and returned an error.
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: StepSource,
    },

    /// A step required itself (directly or through other steps) while running.
    #[error("Step cycle detected: {cycle}")]
    StepCycle { cycle: String },

    /// Plan file not found at the expected location.
    #[error("Plan not found: {path}")]
    PlanNotFound { path: PathBuf },

    /// Plan file could not be parsed.
    #[error("Failed to parse plan at {path}: {message}")]
    PlanParse { path: PathBuf, message: String },

    /// Plan structure or references are invalid.
    #[error("Invalid plan: {message}")]
    PlanValidation { message: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NeedfulError {
    /// Wrap an error raised while running `step`.
    pub fn step_failed(step: impl Into<String>, source: impl Into<StepSource>) -> Self {
        Self::StepFailed {
            step: step.into(),
            source: source.into(),
        }
    }

    /// Convert the error returned by a step body.
    ///
    /// Errors that already are a `NeedfulError` (typically a nested `needs`
    /// that failed) pass through unchanged so the innermost cause reaches the
    /// outermost caller.
    pub fn from_step_body(step: &str, err: anyhow::Error) -> Self {
        match err.downcast::<NeedfulError>() {
            Ok(inner) => inner,
            Err(other) => Self::step_failed(step, other),
        }
    }

    /// Whether this error comes from running a step rather than from group
    /// construction or lookup.
    pub fn is_step_error(&self) -> bool {
        matches!(
            self,
            Self::NoSuchStep { .. } | Self::StepFailed { .. } | Self::StepCycle { .. }
        )
    }
}

/// Result type alias for needful operations.
pub type Result<T> = std::result::Result<T, NeedfulError>;
