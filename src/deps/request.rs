//! Step requests and cross-group references.

use std::fmt;

use serde::Serialize;

/// Separator between a group id and a step name in a sequence entry.
pub const GROUP_SEPARATOR: char = ':';

/// What a caller asks a group to run.
///
/// A single name returns a plain `bool` outcome; a sequence returns a map
/// keyed by entry. Only sequence entries are parsed for `group:step`
/// references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StepRequest {
    /// One step, by name.
    One(String),
    /// An ordered list of entries.
    Many(Vec<String>),
}

impl StepRequest {
    /// Whether the request names no step at all.
    pub fn is_empty(&self) -> bool {
        match self {
            StepRequest::One(name) => name.is_empty(),
            StepRequest::Many(entries) => entries.is_empty(),
        }
    }
}

impl fmt::Display for StepRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRequest::One(name) => write!(f, "{}", name),
            StepRequest::Many(entries) => write!(f, "[{}]", entries.join(", ")),
        }
    }
}

impl From<&str> for StepRequest {
    fn from(name: &str) -> Self {
        StepRequest::One(name.to_string())
    }
}

impl From<String> for StepRequest {
    fn from(name: String) -> Self {
        StepRequest::One(name)
    }
}

impl From<&String> for StepRequest {
    fn from(name: &String) -> Self {
        StepRequest::One(name.clone())
    }
}

impl From<Vec<String>> for StepRequest {
    fn from(entries: Vec<String>) -> Self {
        StepRequest::Many(entries)
    }
}

impl From<Vec<&str>> for StepRequest {
    fn from(entries: Vec<&str>) -> Self {
        StepRequest::Many(entries.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for StepRequest {
    fn from(entries: &[String]) -> Self {
        StepRequest::Many(entries.to_vec())
    }
}

impl From<&[&str]> for StepRequest {
    fn from(entries: &[&str]) -> Self {
        StepRequest::Many(entries.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StepRequest {
    fn from(entries: [&str; N]) -> Self {
        StepRequest::Many(entries.iter().map(|s| s.to_string()).collect())
    }
}

/// One parsed entry of a sequence request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    /// A step in the group being run.
    Local(&'a str),
    /// `group:step`: a single step in another group.
    Remote { group: &'a str, step: &'a str },
    /// `group:`: every remaining entry belongs to another group.
    HandOff { group: &'a str },
}

impl<'a> Entry<'a> {
    /// Parse a sequence entry. The split happens at the first separator and
    /// both sides are trimmed.
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(GROUP_SEPARATOR) {
            None => Entry::Local(raw),
            Some((group, step)) => {
                let group = group.trim();
                let step = step.trim();
                if step.is_empty() {
                    Entry::HandOff { group }
                } else {
                    Entry::Remote { group, step }
                }
            }
        }
    }

    /// The group this entry routes to, if it leaves the current one.
    pub fn group(&self) -> Option<&'a str> {
        match self {
            Entry::Local(_) => None,
            Entry::Remote { group, .. } | Entry::HandOff { group } => Some(group),
        }
    }
}
