//! Results of running steps.

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered map of entry name to outcome, in request order.
pub type Report = IndexMap<String, Outcome>;

/// Outcome of a `needs`/`wants` call.
///
/// Serializes untagged, so a single step becomes `true`/`false` and a
/// sequence becomes a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// A single step: `true` if it succeeded, `false` if its failure was tolerated.
    Step(bool),
    /// A sequence, keyed by step name (or group id for hand-offs).
    Batch(Report),
}

impl Outcome {
    /// Build a batch outcome from `(name, outcome)` pairs.
    pub fn batch<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Outcome)>,
    {
        Outcome::Batch(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// True when every step in the outcome succeeded.
    ///
    /// An empty batch counts as a success.
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Step(ok) => *ok,
            Outcome::Batch(report) => report.values().all(Outcome::is_success),
        }
    }

    /// The boolean of a single-step outcome.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Outcome::Step(ok) => Some(*ok),
            Outcome::Batch(_) => None,
        }
    }

    /// The report of a batch outcome.
    pub fn as_report(&self) -> Option<&Report> {
        match self {
            Outcome::Step(_) => None,
            Outcome::Batch(report) => Some(report),
        }
    }

    /// Look up an entry of a batch outcome.
    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.as_report().and_then(|report| report.get(name))
    }

    /// Names of failed entries, with nested hand-off entries as `group:step`.
    pub fn failures(&self) -> Vec<String> {
        let mut failed = Vec::new();
        if let Outcome::Batch(report) = self {
            collect_failures(report, None, &mut failed);
        }
        failed
    }
}

fn collect_failures(report: &Report, group: Option<&str>, failed: &mut Vec<String>) {
    for (name, outcome) in report {
        match outcome {
            Outcome::Step(true) => {}
            Outcome::Step(false) => match group {
                Some(g) => failed.push(format!("{}:{}", g, name)),
                None => failed.push(name.clone()),
            },
            Outcome::Batch(nested) => collect_failures(nested, Some(name), failed),
        }
    }
}

impl From<bool> for Outcome {
    fn from(ok: bool) -> Self {
        Outcome::Step(ok)
    }
}

impl PartialEq<bool> for Outcome {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}
