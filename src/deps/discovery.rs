//! Prefix/suffix discovery of initial steps.
//!
//! Given the names an owner exposes, finds the ones shaped like
//! `prefix<name>suffix` and returns the `<name>` parts. Matching is
//! case-insensitive and anchored at both ends; `<name>` is one or more word
//! characters.

use regex::RegexBuilder;

use crate::error::Result;

/// Find step names matching `prefix<name>suffix`, returning the `<name>`
/// parts in the order the names were given.
///
/// Returns an empty list when both `prefix` and `suffix` are empty, since
/// that pattern would match every name.
pub fn discover_steps<S: AsRef<str>>(names: &[S], prefix: &str, suffix: &str) -> Result<Vec<String>> {
    if prefix.is_empty() && suffix.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        r"^{}(\w+){}$",
        regex::escape(prefix),
        regex::escape(suffix)
    );
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(anyhow::Error::from)?;

    let mut found: Vec<String> = Vec::new();
    for name in names {
        if let Some(caps) = re.captures(name.as_ref()) {
            let short = caps[1].to_string();
            if !found.contains(&short) {
                found.push(short);
            }
        }
    }

    tracing::trace!(prefix, suffix, found = ?found, "discovered steps");
    Ok(found)
}
