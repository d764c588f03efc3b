//! Plan file discovery and loading.

use crate::error::{NeedfulError, Result};
use crate::plan::schema::PlanConfig;
use crate::plan::validator::ensure_valid;
use std::fs;
use std::path::{Path, PathBuf};

/// File names looked for in a project directory, in priority order.
pub const PLAN_FILE_NAMES: &[&str] = &["needful.yml", "needful.yaml", ".needful.yml"];

/// Find the plan file in a project directory.
pub fn find_plan(project_root: &Path) -> Option<PathBuf> {
    PLAN_FILE_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Load a single plan file, parse and validate it.
///
/// # Errors
///
/// Returns `PlanNotFound` if the file doesn't exist.
/// Returns `PlanParse` if the YAML is invalid.
/// Returns `PlanValidation` if references in the plan don't resolve.
pub fn load_plan_file(path: &Path) -> Result<PlanConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            NeedfulError::PlanNotFound {
                path: path.to_path_buf(),
            }
        } else {
            NeedfulError::Io(e)
        }
    })?;

    let plan = parse_plan(&content, path)?;
    ensure_valid(&plan)?;
    Ok(plan)
}

/// Parse YAML content into a plan.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_plan(content: &str, source_path: &Path) -> Result<PlanConfig> {
    serde_yaml::from_str(content).map_err(|e| NeedfulError::PlanParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the plan for a project: the explicit path if given, otherwise the
/// first plan file found in `project_root`.
///
/// Returns the path the plan was read from alongside the plan.
pub fn load_project_plan(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<(PathBuf, PlanConfig)> {
    let path = match explicit {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => project_root.join(p),
        None => find_plan(project_root).ok_or_else(|| NeedfulError::PlanNotFound {
            path: project_root.join(PLAN_FILE_NAMES[0]),
        })?,
    };

    tracing::debug!(path = %path.display(), "Loading plan");
    let plan = load_plan_file(&path)?;
    Ok((path, plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SIMPLE: &str = "steps:\n  hello:\n    command: echo hello\n";

    #[test]
    fn find_plan_prefers_needful_yml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".needful.yml"), SIMPLE).unwrap();
        fs::write(temp.path().join("needful.yml"), SIMPLE).unwrap();
        assert_eq!(
            find_plan(temp.path()).unwrap(),
            temp.path().join("needful.yml")
        );
    }

    #[test]
    fn find_plan_returns_none_when_missing() {
        let temp = TempDir::new().unwrap();
        assert!(find_plan(temp.path()).is_none());
    }

    #[test]
    fn load_missing_file_is_plan_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_plan_file(&temp.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, NeedfulError::PlanNotFound { .. }));
    }

    #[test]
    fn load_invalid_yaml_is_plan_parse() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("needful.yml");
        fs::write(&path, "steps: [unclosed").unwrap();
        let err = load_plan_file(&path).unwrap_err();
        assert!(matches!(err, NeedfulError::PlanParse { .. }));
        assert!(err.to_string().contains("needful.yml"));
    }

    #[test]
    fn load_runs_validation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("needful.yml");
        fs::write(&path, "settings:\n  default_group: ghost\n").unwrap();
        let err = load_plan_file(&path).unwrap_err();
        assert!(matches!(err, NeedfulError::PlanValidation { .. }));
    }

    #[test]
    fn load_project_plan_discovers_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("needful.yaml"), SIMPLE).unwrap();
        let (path, plan) = load_project_plan(temp.path(), None).unwrap();
        assert_eq!(path, temp.path().join("needful.yaml"));
        assert!(plan.steps.contains_key("hello"));
    }

    #[test]
    fn load_project_plan_resolves_relative_explicit_path() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("plans")).unwrap();
        fs::write(temp.path().join("plans/ci.yml"), SIMPLE).unwrap();
        let (path, _) = load_project_plan(temp.path(), Some(Path::new("plans/ci.yml"))).unwrap();
        assert_eq!(path, temp.path().join("plans/ci.yml"));
    }

    #[test]
    fn load_project_plan_without_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load_project_plan(temp.path(), None).unwrap_err();
        assert!(matches!(err, NeedfulError::PlanNotFound { .. }));
    }
}
