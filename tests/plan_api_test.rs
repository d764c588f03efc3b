//! Integration tests for loading and running plans.
#![cfg(unix)]

use std::fs;

use needful::deps::{HasDeps, Outcome};
use needful::plan::{load_project_plan, validate_plan, PlanRunner};
use needful::NeedfulError;
use tempfile::TempDir;

fn setup_project(plan: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("needful.yml"), plan).unwrap();
    temp
}

fn runner_for(temp: &TempDir) -> PlanRunner {
    let (_, plan) = load_project_plan(temp.path(), None).unwrap();
    PlanRunner::new(plan, temp.path()).capture_output(true)
}

const PROJECT: &str = r#"
settings:
  default_group: app
  env:
    GREETING: hi
lists:
  boot: [prepare]
groups:
  setup:
    steps_from: boot
  app:
    auto_run: false
    args: [world]
  db:
    suffix: _db
    auto_run: false
steps:
  prepare:
    command: mkdir -p out
  migrate_db:
    command: echo migrated > out/db.txt
    needs: ["setup:prepare"]
  seed_db:
    command: echo seeded >> out/db.txt
    needs: ["db:migrate"]
  greet:
    description: Say hello
    command: echo "$GREETING $1" > out/greeting.txt
    needs: ["db:seed"]
  flaky:
    command: exit 1
  release:
    needs: [greet]
    wants: [flaky]
"#;

#[test]
fn bootstrap_runs_auto_run_groups() {
    let temp = setup_project(PROJECT);
    let runner = runner_for(&temp);
    runner.bootstrap().unwrap();

    assert_eq!(runner.executed(), vec!["prepare"]);
    assert!(temp.path().join("out").is_dir());
    assert_eq!(runner.dep_groups().current().unwrap().id(), "app");
}

#[test]
fn requirements_cross_groups_and_touch_the_project() {
    let temp = setup_project(PROJECT);
    let runner = runner_for(&temp);
    runner.bootstrap().unwrap();

    let outcome = runner.needs(["release"]).unwrap();
    assert_eq!(outcome, Outcome::batch([("release", true.into())]));
    assert_eq!(
        runner.executed(),
        vec!["prepare", "migrate_db", "seed_db", "greet", "release"]
    );

    let db = fs::read_to_string(temp.path().join("out/db.txt")).unwrap();
    assert_eq!(db, "migrated\nseeded\n");

    // `greet` runs in `app`, whose default argument is `world`.
    let greeting = fs::read_to_string(temp.path().join("out/greeting.txt")).unwrap();
    assert_eq!(greeting.trim(), "hi world");

    let app = runner.find_dep_group("app").unwrap();
    assert_eq!(app.outcome("flaky"), Some(false));
    assert_eq!(app.outcome("release"), Some(true));
}

#[test]
fn each_step_runs_once_across_requests() {
    let temp = setup_project(PROJECT);
    let runner = runner_for(&temp);
    runner.bootstrap().unwrap();

    runner.needs("greet").unwrap();
    runner.needs("greet").unwrap();
    runner.needs("release").unwrap();

    let db = fs::read_to_string(temp.path().join("out/db.txt")).unwrap();
    assert_eq!(db, "migrated\nseeded\n");
    assert_eq!(
        runner
            .executed()
            .iter()
            .filter(|s| s.as_str() == "greet")
            .count(),
        1
    );
}

#[test]
fn hard_failure_can_be_retried_after_a_fix() {
    let temp = setup_project(
        r#"
steps:
  check:
    command: test -f ready
"#,
    );
    let runner = runner_for(&temp);
    runner.bootstrap().unwrap();

    let err = runner.needs("check").unwrap_err();
    assert!(matches!(err, NeedfulError::StepFailed { .. }));

    fs::write(temp.path().join("ready"), "").unwrap();
    assert_eq!(runner.wants("check").unwrap(), Outcome::Step(true));
    assert_eq!(runner.executed(), vec!["check"]);
}

#[test]
fn invalid_plans_are_rejected_at_load() {
    let temp = setup_project(
        r#"
groups:
  app:
    steps_from: missing
steps:
  'bad:name':
    command: "true"
  ok:
    needs: ["nowhere:step"]
"#,
    );

    let err = load_project_plan(temp.path(), None).unwrap_err();
    let NeedfulError::PlanValidation { message } = err else {
        panic!("expected a validation error");
    };
    assert!(message.contains("bad:name"));
    assert!(message.contains("missing"));
    assert!(message.contains("nowhere"));
}

#[test]
fn validation_reports_every_rule() {
    let plan = serde_yaml::from_str(
        r#"
settings:
  default_group: ghost
steps:
  ' ':
    command: "true"
"#,
    )
    .unwrap();

    let rules: Vec<_> = validate_plan(&plan).into_iter().map(|e| e.rule).collect();
    assert_eq!(rules, vec!["empty-step-name", "unknown-default-group"]);
}

#[test]
fn implicit_main_group_can_be_the_default() {
    let temp = setup_project(
        r#"
settings:
  default_group: main
lists:
  later: ["main:hello"]
steps:
  hello:
    command: "true"
"#,
    );
    let runner = runner_for(&temp);
    runner.bootstrap().unwrap();
    assert_eq!(runner.dep_groups().current().unwrap().id(), "main");

    runner.needs("hello").unwrap();
    assert_eq!(runner.executed(), vec!["hello"]);
}

#[test]
fn mixed_case_prefix_finds_declared_steps() {
    let temp = setup_project(
        r#"
groups:
  setup:
    prefix: Setup_
steps:
  setup_db:
    command: mkdir db
  SETUP_CACHE:
    command: mkdir cache
"#,
    );
    let runner = runner_for(&temp);
    runner.bootstrap().unwrap();

    assert_eq!(runner.executed(), vec!["setup_db", "SETUP_CACHE"]);
    assert!(temp.path().join("db").is_dir());
    assert!(temp.path().join("cache").is_dir());
}
