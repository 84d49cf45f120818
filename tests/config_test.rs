//! Integration tests for settings and task file loading.
//!
//! Settings come from one file (YAML, TOML or JSON by extension) and can be
//! overridden by `NODE_TREE__*` environment variables.

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;

use node_tree::application::ApplicationError;
use node_tree::config::{OutputType, Settings, TaskFile};
use node_tree::domain::RepoType;

// ============================================================
// Settings::load()
// ============================================================

#[rstest]
#[case(
    "settings.yaml",
    "engine:\n  threads: 3\ndatastore:\n  database: /data/records.db\n"
)]
#[case(
    "settings.toml",
    "[engine]\nthreads = 3\n\n[datastore]\ndatabase = \"/data/records.db\"\n"
)]
#[case(
    "settings.json",
    r#"{"engine": {"threads": 3}, "datastore": {"database": "/data/records.db"}}"#
)]
fn given_settings_file_when_load_then_reads_engine_and_datastore(
    #[case] file_name: &str,
    #[case] content: &str,
) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    fs::write(&path, content).unwrap();

    let settings = Settings::load(&path).expect("load settings");

    assert_eq!(settings.engine.threads, 3);
    assert_eq!(
        settings.datastore.expect("datastore section").database,
        PathBuf::from("/data/records.db")
    );
}

#[test]
fn given_settings_without_datastore_when_load_then_datastore_is_none() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.yaml");
    fs::write(&path, "engine:\n  threads: 1\n").unwrap();

    let settings = Settings::load(&path).expect("load settings");

    assert!(settings.datastore.is_none());
    assert_eq!(settings.engine.threads, 1);
}

#[test]
fn given_missing_settings_file_when_load_then_input_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.yaml");

    let err = Settings::load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::InputNotFound(p) if p == path));
}

#[test]
fn given_malformed_settings_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.yaml");
    fs::write(&path, "engine:\n  threads: many\n").unwrap();

    let err = Settings::load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "got {err:?}");
}

#[test]
fn given_env_override_when_load_then_env_wins_over_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.yaml");
    fs::write(&path, "engine:\n  name: from-file\n").unwrap();

    std::env::set_var("NODE_TREE__ENGINE__NAME", "from-env");
    let result = Settings::load(&path);
    std::env::remove_var("NODE_TREE__ENGINE__NAME");

    assert_eq!(result.expect("load settings").engine.name, "from-env");
}

// ============================================================
// TaskFile::load()
// ============================================================

#[test]
fn given_task_file_when_load_then_reads_task_source_and_sink() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("task.yaml");
    fs::write(
        &path,
        r#"
task:
  owner: wangdp
  repo: grapes
  begin_date: "2020-01-01"
  end_date: "2020-01-02"
source:
  - file_path: /logs/grapes.ecf.log
sink:
  - type: file
    file_path: /out/grapes.json
"#,
    )
    .unwrap();

    let task = TaskFile::load(&path).expect("load task file");

    assert_eq!(task.task.owner, "wangdp");
    assert_eq!(task.task.repo, "grapes");
    assert_eq!(task.task.begin_date.as_deref(), Some("2020-01-01"));
    assert_eq!(task.task.end_date.as_deref(), Some("2020-01-02"));
    assert_eq!(task.task.workflow_type, RepoType::Ecflow);
    assert_eq!(
        task.primary_source().unwrap().file_path,
        PathBuf::from("/logs/grapes.ecf.log")
    );
    let sink = task.primary_sink().unwrap();
    assert_eq!(sink.output_type, OutputType::File);
    assert_eq!(sink.file_path, Some(PathBuf::from("/out/grapes.json")));
}

#[test]
fn given_sms_task_with_print_sink_when_load_then_no_file_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("task.toml");
    fs::write(
        &path,
        r#"
[task]
owner = "nwp_xp"
repo = "obs_reg"
workflow_type = "sms"

[[source]]
file_path = "/logs/obs_reg.sms.log"

[[sink]]
type = "print"
"#,
    )
    .unwrap();

    let task = TaskFile::load(&path).expect("load task file");

    assert_eq!(task.task.workflow_type, RepoType::Sms);
    assert!(task.task.begin_date.is_none());
    let sink = task.primary_sink().unwrap();
    assert_eq!(sink.output_type, OutputType::Print);
    assert!(sink.file_path.is_none());
}

#[test]
fn given_tilde_in_source_path_when_load_then_expanded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("task.yaml");
    fs::write(
        &path,
        "task:\n  owner: o\n  repo: r\nsource:\n  - file_path: ~/logs/r.log\nsink:\n  - type: print\n",
    )
    .unwrap();

    let task = TaskFile::load(&path).expect("load task file");

    let home = std::env::var("HOME").expect("HOME should be set");
    let source = task.primary_source().unwrap();
    assert!(source.file_path.starts_with(&home), "{}", source.file_path.display());
}

#[test]
fn given_task_file_without_task_section_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("task.yaml");
    fs::write(&path, "source:\n  - file_path: /logs/r.log\n").unwrap();

    let err = TaskFile::load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "got {err:?}");
}
