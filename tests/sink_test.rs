//! Integration tests for printing and JSON-file sinks.

use std::fs;

use chrono::NaiveDate;
use serde_json::Value;
use tempfile::TempDir;

use node_tree::domain::{build_bunch, BunchMap, NodeStatus, StatusChange};
use node_tree::infrastructure::sink::{bunch_map_to_value, print_bunch_map, write_json_file};
use node_tree::infrastructure::{sink_result, SinkTarget};

fn change(status: NodeStatus, node_path: &str) -> StatusChange<'_> {
    StatusChange { status, node_path }
}

fn sample_map() -> BunchMap {
    let mut map = BunchMap::new();
    map.insert(
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        build_bunch(vec![
            change(NodeStatus::Queued, "/grapes/00"),
            change(NodeStatus::Submitted, "/grapes/00/pre"),
            change(NodeStatus::Complete, "/grapes/00/pre"),
        ]),
    );
    map.insert(
        NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        build_bunch(vec![change(NodeStatus::Submitted, "/grapes/12/pre")]),
    );
    map
}

#[test]
fn given_bunch_map_when_printing_then_lists_each_node_once_under_its_date() {
    let map = sample_map();
    let mut out = Vec::new();

    print_bunch_map(&map, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let expected = "\
2020-01-01
/ [root]
  grapes [family]
    00 [family] queued
      pre [task] complete
2020-01-02
/ [root]
  grapes [family]
    12 [family]
      pre [task] submitted
";
    assert_eq!(text, expected);

    let node_lines = text.lines().count() - map.len();
    let node_count: usize = map.values().map(|b| b.len()).sum();
    assert_eq!(node_lines, node_count);
}

#[test]
fn given_bunch_map_when_writing_json_then_keys_are_dates_and_values_are_trees() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/out/grapes.json");
    let map = sample_map();

    write_json_file(&map, &path).unwrap();

    let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let object = written.as_object().unwrap();
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["2020-01-01", "2020-01-02"]);
    assert_eq!(written, bunch_map_to_value(&map));

    let day = &object["2020-01-01"];
    assert_eq!(day["path"], "/");
    assert_eq!(day["node_type"], "root");
    let pre = &day["children"][0]["children"][0]["children"][0];
    assert_eq!(pre["name"], "pre");
    assert_eq!(pre["path"], "/grapes/00/pre");
    assert_eq!(pre["node_type"], "task");
    assert_eq!(pre["status"], "complete");
}

#[test]
fn given_empty_map_when_writing_json_then_empty_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");

    sink_result(&SinkTarget::File(path.clone()), &BunchMap::new()).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn given_unwritable_target_when_writing_json_then_io_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file, not a directory").unwrap();

    let err = write_json_file(&sample_map(), &blocker.join("out.json")).unwrap_err();

    assert!(err.to_string().contains("blocker"), "{err}");
}
