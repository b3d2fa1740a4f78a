//! Integration tests for the butterfly-arcflags binary
//!
//! Runs the built binary against the US-cities fixture and temporary graph
//! files.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/us_cities.json");

fn butterfly(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_butterfly-arcflags"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run butterfly-arcflags")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn graph_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_route_text() {
    let output = butterfly(&["route", FIXTURE, "--from", "Los Angeles", "--to", "Boston"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Los Angeles -50-> Riverside -1704-> Chicago -238-> Detroit -613-> Boston."));
    assert!(text.contains("Distance: 2605"));
}

#[test]
fn test_route_json_bidirectional_with_flags() {
    let output = butterfly(&[
        "route",
        FIXTURE,
        "--from",
        "Seattle",
        "--to",
        "Miami",
        "--algorithm",
        "bidirectional",
        "--arc-flags",
        "--json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["distance"], 3354.0);
    assert_eq!(report["reachable"], true);
    assert_eq!(report["options"]["algorithm"], "bidirectional");
    assert_eq!(report["options"]["use_arc_flags"], true);
    assert_eq!(
        report["vertices"],
        serde_json::json!(["Seattle", "San Francisco", "Riverside", "Phoenix", "Houston", "Miami"])
    );
    assert!(report["meeting_vertex"].is_string());
}

#[test]
fn test_route_unreachable() {
    let output = butterfly(&["route", FIXTURE, "--from", "Boston", "--to", "Seattle"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No path from Boston to Seattle"));

    let output = butterfly(&["route", FIXTURE, "--from", "Boston", "--to", "Seattle", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["reachable"], false);
    assert!(report["distance"].is_null());
}

#[test]
fn test_route_trace_goes_to_stderr() {
    let output = butterfly(&[
        "route",
        FIXTURE,
        "--from",
        "Chicago",
        "--to",
        "Boston",
        "--algorithm",
        "bidirectional",
        "--trace",
    ]);
    assert!(output.status.success());
    let trace = stderr(&output);
    assert!(trace.contains("[forward] settle Chicago at 0"));
    assert!(trace.contains("[reverse] settle Boston at 0"));
    assert!(trace.contains("meet at"));
    assert!(trace.contains("forward settle order: Chicago, Detroit"));
    assert!(trace.contains("reverse settle order: Boston, Detroit"));
}

#[test]
fn test_route_unknown_vertex_fails() {
    let output = butterfly(&["route", FIXTURE, "--from", "Nowhere", "--to", "Boston"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown vertex 'Nowhere'"));
}

#[test]
fn test_flags_json() {
    let output = butterfly(&["flags", FIXTURE, "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["summary"]["roots"], 15);
    assert_eq!(report["summary"]["edges"], 26);
    let edges = report["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 26);
    assert!(edges.iter().all(|row| row["flags"].as_array().unwrap().len() == 3));
}

#[test]
fn test_tree_forward_and_reverse() {
    let output = butterfly(&["tree", FIXTURE, "--root", "Chicago"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Distances from Chicago: 6 of 15 vertices reached"));
    assert!(text.contains("Chicago -238-> Detroit -613-> Boston. (total weight: 851)"));
    assert!(text.lines().any(|l| l.starts_with("Seattle") && l.ends_with("unreachable")));

    let output = butterfly(&["tree", FIXTURE, "--root", "Chicago", "--reverse"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Distances to Chicago"));
    assert!(text.contains("Seattle -1737-> Chicago. (total weight: 1737)"));
}

#[test]
fn test_check_fixture() {
    let output = butterfly(&["check", FIXTURE]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("225 vertex pairs, 4 query variants each: all answers agree"));
}

#[test]
fn test_check_temporary_graph() {
    let file = graph_file(
        r#"{
            "regions": 2,
            "vertices": [
                {"id": "A", "region": 0}, {"id": "B", "region": 0},
                {"id": "C", "region": 1}, {"id": "D", "region": 1}
            ],
            "edges": [
                {"from": "A", "to": "B", "weight": 1, "bidirectional": true},
                {"from": "B", "to": "C", "weight": 1},
                {"from": "A", "to": "C", "weight": 5},
                {"from": "C", "to": "D", "weight": 2.5, "bidirectional": true}
            ]
        }"#,
    );
    let path = file.path().to_str().unwrap();

    let output = butterfly(&["check", path]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = butterfly(&["route", path, "--from", "A", "--to", "D", "--arc-flags"]);
    assert!(stdout(&output).contains("Distance: 4.5"));
}

#[test]
fn test_invalid_graph_file() {
    let file = graph_file(r#"{"regions": 1, "vertices": [{"id": "A", "region": 3}]}"#);
    let output = butterfly(&["check", file.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("region 3 out of range"));

    let output = butterfly(&["check", "/nonexistent/graph.json"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load graph"));
}
