use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const EVENTS: &str = r#"[
    {"tick": 0, "track": 0, "bytes": "FF 03 50 69 61 6E 6F"},
    {"tick": 0, "track": 0, "bytes": [144, 64, 100]},
    {"tick": 0, "track": 0, "bytes": [144, 60, 100]},
    {"tick": 240, "track": 1, "bytes": "B9 07 64"},
    {"tick": 480, "track": 0, "bytes": "80 3C 00"},
    {"tick": 480, "track": 0, "bytes": "80 40 00"},
    {"tick": 960, "track": 1, "bytes": "F8"},
    {"tick": 990, "track": 1, "bytes": []}
]"#;

fn write_events(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("events.json");
    fs::write(&path, EVENTS).unwrap();
    path
}

#[allow(deprecated)]
fn midiscope() -> Command {
    Command::cargo_bin("midiscope").expect("binary")
}

fn list_json(args: &[&str]) -> Value {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());
    let output = midiscope()
        .arg("--quiet")
        .arg("list")
        .arg(&events)
        .arg("--json")
        .args(args)
        .output()
        .expect("command run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn tree_prints_counts_and_ranges() {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());

    midiscope()
        .arg("tree")
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("- All Events (7)\n"))
        .stdout(predicate::str::contains("Note On [9n] (2)  Note 60 - 64"))
        .stdout(predicate::str::contains("Channel Volume [7] (1)"))
        .stdout(predicate::str::contains("Track Name [FF 03] (1)"));
}

#[test]
fn collapsed_mnemonic_tree() {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());

    let output = midiscope()
        .args(["tree", "--collapse", "--style", "mnemonic"])
        .arg(&events)
        .output()
        .expect("command run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "- ALL_EVENTS (7)");
    assert_eq!(lines[1], "  + CHANNEL_VOICE (5)");
    assert_eq!(lines.len(), 6);
}

#[test]
fn expand_reveals_deep_nodes() {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());

    midiscope()
        .args(["tree", "--expand", "controlChange"])
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("Channel Volume [7] (1)"))
        .stdout(predicate::str::contains("+ Meta Event (1)"))
        .stdout(predicate::str::contains("Track Name").not());
}

#[test]
fn skipped_events_are_reported() {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());

    midiscope()
        .arg("tree")
        .arg(&events)
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping event at tick 990 on track 1"));
}

#[test]
fn list_everything_in_order() {
    let body = list_json(&[]);
    assert_eq!(body["total"], 7);
    assert_eq!(body["visible"], 7);
    assert_eq!(body["skipped"], 1);

    let rows = body["rows"].as_array().unwrap();
    let notes: Vec<Value> = rows[..3]
        .iter()
        .map(|row| row["attributes"]["note_number"].clone())
        .collect();
    assert_eq!(notes, vec![Value::Null, Value::from(60), Value::from(64)]);
    assert_eq!(rows[0]["attributes"]["text"], "Piano");
}

#[test]
fn list_filters_by_flags() {
    let body = list_json(&["--track", "1", "--channel", "independent"]);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["tick"], 960);
    assert_eq!(rows[0]["type"], "Timing Clock ◂ System Real-Time");

    let body = list_json(&["--from", "240", "--to", "480", "--type", "noteOff"]);
    let ticks: Vec<u64> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["tick"].as_u64().unwrap())
        .collect();
    assert_eq!(ticks, vec![480, 480]);
}

#[test]
fn config_file_supplies_criteria_and_flags_override() {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());
    let config = temp.path().join("midiscope.toml");
    fs::write(
        &config,
        "style = \"mnemonic\"\n\n[criteria]\nlimit_tracks = true\ntracks = [1]\n",
    )
    .unwrap();

    let output = midiscope()
        .arg("--config")
        .arg(&config)
        .args(["--quiet", "list", "--json"])
        .arg(&events)
        .output()
        .expect("command run");
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["visible"], 2);
    assert_eq!(body["rows"][0]["type"], "CHANNEL_VOLUME ◂ CONTROL_CHANGE ◂ CHANNEL_VOICE");

    let output = midiscope()
        .arg("--config")
        .arg(&config)
        .args(["--quiet", "list", "--json", "--track", "0", "--style", "descriptive"])
        .arg(&events)
        .output()
        .expect("command run");
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["visible"], 5);
    assert_eq!(body["rows"][1]["type"], "Note On ◂ Channel Voice");
}

#[test]
fn inverted_range_is_rejected() {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());

    midiscope()
        .args(["list", "--from", "10", "--to", "5"])
        .arg(&events)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid filter criteria"));
}

#[test]
fn table_output_has_header_and_summary() {
    let temp = tempdir().unwrap();
    let events = write_events(temp.path());

    midiscope()
        .args(["list", "--type", "meta"])
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Tick  Track  Ch  Type"))
        .stdout(predicate::str::contains("Track Name ◂ Meta Event"))
        .stdout(predicate::str::ends_with("1 of 7 events shown\n"));
}

#[test]
fn missing_events_file_fails() {
    let temp = tempdir().unwrap();
    midiscope()
        .arg("tree")
        .arg(temp.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read events"));
}
