//! CLI Integration Tests
//!
//! Runs the `controls-replay` binary against scripts on disk.

use std::process::Command;

use controls_replay::Report;

const DRAG_SCRIPT: &str = r#"{
    "surface": { "left": 0, "top": 0, "width": 400, "height": 300, "viewportHeight": 300 },
    "options": { "dragEnabled": true },
    "events": [
        { "type": "PointerDown", "data": { "x": 10, "y": 10, "buttons": 1 } },
        { "type": "PointerMove", "data": { "x": 30, "y": 20, "movement_x": 20, "movement_y": 10, "buttons": 1 } },
        { "type": "PointerUp", "data": { "x": 30, "y": 20 } }
    ]
}"#;

fn replay_bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_controls-replay"));
    command.env("RUST_LOG", "off");
    command
}

#[test]
fn test_json_report_on_stdout() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = dir.path().join("drag.json");
    std::fs::write(&script, DRAG_SCRIPT).expect("write script");

    let output = replay_bin()
        .arg("--script")
        .arg(&script)
        .arg("--json")
        .output()
        .expect("run binary");
    assert!(output.status.success(), "{output:?}");

    let report: Report = serde_json::from_slice(&output.stdout).expect("report json");
    assert_eq!(report.translation, [20.0, 10.0]);
    assert_eq!(report.routed, 3);
}

#[test]
fn test_bad_script_exits_with_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let script = dir.path().join("broken.json");
    std::fs::write(&script, "{ not json").expect("write script");

    let output = replay_bin()
        .arg("--script")
        .arg(&script)
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to parse script"));
}
