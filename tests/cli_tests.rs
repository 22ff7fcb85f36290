//! CLI integration tests for facade-finder

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const CAPTURE: &str = r#"{
  "main_document_url": "https://example.com/",
  "cpu_multiplier": 4.0,
  "requests": [
    {"url": "https://example.com/", "transfer_size": 20000, "start_time": 0.0,
     "response_headers_end_time": 40.0, "end_time": 80.0},
    {"url": "https://www.youtube.com/embed/dQw4w9WgXcQ", "transfer_size": 4000,
     "start_time": 200.0, "response_headers_end_time": 201.0, "end_time": 250.0},
    {"url": "https://www.youtube.com/s/player/base.js", "transfer_size": 8000,
     "start_time": 300.0, "response_headers_end_time": 310.0, "end_time": 400.0},
    {"url": "https://i.ytimg.com/generate_204", "transfer_size": 20,
     "start_time": 410.0, "response_headers_end_time": 411.0, "end_time": 412.0}
  ],
  "tasks": [
    {"url": "https://www.youtube.com/s/player/base.js", "duration": 30.0, "self_time": 25.0}
  ]
}"#;

const FIRST_PARTY_ONLY: &str = r#"{
  "main_document_url": "https://www.youtube.com/",
  "requests": [
    {"url": "https://www.youtube.com/", "transfer_size": 20000, "start_time": 0.0,
     "response_headers_end_time": 40.0, "end_time": 80.0},
    {"url": "https://www.youtube.com/embed/abc", "transfer_size": 4000,
     "start_time": 200.0, "response_headers_end_time": 201.0, "end_time": 250.0}
  ]
}"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_text_report() {
    let capture = write_temp(CAPTURE);

    Command::cargo_bin("facade-finder")
        .unwrap()
        .arg("--input")
        .arg(capture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("YouTube Embedded Player"))
        .stdout(predicate::str::contains("Lite YouTube"))
        .stdout(predicate::str::contains("Other resources"))
        .stdout(predicate::str::contains("1 facade alternative available"));
}

#[test]
fn test_json_report() {
    let capture = write_temp(CAPTURE);

    let output = Command::cargo_bin("facade-finder")
        .unwrap()
        .arg("--input")
        .arg(capture.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["is_applicable"], true);
    assert_eq!(report["score"], 0.0);
    assert_eq!(report["summary"]["wasted_bytes"], 12020);
    // 30ms × 4 throttling − 50ms
    assert_eq!(report["summary"]["wasted_ms"], 70.0);

    let opportunity = &report["opportunities"][0];
    assert_eq!(opportunity["product"], "YouTube Embedded Player");
    assert_eq!(opportunity["facade"]["link"], "https://github.com/paulirish/lite-youtube-embed");
    assert_eq!(opportunity["sub_items"][0]["url"], "https://www.youtube.com/s/player/base.js");
    assert_eq!(opportunity["sub_items"][2]["url"], "Other resources");
}

#[test]
fn test_first_party_page_passes() {
    let capture = write_temp(FIRST_PARTY_ONLY);

    Command::cargo_bin("facade-finder")
        .unwrap()
        .arg("-i")
        .arg(capture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No facade alternatives found"));
}

#[test]
fn test_custom_config_label() {
    let capture = write_temp(CAPTURE);
    let config = write_temp("other_resources_label = \"Tiny stuff\"\n");

    Command::cargo_bin("facade-finder")
        .unwrap()
        .arg("-i")
        .arg(capture.path())
        .arg("-c")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tiny stuff"));
}

#[test]
fn test_custom_entity_database() {
    let capture = write_temp(CAPTURE);
    // Database that knows YouTube but offers no facade for it
    let entities = write_temp(
        r#"
[[entity]]
name = "YouTube"
domains = ["*.youtube.com", "*.ytimg.com"]

[[entity.product]]
name = "YouTube Embedded Player"
url_patterns = ["youtube.com/embed/"]
"#,
    );

    Command::cargo_bin("facade-finder")
        .unwrap()
        .arg("-i")
        .arg(capture.path())
        .arg("-e")
        .arg(entities.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No facade alternatives found"));
}

#[test]
fn test_missing_input_file_fails() {
    Command::cargo_bin("facade-finder")
        .unwrap()
        .arg("-i")
        .arg("/nonexistent/capture.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read capture"));
}

#[test]
fn test_malformed_capture_fails() {
    let capture = write_temp("{ not json");

    Command::cargo_bin("facade-finder")
        .unwrap()
        .arg("-i")
        .arg(capture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse capture"));
}
