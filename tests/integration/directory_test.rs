//! Directory conversion tests: tree mirroring, recursion and error handling

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use jsonconv::conversion::batch::convert_batch_sources;
use jsonconv::parser::directory::find_json_files;
use jsonconv::{ConversionConfig, JsonSource};

fn jsonconv() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jsonconv"))
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// input/
///   users.json
///   notes.txt
///   nested/orders.json
fn fixture_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input");
    write(&input, "users.json", r#"[{"id": 1, "name": "Ann"}, {"id": 2, "name": "Bo"}]"#);
    write(&input, "notes.txt", "not json");
    write(&input, "nested/orders.json", r#"{"order": 7, "items": ["a", "b"]}"#);
    tmp
}

fn convert_dir(tmp: &TempDir, extra: &[&str]) -> Output {
    jsonconv()
        .arg(tmp.path().join("input"))
        .arg("--output")
        .arg(tmp.path().join("output"))
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn test_top_level_only_by_default() {
    let tmp = fixture_tree();
    let output = convert_dir(&tmp, &[]);

    assert!(output.status.success());
    let out = tmp.path().join("output");
    assert_eq!(
        fs::read_to_string(out.join("users.csv")).unwrap(),
        "id,name\n1,Ann\n2,Bo"
    );
    assert!(!out.join("nested").exists());
    assert!(!out.join("notes.csv").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Found 1 JSON files"));
}

#[test]
fn test_recursive_mirrors_tree() {
    let tmp = fixture_tree();
    let output = convert_dir(&tmp, &["--recursive", "--quiet"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let out = tmp.path().join("output");
    assert_eq!(
        fs::read_to_string(out.join("nested/orders.csv")).unwrap(),
        "order,items\n7,\"[\"\"a\"\",\"\"b\"\"]\""
    );
}

#[test]
fn test_recursive_xml_extension() {
    let tmp = fixture_tree();
    let output = convert_dir(&tmp, &["--recursive", "--format", "xml", "--quiet"]);

    assert!(output.status.success());
    let xml = fs::read_to_string(tmp.path().join("output/nested/orders.xml")).unwrap();
    assert!(xml.contains("  <items>a</items>\n  <items>b</items>"));
    assert!(tmp.path().join("output/users.xml").exists());
}

#[test]
fn test_failure_stops_without_continue_on_error() {
    let tmp = fixture_tree();
    write(&tmp.path().join("input"), "a_scalar.json", "123");

    let output = convert_dir(&tmp, &[]);

    assert!(!output.status.success());
    // Sorted order puts the bad file first
    assert!(!tmp.path().join("output/users.csv").exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("a_scalar.json"));
}

#[test]
fn test_continue_on_error_converts_the_rest() {
    let tmp = fixture_tree();
    write(&tmp.path().join("input"), "a_broken.json", "{not json");

    let output = convert_dir(&tmp, &["--continue-on-error", "--stats"]);

    assert!(!output.status.success());
    assert!(tmp.path().join("output/users.csv").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed: 1"));
    assert!(stderr.contains("1 file(s) failed to convert"));
}

#[test]
fn test_directory_requires_output() {
    let tmp = fixture_tree();
    let output = jsonconv().arg(tmp.path().join("input")).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Output directory required"));
}

#[test]
fn test_validate_only_directory() {
    let tmp = fixture_tree();
    let output = jsonconv()
        .arg(tmp.path().join("input"))
        .args(["--validate-only", "--recursive"])
        .output()
        .unwrap();
    assert!(output.status.success());

    write(&tmp.path().join("input"), "nested/bad.json", "[1]");
    let output = jsonconv()
        .arg(tmp.path().join("input"))
        .args(["--validate-only", "--recursive"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 invalid file(s)"));
}

#[test]
fn test_batch_api_over_found_files() {
    let tmp = fixture_tree();
    let files = find_json_files(&tmp.path().join("input"), true).unwrap();
    assert_eq!(files.len(), 2);

    let sources = files.into_iter().map(JsonSource::File).collect();
    let report = convert_batch_sources(sources, &ConversionConfig::csv(), false).unwrap();

    assert_eq!(report.converted.len(), 2);
    assert_eq!(report.statistics.file_count, 2);
    assert_eq!(report.statistics.record_count, 3);
}
