//! End-to-end tests driving the jsonconv binary

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn jsonconv() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jsonconv"))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = jsonconv()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn jsonconv");

    // The process may exit on a bad flag before reading its input
    if let Err(e) = child.stdin.take().unwrap().write_all(input.as_bytes()) {
        assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe);
    }
    child.wait_with_output().unwrap()
}

#[test]
fn test_inline_json_to_csv() {
    let output = jsonconv()
        .arg(r#"[{"id": 1, "name": "Ann"}, {"id": 2, "city": "Oslo"}]"#)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "id,name,city\n1,Ann,\n2,,Oslo\n");
}

#[test]
fn test_inline_json_to_xml() {
    let output = jsonconv()
        .args([r#"{"a": [1, 2]}"#, "--format", "xml"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <a>1</a>\n  <a>2</a>\n</root>\n"
    );
}

#[test]
fn test_stdin_input() {
    let output = run_with_stdin(&["--stdin"], r#"{"k": "v,w"}"#);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "k\n\"v,w\"\n");
}

#[test]
fn test_stdin_xml_custom_root_and_indent() {
    let output = run_with_stdin(
        &["--stdin", "-f", "xml", "--root", "doc", "--indent", "4"],
        r#"{"x": {"y": null}}"#,
    );
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<doc>\n    <x>\n        <y />\n    </x>\n</doc>\n"
    );
}

#[test]
fn test_file_to_file_with_stats() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data.json");
    let output_path = tmp.path().join("out/data.csv");
    std::fs::write(&input, r#"[{"a": 1}, {"a": 2}]"#).unwrap();

    let output = jsonconv()
        .arg(&input)
        .arg("-o")
        .arg(&output_path)
        .arg("--stats")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "a\n1\n2");
    assert!(stdout(&output).contains("Converted to:"));
    assert!(stderr(&output).contains("Conversion Statistics:"));
    assert!(stderr(&output).contains("Records: 2"));
}

#[test]
fn test_unsupported_shape_exits_nonzero() {
    let output = run_with_stdin(&["--stdin"], "[1, 2, 3]");

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Cannot convert array containing number to CSV"));
}

#[test]
fn test_scalar_is_fine_as_xml() {
    let output = run_with_stdin(&["--stdin", "--format", "xml"], "42");
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("<root>42</root>\n"));
}

#[test]
fn test_parse_error_reports_location() {
    let output = run_with_stdin(&["--stdin"], "{\n  \"a\": 1,\n  oops\n}");

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("line 3"), "stderr: {}", err);
    assert!(err.contains("--validate-only"));
}

#[test]
fn test_validate_only() {
    let output = jsonconv()
        .args([r#"{"ok": true}"#, "--validate-only"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Valid JSON for CSV"));

    let output = run_with_stdin(&["--stdin", "--validate-only"], "\"just text\"");
    assert!(!output.status.success());
}

#[test]
fn test_strict_csv_and_delimiter_flags() {
    let input = r#"[{"a": "x|y", "b": "line\nbreak"}]"#;

    let output = run_with_stdin(&["--stdin", "--delimiter", "pipe"], input);
    assert_eq!(stdout(&output), "a|b\n\"x|y\"|line\nbreak\n");

    let output = run_with_stdin(&["--stdin", "--strict-csv"], input);
    assert_eq!(stdout(&output), "a,b\nx|y,\"line\nbreak\"\n");
}

#[test]
fn test_max_depth_flag() {
    let output = run_with_stdin(&["--stdin", "--max-depth", "2"], r#"{"a": [[1]]}"#);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("deeper than 2 levels"));
}

#[test]
fn test_max_depth_flag_past_parser_default() {
    let deep = format!("{}1{}", r#"{"a":"#.repeat(200), "}".repeat(200));

    let output = run_with_stdin(&["--stdin", "-f", "xml", "--max-depth", "500"], &deep);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_with_stdin(&["--stdin", "-f", "xml", "--max-depth", "150"], &deep);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("deeper than 150 levels"));
}

#[test]
fn test_parse_error_preview_is_clipped() {
    let long = format!("[{}oops]", "1, ".repeat(2000));
    let output = run_with_stdin(&["--stdin"], &long);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("1, 1, oops]"));
    assert!(err.len() < 1000, "stderr: {}", err);
}

#[test]
fn test_memory_limit_flag() {
    let big = format!(r#"[{{"a": "{}"}}]"#, "x".repeat(2048));
    let output = run_with_stdin(&["--stdin", "--memory-limit", "1KB"], &big);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("too large"));

    let output = run_with_stdin(&["--stdin", "--memory-limit", "8B"], "{}");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("at least 1KB"));
}

#[test]
fn test_missing_input_path() {
    let output = jsonconv().arg("/definitely/not/here.json").output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("does not exist"));
}
