//! Tests for the command-line binary

use std::process::Command;

#[test]
fn test_failed_crawl_reports_error_once() {
    let output = Command::new(env!("CARGO_BIN_EXE_pagewalk"))
        .args(["--quiet", "http://"])
        .output()
        .expect("run CLI");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 1, "stderr: {}", stderr);
    assert!(lines[0].contains("Crawl failed"), "stderr: {}", stderr);
}
