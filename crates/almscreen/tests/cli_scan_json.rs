//! CLI-level tests for `almscreen scan --json`.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn almscreen_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_almscreen"))
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(almscreen_bin())
        .args(args)
        .output()
        .expect("failed to execute almscreen CLI")
}

fn run_cli_json(args: &[&str]) -> serde_json::Value {
    let output = run_cli(args);
    assert!(
        output.status.success(),
        "command failed: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not valid JSON")
}

#[test]
fn scan_reports_corpus_and_ambiguous_instances() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("a.psc"),
        "LIB;uwp01.plb;uwp01;MSR01:H01:Uwp;BMO:MSR01:H01:Uwp\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("b.psc"),
        "LIB;uwp01.plb;uwp01;MSR01:H01:Uwp;BMO:MSR01:H01:Uwp\n\
         LIB;uwp01.plb;uwp01;MSR01:H01:Fuehler;BMO:MSR01:H01:Fuehler\n",
    )
    .unwrap();

    let report = run_cli_json(&["scan", temp.path().to_str().unwrap(), "--json"]);

    assert_eq!(report["files_scanned"], 2);
    assert_eq!(report["instances_found"], 2);

    let ambiguous = report["ambiguous"].as_array().unwrap();
    assert_eq!(ambiguous.len(), 1);
    assert_eq!(ambiguous[0]["instance"], "MSR01:H01:Uwp");
    assert_eq!(ambiguous[0]["candidates"], 2);
    // b.psc shows the neighbouring instance too and wins the heuristic
    assert_eq!(ambiguous[0]["best"], "b.psc");
}

#[test]
fn scan_rejects_missing_directory() {
    let output = run_cli(&["scan", "/nonexistent/screens", "--json"]);
    assert!(!output.status.success());
}
