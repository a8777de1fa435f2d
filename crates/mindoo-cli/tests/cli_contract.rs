use std::path::Path;
use std::process::{Command, Output};

const NET: &str = "PEP\nPetriBox\nFORMAT_N\nPL\n1\"p0\"M1\n2\"p1\"M0\nTR\n1\"t0\"\nTP\n1<2\nPT\n1>1\n";

fn mindoo(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mindoo"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to execute mindoo")
}

fn workspace_with_net() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("net.ll_net"), NET).unwrap();
    std::fs::create_dir(dir.path().join("rules")).unwrap();
    dir
}

#[test]
fn help_lists_every_subcommand_in_session_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = mindoo(&["--help"], dir.path());
    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["doom", "markings", "reach", "dot"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
    let markings = stdout.find("mindoo markings net.ll").expect("markings step");
    let reach = stdout.find("mindoo reach net.ll").expect("reach step");
    let doom = stdout.find("mindoo doom net.ll").expect("doom step");
    assert!(markings < reach && reach < doom);
}

#[test]
fn unknown_bad_place_fails_before_anything_is_written() {
    let dir = workspace_with_net();
    let output = mindoo(&["doom", "net", "p9", "--out", "gen"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("p9"), "stderr should name the place: {stderr}");
    assert!(!dir.path().join("gen").exists());
}

#[test]
fn missing_rule_files_are_reported() {
    let dir = workspace_with_net();
    let output = mindoo(&["doom", "net.ll_net", "p1", "--out", "gen"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("configuration.asp"),
        "stderr should name the missing rule file: {stderr}"
    );
    assert!(!dir.path().join("gen").exists());
}

#[test]
fn net_without_place_section_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.ll_net"), "PEP\nPetriBox\nFORMAT_N\nTR\n1\"t0\"\n")
        .unwrap();
    let output = mindoo(&["markings", "broken"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PL"), "stderr should name the section: {stderr}");
}

#[test]
fn missing_net_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = mindoo(&["reach", "nowhere", "p1"], dir.path());
    assert!(!output.status.success());
}

#[test]
fn unknown_pop_order_is_rejected() {
    let dir = workspace_with_net();
    let output = mindoo(&["doom", "net", "p1", "--pop-order", "random"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("random"));
}

#[cfg(not(feature = "native"))]
#[test]
fn native_backend_needs_feature() {
    let dir = workspace_with_net();
    let output = mindoo(&["markings", "net", "--backend", "native"], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("native"));
}
