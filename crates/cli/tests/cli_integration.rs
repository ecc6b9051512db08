//! CLI integration tests for all implemented subcommands.
//!
//! Uses `assert_cmd` to spawn the `prax` binary and verify
//! exit codes, stdout content, and stderr content.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to conformance fixtures resolve correctly.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `prax` binary, rooted at workspace.
fn prax() -> Command {
    let mut cmd = cargo_bin_cmd!("prax");
    cmd.current_dir(workspace_root());
    cmd
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    prax()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prax systems-analysis toolchain"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn version_exits_0() {
    prax()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prax"));
}

#[test]
fn check_help_exits_0() {
    prax()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--accept-warnings"));
}

// ──────────────────────────────────────────────
// 2. Validate subcommand
// ──────────────────────────────────────────────

#[test]
fn validate_minimal_bundle_exits_0() {
    prax()
        .args(["validate", "conformance/positive/minimal.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_full_bundle_exits_0() {
    prax()
        .args(["validate", "conformance/positive/ebr2_full.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_schema_violation_exits_1() {
    // Missing the required prax/praxVersion envelope fields
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, r#"{"id": "x", "kind": "ModelBundle"}"#).unwrap();

    prax()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid bundle"));
}

#[test]
fn validate_duplicate_system_id_exits_1() {
    // Schema-valid but rejected by construction rules
    prax()
        .args(["validate", "conformance/negative/duplicate_system.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("duplicate"));
}

#[test]
fn validate_json_output_reports_valid() {
    prax()
        .args([
            "--output",
            "json",
            "validate",
            "conformance/positive/minimal.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"));
}

#[test]
fn validate_nonexistent_file_exits_1() {
    prax()
        .args(["validate", "nonexistent_bundle_xyz.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading"));
}

#[test]
fn validate_quiet_suppresses_output_on_error() {
    prax()
        .args([
            "--quiet",
            "validate",
            "conformance/negative/duplicate_system.json",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_clean_model_exits_0() {
    prax()
        .args(["check", "conformance/positive/ebr2_full.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consistency Report"))
        .stdout(predicate::str::contains("No diagnostics."));
}

#[test]
fn check_dangling_references_exits_1() {
    prax()
        .args(["check", "conformance/inconsistent/dangling_refs.json"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("dangling_reference"))
        .stdout(predicate::str::contains("ERROR"));
}

#[test]
fn check_unresolved_loop_is_a_warning() {
    prax()
        .args(["check", "conformance/inconsistent/unresolved_loop.json"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("unresolved_loop"))
        .stdout(predicate::str::contains("WARNING"));
}

#[test]
fn accept_warnings_passes_unresolved_loop() {
    prax()
        .args([
            "check",
            "conformance/inconsistent/unresolved_loop.json",
            "--accept-warnings",
        ])
        .assert()
        .success();
}

#[test]
fn accept_warnings_does_not_mask_errors() {
    prax()
        .args([
            "check",
            "conformance/inconsistent/dangling_refs.json",
            "--accept-warnings",
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn selected_checks_skip_other_passes() {
    // bad_cut_set only trips the trees pass; refs alone is clean
    prax()
        .args([
            "check",
            "conformance/inconsistent/bad_cut_set.json",
            "--checks",
            "refs",
        ])
        .assert()
        .success();
}

#[test]
fn selected_checks_still_run_their_own_pass() {
    prax()
        .args([
            "check",
            "conformance/inconsistent/bad_cut_set.json",
            "--checks",
            "trees",
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("invalid_cut_set"));
}

#[test]
fn check_rejects_unknown_check_name() {
    prax()
        .args([
            "check",
            "conformance/positive/minimal.json",
            "--checks",
            "nonsense",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid check"));
}

#[test]
fn check_json_report_is_parseable() {
    let output = prax()
        .args([
            "--output",
            "json",
            "check",
            "conformance/inconsistent/dangling_refs.json",
        ])
        .output()
        .expect("failed to execute");

    // Diagnostics present, so exit code is still 1
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).expect("invalid UTF-8");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report is not JSON");

    let diagnostics = report["diagnostics"]
        .as_array()
        .expect("diagnostics is not an array");
    assert!(!diagnostics.is_empty(), "expected diagnostics");
    assert!(
        diagnostics
            .iter()
            .any(|d| d["rule"] == "dangling_reference"),
        "expected a dangling_reference diagnostic"
    );

    let checks_run = report["checks_run"]
        .as_array()
        .expect("checks_run is not an array");
    assert_eq!(checks_run.len(), 4, "full run covers all four checks");
}

#[test]
fn check_quiet_still_sets_exit_code() {
    prax()
        .args([
            "--quiet",
            "check",
            "conformance/inconsistent/dangling_refs.json",
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn check_nonexistent_file_exits_1() {
    prax()
        .args(["check", "nonexistent_bundle_xyz.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading"));
}

// ──────────────────────────────────────────────
// 4. Fragments subcommand
// ──────────────────────────────────────────────

#[test]
fn fragments_lists_categories_in_reporting_order() {
    let output = prax()
        .args([
            "fragments",
            "conformance/positive/ebr2_full.json",
            "sys-shutdown-coolers",
        ])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("invalid UTF-8");

    assert!(
        stdout.contains("Documentation for sys-shutdown-coolers"),
        "missing header: {}",
        stdout
    );
    let function_pos = stdout
        .find("[systemFunctionDocumentation]")
        .expect("missing systemFunctionDocumentation");
    let maintenance_pos = stdout
        .find("[testAndMaintenanceDocumentation]")
        .expect("missing testAndMaintenanceDocumentation");
    assert!(
        function_pos < maintenance_pos,
        "categories must follow the (a)-(u) reporting order"
    );
}

#[test]
fn fragments_renders_structured_fragments_as_json() {
    prax()
        .args([
            "fragments",
            "conformance/positive/ebr2_full.json",
            "sys-shutdown-coolers",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[systemSchematicsDocumentation]"))
        .stdout(predicate::str::contains("\"drawing\""));
}

#[test]
fn fragments_unknown_system_exits_1() {
    prax()
        .args([
            "fragments",
            "conformance/positive/minimal.json",
            "sys-does-not-exist",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown system"));
}

#[test]
fn fragments_json_output_is_parseable() {
    let output = prax()
        .args([
            "--output",
            "json",
            "fragments",
            "conformance/positive/ebr2_full.json",
            "sys-shutdown-coolers",
        ])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("invalid UTF-8");
    let view: serde_json::Value = serde_json::from_str(&stdout).expect("output is not JSON");

    assert_eq!(view["system"], "sys-shutdown-coolers");
    let fragments = view["fragments"]
        .as_array()
        .expect("fragments is not an array");
    assert!(!fragments.is_empty(), "expected fragments");
    assert!(
        fragments.iter().all(|f| f.get("category").is_some()),
        "every entry carries its category key"
    );
}

// ──────────────────────────────────────────────
// 5. Graph subcommand
// ──────────────────────────────────────────────

#[test]
fn graph_lists_edges_and_resolved_loop() {
    prax()
        .args(["graph", "conformance/positive/ebr2_full.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "sys-primary-sodium -> sys-plant-power",
        ))
        .stdout(predicate::str::contains("resolved by lr-support-power"));
}

#[test]
fn graph_marks_unresolved_loops_but_exits_0() {
    // graph is a view, not a gate; the checker owns the exit code
    prax()
        .args(["graph", "conformance/inconsistent/unresolved_loop.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(unresolved)"));
}

#[test]
fn graph_without_dependencies_reports_no_loops() {
    prax()
        .args(["graph", "conformance/positive/minimal.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 edge(s)"))
        .stdout(predicate::str::contains("No loops."));
}

#[test]
fn graph_json_output_carries_edges_and_cycles() {
    let output = prax()
        .args([
            "--output",
            "json",
            "graph",
            "conformance/positive/ebr2_full.json",
        ])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("invalid UTF-8");
    let view: serde_json::Value = serde_json::from_str(&stdout).expect("output is not JSON");

    let edges = view["edges"].as_array().expect("edges is not an array");
    assert_eq!(edges.len(), 4, "ebr2 fixture has four dependency edges");
    let cycles = view["cycles"].as_array().expect("cycles is not an array");
    assert_eq!(cycles.len(), 1, "ebr2 fixture has one resolved loop");
    assert_eq!(cycles[0]["resolved_by"], "lr-support-power");
}

// ──────────────────────────────────────────────
// 6. Manifest subcommand
// ──────────────────────────────────────────────

#[test]
fn manifest_stamps_content_etag() {
    let output = prax()
        .args(["manifest", "conformance/positive/minimal.json"])
        .output()
        .expect("failed to execute");

    assert!(
        output.status.success(),
        "manifest failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("invalid UTF-8");
    let manifest: serde_json::Value =
        serde_json::from_str(&stdout).expect("manifest is not valid JSON");

    assert!(
        manifest.get("bundle").is_some(),
        "manifest missing 'bundle' key"
    );
    assert!(
        manifest.get("etag").is_some(),
        "manifest missing 'etag' key"
    );
    assert!(
        manifest.get("prax").is_some(),
        "manifest missing 'prax' key"
    );

    // etag is a lowercase hex string, 64 chars (SHA-256)
    let etag = manifest["etag"].as_str().expect("etag is not a string");
    assert_eq!(
        etag.len(),
        64,
        "etag should be 64 hex chars, got {}",
        etag.len()
    );
    assert!(
        etag.chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
        "etag should be lowercase hex: {}",
        etag
    );
}

#[test]
fn manifest_etag_is_deterministic() {
    let bundle = "conformance/positive/ebr2_full.json";

    let out1 = prax()
        .args(["manifest", bundle])
        .output()
        .expect("first manifest run failed");
    assert!(out1.status.success());

    let json1: serde_json::Value =
        serde_json::from_slice(&out1.stdout).expect("first output not JSON");
    let etag1 = json1["etag"].as_str().expect("first etag missing");

    let out2 = prax()
        .args(["manifest", bundle])
        .output()
        .expect("second manifest run failed");
    assert!(out2.status.success());

    let json2: serde_json::Value =
        serde_json::from_slice(&out2.stdout).expect("second output not JSON");
    let etag2 = json2["etag"].as_str().expect("second etag missing");

    assert_eq!(
        etag1, etag2,
        "same bundle should produce identical etags across runs"
    );
}

#[test]
fn manifest_etag_tracks_content() {
    let out1 = prax()
        .args(["manifest", "conformance/positive/minimal.json"])
        .output()
        .expect("minimal manifest failed");
    assert!(out1.status.success());

    let json1: serde_json::Value =
        serde_json::from_slice(&out1.stdout).expect("minimal output not JSON");
    let etag1 = json1["etag"].as_str().expect("minimal etag missing");

    let out2 = prax()
        .args(["manifest", "conformance/positive/ebr2_full.json"])
        .output()
        .expect("ebr2 manifest failed");
    assert!(out2.status.success());

    let json2: serde_json::Value =
        serde_json::from_slice(&out2.stdout).expect("ebr2 output not JSON");
    let etag2 = json2["etag"].as_str().expect("ebr2 etag missing");

    assert_ne!(etag1, etag2, "different bundles must get different etags");
}

#[test]
fn manifest_output_revalidates() {
    // A manifest the CLI emits must pass its own validate
    let output = prax()
        .args(["manifest", "conformance/positive/ebr2_full.json"])
        .output()
        .expect("manifest failed");
    assert!(output.status.success());

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("ebr2.manifest.json");
    fs::write(&path, &output.stdout).unwrap();

    prax()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid manifest"));
}

#[test]
fn validate_rejects_stale_manifest_etag() {
    // Tamper with the stored etag; the recomputed one no longer matches
    let output = prax()
        .args(["manifest", "conformance/positive/minimal.json"])
        .output()
        .expect("manifest failed");
    assert!(output.status.success());

    let mut manifest: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("manifest not JSON");
    manifest["etag"] = serde_json::json!(
        "0000000000000000000000000000000000000000000000000000000000000000"
    );

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("stale.manifest.json");
    fs::write(&path, serde_json::to_string_pretty(&manifest).unwrap()).unwrap();

    prax()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not match bundle content"));
}
