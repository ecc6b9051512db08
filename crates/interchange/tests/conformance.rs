//! Typed-load conformance suite over the shared fixture bundles.
//!
//! Three fixture families under conformance/:
//! - `positive/`     -- loads and passes every construction rule
//! - `negative/`     -- rejected at load by a construction rule
//! - `inconsistent/` -- loads fine; the findings belong to the checker
//!
//! The runner parses the fixture JSON and feeds it through
//! [`from_bundle`], asserting acceptance or the specific rejection.

use std::path::PathBuf;

use prax_core::ModelError;
use prax_interchange::{from_bundle, InterchangeError, ModelBundle};

fn conformance_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("conformance")
}

fn load_json(family: &str, name: &str) -> serde_json::Value {
    let path = conformance_dir().join(family).join(format!("{}.json", name));
    let src = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&src)
        .unwrap_or_else(|e| panic!("Invalid JSON in {}: {}", path.display(), e))
}

fn run_load_fixture(family: &str, name: &str) -> ModelBundle {
    let json = load_json(family, name);
    from_bundle(&json).unwrap_or_else(|e| panic!("Failed to load {}/{}: {}", family, name, e))
}

fn run_load_fixture_error(name: &str) -> InterchangeError {
    let json = load_json("negative", name);
    match from_bundle(&json) {
        Ok(_) => panic!("Expected load rejection for negative/{}, but it loaded", name),
        Err(e) => e,
    }
}

// ──────────────────────────────────────────────
// Positive fixtures
// ──────────────────────────────────────────────

#[test]
fn minimal_bundle_loads() {
    let bundle = run_load_fixture("positive", "minimal");
    assert_eq!(bundle.id, "minimal");
    assert_eq!(bundle.registry.systems().count(), 1);
    assert_eq!(bundle.registry.documentation().len(), 1);
}

#[test]
fn ebr2_bundle_loads_every_section() {
    let bundle = run_load_fixture("positive", "ebr2_full");
    assert_eq!(bundle.id, "ebr2-systems-analysis");
    assert_eq!(bundle.registry.systems().count(), 5);
    assert_eq!(bundle.registry.dependencies().count(), 4);
    assert_eq!(bundle.registry.fault_trees().count(), 1);
    assert_eq!(bundle.registry.loop_resolutions().count(), 1);
    assert!(bundle.registry.basic_events().count() > 0);
    assert!(!bundle.registry.documentation().is_empty());
}

// ──────────────────────────────────────────────
// Negative fixtures: construction-rule rejections
// ──────────────────────────────────────────────

#[test]
fn duplicate_system_is_rejected() {
    match run_load_fixture_error("duplicate_system") {
        InterchangeError::Construction(ModelError::DuplicateId { id, .. }) => {
            assert_eq!(id, "sys-primary-sodium");
        }
        other => panic!("expected DuplicateId, got {:?}", other),
    }
}

#[test]
fn self_dependency_is_rejected() {
    match run_load_fixture_error("self_dependency") {
        InterchangeError::Construction(ModelError::SelfDependency { id, system }) => {
            assert_eq!(id, "dep-self");
            assert_eq!(system, "sys-plant-power");
        }
        other => panic!("expected SelfDependency, got {:?}", other),
    }
}

#[test]
fn tree_without_discoverable_top_is_rejected() {
    match run_load_fixture_error("no_top_node") {
        InterchangeError::Construction(ModelError::MissingTopNode { id, .. }) => {
            assert_eq!(id, "ft-circular");
        }
        other => panic!("expected MissingTopNode, got {:?}", other),
    }
}

#[test]
fn tree_with_two_roots_and_no_designation_is_rejected() {
    match run_load_fixture_error("ambiguous_top") {
        InterchangeError::Construction(ModelError::MissingTopNode { id, .. }) => {
            assert_eq!(id, "ft-two-roots");
        }
        other => panic!("expected MissingTopNode, got {:?}", other),
    }
}

#[test]
fn system_with_nothing_modeled_or_justified_is_rejected() {
    match run_load_fixture_error("empty_system") {
        InterchangeError::Construction(ModelError::EmptySystemModel { id }) => {
            assert_eq!(id, "sys-undocumented");
        }
        other => panic!("expected EmptySystemModel, got {:?}", other),
    }
}

// ──────────────────────────────────────────────
// Inconsistent fixtures: load fine, report later
// ──────────────────────────────────────────────

#[test]
fn dangling_refs_bundle_still_loads() {
    let bundle = run_load_fixture("inconsistent", "dangling_refs");
    assert_eq!(bundle.id, "dangling-refs");
}

#[test]
fn bad_cut_set_bundle_still_loads() {
    let bundle = run_load_fixture("inconsistent", "bad_cut_set");
    assert_eq!(bundle.id, "bad-cut-set");
}

#[test]
fn unresolved_loop_bundle_still_loads() {
    let bundle = run_load_fixture("inconsistent", "unresolved_loop");
    assert_eq!(bundle.id, "unresolved-loop");
    assert_eq!(bundle.registry.systems().count(), 3);
}
