//! Validates every conformance bundle against the formal model schema
//! at schema/model-schema.json.
//!
//! All three fixture families are schema-valid by construction: the
//! negative and inconsistent bundles exercise typed-load rejection and
//! checker diagnostics, not schema violations.

use std::path::Path;

fn validate_file(
    validator: &jsonschema::Validator,
    path: &Path,
    failures: &mut Vec<String>,
    tested: &mut usize,
) {
    let json_src = std::fs::read_to_string(path).unwrap();
    let instance: serde_json::Value = serde_json::from_str(&json_src).unwrap();
    if let Err(error) = validator.validate(&instance) {
        failures.push(format!("{}: {}", path.display(), error));
    }
    *tested += 1;
}

fn collect_json_files(dir: &Path) -> Vec<std::path::PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "json"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn validate_all_conformance_bundles_against_schema() {
    let schema_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schema/model-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    let validator = jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e));

    let conformance_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../conformance");

    let mut tested = 0usize;
    let mut failures = Vec::new();

    for dir_name in &["positive", "negative", "inconsistent"] {
        let dir = conformance_root.join(dir_name);
        for path in collect_json_files(&dir) {
            validate_file(&validator, &path, &mut failures, &mut tested);
        }
    }

    assert!(tested > 0, "No conformance bundles found -- check paths");
    assert!(
        failures.is_empty(),
        "Schema validation failed for {} of {} files:\n{}",
        failures.len(),
        tested,
        failures.join("\n")
    );

    eprintln!("Schema validation passed for {} bundles", tested);
}

#[test]
fn schema_rejects_unknown_documentation_categories() {
    let schema_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schema/model-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path).unwrap();
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    let validator = jsonschema::validator_for(&schema_value).unwrap();

    let instance = serde_json::json!({
        "id": "bad-category",
        "kind": "ModelBundle",
        "prax": "1.0",
        "praxVersion": "1.0.0",
        "documentation": {
            "operatorLoreDocumentation": [{"fragment": "not a real category"}]
        }
    });
    assert!(validator.validate(&instance).is_err());
}
