use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Manifest envelope version (e.g., "1.0").
const MANIFEST_PRAX_VERSION: &str = "1.0";

/// Compute a SHA-256 etag over the compact JSON form of a bundle.
///
/// The etag is defined over the canonical serialization, so two
/// revisions with the same content fingerprint identically regardless
/// of how their source files were formatted.
pub(crate) fn compute_etag(bundle: &Value) -> String {
    // Serializing an in-memory Value does not fail.
    let canonical = serde_json::to_string(bundle).unwrap_or_default();
    let hash = Sha256::digest(canonical.as_bytes());
    format!("{:x}", hash)
}

/// Wrap a canonical bundle in a manifest envelope.
///
/// Keys are lexicographically sorted: `serde_json::Map` is backed by
/// `BTreeMap` (the default when `preserve_order` is not enabled), so
/// insertion order does not matter.
pub(crate) fn build_manifest(bundle: Value) -> Value {
    let etag = compute_etag(&bundle);
    let mut map = Map::new();
    map.insert("bundle".to_string(), bundle);
    map.insert("etag".to_string(), Value::String(etag));
    map.insert(
        "prax".to_string(),
        Value::String(MANIFEST_PRAX_VERSION.to_string()),
    );
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn etag_is_lowercase_hex_sha256() {
        let etag = compute_etag(&json!({"id": "m", "kind": "ModelBundle"}));
        assert_eq!(etag.len(), 64);
        assert!(etag
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn identical_bundles_share_an_etag() {
        let a = json!({"id": "m", "systems": ["x"]});
        let b = json!({"id": "m", "systems": ["x"]});
        assert_eq!(compute_etag(&a), compute_etag(&b));
    }

    #[test]
    fn different_bundles_get_different_etags() {
        let a = json!({"id": "m", "systems": ["x"]});
        let b = json!({"id": "m", "systems": ["y"]});
        assert_ne!(compute_etag(&a), compute_etag(&b));
    }

    #[test]
    fn manifest_wraps_bundle_with_etag_and_version() {
        let bundle = json!({"id": "m", "kind": "ModelBundle"});
        let expected_etag = compute_etag(&bundle);
        let manifest = build_manifest(bundle);

        assert_eq!(manifest["etag"], json!(expected_etag));
        assert_eq!(manifest["prax"], json!(MANIFEST_PRAX_VERSION));
        assert_eq!(manifest["bundle"]["kind"], json!("ModelBundle"));
    }
}
