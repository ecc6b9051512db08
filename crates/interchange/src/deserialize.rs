//! Deserialization from model bundle JSON into a validated registry.
//!
//! The main entry point is [`from_bundle`], which takes a
//! `&serde_json::Value` and produces a [`ModelBundle`] whose registry
//! has passed every construction-time rule.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use prax_core::{
    BasicEvent, DocumentationStore, FaultTree, HumanAction, LoopResolution, ModelError,
    ModelRegistry, ModelUncertainty, PassiveSystemsTreatment, PreOperationalAssumptions,
    SystemDefinition, SystemDependency, SystemModelEvaluation, SystemSensitivityStudy,
};

/// Errors during bundle serialization or deserialization.
#[derive(Debug, Clone, PartialEq)]
pub enum InterchangeError {
    /// The bundle is missing a required top-level field.
    MissingField { field: String },
    /// A section is not shaped the way the bundle format requires.
    InvalidSection { section: String, message: String },
    /// A record inside a section failed to parse.
    Record {
        section: String,
        id: String,
        message: String,
    },
    /// A parsed record was rejected by a registry construction rule.
    Construction(ModelError),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "bundle missing required field: '{}'", field)
            }
            InterchangeError::InvalidSection { section, message } => {
                write!(f, "section '{}': {}", section, message)
            }
            InterchangeError::Record {
                section,
                id,
                message,
            } => {
                write!(f, "{} '{}': {}", section, id, message)
            }
            InterchangeError::Construction(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for InterchangeError {}

impl From<ModelError> for InterchangeError {
    fn from(err: ModelError) -> Self {
        InterchangeError::Construction(err)
    }
}

/// A deserialized bundle: envelope fields plus the populated registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    pub id: String,
    pub prax: String,
    pub prax_version: String,
    pub registry: ModelRegistry,
}

/// Deserialize a model bundle into a validated registry.
///
/// Records pass through the registry's insert methods, so everything a
/// construction rule rejects (duplicate ids, self-dependencies,
/// undiscoverable fault tree tops, empty system models) rejects the
/// bundle. Documentation keys are re-attached leniently; fragments
/// whose targets are missing surface later as checker diagnostics.
/// Unknown top-level keys are skipped for forward compatibility.
pub fn from_bundle(bundle: &Value) -> Result<ModelBundle, InterchangeError> {
    let id = bundle
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "id".to_string(),
        })?
        .to_string();

    let prax = bundle
        .get("prax")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let prax_version = bundle
        .get("praxVersion")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let mut registry = ModelRegistry::new();

    for record in section_records::<SystemDefinition>(bundle, "systems")? {
        registry.insert_system(record)?;
    }
    for record in section_records::<SystemDependency>(bundle, "dependencies")? {
        registry.insert_dependency(record)?;
    }
    for record in section_records::<LoopResolution>(bundle, "loopResolutions")? {
        registry.insert_loop_resolution(record)?;
    }
    for record in section_records::<FaultTree>(bundle, "faultTrees")? {
        registry.insert_fault_tree(record)?;
    }
    for record in section_records::<BasicEvent>(bundle, "basicEvents")? {
        registry.insert_basic_event(record)?;
    }
    for record in section_records::<HumanAction>(bundle, "humanActions")? {
        registry.insert_human_action(record)?;
    }
    for record in section_records::<PassiveSystemsTreatment>(bundle, "passiveTreatments")? {
        registry.insert_passive_treatment(record)?;
    }
    for record in section_records::<SystemModelEvaluation>(bundle, "evaluations")? {
        registry.insert_evaluation(record)?;
    }
    for record in section_records::<SystemSensitivityStudy>(bundle, "sensitivityStudies")? {
        registry.insert_sensitivity_study(record)?;
    }
    for record in section_records::<ModelUncertainty>(bundle, "modelUncertainties")? {
        registry.insert_model_uncertainty(record)?;
    }
    for record in section_records::<PreOperationalAssumptions>(bundle, "preOperationalAssumptions")?
    {
        registry.insert_pre_operational_assumptions(record)?;
    }

    if let Some(raw) = bundle.get("documentation") {
        let store: DocumentationStore =
            serde_json::from_value(raw.clone()).map_err(|e| InterchangeError::InvalidSection {
                section: "documentation".to_string(),
                message: e.to_string(),
            })?;
        for (category, entry) in store.entries() {
            registry.restore_fragment(category, entry.key.clone(), entry.fragment.clone())?;
        }
    }

    Ok(ModelBundle {
        id,
        prax,
        prax_version,
        registry,
    })
}

/// Parse one section array into typed records. A missing section is an
/// empty one; a present section must be an array.
fn section_records<T: DeserializeOwned>(
    bundle: &Value,
    section: &str,
) -> Result<Vec<T>, InterchangeError> {
    let Some(raw) = bundle.get(section) else {
        return Ok(Vec::new());
    };
    let rows = raw
        .as_array()
        .ok_or_else(|| InterchangeError::InvalidSection {
            section: section.to_string(),
            message: "expected an array".to_string(),
        })?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        // records keyed by system (SY-C2/C3 sections) have no id field
        let id = row
            .get("id")
            .or_else(|| row.get("system"))
            .and_then(|v| v.as_str())
            .unwrap_or("?")
            .to_string();
        let record =
            serde_json::from_value(row.clone()).map_err(|e| InterchangeError::Record {
                section: section.to_string(),
                id,
                message: e.to_string(),
            })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prax_core::{DocumentationCategory, Fragment, FragmentKey, SystemId};
    use serde_json::json;

    fn make_bundle(extra: serde_json::Value) -> Value {
        let mut bundle = json!({
            "id": "bundle-test",
            "kind": "ModelBundle",
            "prax": "1.0",
            "praxVersion": "1.0.0"
        });
        if let (Some(target), Some(source)) = (bundle.as_object_mut(), extra.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }
        bundle
    }

    fn system_row(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": id.to_uppercase(),
            "description": "test system",
            "excludedComponents": ["passive piping"]
        })
    }

    #[test]
    fn empty_bundle_yields_empty_registry() {
        let bundle = make_bundle(json!({}));
        let result = from_bundle(&bundle).unwrap();
        assert_eq!(result.id, "bundle-test");
        assert_eq!(result.prax, "1.0");
        assert_eq!(result.prax_version, "1.0.0");
        assert_eq!(result.registry, ModelRegistry::new());
    }

    #[test]
    fn missing_bundle_id_is_an_error() {
        let bundle = json!({"systems": []});
        match from_bundle(&bundle).unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "id"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn version_fields_default_when_absent() {
        let bundle = json!({"id": "bundle-bare"});
        let result = from_bundle(&bundle).unwrap();
        assert_eq!(result.prax, "");
        assert_eq!(result.prax_version, "");
    }

    #[test]
    fn non_array_section_is_rejected() {
        let bundle = make_bundle(json!({"systems": {"id": "sys-a"}}));
        match from_bundle(&bundle).unwrap_err() {
            InterchangeError::InvalidSection { section, .. } => assert_eq!(section, "systems"),
            other => panic!("expected InvalidSection, got {:?}", other),
        }
    }

    #[test]
    fn malformed_record_names_section_and_id() {
        // name and description are required
        let bundle = make_bundle(json!({"systems": [{"id": "sys-a"}]}));
        match from_bundle(&bundle).unwrap_err() {
            InterchangeError::Record { section, id, .. } => {
                assert_eq!(section, "systems");
                assert_eq!(id, "sys-a");
            }
            other => panic!("expected Record, got {:?}", other),
        }
    }

    #[test]
    fn construction_rules_reject_the_bundle() {
        let bundle = make_bundle(json!({
            "systems": [system_row("sys-a"), system_row("sys-a")]
        }));
        match from_bundle(&bundle).unwrap_err() {
            InterchangeError::Construction(ModelError::DuplicateId { id, .. }) => {
                assert_eq!(id, "sys-a");
            }
            other => panic!("expected Construction, got {:?}", other),
        }
    }

    #[test]
    fn unknown_top_level_keys_are_skipped() {
        let bundle = make_bundle(json!({
            "systems": [system_row("sys-a")],
            "futureSection": [{"id": "later"}]
        }));
        let result = from_bundle(&bundle).unwrap();
        assert!(result
            .registry
            .system(&SystemId::from("sys-a"))
            .is_some());
    }

    #[test]
    fn documentation_is_restored_even_when_dangling() {
        let bundle = make_bundle(json!({
            "systems": [system_row("sys-a")],
            "documentation": {
                "systemFunctionDocumentation": [
                    {"ref": "sys-a", "fragment": "Provides shutdown cooling."},
                    {"ref": "sys-ghost", "fragment": "Authored before its system."}
                ]
            }
        }));
        let result = from_bundle(&bundle).unwrap();
        let store = result.registry.documentation();
        assert_eq!(store.len(), 2);
        let fragments = store.fragments_for(&FragmentKey::System(SystemId::from("sys-ghost")));
        assert_eq!(fragments.len(), 1);
        assert_eq!(
            fragments[0],
            (
                DocumentationCategory::SystemFunction,
                &Fragment::text("Authored before its system.")
            )
        );
    }

    #[test]
    fn unknown_documentation_category_is_rejected() {
        let bundle = make_bundle(json!({
            "documentation": {
                "surprisesDocumentation": [{"fragment": "?"}]
            }
        }));
        match from_bundle(&bundle).unwrap_err() {
            InterchangeError::InvalidSection { section, .. } => {
                assert_eq!(section, "documentation");
            }
            other => panic!("expected InvalidSection, got {:?}", other),
        }
    }
}
