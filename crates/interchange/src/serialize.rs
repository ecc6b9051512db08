//! Canonical bundle serialization.
//!
//! The main entry point is [`to_bundle`], which renders a populated
//! registry as a `ModelBundle` JSON value with sorted keys and
//! id-sorted section arrays.

use serde::Serialize;
use serde_json::{Map, Value};

use prax_core::{ModelRegistry, PRAX_BUNDLE_VERSION, PRAX_VERSION};

use crate::deserialize::InterchangeError;

/// Serialize a registry into a canonical `ModelBundle` value.
///
/// Object keys come out sorted (`serde_json::Map` is BTree-backed),
/// section arrays are sorted by record id, and empty sections are
/// omitted, so two equal registries always render byte-identically.
pub fn to_bundle(registry: &ModelRegistry, bundle_id: &str) -> Result<Value, InterchangeError> {
    let mut bundle = Map::new();
    bundle.insert("id".to_owned(), Value::String(bundle_id.to_owned()));
    bundle.insert("kind".to_owned(), Value::String("ModelBundle".to_owned()));
    bundle.insert("prax".to_owned(), Value::String(PRAX_VERSION.to_owned()));
    bundle.insert(
        "praxVersion".to_owned(),
        Value::String(PRAX_BUNDLE_VERSION.to_owned()),
    );

    insert_section(&mut bundle, "systems", registry.systems())?;
    insert_section(&mut bundle, "dependencies", registry.dependencies())?;
    insert_section(&mut bundle, "loopResolutions", registry.loop_resolutions())?;
    insert_section(&mut bundle, "faultTrees", registry.fault_trees())?;
    insert_section(&mut bundle, "basicEvents", registry.basic_events())?;
    insert_section(&mut bundle, "humanActions", registry.human_actions())?;
    insert_section(&mut bundle, "passiveTreatments", registry.passive_treatments())?;
    insert_section(&mut bundle, "evaluations", registry.evaluations())?;
    insert_section(
        &mut bundle,
        "sensitivityStudies",
        registry.sensitivity_studies(),
    )?;
    insert_section(
        &mut bundle,
        "modelUncertainties",
        registry.model_uncertainties(),
    )?;
    insert_section(
        &mut bundle,
        "preOperationalAssumptions",
        registry.pre_operational(),
    )?;

    let documentation = registry.documentation();
    if !documentation.is_empty() {
        let value = serde_json::to_value(documentation)
            .map_err(|e| section_error("documentation", e))?;
        bundle.insert("documentation".to_owned(), value);
    }

    Ok(Value::Object(bundle))
}

fn insert_section<'a, T, I>(
    bundle: &mut Map<String, Value>,
    section: &str,
    records: I,
) -> Result<(), InterchangeError>
where
    T: Serialize + 'a,
    I: Iterator<Item = &'a T>,
{
    let values = records
        .map(|record| serde_json::to_value(record).map_err(|e| section_error(section, e)))
        .collect::<Result<Vec<_>, _>>()?;
    if !values.is_empty() {
        bundle.insert(section.to_owned(), Value::Array(values));
    }
    Ok(())
}

fn section_error(section: &str, err: serde_json::Error) -> InterchangeError {
    InterchangeError::InvalidSection {
        section: section.to_owned(),
        message: err.to_string(),
    }
}
