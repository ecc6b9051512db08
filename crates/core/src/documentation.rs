//! The per-category documentation store.
//!
//! `DocumentationStore` is an append-only multi-map from
//! (category, key) to fragments. The category set is closed: the 21
//! SY-C1 sub-requirements (a)-(u), each keyed by a system, dependency,
//! human action, or basic event -- except the modularization and
//! information-sources categories, which are global.
//!
//! Within a category, fragments keep their insertion order. Across
//! categories, every view follows the fixed declaration order below,
//! which is also the (a)-(u) reporting order.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::ids::{BasicEventId, DependencyId, HumanActionId, SystemId};

/// What a documentation category is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryScope {
    System,
    Dependency,
    HumanAction,
    BasicEvent,
    /// Keyed by nothing; the fragment describes the model as a whole.
    Global,
}

impl fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CategoryScope::System => "system",
            CategoryScope::Dependency => "dependency",
            CategoryScope::HumanAction => "human action",
            CategoryScope::BasicEvent => "basic event",
            CategoryScope::Global => "global",
        };
        f.write_str(s)
    }
}

/// The closed set of documentation categories, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentationCategory {
    SystemFunction,
    SystemBoundaries,
    SystemSchematics,
    EquipmentOperability,
    OperationalHistory,
    SuccessCriteria,
    HumanActions,
    TestAndMaintenance,
    SystemDependencies,
    SpatialInformation,
    ModelingAssumptions,
    ComponentsAndFailureModes,
    Modularization,
    LogicLoopResolutions,
    EvaluationResults,
    SensitivityStudies,
    InformationSources,
    BasicEvents,
    Nomenclature,
    DigitalInstrumentationAndControl,
    PassiveSafetyConsiderations,
}

impl DocumentationCategory {
    /// Every category, in reporting order.
    pub const ALL: [DocumentationCategory; 21] = [
        DocumentationCategory::SystemFunction,
        DocumentationCategory::SystemBoundaries,
        DocumentationCategory::SystemSchematics,
        DocumentationCategory::EquipmentOperability,
        DocumentationCategory::OperationalHistory,
        DocumentationCategory::SuccessCriteria,
        DocumentationCategory::HumanActions,
        DocumentationCategory::TestAndMaintenance,
        DocumentationCategory::SystemDependencies,
        DocumentationCategory::SpatialInformation,
        DocumentationCategory::ModelingAssumptions,
        DocumentationCategory::ComponentsAndFailureModes,
        DocumentationCategory::Modularization,
        DocumentationCategory::LogicLoopResolutions,
        DocumentationCategory::EvaluationResults,
        DocumentationCategory::SensitivityStudies,
        DocumentationCategory::InformationSources,
        DocumentationCategory::BasicEvents,
        DocumentationCategory::Nomenclature,
        DocumentationCategory::DigitalInstrumentationAndControl,
        DocumentationCategory::PassiveSafetyConsiderations,
    ];

    /// The wire key for this category.
    pub fn key(&self) -> &'static str {
        match self {
            DocumentationCategory::SystemFunction => "systemFunctionDocumentation",
            DocumentationCategory::SystemBoundaries => "systemBoundariesDocumentation",
            DocumentationCategory::SystemSchematics => "systemSchematicsDocumentation",
            DocumentationCategory::EquipmentOperability => "equipmentOperabilityDocumentation",
            DocumentationCategory::OperationalHistory => "operationalHistoryDocumentation",
            DocumentationCategory::SuccessCriteria => "successCriteriaDocumentation",
            DocumentationCategory::HumanActions => "humanActionsDocumentation",
            DocumentationCategory::TestAndMaintenance => "testAndMaintenanceDocumentation",
            DocumentationCategory::SystemDependencies => "systemDependenciesDocumentation",
            DocumentationCategory::SpatialInformation => "spatialInformationDocumentation",
            DocumentationCategory::ModelingAssumptions => "modelingAssumptionsDocumentation",
            DocumentationCategory::ComponentsAndFailureModes => {
                "componentsAndFailureModesDocumentation"
            }
            DocumentationCategory::Modularization => "modularizationDocumentation",
            DocumentationCategory::LogicLoopResolutions => "logicLoopResolutionsDocumentation",
            DocumentationCategory::EvaluationResults => "evaluationResultsDocumentation",
            DocumentationCategory::SensitivityStudies => "sensitivityStudiesDocumentation",
            DocumentationCategory::InformationSources => "informationSourcesDocumentation",
            DocumentationCategory::BasicEvents => "basicEventsDocumentation",
            DocumentationCategory::Nomenclature => "nomenclatureDocumentation",
            DocumentationCategory::DigitalInstrumentationAndControl => {
                "digitalInstrumentationAndControlDocumentation"
            }
            DocumentationCategory::PassiveSafetyConsiderations => {
                "passiveSafetyConsiderationsDocumentation"
            }
        }
    }

    /// Look a category up by its wire key.
    pub fn from_key(key: &str) -> Option<DocumentationCategory> {
        DocumentationCategory::ALL
            .iter()
            .copied()
            .find(|category| category.key() == key)
    }

    /// What this category is keyed by.
    pub fn scope(&self) -> CategoryScope {
        match self {
            DocumentationCategory::SystemDependencies => CategoryScope::Dependency,
            DocumentationCategory::HumanActions => CategoryScope::HumanAction,
            DocumentationCategory::BasicEvents => CategoryScope::BasicEvent,
            DocumentationCategory::Modularization | DocumentationCategory::InformationSources => {
                CategoryScope::Global
            }
            _ => CategoryScope::System,
        }
    }
}

impl fmt::Display for DocumentationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for DocumentationCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for DocumentationCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        DocumentationCategory::from_key(&key)
            .ok_or_else(|| D::Error::custom(format!("unknown documentation category '{}'", key)))
    }
}

/// A documentation fragment: narrative text or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    Text(String),
    Structured(serde_json::Map<String, Value>),
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Fragment {
        Fragment::Text(text.into())
    }
}

/// The key a fragment is filed under: one of the four reference scopes,
/// or global for the unkeyed categories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FragmentKey {
    System(SystemId),
    Dependency(DependencyId),
    HumanAction(HumanActionId),
    BasicEvent(BasicEventId),
    Global,
}

impl FragmentKey {
    pub fn scope(&self) -> CategoryScope {
        match self {
            FragmentKey::System(_) => CategoryScope::System,
            FragmentKey::Dependency(_) => CategoryScope::Dependency,
            FragmentKey::HumanAction(_) => CategoryScope::HumanAction,
            FragmentKey::BasicEvent(_) => CategoryScope::BasicEvent,
            FragmentKey::Global => CategoryScope::Global,
        }
    }

    /// The referenced id, when the key has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            FragmentKey::System(id) => Some(id.as_str()),
            FragmentKey::Dependency(id) => Some(id.as_str()),
            FragmentKey::HumanAction(id) => Some(id.as_str()),
            FragmentKey::BasicEvent(id) => Some(id.as_str()),
            FragmentKey::Global => None,
        }
    }

    fn for_scope(scope: CategoryScope, id: String) -> Option<FragmentKey> {
        match scope {
            CategoryScope::System => Some(FragmentKey::System(SystemId::new(id))),
            CategoryScope::Dependency => Some(FragmentKey::Dependency(DependencyId::new(id))),
            CategoryScope::HumanAction => Some(FragmentKey::HumanAction(HumanActionId::new(id))),
            CategoryScope::BasicEvent => Some(FragmentKey::BasicEvent(BasicEventId::new(id))),
            CategoryScope::Global => None,
        }
    }
}

/// One stored fragment together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentEntry {
    pub key: FragmentKey,
    pub fragment: Fragment,
}

/// Append-only multi-map from (category, key) to fragments.
///
/// Inserts go through `ModelRegistry::put_fragment`, which validates
/// the key against the category scope and the registry, or through
/// `restore_fragment`, which skips reference resolution for reloads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentationStore {
    entries: BTreeMap<DocumentationCategory, Vec<FragmentEntry>>,
}

impl DocumentationStore {
    pub fn new() -> DocumentationStore {
        DocumentationStore {
            entries: BTreeMap::new(),
        }
    }

    /// Number of stored fragments across all categories.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, category: DocumentationCategory, entry: FragmentEntry) {
        self.entries.entry(category).or_default().push(entry);
    }

    /// All entries, in category order then insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (DocumentationCategory, &FragmentEntry)> {
        self.entries
            .iter()
            .flat_map(|(category, rows)| rows.iter().map(move |row| (*category, row)))
    }

    /// Entries of one category, in insertion order.
    pub fn category_entries(&self, category: DocumentationCategory) -> &[FragmentEntry] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Fragments filed under `key`, in category order then insertion
    /// order.
    pub fn fragments_for(&self, key: &FragmentKey) -> Vec<(DocumentationCategory, &Fragment)> {
        self.entries()
            .filter(|(_, entry)| entry.key == *key)
            .map(|(category, entry)| (category, &entry.fragment))
            .collect()
    }

    /// The per-system documentation view.
    pub fn fragments_for_system(&self, id: &SystemId) -> Vec<(DocumentationCategory, &Fragment)> {
        self.fragments_for(&FragmentKey::System(id.clone()))
    }

    /// Fragments of the global (unkeyed) categories.
    pub fn global_fragments(&self) -> Vec<(DocumentationCategory, &Fragment)> {
        self.fragments_for(&FragmentKey::Global)
    }
}

// Wire shape: { "<categoryKey>": [ {"ref": "...", "fragment": ...}, ... ] }.
// Keyed scopes require "ref"; global categories forbid it. Unknown
// category keys are rejected, which keeps the category set closed on
// the wire as well as in the enum.

#[derive(Serialize, Deserialize)]
struct RawEntry {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    fragment: Fragment,
}

impl Serialize for DocumentationStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, rows) in &self.entries {
            let raw: Vec<RawEntry> = rows
                .iter()
                .map(|entry| RawEntry {
                    reference: entry.key.id().map(str::to_owned),
                    fragment: entry.fragment.clone(),
                })
                .collect();
            map.serialize_entry(category.key(), &raw)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentationStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, Vec<RawEntry>> = BTreeMap::deserialize(deserializer)?;
        let mut store = DocumentationStore::new();
        for (key, rows) in raw {
            let category = DocumentationCategory::from_key(&key).ok_or_else(|| {
                D::Error::custom(format!("unknown documentation category '{}'", key))
            })?;
            for row in rows {
                let entry_key = match (category.scope(), row.reference) {
                    (CategoryScope::Global, None) => FragmentKey::Global,
                    (CategoryScope::Global, Some(_)) => {
                        return Err(D::Error::custom(format!(
                            "category '{}' is global and takes no ref",
                            key
                        )))
                    }
                    (scope, Some(id)) => match FragmentKey::for_scope(scope, id) {
                        Some(k) => k,
                        None => FragmentKey::Global,
                    },
                    (scope, None) => {
                        return Err(D::Error::custom(format!(
                            "category '{}' is keyed by {} and requires a ref",
                            key, scope
                        )))
                    }
                };
                store.push(
                    category,
                    FragmentEntry {
                        key: entry_key,
                        fragment: row.fragment,
                    },
                );
            }
        }
        Ok(store)
    }
}
