//! Construction-time errors.

use crate::ids::EntityKind;

/// Reasons a record is rejected at insert or replace time.
///
/// These are fatal for the offending record only: a rejected insert
/// leaves the registry exactly as it was. Cross-record consistency
/// (dangling references, cut sets, dependency loops) is not checked
/// here -- a half-authored document must stay loadable, and those
/// conditions are reported by the consistency checker instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// An entity of this kind with this id is already registered.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: EntityKind, id: String },

    /// A dependency names the same system as dependent and supporting.
    #[error("dependency '{id}': system '{system}' cannot support itself")]
    SelfDependency { id: String, system: String },

    /// A fault tree has no single identifiable top node.
    #[error("fault tree '{id}': {reason}")]
    MissingTopNode { id: String, reason: String },

    /// A system models no components and justifies no exclusions.
    #[error("system '{id}' models no components and records no exclusion justifications")]
    EmptySystemModel { id: String },

    /// A documentation fragment key does not match its category's
    /// scope, or does not resolve to a registered record.
    #[error("documentation '{category}': {message}")]
    InvalidReference { category: String, message: String },
}
