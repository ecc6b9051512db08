//! prax-interchange: ModelBundle JSON serialization and deserialization.
//!
//! A `ModelBundle` is the canonical on-disk and on-wire form of a
//! [`prax_core::ModelRegistry`]: one JSON object carrying the envelope
//! fields (`id`, `kind`, `prax`, `praxVersion`), one array per record
//! section, and a keyed `documentation` object. [`to_bundle`] renders a
//! registry deterministically (sorted keys, id-sorted arrays, empty
//! sections omitted); [`from_bundle`] parses and rebuilds a registry
//! through its construction-time validation.
//!
//! The CLI and the HTTP service both depend on this crate, so a bundle
//! written by one tool reloads identically in the other.

pub mod deserialize;
pub mod serialize;

pub use deserialize::{from_bundle, InterchangeError, ModelBundle};
pub use serialize::to_bundle;
