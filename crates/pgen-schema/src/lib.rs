//! # pgen-schema: Schema Validation & Model Compilation
//!
//! Reads parameter schema documents, enforces every schema invariant and
//! builds the deterministic [`CompiledModel`] that emitters and the runtime
//! store consume.
//!
//! ## Pipeline
//!
//! ```text
//! SchemaDocument ──validate──▶ Schema ──build──▶ CompiledModel ──Emitter──▶ output
//! ```
//!
//! - [`document`]: serde loading of the raw attribute tree (YAML/JSON).
//! - [`validate`](mod@validate): fail-fast invariant checks, first violation
//!   wins.
//! - [`compile`](mod@compile): indices, alphabetical listings, visibility
//!   counts, sizing.
//! - [`emit`]: the [`Emitter`] trait and the JSON [`ManifestEmitter`].
//!
//! ## Crate Policy
//!
//! - Depends only on `pgen-core` internally.
//! - A schema error aborts compilation; no partial model is produced.

pub mod compile;
pub mod document;
pub mod emit;
pub mod validate;

pub use compile::build;
pub use document::{DocumentError, SchemaDocument};
pub use emit::{EmitError, Emitter, Manifest, ManifestEmitter};
pub use validate::validate;

use pgen_core::{CompiledModel, SchemaError};

/// Validate a document and build its compiled model.
///
/// # Errors
///
/// Returns the first [`SchemaError`] the validator finds.
pub fn compile(document: &SchemaDocument) -> Result<CompiledModel, SchemaError> {
    let schema = validate(document)?;
    build(&schema)
}
