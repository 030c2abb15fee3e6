//! # pgen-core: Foundational Types for the Parameter Compiler
//!
//! This crate is the leaf of the pgen workspace. It defines the data that
//! flows between the schema validator, the model builder and the runtime
//! parameter store. Every other crate in the workspace depends on
//! `pgen-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Two models, two trust levels.** [`schema::Schema`] is a validated,
//!    typed copy of the author's schema. [`compiled::CompiledModel`] is the
//!    indexed, sorted representation consumed by emitters and the runtime
//!    store. Neither can be produced from raw attribute strings without
//!    passing through the validator in `pgen-schema`.
//!
//! 2. **`ParameterId` is not an index.** The user-chosen id is the external
//!    addressing key; the compiled index is the dense-array key. Both are
//!    distinct types so they cannot be swapped by accident.
//!
//! 3. **One formatting path.** Display strings for parameter values are
//!    produced only by [`format::format_scaled`], which is exact integer
//!    arithmetic. The model builder sizes buffers with the same function the
//!    runtime uses to render.
//!
//! 4. **Determinism is checkable.** [`CompiledModel::digest`] hashes the JCS
//!    canonical serialization of the model, so two compilations of the same
//!    schema can be compared byte for byte.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pgen-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public model types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod canonical;
pub mod compiled;
pub mod digest;
pub mod error;
pub mod format;
pub mod identity;
pub mod naming;
pub mod schema;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use compiled::{
    visible_count, CompiledCategory, CompiledModel, CompiledParameter, ModelSizing, ValueKind,
    VisibilityCount,
};
pub use digest::{sha256_digest, ModelDigest};
pub use error::{CanonicalizationError, EntityKind, SchemaError};
pub use format::{format_scaled, MAX_EXPONENT};
pub use identity::{ParameterId, ParameterIndex, MACHINE_TYPE_ID, MACHINE_TYPE_NAME};
pub use naming::{settings_key, to_camel_case, SETTINGS_PREFIX};
pub use schema::{
    AccessLevel, Category, EnumMember, EnumType, MachineTypeOverride, NumericType, Parameter,
    ParameterType, Schema, Unit, MACHINE_TYPE_ENUM,
};
