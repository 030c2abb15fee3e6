//! # pgen-store: Runtime Parameter Store
//!
//! Holds the live values of every parameter in a compiled model and offers
//! bounded access to them:
//!
//! - [`ParameterStore::get`] / [`set`](ParameterStore::set) with range
//!   checking, [`incr`](ParameterStore::incr) / [`decr`](ParameterStore::decr)
//!   with wraparound.
//! - Display rendering through the same formatting path the model builder
//!   sizes buffers with.
//! - Alphabetical category listings and access-scoped walks.
//! - Machine-type aware default loading and persistence through a
//!   [`SettingsBackend`].
//!
//! The store is an explicit value, shared with `Arc<ParameterStore>`; there
//! is no process-wide instance.
//!
//! ## Crate Policy
//!
//! - Depends only on `pgen-core` internally.
//! - One lock per store; callbacks never run under it.

pub mod category;
pub mod error;
pub mod settings;
pub mod store;

pub use category::CategoryView;
pub use error::{Lookup, SettingsError, StoreError};
pub use settings::{decode_value, encode_value, MemorySettings, SettingsBackend};
pub use store::{DefaultsOutcome, ExportReport, ParameterInfo, ParameterStore, RestoreReport};
