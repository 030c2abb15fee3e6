//! # Store Errors
//!
//! Runtime failures of the parameter store and its settings backend. They
//! are disjoint from the compile-time `SchemaError` taxonomy in `pgen-core`.

use pgen_core::ParameterId;
use thiserror::Error;

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A parameter by schema id.
    Parameter(ParameterId),
    /// A category by listing index.
    Category(usize),
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parameter(id) => write!(f, "parameter {id}"),
            Self::Category(index) => write!(f, "category #{index}"),
        }
    }
}

/// Error reported by a [`SettingsBackend`](crate::settings::SettingsBackend).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The backing medium cannot be reached.
    #[error("settings backend unavailable: {0}")]
    Unavailable(String),

    /// Reading the subtree failed.
    #[error("cannot read settings under '{prefix}': {reason}")]
    ReadFailed { prefix: String, reason: String },

    /// Writing one key failed.
    #[error("cannot write settings key '{key}': {reason}")]
    WriteFailed { key: String, reason: String },
}

/// Error returned by [`ParameterStore`](crate::store::ParameterStore)
/// operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unknown parameter id or category index. Nothing was modified.
    #[error("{0} not found")]
    NotFound(Lookup),

    /// The value lies outside the parameter's `[min, max]`. The stored
    /// value is unchanged.
    #[error("value {value} out of range [{min}, {max}] for parameter {id}")]
    OutOfRange {
        id: ParameterId,
        value: i32,
        min: i32,
        max: i32,
    },

    /// The settings backend failed. `key` is the parameter's settings key,
    /// or the settings prefix when a whole restore failed.
    #[error("storage failure at '{key}': {source}")]
    StorageFailure {
        /// Failing parameter, if the failure concerns one.
        parameter: Option<ParameterId>,
        key: String,
        #[source]
        source: SettingsError,
    },
}

impl StoreError {
    pub(crate) fn parameter_not_found(id: ParameterId) -> Self {
        Self::NotFound(Lookup::Parameter(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::parameter_not_found(ParameterId(42));
        assert_eq!(err.to_string(), "parameter 42 not found");
        let err = StoreError::NotFound(Lookup::Category(3));
        assert_eq!(err.to_string(), "category #3 not found");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = StoreError::OutOfRange {
            id: ParameterId(1),
            value: 150,
            min: 0,
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "value 150 out of range [0, 100] for parameter 1"
        );
    }

    #[test]
    fn test_storage_failure_keeps_source() {
        use std::error::Error as _;
        let err = StoreError::StorageFailure {
            parameter: Some(ParameterId(1)),
            key: "parameters/Speed".into(),
            source: SettingsError::WriteFailed {
                key: "parameters/Speed".into(),
                reason: "flash full".into(),
            },
        };
        assert!(err.to_string().contains("parameters/Speed"));
        assert!(err.source().unwrap().to_string().contains("flash full"));
    }
}
