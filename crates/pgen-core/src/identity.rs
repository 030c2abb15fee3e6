//! # Parameter Identity Newtypes
//!
//! A parameter has two integer handles: the `Id` chosen by the schema author
//! (stable across firmware releases, used by callers and persistence) and the
//! compiled index (its position in declaration order, used for dense array
//! storage). These newtypes keep the two namespaces apart.

use serde::{Deserialize, Serialize};

/// The id reserved for the machine-type parameter.
pub const MACHINE_TYPE_ID: ParameterId = ParameterId(0);

/// The display name the reserved id must carry.
pub const MACHINE_TYPE_NAME: &str = "Machine type";

/// User-chosen parameter identifier from the schema `Id` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParameterId(pub i32);

/// Dense position of a parameter in the compiled model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParameterIndex(pub usize);

impl ParameterId {
    /// Access the raw id.
    pub fn get(self) -> i32 {
        self.0
    }

    /// Whether this is the reserved machine-type id.
    pub fn is_machine_type(self) -> bool {
        self == MACHINE_TYPE_ID
    }
}

impl ParameterIndex {
    /// Access the raw index.
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ParameterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ParameterIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i32> for ParameterId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}
