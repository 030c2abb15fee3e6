//! # Compiled Model
//!
//! The deterministic, indexed representation of a validated schema. It is
//! the only input emitters and the runtime parameter store need.
//!
//! ## Invariants
//!
//! - `parameters[i].index == ParameterIndex(i)`; indices follow schema
//!   declaration order.
//! - `categories` are ordered alphabetically by display name and
//!   `categories[i].index == i`.
//! - Each category's `members` are ordered alphabetically by parameter
//!   display name (byte-wise, case-sensitive; ties keep declaration order).
//! - Each category's `visibility` has one entry per access level in
//!   ascending id order; counts are non-decreasing and the last one equals
//!   `members.len()`.
//! - `min < max` for every parameter, and `default` lies in `[min, max]`.
//!
//! The builder in `pgen-schema` upholds these; nothing in this module
//! re-checks them.

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ModelDigest};
use crate::error::CanonicalizationError;
use crate::format::format_scaled;
use crate::identity::{ParameterId, ParameterIndex};
use crate::schema::{AccessLevel, EnumType, MachineTypeOverride, NumericType};

/// How a stored value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// A plain number of the given primitive.
    Numeric(NumericType),
    /// A member of `CompiledModel::enums[enum_index]`.
    Enum { enum_index: usize },
}

/// One parameter with its resolved metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledParameter {
    pub index: ParameterIndex,
    pub id: ParameterId,
    pub name: String,
    /// `parameters/<CamelCaseName>`.
    pub settings_key: String,
    pub description: String,
    pub kind: ValueKind,
    pub category_id: i32,
    pub access_level_id: i32,
    pub unit: Option<String>,
    pub min: i32,
    pub max: i32,
    pub exponent: i32,
    /// Production default.
    pub default: i32,
}

impl CompiledParameter {
    /// Whether `value` lies inside `[min, max]`.
    pub fn accepts(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Whether the parameter is enum-typed.
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ValueKind::Enum { .. })
    }
}

/// Number of category members visible at one access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityCount {
    pub access_level_id: i32,
    pub count: usize,
}

/// Members visible at `access_level_id` given a category's visibility
/// table (ascending by access level id).
///
/// Levels between declared ids see as much as the nearest declared level
/// below them; levels below every declared id see nothing.
pub fn visible_count(visibility: &[VisibilityCount], access_level_id: i32) -> usize {
    visibility
        .iter()
        .take_while(|v| v.access_level_id <= access_level_id)
        .last()
        .map_or(0, |v| v.count)
}

/// A category with its alphabetically ordered members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCategory {
    /// Position in the alphabetical category listing.
    pub index: usize,
    pub id: i32,
    pub name: String,
    /// Parameter indices sorted by parameter display name.
    pub members: Vec<ParameterIndex>,
    /// One entry per access level, ascending by id.
    pub visibility: Vec<VisibilityCount>,
}

impl CompiledCategory {
    /// Number of members visible at `access_level_id`. See
    /// [`visible_count`].
    pub fn visible_count(&self, access_level_id: i32) -> usize {
        visible_count(&self.visibility, access_level_id)
    }
}

/// Capacity metadata for fixed-size emission targets. Not used by runtime
/// logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSizing {
    pub max_name_len: usize,
    pub max_description_len: usize,
    pub max_category_name_len: usize,
    pub max_value_string_len: usize,
    pub max_params_in_category: usize,
}

/// The output of the model builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledModel {
    pub parameters: Vec<CompiledParameter>,
    pub categories: Vec<CompiledCategory>,
    /// Ascending by id.
    pub access_levels: Vec<AccessLevel>,
    pub enums: Vec<EnumType>,
    pub overrides: Vec<MachineTypeOverride>,
    pub sizing: ModelSizing,
}

impl CompiledModel {
    /// Look up a parameter by its schema id.
    pub fn parameter_by_id(&self, id: ParameterId) -> Option<&CompiledParameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    /// Look up a parameter by compiled index.
    pub fn parameter(&self, index: ParameterIndex) -> Option<&CompiledParameter> {
        self.parameters.get(index.get())
    }

    /// The enum backing an enum-typed parameter.
    pub fn enum_of(&self, parameter: &CompiledParameter) -> Option<&EnumType> {
        match parameter.kind {
            ValueKind::Enum { enum_index } => self.enums.get(enum_index),
            ValueKind::Numeric(_) => None,
        }
    }

    /// The override declared for a machine-type code.
    pub fn override_for(&self, machine_type: i32) -> Option<&MachineTypeOverride> {
        self.overrides.iter().find(|o| o.code == machine_type)
    }

    /// Render `value` the way the runtime store does: the member name for
    /// enum parameters, the scaled decimal otherwise.
    ///
    /// Returns `None` only for an enum value with no member, which cannot
    /// happen for values inside `[min, max]`.
    pub fn render(&self, parameter: &CompiledParameter, value: i32) -> Option<String> {
        match self.enum_of(parameter) {
            Some(e) => e.member_by_value(value).map(|m| m.name.clone()),
            None => Some(format_scaled(value, parameter.exponent)),
        }
    }

    /// Canonical (JCS) serialization of the model.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(self)
    }

    /// SHA-256 digest of the canonical serialization. Two compilations of
    /// the same schema produce the same digest.
    pub fn digest(&self) -> Result<ModelDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }
}
