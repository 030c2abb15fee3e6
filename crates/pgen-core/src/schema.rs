//! # Validated Schema Model
//!
//! Typed records produced by the validator in `pgen-schema`. Once a
//! [`Schema`] exists, every invariant of the parameter schema holds:
//! names and ids are unique, references resolve, ranges are well-formed,
//! and defaults lie inside their ranges. The model builder relies on this
//! and performs no checks of its own.
//!
//! Declaration order is preserved in every collection. It determines the
//! compiled parameter index.

use serde::{Deserialize, Serialize};

use crate::identity::ParameterId;

/// Name of the enum that enumerates machine types for default overrides.
pub const MACHINE_TYPE_ENUM: &str = "machine_type_t";

/// An ordered privilege tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLevel {
    pub name: String,
    pub id: i32,
}

/// A named grouping of parameters for UI listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub id: i32,
}

/// A display unit. Purely descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub id: i32,
}

/// One named value of an [`EnumType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i32,
}

/// A closed set of named integer values, `0..N` without gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
}

impl EnumType {
    /// Look up the member carrying `value`.
    pub fn member_by_value(&self, value: i32) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.value == value)
    }

    /// Look up a member by name.
    pub fn member_by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Largest legal value (`N - 1`).
    pub fn max_value(&self) -> i32 {
        self.members.len() as i32 - 1
    }
}

/// Numeric storage primitives a parameter may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericType {
    #[serde(rename = "uint8_t")]
    U8,
    #[serde(rename = "uint16_t")]
    U16,
    #[serde(rename = "int8_t")]
    I8,
    #[serde(rename = "int16_t")]
    I16,
    #[serde(rename = "int32_t")]
    I32,
}

impl NumericType {
    /// All primitives, in the order they are documented.
    pub const ALL: [NumericType; 5] = [Self::U8, Self::U16, Self::I8, Self::I16, Self::I32];

    /// Parse a schema `Type` attribute.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.type_name() == name)
    }

    /// The `Type` attribute spelling.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::U8 => "uint8_t",
            Self::U16 => "uint16_t",
            Self::I8 => "int8_t",
            Self::I16 => "int16_t",
            Self::I32 => "int32_t",
        }
    }

    /// Inclusive range representable by the primitive.
    pub fn bounds(&self) -> (i64, i64) {
        match self {
            Self::U8 => (0, u8::MAX as i64),
            Self::U16 => (0, u16::MAX as i64),
            Self::I8 => (i8::MIN as i64, i8::MAX as i64),
            Self::I16 => (i16::MIN as i64, i16::MAX as i64),
            Self::I32 => (i32::MIN as i64, i32::MAX as i64),
        }
    }
}

impl std::fmt::Display for NumericType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// The resolved `Type` attribute of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    Numeric(NumericType),
    /// Name of a declared [`EnumType`].
    Enum(String),
}

impl ParameterType {
    /// Whether the parameter is enum-typed.
    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }
}

/// A validated parameter.
///
/// `min`, `max` and `exponent` are the effective values: for enum types they
/// are `0`, `N - 1` and `0` regardless of what the document declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: ParameterId,
    pub name: String,
    pub description: String,
    pub ty: ParameterType,
    /// Name of the owning [`Category`].
    pub category: String,
    /// Name of the [`AccessLevel`].
    pub access_level: String,
    /// Name of the [`Unit`], if any.
    pub unit: Option<String>,
    pub min: i32,
    pub max: i32,
    pub exponent: i32,
    /// Production default.
    pub default: i32,
}

/// Default substitutions applied when booting a particular machine type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineTypeOverride {
    /// Member name in `machine_type_t`.
    pub machine_type: String,
    /// Member value in `machine_type_t`; compared against the machine-type
    /// parameter at runtime.
    pub code: i32,
    /// Substituted defaults in declaration order.
    pub values: Vec<(ParameterId, i32)>,
}

/// A schema that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub access_levels: Vec<AccessLevel>,
    pub categories: Vec<Category>,
    pub units: Vec<Unit>,
    pub enums: Vec<EnumType>,
    pub parameters: Vec<Parameter>,
    pub overrides: Vec<MachineTypeOverride>,
}

impl Schema {
    /// Look up an enum by name.
    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Look up an access level by name.
    pub fn access_level(&self, name: &str) -> Option<&AccessLevel> {
        self.access_levels.iter().find(|a| a.name == name)
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}
