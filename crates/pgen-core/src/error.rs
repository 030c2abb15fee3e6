//! # Error Types
//!
//! Defines the compile-time error taxonomy. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every `SchemaError` names the entity kind, the entity (by name or id as
//!   authored), the attribute involved, and the violated constraint.
//! - Schema errors are values. The validator stops at the first one; the
//!   caller decides whether that aborts code generation (it conventionally
//!   does).
//! - Runtime store errors live in `pgen-store`; they are a disjoint taxonomy.

use thiserror::Error;

/// The schema record kinds, named as they appear in a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `AccessLevel{Name, Id}`
    AccessLevel,
    /// `Category{Name, Id}`
    Category,
    /// `Unit{Name, Id}`
    Unit,
    /// `Enum{Name}`
    Enum,
    /// `EnumValue{Name, Value}` inside an `Enum`.
    EnumValue,
    /// `Parameter{...}`
    Parameter,
    /// `DefaultOverride{MachineType}`
    DefaultOverride,
    /// `DefaultValue{ParameterId, Value}` inside a `DefaultOverride`.
    DefaultValue,
}

impl EntityKind {
    /// Returns the record name used in schema documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessLevel => "AccessLevel",
            Self::Category => "Category",
            Self::Unit => "Unit",
            Self::Enum => "Enum",
            Self::EnumValue => "EnumValue",
            Self::Parameter => "Parameter",
            Self::DefaultOverride => "DefaultOverride",
            Self::DefaultValue => "DefaultValue",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema invariant violation found by the validator.
///
/// `entity` is a human-readable handle for the offending record as the
/// author wrote it, e.g. `Parameter with Id "3"` or `Category "Motion"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two records of the same kind share a name or id.
    #[error("duplicate attribute {attribute} for {kind}: \"{value}\"")]
    Duplicate {
        /// Record kind.
        kind: EntityKind,
        /// The attribute that must be unique (`Name`, `Id`, ...).
        attribute: &'static str,
        /// The repeated value.
        value: String,
    },

    /// Two members of one enum share a name or value.
    #[error("duplicate attribute {attribute} for EnumValue in Enum \"{enum_name}\": \"{value}\"")]
    DuplicateEnumMember {
        /// The enum containing the duplicate.
        enum_name: String,
        /// `Name` or `Value`.
        attribute: &'static str,
        /// The repeated value.
        value: String,
    },

    /// A required attribute is absent.
    #[error("missing attribute {attribute} for {entity}")]
    MissingAttribute {
        /// Record kind.
        kind: EntityKind,
        /// The offending record.
        entity: String,
        /// The missing attribute.
        attribute: &'static str,
    },

    /// The `{Unit, Min, Max, Exponent}` attribute group is incomplete or
    /// present where it is not allowed.
    #[error("invalid attribute combination for Parameter with Id \"{parameter}\": {reason}")]
    InvalidAttributeGroup {
        /// Parameter id as authored.
        parameter: String,
        /// What is wrong with the combination.
        reason: String,
    },

    /// An attribute that must be a base-10 integer is not.
    #[error("attribute {attribute} (\"{value}\") must be an integer ({entity})")]
    InvalidInteger {
        /// Record kind.
        kind: EntityKind,
        /// The offending record.
        entity: String,
        /// The attribute being parsed.
        attribute: &'static str,
        /// The literal that failed to parse.
        value: String,
    },

    /// A reference names a record that is not declared.
    #[error("unknown {target} \"{value}\" referenced by attribute {attribute} of {entity}")]
    UnknownReference {
        /// Record kind of the referrer.
        kind: EntityKind,
        /// The referring record.
        entity: String,
        /// The referencing attribute.
        attribute: &'static str,
        /// What kind of record was expected.
        target: &'static str,
        /// The unresolved value.
        value: String,
    },

    /// A parameter `Type` is neither a numeric primitive nor a declared enum.
    #[error("unknown Type \"{type_name}\" for Parameter with Id \"{parameter}\"")]
    UnknownType {
        /// Parameter id as authored.
        parameter: String,
        /// The unresolved type name.
        type_name: String,
    },

    /// A category has no member parameters.
    #[error("Category \"{category}\" has no parameters")]
    EmptyCategory {
        /// The empty category.
        category: String,
    },

    /// The reserved id 0 is used by a parameter not named "Machine type".
    #[error("Parameter Id 0 is reserved for \"Machine type\", found \"{name}\"")]
    ReservedId {
        /// The name found on parameter 0.
        name: String,
    },

    /// `Max` is not strictly larger than `Min`.
    #[error("attribute Max ({max}) must be larger than Min ({min}) (Parameter with Id \"{parameter}\")")]
    InvalidRange {
        /// Parameter id as authored.
        parameter: String,
        /// Parsed minimum.
        min: i64,
        /// Parsed maximum.
        max: i64,
    },

    /// `Min` or `Max` does not fit the numeric primitive type.
    #[error("range [{min}, {max}] does not fit Type \"{type_name}\" (Parameter with Id \"{parameter}\")")]
    RangeExceedsType {
        /// Parameter id as authored.
        parameter: String,
        /// The numeric primitive.
        type_name: &'static str,
        /// Parsed minimum.
        min: i64,
        /// Parsed maximum.
        max: i64,
    },

    /// `Exponent` is outside the supported display scaling range.
    #[error("attribute Exponent ({exponent}) must be within -{limit}..={limit} (Parameter with Id \"{parameter}\")")]
    ExponentOutOfRange {
        /// Parameter id as authored.
        parameter: String,
        /// Parsed exponent.
        exponent: i64,
        /// The supported magnitude.
        limit: i32,
    },

    /// Enum member values are not exactly `0..N`.
    #[error("values of Enum \"{enum_name}\" must be 0..{count} without gaps, found {value}")]
    NonContiguousEnum {
        /// The enum.
        enum_name: String,
        /// Member count.
        count: usize,
        /// A value outside `0..count`.
        value: i64,
    },

    /// A default or override value is not a legal value of the parameter.
    #[error("{attribute} \"{value}\" is not a legal value for Parameter with Id \"{parameter}\": {reason}")]
    InvalidValue {
        /// Parameter id as authored.
        parameter: String,
        /// `Default` or `Value`.
        attribute: &'static str,
        /// The literal.
        value: String,
        /// Why it is illegal.
        reason: String,
    },

    /// Overrides exist but no `machine_type_t` enum is declared.
    #[error("DefaultOverride requires an Enum named \"machine_type_t\"")]
    MissingMachineTypeEnum,
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_names_match_document_records() {
        assert_eq!(EntityKind::AccessLevel.to_string(), "AccessLevel");
        assert_eq!(EntityKind::DefaultValue.to_string(), "DefaultValue");
        assert_eq!(EntityKind::EnumValue.as_str(), "EnumValue");
    }

    #[test]
    fn test_duplicate_display() {
        let err = SchemaError::Duplicate {
            kind: EntityKind::Category,
            attribute: "Name",
            value: "Motion".into(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate attribute Name for Category: \"Motion\""
        );
    }

    #[test]
    fn test_empty_category_names_category() {
        let err = SchemaError::EmptyCategory {
            category: "Heating".into(),
        };
        assert!(err.to_string().contains("\"Heating\""));
    }

    #[test]
    fn test_unknown_reference_display() {
        let err = SchemaError::UnknownReference {
            kind: EntityKind::Parameter,
            entity: "Parameter with Id \"4\"".into(),
            attribute: "Category",
            target: "Category",
            value: "Nope".into(),
        };
        let s = err.to_string();
        assert!(s.contains("unknown Category \"Nope\""));
        assert!(s.contains("Parameter with Id \"4\""));
    }
}
