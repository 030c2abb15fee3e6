//! # Schema Documents
//!
//! The raw attribute tree a schema author writes. Every attribute is kept as
//! an optional string exactly as authored; nothing is parsed or checked here
//! beyond the document shape. The validator turns a [`SchemaDocument`] into
//! a typed [`Schema`](pgen_core::Schema) or reports the first violation.
//!
//! ## Encoding
//!
//! Documents are read with serde from YAML (`.yaml`/`.yml`) or JSON (any
//! other extension). Record and attribute names follow the schema record
//! kinds:
//!
//! ```yaml
//! AccessLevels: [{ Name: Operator, Id: 0 }]
//! Categories:   [{ Name: Motion, Id: 0 }]
//! Units:        [{ Name: rpm, Id: 0 }]
//! Enums:
//!   - Name: machine_type_t
//!     Values: [{ Name: Standard, Value: 0 }, { Name: Compact, Value: 1 }]
//! Parameters:
//!   - { Id: 1, Name: Speed, Description: Spindle speed, Type: int16_t,
//!       Category: Motion, AccessLevel: Operator, Default: 10,
//!       Unit: rpm, Min: 0, Max: 100, Exponent: 0 }
//! DefaultOverrides:
//!   - MachineType: Compact
//!     Values: [{ ParameterId: 1, Value: 50 }]
//! ```
//!
//! Scalars may be written as strings, integers or booleans; they are
//! normalised to their string form. Unknown attributes are rejected at load
//! time so a misspelt `Exponnet` cannot silently disappear.

use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Error reading or parsing a schema document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("cannot read schema document '{path}': {source}")]
    Io {
        /// Path to the document.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed YAML/JSON or has the wrong shape.
    #[error("invalid schema document '{path}': {reason}")]
    Parse {
        /// Path to the document, or `<inline>`.
        path: String,
        /// Parser message.
        reason: String,
    },
}

/// `AccessLevel`, `Category` and `Unit` records share this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedRecord {
    #[serde(rename = "Name", default, deserialize_with = "attribute")]
    pub name: Option<String>,
    #[serde(rename = "Id", default, deserialize_with = "attribute")]
    pub id: Option<String>,
}

/// `EnumValue{Name, Value}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumValueRecord {
    #[serde(rename = "Name", default, deserialize_with = "attribute")]
    pub name: Option<String>,
    #[serde(rename = "Value", default, deserialize_with = "attribute")]
    pub value: Option<String>,
}

/// `Enum{Name}` with its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumRecord {
    #[serde(rename = "Name", default, deserialize_with = "attribute")]
    pub name: Option<String>,
    #[serde(rename = "Values", default)]
    pub values: Vec<EnumValueRecord>,
}

/// `Parameter{Id, Name, Description, Type, Category, AccessLevel, Default,
/// [Unit, Min, Max, Exponent]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterRecord {
    #[serde(rename = "Id", default, deserialize_with = "attribute")]
    pub id: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "attribute")]
    pub name: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "attribute")]
    pub description: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "attribute")]
    pub ty: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "attribute")]
    pub category: Option<String>,
    #[serde(rename = "AccessLevel", default, deserialize_with = "attribute")]
    pub access_level: Option<String>,
    #[serde(rename = "Default", default, deserialize_with = "attribute")]
    pub default: Option<String>,
    #[serde(rename = "Unit", default, deserialize_with = "attribute")]
    pub unit: Option<String>,
    #[serde(rename = "Min", default, deserialize_with = "attribute")]
    pub min: Option<String>,
    #[serde(rename = "Max", default, deserialize_with = "attribute")]
    pub max: Option<String>,
    #[serde(rename = "Exponent", default, deserialize_with = "attribute")]
    pub exponent: Option<String>,
}

/// `DefaultValue{ParameterId, Value}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultValueRecord {
    #[serde(rename = "ParameterId", default, deserialize_with = "attribute")]
    pub parameter_id: Option<String>,
    #[serde(rename = "Value", default, deserialize_with = "attribute")]
    pub value: Option<String>,
}

/// `DefaultOverride{MachineType}` with its substitutions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideRecord {
    #[serde(rename = "MachineType", default, deserialize_with = "attribute")]
    pub machine_type: Option<String>,
    #[serde(rename = "Values", default)]
    pub values: Vec<DefaultValueRecord>,
}

/// A complete, unvalidated schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    #[serde(rename = "AccessLevels", default)]
    pub access_levels: Vec<NamedRecord>,
    #[serde(rename = "Categories", default)]
    pub categories: Vec<NamedRecord>,
    #[serde(rename = "Units", default)]
    pub units: Vec<NamedRecord>,
    #[serde(rename = "Enums", default)]
    pub enums: Vec<EnumRecord>,
    #[serde(rename = "Parameters", default)]
    pub parameters: Vec<ParameterRecord>,
    #[serde(rename = "DefaultOverrides", default)]
    pub default_overrides: Vec<OverrideRecord>,
}

const INLINE: &str = "<inline>";

impl SchemaDocument {
    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, DocumentError> {
        parse_yaml(content, INLINE)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, DocumentError> {
        parse_json(content, INLINE)
    }

    /// Load a document from disk, choosing the format by file extension.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Io` if the file cannot be read and
    /// `DocumentError::Parse` if it is not a well-formed schema document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Io {
            path: display.clone(),
            source: e,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => parse_yaml(&content, &display),
            _ => parse_json(&content, &display),
        }
    }
}

fn parse_yaml(content: &str, path: &str) -> Result<SchemaDocument, DocumentError> {
    serde_yaml::from_str(content).map_err(|e| DocumentError::Parse {
        path: path.to_string(),
        reason: format!("invalid YAML: {e}"),
    })
}

fn parse_json(content: &str, path: &str) -> Result<SchemaDocument, DocumentError> {
    serde_json::from_str(content).map_err(|e| DocumentError::Parse {
        path: path.to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Accept any scalar and keep its string form.
fn attribute<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "attribute values must be scalars, found {other}"
        ))),
    }
}
