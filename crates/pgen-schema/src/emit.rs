//! # Emitters
//!
//! An [`Emitter`] renders a [`CompiledModel`] for one target. Targets are
//! pluggable: firmware headers, documentation tables and UI resource files
//! each get their own emitter, and none of them feed back into the model.
//!
//! [`ManifestEmitter`] is the built-in target. It writes a JSON manifest
//! describing every parameter, category and override together with the
//! model digest, so downstream tooling can check which model a generated
//! artifact was rendered from.

use pgen_core::{CanonicalizationError, CompiledModel, ModelDigest, ModelSizing, ValueKind};
use serde::Serialize;
use thiserror::Error;

/// Error rendering a compiled model.
#[derive(Error, Debug)]
pub enum EmitError {
    /// The model could not be canonicalized for its digest.
    #[error("cannot digest compiled model: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The rendered output could not be serialized.
    #[error("cannot serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The model contains something the target cannot represent.
    #[error("unsupported by {target}: {reason}")]
    Unsupported {
        /// Emitter name.
        target: &'static str,
        /// What could not be rendered.
        reason: String,
    },
}

/// A code-generation target.
pub trait Emitter {
    /// Rendered artifact.
    type Output;

    /// Short target name used in logs and errors.
    fn target(&self) -> &'static str;

    /// Render the model.
    fn emit(&self, model: &CompiledModel) -> Result<Self::Output, EmitError>;
}

/// Renders a pretty-printed JSON manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestEmitter;

/// Top-level manifest document.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub digest: String,
    pub parameters: Vec<ManifestParameter<'a>>,
    pub categories: Vec<ManifestCategory<'a>>,
    pub overrides: Vec<ManifestOverride<'a>>,
    pub sizing: ModelSizing,
}

#[derive(Debug, Serialize)]
pub struct ManifestParameter<'a> {
    pub id: i32,
    pub name: &'a str,
    pub settings_key: &'a str,
    pub description: &'a str,
    /// Primitive name or enum type name.
    #[serde(rename = "type")]
    pub type_name: &'a str,
    pub unit: Option<&'a str>,
    pub access_level_id: i32,
    pub category_id: i32,
    pub min: i32,
    pub max: i32,
    pub exponent: i32,
    pub default: i32,
    /// Default rendered the way the runtime store renders it.
    pub default_display: String,
}

#[derive(Debug, Serialize)]
pub struct ManifestCategory<'a> {
    pub id: i32,
    pub name: &'a str,
    /// Parameter ids in listing order.
    pub members: Vec<i32>,
    /// `[access_level_id, visible_count]` pairs.
    pub visibility: Vec<(i32, usize)>,
}

#[derive(Debug, Serialize)]
pub struct ManifestOverride<'a> {
    pub machine_type: &'a str,
    pub code: i32,
    /// `[parameter_id, value]` pairs.
    pub values: Vec<(i32, i32)>,
}

impl ManifestEmitter {
    /// Build the manifest structure without serializing it.
    pub fn manifest<'a>(&self, model: &'a CompiledModel) -> Result<Manifest<'a>, EmitError> {
        let digest: ModelDigest = model.digest()?;

        let mut parameters = Vec::with_capacity(model.parameters.len());
        for p in &model.parameters {
            let type_name = match p.kind {
                ValueKind::Numeric(numeric) => numeric.type_name(),
                ValueKind::Enum { .. } => model
                    .enum_of(p)
                    .map(|e| e.name.as_str())
                    .ok_or_else(|| self.unsupported(format!("parameter {} has no enum", p.id)))?,
            };
            let default_display = model.render(p, p.default).ok_or_else(|| {
                self.unsupported(format!("default of parameter {} has no enum member", p.id))
            })?;
            parameters.push(ManifestParameter {
                id: p.id.get(),
                name: &p.name,
                settings_key: &p.settings_key,
                description: &p.description,
                type_name,
                unit: p.unit.as_deref(),
                access_level_id: p.access_level_id,
                category_id: p.category_id,
                min: p.min,
                max: p.max,
                exponent: p.exponent,
                default: p.default,
                default_display,
            });
        }

        let categories = model
            .categories
            .iter()
            .map(|c| ManifestCategory {
                id: c.id,
                name: &c.name,
                members: c
                    .members
                    .iter()
                    .filter_map(|i| model.parameter(*i))
                    .map(|p| p.id.get())
                    .collect(),
                visibility: c
                    .visibility
                    .iter()
                    .map(|v| (v.access_level_id, v.count))
                    .collect(),
            })
            .collect();

        let overrides = model
            .overrides
            .iter()
            .map(|o| ManifestOverride {
                machine_type: &o.machine_type,
                code: o.code,
                values: o.values.iter().map(|(id, v)| (id.get(), *v)).collect(),
            })
            .collect();

        Ok(Manifest {
            digest: digest.to_string(),
            parameters,
            categories,
            overrides,
            sizing: model.sizing,
        })
    }

    fn unsupported(&self, reason: String) -> EmitError {
        EmitError::Unsupported {
            target: self.target(),
            reason,
        }
    }
}

impl Emitter for ManifestEmitter {
    type Output = String;

    fn target(&self) -> &'static str {
        "manifest"
    }

    fn emit(&self, model: &CompiledModel) -> Result<String, EmitError> {
        let manifest = self.manifest(model)?;
        let mut out = serde_json::to_string_pretty(&manifest)?;
        out.push('\n');
        tracing::debug!(
            target_name = self.target(),
            digest = %manifest.digest,
            bytes = out.len(),
            "manifest emitted"
        );
        Ok(out)
    }
}
