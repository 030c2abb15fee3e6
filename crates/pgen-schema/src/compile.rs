//! # Model Builder
//!
//! Turns a validated [`Schema`] into a [`CompiledModel`]:
//!
//! - parameters keep declaration order and get dense indices;
//! - categories are sorted by display name, members by parameter name
//!   (byte-wise, ties keep declaration order);
//! - every category gets one visibility count per access level, ascending by
//!   access level id;
//! - sizing metadata records the longest name, description, category name
//!   and rendered value, and the largest category.
//!
//! The output depends only on the schema contents, so compiling the same
//! schema twice produces models with equal [`CompiledModel::digest`]s.

use std::collections::HashMap;

use pgen_core::format::max_rendered_len;
use pgen_core::{
    settings_key, CompiledCategory, CompiledModel, CompiledParameter, EntityKind, EnumType,
    ModelSizing, ParameterIndex, ParameterType, Schema, SchemaError, ValueKind, VisibilityCount,
};
use tracing::info;

/// Build the compiled model for a validated schema.
///
/// # Errors
///
/// A schema produced by [`validate`](crate::validate::validate) always
/// builds. Hand-assembled schemas whose parameters reference undeclared
/// categories, access levels or enums are rejected with
/// `SchemaError::UnknownReference`.
pub fn build(schema: &Schema) -> Result<CompiledModel, SchemaError> {
    let category_ids: HashMap<&str, i32> = schema
        .categories
        .iter()
        .map(|c| (c.name.as_str(), c.id))
        .collect();
    let access_level_ids: HashMap<&str, i32> = schema
        .access_levels
        .iter()
        .map(|a| (a.name.as_str(), a.id))
        .collect();
    let enum_indices: HashMap<&str, usize> = schema
        .enums
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name.as_str(), i))
        .collect();

    let mut parameters = Vec::with_capacity(schema.parameters.len());
    for (index, p) in schema.parameters.iter().enumerate() {
        let unresolved = |attribute: &'static str, target: &'static str, value: &str| {
            SchemaError::UnknownReference {
                kind: EntityKind::Parameter,
                entity: format!("Parameter with Id \"{}\"", p.id),
                attribute,
                target,
                value: value.to_string(),
            }
        };
        let kind = match &p.ty {
            ParameterType::Numeric(numeric) => ValueKind::Numeric(*numeric),
            ParameterType::Enum(name) => ValueKind::Enum {
                enum_index: *enum_indices
                    .get(name.as_str())
                    .ok_or_else(|| unresolved("Type", "Enum", name))?,
            },
        };
        let category_id = *category_ids
            .get(p.category.as_str())
            .ok_or_else(|| unresolved("Category", "Category", &p.category))?;
        let access_level_id = *access_level_ids
            .get(p.access_level.as_str())
            .ok_or_else(|| unresolved("AccessLevel", "AccessLevel", &p.access_level))?;

        parameters.push(CompiledParameter {
            index: ParameterIndex(index),
            id: p.id,
            name: p.name.clone(),
            settings_key: settings_key(&p.name),
            description: p.description.clone(),
            kind,
            category_id,
            access_level_id,
            unit: p.unit.clone(),
            min: p.min,
            max: p.max,
            exponent: p.exponent,
            default: p.default,
        });
    }

    let mut access_levels = schema.access_levels.clone();
    access_levels.sort_by_key(|a| a.id);

    let categories = categories(schema, &parameters, &access_levels);
    let sizing = sizing(&parameters, &categories, &schema.enums);

    let model = CompiledModel {
        parameters,
        categories,
        access_levels,
        enums: schema.enums.clone(),
        overrides: schema.overrides.clone(),
        sizing,
    };

    info!(
        parameters = model.parameters.len(),
        categories = model.categories.len(),
        overrides = model.overrides.len(),
        "model compiled"
    );
    Ok(model)
}

fn categories(
    schema: &Schema,
    parameters: &[CompiledParameter],
    access_levels: &[pgen_core::AccessLevel],
) -> Vec<CompiledCategory> {
    let mut sorted: Vec<_> = schema.categories.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, category)| {
            let mut members: Vec<&CompiledParameter> = parameters
                .iter()
                .filter(|p| p.category_id == category.id)
                .collect();
            // Stable: equal names keep declaration order.
            members.sort_by(|a, b| a.name.cmp(&b.name));

            let visibility = access_levels
                .iter()
                .map(|level| VisibilityCount {
                    access_level_id: level.id,
                    count: members
                        .iter()
                        .filter(|p| p.access_level_id <= level.id)
                        .count(),
                })
                .collect();

            CompiledCategory {
                index,
                id: category.id,
                name: category.name.clone(),
                members: members.iter().map(|p| p.index).collect(),
                visibility,
            }
        })
        .collect()
}

fn sizing(
    parameters: &[CompiledParameter],
    categories: &[CompiledCategory],
    enums: &[EnumType],
) -> ModelSizing {
    let value_len = |p: &CompiledParameter| match p.kind {
        ValueKind::Enum { enum_index } => enums
            .get(enum_index)
            .and_then(|e| e.members.iter().map(|m| m.name.len()).max())
            .unwrap_or(0),
        ValueKind::Numeric(_) => max_rendered_len(p.min, p.max, p.exponent),
    };

    ModelSizing {
        max_name_len: parameters.iter().map(|p| p.name.len()).max().unwrap_or(0),
        max_description_len: parameters
            .iter()
            .map(|p| p.description.len())
            .max()
            .unwrap_or(0),
        max_category_name_len: categories.iter().map(|c| c.name.len()).max().unwrap_or(0),
        max_value_string_len: parameters.iter().map(value_len).max().unwrap_or(0),
        max_params_in_category: categories
            .iter()
            .map(|c| c.members.len())
            .max()
            .unwrap_or(0),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use pgen_core::{AccessLevel, Category, NumericType, Parameter, ParameterId};
    use proptest::prelude::*;

    /// Schemas with one category, a handful of access levels and
    /// arbitrarily named parameters spread across them.
    fn schema_strategy() -> impl Strategy<Value = Schema> {
        (
            prop::collection::btree_set(-5i32..20, 1..5),
            prop::collection::vec(("[A-Za-z ]{1,8}", 0usize..8), 1..24),
        )
            .prop_map(|(level_ids, params)| {
                let access_levels: Vec<AccessLevel> = level_ids
                    .iter()
                    .rev()
                    .map(|id| AccessLevel { name: format!("L{id}"), id: *id })
                    .collect();
                let parameters = params
                    .into_iter()
                    .enumerate()
                    .map(|(i, (name, level))| Parameter {
                        id: ParameterId(i as i32 + 1),
                        name,
                        description: String::new(),
                        ty: ParameterType::Numeric(NumericType::I32),
                        category: "All".into(),
                        access_level: access_levels[level % access_levels.len()].name.clone(),
                        unit: None,
                        min: 0,
                        max: 1,
                        exponent: 0,
                        default: 0,
                    })
                    .collect();
                Schema {
                    access_levels,
                    categories: vec![Category { name: "All".into(), id: 0 }],
                    units: vec![],
                    enums: vec![],
                    parameters,
                    overrides: vec![],
                }
            })
    }

    proptest! {
        /// Counts never decrease with privilege and the top level sees all.
        #[test]
        fn visibility_is_monotonic(schema in schema_strategy()) {
            let model = build(&schema).unwrap();
            let category = &model.categories[0];
            prop_assert_eq!(category.visibility.len(), schema.access_levels.len());
            for pair in category.visibility.windows(2) {
                prop_assert!(pair[0].access_level_id < pair[1].access_level_id);
                prop_assert!(pair[0].count <= pair[1].count);
            }
            prop_assert_eq!(
                category.visibility.last().map(|v| v.count),
                Some(category.members.len())
            );
        }

        /// Members are sorted by name; equal names keep declaration order.
        #[test]
        fn members_sorted_stably(schema in schema_strategy()) {
            let model = build(&schema).unwrap();
            let members = &model.categories[0].members;
            prop_assert_eq!(members.len(), schema.parameters.len());
            for pair in members.windows(2) {
                let a = &model.parameters[pair[0].get()];
                let b = &model.parameters[pair[1].get()];
                prop_assert!(a.name < b.name || (a.name == b.name && a.index < b.index));
            }
        }

        /// Building twice yields the same digest.
        #[test]
        fn build_is_deterministic(schema in schema_strategy()) {
            let a = build(&schema).unwrap().digest().unwrap();
            let b = build(&schema).unwrap().digest().unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
