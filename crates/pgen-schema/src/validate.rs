//! # Schema Validation
//!
//! Turns an unvalidated [`SchemaDocument`] into a typed [`Schema`], or
//! reports the first invariant violation as a [`SchemaError`].
//!
//! ## Order
//!
//! Validation is fail-fast and runs in a fixed order, so the same broken
//! document always reports the same error:
//!
//! 1. `AccessLevel`, `Category`, `Unit`: required attributes, integer ids,
//!    unique names and ids.
//! 2. `Enum`: unique type names; per enum, unique member names and values,
//!    values exactly `0..N`.
//! 3. `Parameter` ids: present, integer, unique; id 0 named "Machine type".
//! 4. Each `Parameter` in declaration order: required attributes,
//!    references, type, the `{Unit, Min, Max, Exponent}` group, integer
//!    literals, range, default. Then settings keys must be unique.
//! 5. Every `Category` has at least one parameter.
//! 6. `machine_type_t` is declared if any `DefaultOverride` exists.
//! 7. Each `DefaultOverride`: known machine type, known parameter ids,
//!    legal values, no duplicates.
//!
//! ## Attribute group rules
//!
//! | `Unit`  | type    | `Min`/`Max` | `Exponent`         |
//! |---------|---------|-------------|--------------------|
//! | present | any     | required    | required           |
//! | absent  | numeric | required    | forbidden (0)      |
//! | absent  | enum    | forbidden   | forbidden          |
//!
//! Enum-typed parameters always get the effective range `[0, N - 1]` and
//! exponent 0, whatever the document declares.

use std::collections::{HashMap, HashSet};

use pgen_core::{
    settings_key, AccessLevel, Category, EntityKind, EnumMember, EnumType, MachineTypeOverride,
    NumericType, Parameter, ParameterId, ParameterType, Schema, SchemaError, Unit,
    MACHINE_TYPE_ENUM, MACHINE_TYPE_ID, MACHINE_TYPE_NAME, MAX_EXPONENT,
};
use tracing::debug;

use crate::document::{
    DefaultValueRecord, EnumRecord, NamedRecord, OverrideRecord, ParameterRecord, SchemaDocument,
};

/// Validate a schema document.
///
/// # Errors
///
/// Returns the first [`SchemaError`] found, in the order documented at the
/// module level. No partial schema is ever returned.
pub fn validate(document: &SchemaDocument) -> Result<Schema, SchemaError> {
    // 1.
    let access_levels: Vec<AccessLevel> = named_records(&document.access_levels, EntityKind::AccessLevel)?
        .into_iter()
        .map(|(name, id)| AccessLevel { name, id })
        .collect();
    let categories: Vec<Category> = named_records(&document.categories, EntityKind::Category)?
        .into_iter()
        .map(|(name, id)| Category { name, id })
        .collect();
    let units: Vec<Unit> = named_records(&document.units, EntityKind::Unit)?
        .into_iter()
        .map(|(name, id)| Unit { name, id })
        .collect();

    // 2.
    let enums = enum_types(&document.enums)?;

    // 3.
    let ids = parameter_ids(&document.parameters)?;

    // 4.
    let scope = Scope {
        access_levels: &access_levels,
        categories: &categories,
        units: &units,
        enums: &enums,
    };
    let parameters = document
        .parameters
        .iter()
        .zip(ids)
        .map(|(record, id)| scope.parameter(record, id))
        .collect::<Result<Vec<_>, _>>()?;
    unique_settings_keys(&parameters)?;

    // 5.
    for category in &categories {
        if !parameters.iter().any(|p| p.category == category.name) {
            return Err(SchemaError::EmptyCategory {
                category: category.name.clone(),
            });
        }
    }

    // 6. and 7.
    let overrides = if document.default_overrides.is_empty() {
        Vec::new()
    } else {
        let machine_types = enums
            .iter()
            .find(|e| e.name == MACHINE_TYPE_ENUM)
            .ok_or(SchemaError::MissingMachineTypeEnum)?;
        machine_type_overrides(&document.default_overrides, machine_types, &parameters, &enums)?
    };

    debug!(
        access_levels = access_levels.len(),
        categories = categories.len(),
        units = units.len(),
        enums = enums.len(),
        parameters = parameters.len(),
        overrides = overrides.len(),
        "schema validated"
    );

    Ok(Schema {
        access_levels,
        categories,
        units,
        enums,
        parameters,
        overrides,
    })
}

// ─── Literals ───────────────────────────────────────────────────────

fn required<'a>(
    value: &'a Option<String>,
    kind: EntityKind,
    entity: &str,
    attribute: &'static str,
) -> Result<&'a str, SchemaError> {
    value.as_deref().ok_or_else(|| SchemaError::MissingAttribute {
        kind,
        entity: entity.to_string(),
        attribute,
    })
}

fn parse_int(
    value: &str,
    kind: EntityKind,
    entity: &str,
    attribute: &'static str,
) -> Result<i64, SchemaError> {
    value.trim().parse::<i64>().map_err(|_| SchemaError::InvalidInteger {
        kind,
        entity: entity.to_string(),
        attribute,
        value: value.to_string(),
    })
}

fn parse_i32(
    value: &str,
    kind: EntityKind,
    entity: &str,
    attribute: &'static str,
) -> Result<i32, SchemaError> {
    let parsed = parse_int(value, kind, entity, attribute)?;
    i32::try_from(parsed).map_err(|_| SchemaError::InvalidInteger {
        kind,
        entity: entity.to_string(),
        attribute,
        value: value.to_string(),
    })
}

/// Handle for a record that may not have a usable name yet.
fn record_entity(kind: EntityKind, name: Option<&str>, position: usize) -> String {
    match name {
        Some(name) => format!("{kind} \"{name}\""),
        None => format!("{kind} #{position}"),
    }
}

fn parameter_entity(id: &str) -> String {
    format!("Parameter with Id \"{id}\"")
}

// ─── 1. Access levels, categories, units ────────────────────────────

fn named_records(
    records: &[NamedRecord],
    kind: EntityKind,
) -> Result<Vec<(String, i32)>, SchemaError> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let entity = record_entity(kind, record.name.as_deref(), position);
        let name = required(&record.name, kind, &entity, "Name")?;
        let id_literal = required(&record.id, kind, &entity, "Id")?;
        let id = parse_i32(id_literal, kind, &entity, "Id")?;

        if !names.insert(name) {
            return Err(SchemaError::Duplicate {
                kind,
                attribute: "Name",
                value: name.to_string(),
            });
        }
        if !ids.insert(id) {
            return Err(SchemaError::Duplicate {
                kind,
                attribute: "Id",
                value: id_literal.to_string(),
            });
        }
        out.push((name.to_string(), id));
    }
    Ok(out)
}

// ─── 2. Enums ───────────────────────────────────────────────────────

fn enum_types(records: &[EnumRecord]) -> Result<Vec<EnumType>, SchemaError> {
    let mut names = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let entity = record_entity(EntityKind::Enum, record.name.as_deref(), position);
        let name = required(&record.name, EntityKind::Enum, &entity, "Name")?;
        if !names.insert(name) {
            return Err(SchemaError::Duplicate {
                kind: EntityKind::Enum,
                attribute: "Name",
                value: name.to_string(),
            });
        }
        if record.values.is_empty() {
            return Err(SchemaError::MissingAttribute {
                kind: EntityKind::Enum,
                entity,
                attribute: "Values",
            });
        }

        let mut member_names = HashSet::new();
        let mut member_values = HashSet::new();
        let mut members = Vec::with_capacity(record.values.len());
        for (member_position, member) in record.values.iter().enumerate() {
            let member_entity = format!(
                "{} in Enum \"{name}\"",
                record_entity(EntityKind::EnumValue, member.name.as_deref(), member_position)
            );
            let member_name = required(&member.name, EntityKind::EnumValue, &member_entity, "Name")?;
            let literal = required(&member.value, EntityKind::EnumValue, &member_entity, "Value")?;
            let value = parse_i32(literal, EntityKind::EnumValue, &member_entity, "Value")?;

            if !member_names.insert(member_name) {
                return Err(SchemaError::DuplicateEnumMember {
                    enum_name: name.to_string(),
                    attribute: "Name",
                    value: member_name.to_string(),
                });
            }
            if !member_values.insert(value) {
                return Err(SchemaError::DuplicateEnumMember {
                    enum_name: name.to_string(),
                    attribute: "Value",
                    value: literal.to_string(),
                });
            }
            members.push(EnumMember {
                name: member_name.to_string(),
                value,
            });
        }

        // Unique values all inside 0..N means exactly 0..N.
        let count = members.len();
        if let Some(bad) = members
            .iter()
            .find(|m| m.value < 0 || m.value as usize >= count)
        {
            return Err(SchemaError::NonContiguousEnum {
                enum_name: name.to_string(),
                count,
                value: i64::from(bad.value),
            });
        }

        out.push(EnumType {
            name: name.to_string(),
            members,
        });
    }
    Ok(out)
}

// ─── 3. Parameter ids ───────────────────────────────────────────────

fn parameter_ids(records: &[ParameterRecord]) -> Result<Vec<ParameterId>, SchemaError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let entity = record_entity(EntityKind::Parameter, record.name.as_deref(), position);
        let literal = required(&record.id, EntityKind::Parameter, &entity, "Id")?;
        let id = ParameterId(parse_i32(literal, EntityKind::Parameter, &entity, "Id")?);

        if !seen.insert(id) {
            return Err(SchemaError::Duplicate {
                kind: EntityKind::Parameter,
                attribute: "Id",
                value: literal.to_string(),
            });
        }
        // A missing name is reported with the other required attributes.
        match record.name.as_deref() {
            Some(name) if id == MACHINE_TYPE_ID && name != MACHINE_TYPE_NAME => {
                return Err(SchemaError::ReservedId {
                    name: name.to_string(),
                });
            }
            _ => {}
        }
        out.push(id);
    }
    Ok(out)
}

// ─── 4. Parameters ──────────────────────────────────────────────────

/// Declarations a parameter may reference.
struct Scope<'a> {
    access_levels: &'a [AccessLevel],
    categories: &'a [Category],
    units: &'a [Unit],
    enums: &'a [EnumType],
}

impl Scope<'_> {
    fn parameter(&self, record: &ParameterRecord, id: ParameterId) -> Result<Parameter, SchemaError> {
        let kind = EntityKind::Parameter;
        let id_text = id.to_string();
        let entity = parameter_entity(&id_text);

        let name = required(&record.name, kind, &entity, "Name")?;
        let description = required(&record.description, kind, &entity, "Description")?;
        let type_name = required(&record.ty, kind, &entity, "Type")?;
        let category = required(&record.category, kind, &entity, "Category")?;
        let access_level = required(&record.access_level, kind, &entity, "AccessLevel")?;
        let default = required(&record.default, kind, &entity, "Default")?;

        let unknown = |attribute: &'static str, target: &'static str, value: &str| {
            SchemaError::UnknownReference {
                kind,
                entity: entity.clone(),
                attribute,
                target,
                value: value.to_string(),
            }
        };
        if !self.categories.iter().any(|c| c.name == category) {
            return Err(unknown("Category", "Category", category));
        }
        if !self.access_levels.iter().any(|a| a.name == access_level) {
            return Err(unknown("AccessLevel", "AccessLevel", access_level));
        }
        if let Some(unit) = record.unit.as_deref() {
            if !self.units.iter().any(|u| u.name == unit) {
                return Err(unknown("Unit", "Unit", unit));
            }
        }

        let ty = match NumericType::from_type_name(type_name) {
            Some(numeric) => ParameterType::Numeric(numeric),
            None if self.enums.iter().any(|e| e.name == type_name) => {
                ParameterType::Enum(type_name.to_string())
            }
            None => {
                return Err(SchemaError::UnknownType {
                    parameter: id_text,
                    type_name: type_name.to_string(),
                })
            }
        };

        attribute_group(record, &ty, &id_text)?;

        let exponent = match record.exponent.as_deref() {
            Some(literal) => {
                let exponent = parse_int(literal, kind, &entity, "Exponent")?;
                let limit = i64::from(MAX_EXPONENT);
                match i32::try_from(exponent) {
                    Ok(exponent) if (-limit..=limit).contains(&i64::from(exponent)) => exponent,
                    _ => {
                        return Err(SchemaError::ExponentOutOfRange {
                            parameter: id_text,
                            exponent,
                            limit: MAX_EXPONENT,
                        })
                    }
                }
            }
            None => 0,
        };
        let declared_min = record
            .min
            .as_deref()
            .map(|literal| parse_int(literal, kind, &entity, "Min"))
            .transpose()?;
        let declared_max = record
            .max
            .as_deref()
            .map(|literal| parse_int(literal, kind, &entity, "Max"))
            .transpose()?;

        let (min, max, exponent) = match &ty {
            ParameterType::Enum(enum_name) => {
                let max = self.enum_type(enum_name).map_or(0, EnumType::max_value);
                (0, max, 0)
            }
            ParameterType::Numeric(numeric) => {
                // Presence is guaranteed by `attribute_group`.
                let (Some(min), Some(max)) = (declared_min, declared_max) else {
                    return Err(SchemaError::MissingAttribute {
                        kind,
                        entity,
                        attribute: if declared_min.is_none() { "Min" } else { "Max" },
                    });
                };
                numeric_range(*numeric, min, max, &id_text)?;
                (min as i32, max as i32, exponent)
            }
        };

        let default = resolve_value(
            &ty,
            self.enums,
            default,
            min,
            max,
            "Default",
            &id_text,
        )?;

        Ok(Parameter {
            id,
            name: name.to_string(),
            description: description.to_string(),
            ty,
            category: category.to_string(),
            access_level: access_level.to_string(),
            unit: record.unit.clone(),
            min,
            max,
            exponent,
            default,
        })
    }

    fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == name)
    }
}

fn attribute_group(
    record: &ParameterRecord,
    ty: &ParameterType,
    parameter: &str,
) -> Result<(), SchemaError> {
    let group = [
        ("Min", record.min.is_some()),
        ("Max", record.max.is_some()),
        ("Exponent", record.exponent.is_some()),
    ];
    let invalid = |reason: String| SchemaError::InvalidAttributeGroup {
        parameter: parameter.to_string(),
        reason,
    };

    if record.unit.is_some() {
        if let Some((attribute, _)) = group.iter().find(|(_, present)| !present) {
            return Err(invalid(format!(
                "attribute {attribute} (required by attribute Unit) missing"
            )));
        }
        return Ok(());
    }

    match ty {
        ParameterType::Enum(_) => {
            if let Some((attribute, _)) = group.iter().find(|(_, present)| *present) {
                return Err(invalid(format!(
                    "attribute {attribute} requires attribute Unit on an enum-typed parameter"
                )));
            }
        }
        ParameterType::Numeric(_) => {
            if let Some((attribute, _)) = group[..2].iter().find(|(_, present)| !present) {
                return Err(SchemaError::MissingAttribute {
                    kind: EntityKind::Parameter,
                    entity: parameter_entity(parameter),
                    attribute: *attribute,
                });
            }
            if record.exponent.is_some() {
                return Err(invalid(
                    "attribute Exponent requires attribute Unit".to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn numeric_range(numeric: NumericType, min: i64, max: i64, parameter: &str) -> Result<(), SchemaError> {
    if max <= min {
        return Err(SchemaError::InvalidRange {
            parameter: parameter.to_string(),
            min,
            max,
        });
    }
    let (lo, hi) = numeric.bounds();
    if min < lo || max > hi {
        return Err(SchemaError::RangeExceedsType {
            parameter: parameter.to_string(),
            type_name: numeric.type_name(),
            min,
            max,
        });
    }
    Ok(())
}

/// Resolve a `Default` or override `Value` literal against a parameter.
///
/// Enum parameters take a member name or a member value; numeric parameters
/// take a base-10 integer inside `[min, max]`.
fn resolve_value(
    ty: &ParameterType,
    enums: &[EnumType],
    literal: &str,
    min: i32,
    max: i32,
    attribute: &'static str,
    parameter: &str,
) -> Result<i32, SchemaError> {
    let illegal = |reason: String| SchemaError::InvalidValue {
        parameter: parameter.to_string(),
        attribute,
        value: literal.to_string(),
        reason,
    };

    let value = match ty {
        ParameterType::Enum(enum_name) => {
            let enum_type = enums.iter().find(|e| &e.name == enum_name);
            let by_name = enum_type.and_then(|e| e.member_by_name(literal));
            let by_value = || {
                let v = literal.trim().parse::<i32>().ok()?;
                enum_type.and_then(|e| e.member_by_value(v))
            };
            match by_name.or_else(by_value) {
                Some(member) => i64::from(member.value),
                None => return Err(illegal(format!("not a member of Enum \"{enum_name}\""))),
            }
        }
        ParameterType::Numeric(_) => parse_int(
            literal,
            EntityKind::Parameter,
            &parameter_entity(parameter),
            attribute,
        )?,
    };

    if value < i64::from(min) || value > i64::from(max) {
        return Err(illegal(format!("outside [{min}, {max}]")));
    }
    Ok(value as i32)
}

fn unique_settings_keys(parameters: &[Parameter]) -> Result<(), SchemaError> {
    let mut keys = HashSet::new();
    for parameter in parameters {
        let key = settings_key(&parameter.name);
        if !keys.insert(key.clone()) {
            return Err(SchemaError::Duplicate {
                kind: EntityKind::Parameter,
                attribute: "Name",
                value: key,
            });
        }
    }
    Ok(())
}

// ─── 7. Default overrides ───────────────────────────────────────────

fn machine_type_overrides(
    records: &[OverrideRecord],
    machine_types: &EnumType,
    parameters: &[Parameter],
    enums: &[EnumType],
) -> Result<Vec<MachineTypeOverride>, SchemaError> {
    let by_id: HashMap<ParameterId, &Parameter> = parameters.iter().map(|p| (p.id, p)).collect();
    let mut seen_machine_types = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let kind = EntityKind::DefaultOverride;
        let entity = record_entity(kind, record.machine_type.as_deref(), position);
        let machine_type = required(&record.machine_type, kind, &entity, "MachineType")?;
        let member = machine_types.member_by_name(machine_type).ok_or_else(|| {
            SchemaError::UnknownReference {
                kind,
                entity: entity.clone(),
                attribute: "MachineType",
                target: "machine_type_t member",
                value: machine_type.to_string(),
            }
        })?;
        if !seen_machine_types.insert(member.value) {
            return Err(SchemaError::Duplicate {
                kind,
                attribute: "MachineType",
                value: machine_type.to_string(),
            });
        }

        let values = override_values(&record.values, &entity, &by_id, enums)?;
        out.push(MachineTypeOverride {
            machine_type: member.name.clone(),
            code: member.value,
            values,
        });
    }
    Ok(out)
}

fn override_values(
    records: &[DefaultValueRecord],
    override_entity: &str,
    by_id: &HashMap<ParameterId, &Parameter>,
    enums: &[EnumType],
) -> Result<Vec<(ParameterId, i32)>, SchemaError> {
    let kind = EntityKind::DefaultValue;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let entity = format!("{kind} #{position} in {override_entity}");
        let literal = required(&record.parameter_id, kind, &entity, "ParameterId")?;
        let id = ParameterId(parse_i32(literal, kind, &entity, "ParameterId")?);
        let parameter = by_id.get(&id).ok_or_else(|| SchemaError::UnknownReference {
            kind,
            entity: entity.clone(),
            attribute: "ParameterId",
            target: "Parameter",
            value: literal.to_string(),
        })?;
        if !seen.insert(id) {
            return Err(SchemaError::Duplicate {
                kind,
                attribute: "ParameterId",
                value: literal.to_string(),
            });
        }

        let value_literal = required(&record.value, kind, &entity, "Value")?;
        let value = resolve_value(
            &parameter.ty,
            enums,
            value_literal,
            parameter.min,
            parameter.max,
            "Value",
            &id.to_string(),
        )?;
        out.push((id, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
AccessLevels:
  - { Name: Operator, Id: 0 }
  - { Name: Supervisor, Id: 1 }
Categories:
  - { Name: Motion, Id: 0 }
Units:
  - { Name: rpm, Id: 0 }
Enums:
  - Name: machine_type_t
    Values:
      - { Name: Standard, Value: 0 }
      - { Name: Compact, Value: 1 }
Parameters:
  - { Id: 0, Name: Machine type, Description: Machine variant, Type: machine_type_t,
      Category: Motion, AccessLevel: Operator, Default: Standard }
  - { Id: 1, Name: Speed, Description: Spindle speed, Type: int16_t,
      Category: Motion, AccessLevel: Operator, Default: 10,
      Unit: rpm, Min: 0, Max: 100, Exponent: 0 }
DefaultOverrides:
  - MachineType: Compact
    Values:
      - { ParameterId: 1, Value: 50 }
"#;

    fn base() -> SchemaDocument {
        SchemaDocument::from_yaml_str(BASE).unwrap()
    }

    fn speed(doc: &mut SchemaDocument) -> &mut ParameterRecord {
        &mut doc.parameters[1]
    }

    #[test]
    fn test_valid_schema() {
        let schema = validate(&base()).unwrap();
        assert_eq!(schema.access_levels.len(), 2);
        assert_eq!(schema.parameters.len(), 2);
        let machine = &schema.parameters[0];
        assert_eq!((machine.min, machine.max, machine.exponent), (0, 1, 0));
        assert_eq!(machine.default, 0);
        let speed = &schema.parameters[1];
        assert_eq!(speed.ty, ParameterType::Numeric(NumericType::I16));
        assert_eq!((speed.min, speed.max, speed.default), (0, 100, 10));
        assert_eq!(schema.overrides[0].code, 1);
        assert_eq!(schema.overrides[0].values, vec![(ParameterId(1), 50)]);
    }

    #[test]
    fn test_duplicate_access_level_name() {
        let mut doc = base();
        doc.access_levels[1].name = Some("Operator".into());
        assert_eq!(
            validate(&doc).unwrap_err(),
            SchemaError::Duplicate {
                kind: EntityKind::AccessLevel,
                attribute: "Name",
                value: "Operator".into()
            }
        );
    }

    #[test]
    fn test_duplicate_category_id() {
        let mut doc = base();
        doc.categories.push(NamedRecord {
            name: Some("Heating".into()),
            id: Some("0".into()),
        });
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::Duplicate { kind: EntityKind::Category, attribute: "Id", .. }
        ));
    }

    #[test]
    fn test_non_integer_unit_id() {
        let mut doc = base();
        doc.units[0].id = Some("x1".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidInteger { kind: EntityKind::Unit, attribute: "Id", .. }
        ));
    }

    #[test]
    fn test_duplicate_enum_member_value() {
        let mut doc = base();
        doc.enums[0].values[1].value = Some("0".into());
        assert_eq!(
            validate(&doc).unwrap_err(),
            SchemaError::DuplicateEnumMember {
                enum_name: "machine_type_t".into(),
                attribute: "Value",
                value: "0".into()
            }
        );
    }

    #[test]
    fn test_non_contiguous_enum() {
        let mut doc = base();
        doc.enums[0].values[1].value = Some("5".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::NonContiguousEnum { count: 2, value: 5, .. }
        ));
    }

    #[test]
    fn test_duplicate_enum_name() {
        let mut doc = base();
        let copy = doc.enums[0].clone();
        doc.enums.push(copy);
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::Duplicate { kind: EntityKind::Enum, .. }
        ));
    }

    #[test]
    fn test_duplicate_parameter_id() {
        let mut doc = base();
        speed(&mut doc).id = Some("0".into());
        // Id 0 is checked for duplicates before its name.
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::Duplicate { kind: EntityKind::Parameter, attribute: "Id", .. }
        ));
    }

    #[test]
    fn test_reserved_id_zero_name() {
        let mut doc = base();
        doc.parameters[0].name = Some("Variant".into());
        assert_eq!(
            validate(&doc).unwrap_err(),
            SchemaError::ReservedId { name: "Variant".into() }
        );
    }

    #[test]
    fn test_unknown_category_reference() {
        let mut doc = base();
        speed(&mut doc).category = Some("Heating".into());
        match validate(&doc).unwrap_err() {
            SchemaError::UnknownReference { attribute, value, entity, .. } => {
                assert_eq!(attribute, "Category");
                assert_eq!(value, "Heating");
                assert_eq!(entity, "Parameter with Id \"1\"");
            }
            other => panic!("Expected UnknownReference, got: {other}"),
        }
    }

    #[test]
    fn test_unknown_access_level_and_unit() {
        let mut doc = base();
        speed(&mut doc).access_level = Some("Root".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::UnknownReference { attribute: "AccessLevel", .. }
        ));

        let mut doc = base();
        speed(&mut doc).unit = Some("furlong".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::UnknownReference { attribute: "Unit", .. }
        ));
    }

    #[test]
    fn test_unknown_type() {
        let mut doc = base();
        speed(&mut doc).ty = Some("float".into());
        assert_eq!(
            validate(&doc).unwrap_err(),
            SchemaError::UnknownType {
                parameter: "1".into(),
                type_name: "float".into()
            }
        );
    }

    #[test]
    fn test_missing_default() {
        let mut doc = base();
        speed(&mut doc).default = None;
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::MissingAttribute { attribute: "Default", .. }
        ));
    }

    #[test]
    fn test_unit_requires_full_group() {
        let mut doc = base();
        speed(&mut doc).exponent = None;
        match validate(&doc).unwrap_err() {
            SchemaError::InvalidAttributeGroup { parameter, reason } => {
                assert_eq!(parameter, "1");
                assert!(reason.contains("Exponent"));
            }
            other => panic!("Expected InvalidAttributeGroup, got: {other}"),
        }
    }

    #[test]
    fn test_numeric_without_unit_requires_min_max() {
        let mut doc = base();
        let p = speed(&mut doc);
        p.unit = None;
        p.exponent = None;
        assert!(validate(&doc).is_ok());

        let mut doc = base();
        let p = speed(&mut doc);
        p.unit = None;
        p.max = None;
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::MissingAttribute { attribute: "Max", .. }
        ));
    }

    #[test]
    fn test_numeric_exponent_requires_unit() {
        let mut doc = base();
        let p = speed(&mut doc);
        p.unit = None;
        p.exponent = Some("0".into());
        match validate(&doc).unwrap_err() {
            SchemaError::InvalidAttributeGroup { reason, .. } => {
                assert!(reason.contains("Exponent"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_enum_without_unit_rejects_range_attributes() {
        let mut doc = base();
        doc.parameters[0].min = Some("0".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidAttributeGroup { .. }
        ));
    }

    #[test]
    fn test_enum_range_overrides_declared_range() {
        let mut doc = base();
        let p = &mut doc.parameters[0];
        p.unit = Some("rpm".into());
        p.min = Some("-4".into());
        p.max = Some("40".into());
        p.exponent = Some("-2".into());
        let schema = validate(&doc).unwrap();
        let machine = &schema.parameters[0];
        assert_eq!((machine.min, machine.max, machine.exponent), (0, 1, 0));
    }

    #[test]
    fn test_non_integer_min() {
        let mut doc = base();
        speed(&mut doc).min = Some("1.5".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidInteger { attribute: "Min", .. }
        ));
    }

    #[test]
    fn test_max_must_exceed_min() {
        let mut doc = base();
        speed(&mut doc).max = Some("0".into());
        assert_eq!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidRange { parameter: "1".into(), min: 0, max: 0 }
        );
    }

    #[test]
    fn test_range_must_fit_type() {
        let mut doc = base();
        let p = speed(&mut doc);
        p.ty = Some("uint8_t".into());
        p.max = Some("300".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::RangeExceedsType { type_name: "uint8_t", .. }
        ));
    }

    #[test]
    fn test_exponent_limit() {
        let mut doc = base();
        speed(&mut doc).exponent = Some("-10".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::ExponentOutOfRange { exponent: -10, .. }
        ));
    }

    #[test]
    fn test_exponent_minimum_integer_rejected() {
        let mut doc = base();
        speed(&mut doc).exponent = Some("-9223372036854775808".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::ExponentOutOfRange { exponent: i64::MIN, .. }
        ));

        let mut doc = base();
        speed(&mut doc).exponent = Some("4294967296".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::ExponentOutOfRange { exponent: 4_294_967_296, .. }
        ));
    }

    #[test]
    fn test_default_out_of_range() {
        let mut doc = base();
        speed(&mut doc).default = Some("101".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidValue { attribute: "Default", .. }
        ));
    }

    #[test]
    fn test_enum_default_accepts_member_value() {
        let mut doc = base();
        doc.parameters[0].default = Some("1".into());
        assert_eq!(validate(&doc).unwrap().parameters[0].default, 1);

        let mut doc = base();
        doc.parameters[0].default = Some("Huge".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidValue { attribute: "Default", .. }
        ));
    }

    #[test]
    fn test_duplicate_settings_key() {
        let mut doc = base();
        speed(&mut doc).name = Some("machine Type".into());
        assert_eq!(
            validate(&doc).unwrap_err(),
            SchemaError::Duplicate {
                kind: EntityKind::Parameter,
                attribute: "Name",
                value: "parameters/MachineType".into()
            }
        );
    }

    #[test]
    fn test_empty_category_rejected_by_name() {
        let mut doc = base();
        doc.categories.push(NamedRecord {
            name: Some("Heating".into()),
            id: Some("7".into()),
        });
        assert_eq!(
            validate(&doc).unwrap_err(),
            SchemaError::EmptyCategory { category: "Heating".into() }
        );
    }

    #[test]
    fn test_overrides_require_machine_type_enum() {
        let mut doc = base();
        doc.enums[0].name = Some("variant_t".into());
        doc.parameters[0].ty = Some("variant_t".into());
        assert_eq!(validate(&doc).unwrap_err(), SchemaError::MissingMachineTypeEnum);
    }

    #[test]
    fn test_no_overrides_no_machine_type_enum_needed() {
        let mut doc = base();
        doc.default_overrides.clear();
        doc.enums[0].name = Some("variant_t".into());
        doc.parameters[0].ty = Some("variant_t".into());
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn test_override_unknown_machine_type() {
        let mut doc = base();
        doc.default_overrides[0].machine_type = Some("Giant".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::UnknownReference { kind: EntityKind::DefaultOverride, attribute: "MachineType", .. }
        ));
    }

    #[test]
    fn test_override_unknown_parameter() {
        let mut doc = base();
        doc.default_overrides[0].values[0].parameter_id = Some("42".into());
        match validate(&doc).unwrap_err() {
            SchemaError::UnknownReference { kind, target, value, .. } => {
                assert_eq!(kind, EntityKind::DefaultValue);
                assert_eq!(target, "Parameter");
                assert_eq!(value, "42");
            }
            other => panic!("Expected UnknownReference, got: {other}"),
        }
    }

    #[test]
    fn test_override_value_out_of_range() {
        let mut doc = base();
        doc.default_overrides[0].values[0].value = Some("500".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidValue { attribute: "Value", .. }
        ));
    }

    #[test]
    fn test_override_duplicates() {
        let mut doc = base();
        let copy = doc.default_overrides[0].clone();
        doc.default_overrides.push(copy);
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::Duplicate { kind: EntityKind::DefaultOverride, .. }
        ));

        let mut doc = base();
        let value = doc.default_overrides[0].values[0].clone();
        doc.default_overrides[0].values.push(value);
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::Duplicate { kind: EntityKind::DefaultValue, .. }
        ));
    }

    #[test]
    fn test_fail_fast_reports_earliest_step() {
        // Both an empty category (step 5) and a bad access level (step 1).
        let mut doc = base();
        doc.categories.push(NamedRecord {
            name: Some("Heating".into()),
            id: Some("9".into()),
        });
        doc.access_levels[0].id = Some("one".into());
        assert!(matches!(
            validate(&doc).unwrap_err(),
            SchemaError::InvalidInteger { kind: EntityKind::AccessLevel, .. }
        ));
    }
}
