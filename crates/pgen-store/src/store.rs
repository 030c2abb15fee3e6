//! # Parameter Store
//!
//! The runtime table of parameter values for one [`CompiledModel`]. One
//! `i32` is kept per compiled index; callers address parameters by their
//! schema id through an id→index map.
//!
//! ## Locking
//!
//! A single `parking_lot::Mutex` guards the value table. Every value read
//! or write, every category snapshot and the bulk export run inside it.
//! Model metadata (names, bounds, units) is immutable and read without it.
//! Walk callbacks run after the lock is released, so they may call back
//! into the store.
//!
//! ## Persistence
//!
//! Values live under `parameters/<CamelCaseName>` in the
//! [`SettingsBackend`] as 4-byte little-endian integers. [`init`] restores
//! into a scratch copy and commits only if the backend read succeeds, so a
//! failing backend leaves the table at production defaults.
//!
//! [`init`]: ParameterStore::init

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use parking_lot::Mutex;
use pgen_core::{
    CompiledModel, CompiledParameter, ParameterId, ParameterIndex, ValueKind, MACHINE_TYPE_ENUM,
    MACHINE_TYPE_ID, SETTINGS_PREFIX,
};
use tracing::{debug, info, warn};

use crate::category::CategoryView;
use crate::error::{Lookup, SettingsError, StoreError};
use crate::settings::{decode_value, encode_value, SettingsBackend};

/// Static description of one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub id: ParameterId,
    pub name: String,
    pub description: String,
    pub kind: ValueKind,
    pub unit: Option<String>,
    pub min: i32,
    pub max: i32,
    pub exponent: i32,
    pub access_level_id: i32,
    pub category_id: i32,
    pub settings_key: String,
}

impl ParameterInfo {
    /// Whether the parameter is enum-typed.
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, ValueKind::Enum { .. })
    }
}

/// What [`ParameterStore::load_defaults`] applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultsOutcome {
    /// Production defaults plus the override for this machine type.
    Overridden {
        machine_type: String,
        substitutions: usize,
    },
    /// A known machine type without an override: production defaults only.
    Production,
    /// Not a member of `machine_type_t`: production defaults only.
    UnknownMachineType(i32),
}

/// Result of a successful [`ParameterStore::init`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Persisted values that were applied.
    pub restored: usize,
    /// Persisted entries that were ignored: unknown key, wrong width or out
    /// of range.
    pub skipped: usize,
}

/// Result of a bulk export.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Parameters written successfully.
    pub saved: usize,
    /// One `StoreError::StorageFailure` per parameter the sink rejected.
    pub failures: Vec<StoreError>,
}

impl ExportReport {
    /// Whether every parameter was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runtime parameter table bound to a compiled model and a settings
/// backend.
pub struct ParameterStore {
    model: Arc<CompiledModel>,
    settings: Arc<dyn SettingsBackend>,
    by_id: HashMap<ParameterId, ParameterIndex>,
    by_key: HashMap<String, ParameterIndex>,
    values: Mutex<Vec<i32>>,
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("parameters", &self.model.parameters.len())
            .field("categories", &self.model.categories.len())
            .finish_non_exhaustive()
    }
}

impl ParameterStore {
    /// Create a store holding production defaults. Nothing is read from
    /// `settings` until [`init`](Self::init).
    pub fn new(model: Arc<CompiledModel>, settings: Arc<dyn SettingsBackend>) -> Self {
        let by_id = model.parameters.iter().map(|p| (p.id, p.index)).collect();
        let by_key = model
            .parameters
            .iter()
            .map(|p| (p.settings_key.clone(), p.index))
            .collect();
        let values = Mutex::new(production_defaults(&model));
        Self {
            model,
            settings,
            by_id,
            by_key,
            values,
        }
    }

    /// The compiled model backing this store.
    pub fn model(&self) -> &CompiledModel {
        &self.model
    }

    fn parameter(&self, id: ParameterId) -> Result<&CompiledParameter, StoreError> {
        self.by_id
            .get(&id)
            .and_then(|index| self.model.parameter(*index))
            .ok_or_else(|| StoreError::parameter_not_found(id))
    }

    fn render(&self, parameter: &CompiledParameter, value: i32) -> String {
        self.model
            .render(parameter, value)
            .unwrap_or_else(|| value.to_string())
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Load production defaults, then restore persisted values.
    ///
    /// Absent keys keep their defaults. Entries with an unknown key, the
    /// wrong width or an out-of-range value are skipped with a warning.
    ///
    /// # Errors
    ///
    /// `StoreError::StorageFailure` if the backend read fails; the table is
    /// left at production defaults.
    pub fn init(&self) -> Result<RestoreReport, StoreError> {
        let mut scratch = production_defaults(&self.model);
        let mut report = RestoreReport::default();

        let loaded = self.settings.load(SETTINGS_PREFIX, &mut |key: &str, bytes: &[u8]| {
            let Some(parameter) = self
                .by_key
                .get(key)
                .and_then(|index| self.model.parameter(*index))
            else {
                debug!(key, "ignoring unknown settings key");
                report.skipped += 1;
                return;
            };
            match decode_value(bytes) {
                Some(value) if parameter.accepts(value) => {
                    scratch[parameter.index.get()] = value;
                    report.restored += 1;
                }
                Some(value) => {
                    warn!(
                        key,
                        value,
                        min = parameter.min,
                        max = parameter.max,
                        "persisted value out of range, keeping default"
                    );
                    report.skipped += 1;
                }
                None => {
                    warn!(key, len = bytes.len(), "malformed persisted value, keeping default");
                    report.skipped += 1;
                }
            }
        });

        let mut values = self.values.lock();
        match loaded {
            Ok(()) => {
                *values = scratch;
                info!(
                    restored = report.restored,
                    skipped = report.skipped,
                    "parameters restored"
                );
                Ok(report)
            }
            Err(source) => {
                *values = production_defaults(&self.model);
                warn!(error = %source, "restore failed, using production defaults");
                Err(StoreError::StorageFailure {
                    parameter: None,
                    key: SETTINGS_PREFIX.to_string(),
                    source,
                })
            }
        }
    }

    /// Reset every parameter to its production default, set the
    /// machine-type parameter to `machine_type`, then apply that machine
    /// type's override if one exists. Logs a warning whenever no override
    /// applies.
    ///
    /// Does not persist anything.
    pub fn load_defaults(&self, machine_type: i32) -> DefaultsOutcome {
        let mut values = self.values.lock();
        *values = production_defaults(&self.model);

        match self.parameter(MACHINE_TYPE_ID) {
            Ok(parameter) if parameter.accepts(machine_type) => {
                values[parameter.index.get()] = machine_type;
            }
            Ok(_) => warn!(machine_type, "machine type outside parameter range, not stored"),
            Err(_) => warn!(machine_type, "model has no machine type parameter"),
        }

        if let Some(machine_override) = self.model.override_for(machine_type) {
            for (id, value) in &machine_override.values {
                if let Some(index) = self.by_id.get(id) {
                    values[index.get()] = *value;
                }
            }
            info!(
                machine_type = %machine_override.machine_type,
                substitutions = machine_override.values.len(),
                "defaults loaded with machine type override"
            );
            return DefaultsOutcome::Overridden {
                machine_type: machine_override.machine_type.clone(),
                substitutions: machine_override.values.len(),
            };
        }

        let known = self
            .model
            .enums
            .iter()
            .find(|e| e.name == MACHINE_TYPE_ENUM)
            .and_then(|e| e.member_by_value(machine_type))
            .is_some();
        if known {
            warn!(machine_type, "no default override for machine type, production defaults loaded");
            DefaultsOutcome::Production
        } else {
            warn!(machine_type, "unknown machine type, production defaults loaded");
            DefaultsOutcome::UnknownMachineType(machine_type)
        }
    }

    // ── Values ──────────────────────────────────────────────────────

    /// Current value.
    pub fn get(&self, id: ParameterId) -> Result<i32, StoreError> {
        let parameter = self.parameter(id)?;
        Ok(self.values.lock()[parameter.index.get()])
    }

    /// Replace the value if it lies in `[min, max]`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `OutOfRange` otherwise; in both cases
    /// nothing changes.
    pub fn set(&self, id: ParameterId, value: i32) -> Result<(), StoreError> {
        let parameter = self.parameter(id)?;
        if !parameter.accepts(value) {
            return Err(StoreError::OutOfRange {
                id,
                value,
                min: parameter.min,
                max: parameter.max,
            });
        }
        self.values.lock()[parameter.index.get()] = value;
        Ok(())
    }

    /// Step up by one, wrapping `max` to `min`. Returns the new value.
    pub fn incr(&self, id: ParameterId) -> Result<i32, StoreError> {
        let parameter = self.parameter(id)?;
        let mut values = self.values.lock();
        let slot = &mut values[parameter.index.get()];
        *slot = if *slot >= parameter.max {
            parameter.min
        } else {
            *slot + 1
        };
        Ok(*slot)
    }

    /// Step down by one, wrapping `min` to `max`. Returns the new value.
    pub fn decr(&self, id: ParameterId) -> Result<i32, StoreError> {
        let parameter = self.parameter(id)?;
        let mut values = self.values.lock();
        let slot = &mut values[parameter.index.get()];
        *slot = if *slot <= parameter.min {
            parameter.max
        } else {
            *slot - 1
        };
        Ok(*slot)
    }

    /// Current value rendered for display: the member name for enum
    /// parameters, the scaled decimal otherwise.
    pub fn value_string(&self, id: ParameterId) -> Result<String, StoreError> {
        let parameter = self.parameter(id)?;
        let value = self.values.lock()[parameter.index.get()];
        Ok(self.render(parameter, value))
    }

    /// Render a candidate value without storing it.
    pub fn format_value(&self, id: ParameterId, value: i32) -> Result<String, StoreError> {
        let parameter = self.parameter(id)?;
        if !parameter.accepts(value) {
            return Err(StoreError::OutOfRange {
                id,
                value,
                min: parameter.min,
                max: parameter.max,
            });
        }
        Ok(self.render(parameter, value))
    }

    // ── Metadata ────────────────────────────────────────────────────

    /// Display name.
    pub fn name(&self, id: ParameterId) -> Result<&str, StoreError> {
        Ok(&self.parameter(id)?.name)
    }

    /// Static metadata.
    pub fn info(&self, id: ParameterId) -> Result<ParameterInfo, StoreError> {
        let p = self.parameter(id)?;
        Ok(ParameterInfo {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
            kind: p.kind,
            unit: p.unit.clone(),
            min: p.min,
            max: p.max,
            exponent: p.exponent,
            access_level_id: p.access_level_id,
            category_id: p.category_id,
            settings_key: p.settings_key.clone(),
        })
    }

    // ── Categories ──────────────────────────────────────────────────

    /// Number of categories.
    pub fn category_count(&self) -> usize {
        self.model.categories.len()
    }

    /// Snapshot of the category at `index` in the alphabetical listing.
    pub fn category(&self, index: usize) -> Result<CategoryView, StoreError> {
        let category = self
            .model
            .categories
            .get(index)
            .ok_or(StoreError::NotFound(Lookup::Category(index)))?;
        let _values = self.values.lock();
        Ok(CategoryView::new(&self.model, category))
    }

    /// Visit, in listing order, every category with at least one parameter
    /// visible at `access_level_id`. Returns the number of categories
    /// visited.
    pub fn walk_categories<F>(&self, access_level_id: i32, mut visit: F) -> usize
    where
        F: FnMut(&CategoryView) -> ControlFlow<()>,
    {
        let views: Vec<CategoryView> = {
            let _values = self.values.lock();
            self.model
                .categories
                .iter()
                .map(|c| CategoryView::new(&self.model, c))
                .filter(|v| v.visible_count(access_level_id) > 0)
                .collect()
        };

        let mut visited = 0;
        for view in &views {
            visited += 1;
            if visit(view).is_break() {
                break;
            }
        }
        visited
    }

    /// Visit the members of category `index` visible at `access_level_id`,
    /// in alphabetical order. Returns the number of parameters visited.
    pub fn walk_parameters<F>(
        &self,
        index: usize,
        access_level_id: i32,
        mut visit: F,
    ) -> Result<usize, StoreError>
    where
        F: FnMut(ParameterId) -> ControlFlow<()>,
    {
        let view = self.category(index)?;
        let mut visited = 0;
        for id in view.visible_members(access_level_id) {
            visited += 1;
            if visit(id).is_break() {
                break;
            }
        }
        Ok(visited)
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Persist one parameter through the settings backend. Failures are
    /// returned, not retried.
    pub fn save(&self, id: ParameterId) -> Result<(), StoreError> {
        let parameter = self.parameter(id)?;
        let value = self.values.lock()[parameter.index.get()];
        self.settings
            .save(&parameter.settings_key, &encode_value(value))
            .map_err(|source| {
                warn!(key = %parameter.settings_key, error = %source, "parameter save failed");
                StoreError::StorageFailure {
                    parameter: Some(id),
                    key: parameter.settings_key.clone(),
                    source,
                }
            })
    }

    /// Write every parameter through `sink` while holding the store lock.
    /// A failing parameter is recorded and the export continues.
    pub fn export<S>(&self, mut sink: S) -> ExportReport
    where
        S: FnMut(&str, &[u8]) -> Result<(), SettingsError>,
    {
        let values = self.values.lock();
        let mut report = ExportReport::default();

        for parameter in &self.model.parameters {
            let bytes = encode_value(values[parameter.index.get()]);
            match sink(&parameter.settings_key, &bytes) {
                Ok(()) => report.saved += 1,
                Err(source) => {
                    warn!(key = %parameter.settings_key, error = %source, "export failed for parameter");
                    report.failures.push(StoreError::StorageFailure {
                        parameter: Some(parameter.id),
                        key: parameter.settings_key.clone(),
                        source,
                    });
                }
            }
        }

        debug!(
            saved = report.saved,
            failed = report.failures.len(),
            "parameters exported"
        );
        report
    }

    /// Export every parameter through the store's own settings backend.
    pub fn save_all(&self) -> ExportReport {
        let settings = Arc::clone(&self.settings);
        self.export(|key, bytes| settings.save(key, bytes))
    }
}

fn production_defaults(model: &CompiledModel) -> Vec<i32> {
    model.parameters.iter().map(|p| p.default).collect()
}
