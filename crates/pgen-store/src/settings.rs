//! # Settings Backend
//!
//! The persistent key/value collaborator of the parameter store. Each
//! parameter is stored under its settings key (`parameters/<CamelCaseName>`)
//! as a 4-byte little-endian two's-complement integer.
//!
//! [`MemorySettings`] is an in-process backend used by tests and by hosts
//! that persist the map themselves.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::error::SettingsError;

/// Width of a persisted value.
pub const VALUE_LEN: usize = 4;

/// Encode a stored value for persistence.
pub fn encode_value(value: i32) -> [u8; VALUE_LEN] {
    value.to_le_bytes()
}

/// Decode a persisted value. Returns `None` unless `bytes` is exactly
/// [`VALUE_LEN`] long.
pub fn decode_value(bytes: &[u8]) -> Option<i32> {
    let bytes: [u8; VALUE_LEN] = bytes.try_into().ok()?;
    Some(i32::from_le_bytes(bytes))
}

/// Persistent key/value storage for parameter values.
pub trait SettingsBackend: Send + Sync {
    /// Feed every `(key, bytes)` pair whose key lies under `prefix/` to
    /// `visitor`. Keys are passed in full, prefix included.
    fn load(&self, prefix: &str, visitor: &mut dyn FnMut(&str, &[u8])) -> Result<(), SettingsError>;

    /// Write one key.
    fn save(&self, key: &str, value: &[u8]) -> Result<(), SettingsError>;
}

/// In-memory settings map.
#[derive(Debug, Default)]
pub struct MemorySettings {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `key`.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries.lock().insert(key.into(), value.into());
    }

    /// Raw bytes under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(key).cloned()
    }

    /// Decoded value under `key`, if present and well-formed.
    pub fn value(&self, key: &str) -> Option<i32> {
        self.get(key).as_deref().and_then(decode_value)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SettingsBackend for MemorySettings {
    fn load(&self, prefix: &str, visitor: &mut dyn FnMut(&str, &[u8])) -> Result<(), SettingsError> {
        let subtree = format!("{prefix}/");
        // Copy out so the visitor runs without the map locked.
        let matching: Vec<(String, Vec<u8>)> = self
            .entries
            .lock()
            .range(subtree.clone()..)
            .take_while(|(key, _)| key.starts_with(&subtree))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in &matching {
            visitor(key, value);
        }
        Ok(())
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<(), SettingsError> {
        self.insert(key, value);
        Ok(())
    }
}
