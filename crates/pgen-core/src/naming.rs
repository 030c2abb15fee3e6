//! # Settings Key Naming
//!
//! Persisted values are stored under `parameters/<CamelCaseName>`, where the
//! camel-case form capitalises each whitespace-separated word of the display
//! name (first letter upper, remaining letters lower) and joins them.
//! `"Machine type"` is stored under `parameters/MachineType`.
//!
//! Renaming a parameter changes its key; a firmware update that renames a
//! parameter loses the persisted value and falls back to the default.

/// Subtree of the settings store owned by the parameter store.
pub const SETTINGS_PREFIX: &str = "parameters";

/// Convert a display name to its camel-case identifier.
pub fn to_camel_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Full settings key for a parameter display name.
pub fn settings_key(name: &str) -> String {
    format!("{SETTINGS_PREFIX}/{}", to_camel_case(name))
}
