//! Property tests for value access on stores built from generated schemas.

use std::sync::Arc;

use pgen_core::ParameterId;
use pgen_schema::{compile, SchemaDocument};
use pgen_store::{MemorySettings, ParameterStore, StoreError};
use proptest::prelude::*;

/// A store with one numeric parameter (id 5) ranging over `[min, max]`.
fn numeric_store(ty: &str, min: i64, max: i64, exponent: i32) -> ParameterStore {
    let yaml = format!(
        r#"
AccessLevels: [{{ Name: Operator, Id: 0 }}]
Categories: [{{ Name: General, Id: 0 }}]
Units: [{{ Name: u, Id: 0 }}]
Parameters:
  - {{ Id: 5, Name: Value, Description: Under test, Type: {ty}, Category: General,
      AccessLevel: Operator, Default: {min}, Unit: u, Min: {min}, Max: {max}, Exponent: {exponent} }}
"#
    );
    let model = compile(&SchemaDocument::from_yaml_str(&yaml).unwrap()).unwrap();
    ParameterStore::new(Arc::new(model), Arc::new(MemorySettings::new()))
}

const ID: ParameterId = ParameterId(5);

fn range() -> impl Strategy<Value = (i64, i64)> {
    (-30_000i64..30_000, 1i64..2_000).prop_map(|(min, span)| (min, min + span))
}

proptest! {
    /// A successful set is observed by get; a rejected one changes nothing.
    #[test]
    fn set_get_consistency((min, max) in range(), candidate in -40_000i32..40_000) {
        let store = numeric_store("int32_t", min, max, 0);
        let before = store.get(ID).unwrap();
        match store.set(ID, candidate) {
            Ok(()) => {
                prop_assert!(i64::from(candidate) >= min && i64::from(candidate) <= max);
                prop_assert_eq!(store.get(ID).unwrap(), candidate);
            }
            Err(StoreError::OutOfRange { .. }) => {
                prop_assert!(i64::from(candidate) < min || i64::from(candidate) > max);
                prop_assert_eq!(store.get(ID).unwrap(), before);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// Stepping up `span + 1` times returns to the start, and every
    /// intermediate value stays in range.
    #[test]
    fn incr_cycles_through_range((min, max) in range(), offset in 0i64..2_000) {
        let store = numeric_store("int16_t", min, max, 0);
        let start = (min + offset % (max - min + 1)) as i32;
        store.set(ID, start).unwrap();
        for _ in 0..=(max - min) {
            let v = i64::from(store.incr(ID).unwrap());
            prop_assert!(v >= min && v <= max);
        }
        prop_assert_eq!(store.get(ID).unwrap(), start);
    }

    /// Decrement undoes increment, including across the wrap point.
    #[test]
    fn decr_inverts_incr((min, max) in range(), at_max in any::<bool>()) {
        let store = numeric_store("int16_t", min, max, 0);
        let start = if at_max { max } else { min } as i32;
        store.set(ID, start).unwrap();
        store.incr(ID).unwrap();
        prop_assert_eq!(store.decr(ID).unwrap(), start);
    }

    /// The rendered string re-parses to the stored value.
    #[test]
    fn value_string_matches_scaled_value((min, max) in range(), exponent in -4i32..=0) {
        let store = numeric_store("int32_t", min, max, exponent);
        store.set(ID, max as i32).unwrap();
        let rendered = store.value_string(ID).unwrap();
        let digits: String = rendered.chars().filter(|c| *c != '.').collect();
        prop_assert_eq!(digits.parse::<i64>().unwrap(), max);
        prop_assert_eq!(
            rendered.split_once('.').map_or(0, |(_, frac)| frac.len()),
            exponent.unsigned_abs() as usize
        );
    }
}
