//! Property tests for the template interpreter
//!
//! Each property holds for arbitrary keys and values of the stated shape.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use vxforms_template::{
    interpret, Lookup, RawTemplate, RawValue, ResolvedLookups, ResolvedValue,
};

const NOW: i64 = 1_730_496_755;

fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(NOW, 0).unwrap()
}

fn single(key: &str, value: RawValue) -> RawTemplate {
    let mut raw = RawTemplate::new();
    raw.insert(key.to_string(), value);
    raw
}

fn scalar_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        any::<i64>().prop_map(RawValue::Integer),
        (-1.0e12..1.0e12f64).prop_map(RawValue::Float),
        any::<bool>().prop_map(RawValue::Bool),
        "[a-z0-9 ]{0,12}".prop_map(RawValue::String),
        proptest::collection::vec("[a-z]{1,4}", 0..4)
            .prop_map(|v| RawValue::Sequence(v.iter().map(|s| RawValue::from(s.as_str())).collect())),
    ]
}

proptest! {
    #[test]
    fn prop_hash_prefix_is_constant(key in "[a-zA-Z_]{1,10}", rest in "\\PC{0,20}") {
        let input = format!("#{rest}");
        let t = interpret("p", &single(&key, RawValue::String(input)), &ResolvedLookups::new(), now());

        prop_assert!(t.is_disabled(&key));
        prop_assert_eq!(t.value(&key), Some(&ResolvedValue::Text(rest)));
        prop_assert!(t.select_options(&key).is_none());
    }

    #[test]
    fn prop_epoch_keys_resolve_to_now(
        prefix in "[a-z_]{0,6}",
        suffix in "[a-z_]{0,6}",
        value in scalar_value()
    ) {
        let key = format!("{prefix}Epoch{suffix}");
        let t = interpret("p", &single(&key, value), &ResolvedLookups::new(), now());

        prop_assert_eq!(t.value(&key), Some(&ResolvedValue::Integer(NOW)));
        prop_assert!(!t.is_disabled(&key));
    }

    #[test]
    fn prop_duration_floats_truncate(
        prefix in "[a-z_]{0,6}",
        suffix in "[a-z_]{0,6}",
        value in -1.0e12..1.0e12f64
    ) {
        let key = format!("{prefix}duration{suffix}");
        let t = interpret("p", &single(&key, RawValue::Float(value)), &ResolvedLookups::new(), now());

        #[allow(clippy::cast_possible_truncation)]
        let expected = value.trunc() as i64;
        prop_assert_eq!(t.value(&key), Some(&ResolvedValue::Integer(expected)));
    }

    #[test]
    fn prop_string_sequences_become_options(
        key in "[a-z]{1,8}",
        items in proptest::collection::vec("[A-Za-z0-9]{0,6}", 0..8)
    ) {
        let raw = RawValue::Sequence(items.iter().map(|s| RawValue::from(s.as_str())).collect());
        let t = interpret("p", &single(&key, raw), &ResolvedLookups::new(), now());

        prop_assert_eq!(t.select_options(&key), Some(items.as_slice()));
        prop_assert_eq!(t.value(&key), Some(&ResolvedValue::Texts(items.clone())));
    }

    #[test]
    fn prop_unknown_directive_is_named(name in "[a-zA-Z]{1,12}") {
        prop_assume!(Lookup::from_directive_name(&name).is_none());

        let mut raw = single("fn", RawValue::String(format!("&{name}")));
        raw.insert("sibling".into(), RawValue::Integer(7));
        let t = interpret("p", &raw, &ResolvedLookups::new(), now());

        let placeholder = t.value("fn").and_then(ResolvedValue::as_text).unwrap().to_string();
        prop_assert!(placeholder.contains(&name));
        prop_assert_eq!(t.value("sibling"), Some(&ResolvedValue::Integer(7)));
        prop_assert_eq!(t.diagnostics.len(), 1);
    }
}
