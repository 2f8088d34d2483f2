//! End-to-end interpretation scenarios
//!
//! Whole template documents, as stored, run through the interpreter.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use vxforms_template::{
    interpret, requested_lookups, Lookup, RawTemplate, ResolvedLookups, ResolvedValue, SelectMode,
};

fn raw(value: serde_json::Value) -> RawTemplate {
    serde_json::from_value(value).unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[test]
fn test_sub_type_lookup_drives_select() {
    let lookups = ResolvedLookups::new().with(Lookup::SubTypes, &["GRIB2", "NETCDF"]);
    let t = interpret("ingest", &raw(json!({"subType": "&getSubTypes"})), &lookups, Utc::now());

    assert_eq!(t.select_options("subType"), Some(strings(&["GRIB2", "NETCDF"]).as_slice()));
    assert_eq!(t.select_mode, SelectMode::LookupDriven);
    assert!(!t.is_disabled("subType"));
}

#[test]
fn test_constant_builder_type() {
    let t = interpret(
        "ingest",
        &raw(json!({"builder_type": "#NetcdfMetarObsBuilderV01"})),
        &ResolvedLookups::new(),
        Utc::now(),
    );

    assert_eq!(t.value("builder_type"), Some(&ResolvedValue::from("NetcdfMetarObsBuilderV01")));
    assert!(t.is_disabled("builder_type"));
}

#[test]
fn test_plain_float_is_decimal_string() {
    let t = interpret(
        "ingest",
        &raw(json!({"validTimeDelta": 1800.0})),
        &ResolvedLookups::new(),
        Utc::now(),
    );

    assert_eq!(t.value("validTimeDelta"), Some(&ResolvedValue::from("1800.000000")));
}

#[test]
fn test_integer_list_keeps_integers() {
    let t = interpret("ids", &raw(json!({"ids": [1, 2, 3]})), &ResolvedLookups::new(), Utc::now());

    assert_eq!(t.select_options("ids"), Some(strings(&["1", "2", "3"]).as_slice()));
    assert_eq!(t.value("ids"), Some(&ResolvedValue::Integers(vec![1, 2, 3])));
}

#[test]
fn test_data_source_template() {
    let document = raw(json!({
        "id": "DS:operational:HRRR_OPS:V01",
        "type": "#DS",
        "sub_type": "&getDataSourceSubTypes",
        "status": "&getDataSourceStatuses",
        "process_spec_id": "&getProcessSpecIds",
        "start_epoch": 1_730_496_755,
        "requestEpoch": 0,
        "duration": 1814400.0,
        "TTLTier": "&getTTLTier",
        "@template": {"variables": ["temperature", "dewpoint"]},
        "version": "#V01"
    }));
    let now = Utc.timestamp_opt(1_750_000_000, 0).unwrap();
    let lookups = ResolvedLookups::new()
        .with(Lookup::DataSourceSubTypes, &["operational", "retro"])
        .with(Lookup::DataSourceStatuses, &["initial", "active"])
        .with(Lookup::ProcessSpecIds, &["PS:1", "PS:2"])
        .with(Lookup::TtlTiers, &["short", "long"]);

    assert_eq!(
        requested_lookups(&document).into_iter().collect::<Vec<_>>(),
        vec![
            Lookup::ProcessSpecIds,
            Lookup::TtlTiers,
            Lookup::DataSourceSubTypes,
            Lookup::DataSourceStatuses,
        ]
    );

    let t = interpret("DataSource", &document, &lookups, now);

    assert_eq!(t.fields.len(), 11);
    assert_eq!(t.select_mode, SelectMode::LookupDriven);
    assert!(t.is_disabled("type"));
    assert!(t.is_disabled("version"));
    assert_eq!(t.value("type"), Some(&ResolvedValue::from("DS")));
    assert_eq!(t.value("start_epoch"), Some(&ResolvedValue::Integer(1_730_496_755)));
    assert_eq!(t.value("requestEpoch"), Some(&ResolvedValue::Integer(1_750_000_000)));
    assert_eq!(t.value("duration"), Some(&ResolvedValue::Integer(1_814_400)));
    assert_eq!(
        t.value("process_spec_id"),
        Some(&ResolvedValue::Texts(strings(&["PS:1", "PS:2"])))
    );
    assert!(t.select_options("process_spec_id").is_none());
    assert_eq!(t.select_options("TTLTier"), Some(strings(&["short", "long"]).as_slice()));
    assert!(t
        .value("@template")
        .and_then(ResolvedValue::as_text)
        .unwrap()
        .contains("\"temperature\""));
    assert!(t.diagnostics.is_empty());
}
