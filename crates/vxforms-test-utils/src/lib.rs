//! Testing utilities for the vxForms workspace
//!
//! Shared fixtures: sample template documents, seeded stores, fixed clocks.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use vxforms_store::{InMemoryStore, Keyspace, SharedStore};
use vxforms_template::RawTemplate;

/// Unix time of [`fixed_now`]
pub const FIXED_EPOCH: i64 = 1_700_000_000;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(FIXED_EPOCH, 0).single().unwrap()
}

pub fn raw_template(value: JsonValue) -> RawTemplate {
    serde_json::from_value(value).unwrap()
}

/// Data source template exercising every directive
pub fn data_source_template() -> JsonValue {
    json!({
        "id": "DS:METAR:obs:GRIB2",
        "type": "DS",
        "version": "V01",
        "builder_type": "#NetcdfMetarObsBuilderV01",
        "subset": "&getSubsets",
        "subType": "&getSubTypes",
        "region": "&getRegions",
        "sourceIds": "&getDataSourceId",
        "status": "&getDataSourceStatuses",
        "requestedEpoch": 0,
        "validTimeDelta": 1800.0,
        "fcstLen_duration": 3600.9,
        "fcstLens": [0, 6, 12],
        "enabled": true,
        "@mapping": {"station": "name", "offset": 1}
    })
}

/// Process spec template without lookups
pub fn process_spec_template() -> JsonValue {
    json!({
        "id": "PS:METAR",
        "type": "PS",
        "subDocType": "#obs",
        "processSpecStatuses": ["active", "inactive"],
        "scheduleEpoch": "now",
        "thresholds": [0.5, 1, 2.5]
    })
}

/// Template documents as stored in the `COMMON` keyspace, by id
pub fn template_documents() -> Vec<(String, JsonValue)> {
    vec![
        (
            "DS:V01:TEMPLATE".to_string(),
            json!({"templateName": "DS", "template": data_source_template()}),
        ),
        (
            "PS:V01:TEMPLATE".to_string(),
            json!({"templateName": "PS", "template": process_spec_template()}),
        ),
    ]
}

/// Reference data answering every store-backed lookup
pub fn reference_documents() -> Vec<(Keyspace, String, JsonValue)> {
    let common = |id: &str, doc: JsonValue| (Keyspace::Common, id.to_string(), doc);
    let runtime = |id: &str, doc: JsonValue| (Keyspace::Runtime, id.to_string(), doc);
    vec![
        common("MD:ingest:1", json!({"type": "MD", "docType": "ingest", "subset": "METAR", "subType": "GRIB2", "subDocType": "obs"})),
        common("MD:ingest:2", json!({"type": "MD", "docType": "ingest", "subset": "METAR", "subType": "NETCDF", "subDocType": "SQL"})),
        common("MD:ingest:3", json!({"type": "MD", "docType": "ingest", "subset": "RAOB", "subType": "GRIB2", "subDocType": "model"})),
        common("MD:region:CONUS", json!({"type": "MD", "docType": "region", "name": "CONUS"})),
        common("MD:region:E_US", json!({"type": "MD", "docType": "region", "name": "E_US"})),
        common("JOB:V01:METAR", json!({"type": "JOB"})),
        common("MD:V01:DataSourceStatuses", json!({"statuses": ["active", "retired"]})),
        common("MD:V01:Statuses", json!({"statuses": ["draft", "active"]})),
        common("MD:V01:DataSourceTypes", json!({"types": ["obs", "model"]})),
        common("MD:V01:ProcessSpecStatuses", json!({"statuses": ["active", "inactive"]})),
        common("MD:V01:TTLTiers", json!({"Tiers": ["short", "long"], "TierSeconds": [3600, 86400]})),
        runtime("MD:V01:DataSourceSubTypes", json!({"subTypes": ["obs", "model"]})),
        runtime("DS:METAR:obs", json!({"type": "DS"})),
        runtime("DS:RAOB:obs", json!({"type": "DS"})),
        runtime("PS:METAR", json!({"type": "PS"})),
        runtime("IS:METAR", json!({"type": "IS", "docType": "ingest"})),
    ]
}

/// In-memory store holding the sample templates and reference data
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    for (id, doc) in template_documents() {
        store.insert(Keyspace::Common, id, doc);
    }
    for (keyspace, id, doc) in reference_documents() {
        store.insert(keyspace, id, doc);
    }
    Arc::new(store)
}

pub fn shared(store: &Arc<InMemoryStore>) -> SharedStore {
    store.clone()
}
