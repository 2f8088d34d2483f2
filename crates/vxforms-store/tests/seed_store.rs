//! Seeded in-memory store behaviour

use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use vxforms_store::{DocumentStore, InMemoryStore, Keyspace, ReferenceList, Statement, StoreError};

const SEED: &str = r#"{
  "COMMON": {
    "DS:TEMPLATE": {"templateName": "DS", "template": {"type": "DS"}},
    "PS:TEMPLATE": {"templateName": "PS", "template": {"type": "PS"}},
    "JOB:V01:METAR": {"type": "JOB"},
    "MD:V01:TTLTiers": {"Tiers": ["short", "long"], "TierSeconds": [3600, 86400]},
    "MD:region:CONUS": {"type": "MD", "docType": "region", "name": "CONUS"},
    "MD:region:ALL_HRRR": {"type": "MD", "docType": "region", "name": "ALL_HRRR"}
  },
  "RUNTIME": {
    "DS:METAR": {"type": "DS"},
    "DS:RAOB": {"type": "DS"},
    "MD:V01:DataSourceSubTypes": {"subTypes": ["obs", "model"]}
  }
}"#;

fn write_seed(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_seed_file_serves_statements() {
    let file = write_seed(SEED);
    let store = InMemoryStore::load_seed(file.path()).unwrap();

    let templates = store.query(&Statement::FormTemplates).await.unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0]["COMMON"]["templateName"], json!("DS"));

    let ids = store.query(&Statement::DataSourceIds).await.unwrap();
    assert_eq!(ids, vec![json!({"id": "DS:METAR"}), json!({"id": "DS:RAOB"})]);

    let jobs = store.query(&Statement::JobSpecIds).await.unwrap();
    assert_eq!(jobs, vec![json!({"id": "JOB:V01:METAR"})]);

    let regions = store.query(&Statement::Regions).await.unwrap();
    assert_eq!(regions, vec![json!({"name": "ALL_HRRR"}), json!({"name": "CONUS"})]);
}

#[tokio::test]
async fn test_reference_lists_come_from_their_keyspace() {
    let file = write_seed(SEED);
    let store = InMemoryStore::load_seed(file.path()).unwrap();

    let seconds = store
        .query(&Statement::Reference(ReferenceList::TtlTierSeconds))
        .await
        .unwrap();
    assert_eq!(seconds, vec![json!({"TierSeconds": [3600, 86400]})]);

    let sub_types = store
        .query(&Statement::Reference(ReferenceList::DataSourceSubTypes))
        .await
        .unwrap();
    assert_eq!(sub_types, vec![json!({"subTypes": ["obs", "model"]})]);
}

#[test]
fn test_malformed_seed_is_format_error() {
    let file = write_seed("{ not json");
    let err = InMemoryStore::load_seed(file.path()).unwrap_err();
    assert!(matches!(err, StoreError::SeedFormat { .. }));
}

#[test]
fn test_missing_seed_is_io_error() {
    let err = InMemoryStore::load_seed("/nonexistent/seed.json").unwrap_err();
    assert!(matches!(err, StoreError::SeedIo { .. }));
}

#[tokio::test]
async fn test_concurrent_upserts() {
    let store = std::sync::Arc::new(InMemoryStore::new());
    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .upsert(Keyspace::Runtime, &format!("DS:{i}"), json!({"type": "DS"}))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.len(Keyspace::Runtime), 16);
    let ids = store.query(&Statement::IdsByType("DS".into())).await.unwrap();
    assert_eq!(ids.len(), 16);
}
