//! In-memory document store
//!
//! Evaluates catalog statements through their [`QueryPlan`]. Used for
//! local runs (seeded from a JSON file) and tests.
//!
//! Seed file shape:
//!
//! ```text
//! { "COMMON": { "<id>": {..}, .. }, "RUNTIME": { "<id>": {..}, .. } }
//! ```

use crate::error::StoreError;
use crate::statement::{Keyspace, QueryPlan, Statement};
use crate::store::DocumentStore;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Seed file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    /// Documents of the `COMMON` keyspace by id
    #[serde(rename = "COMMON", default)]
    pub common: BTreeMap<String, JsonValue>,
    /// Documents of the `RUNTIME` keyspace by id
    #[serde(rename = "RUNTIME", default)]
    pub runtime: BTreeMap<String, JsonValue>,
}

/// Concurrent in-memory store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    common: DashMap<String, JsonValue>,
    runtime: DashMap<String, JsonValue>,
    queries: AtomicU64,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store holding the seed documents
    #[must_use]
    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        for (id, doc) in seed.common {
            store.insert(Keyspace::Common, id, doc);
        }
        for (id, doc) in seed.runtime {
            store.insert(Keyspace::Runtime, id, doc);
        }
        store
    }

    /// Load a seed file
    ///
    /// # Errors
    /// - `StoreError::SeedIo` if the file cannot be read
    /// - `StoreError::SeedFormat` if it is not a valid seed
    pub fn load_seed(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;
        let seed: Seed = serde_json::from_str(&text).map_err(|source| StoreError::SeedFormat {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            common = seed.common.len(),
            runtime = seed.runtime.len(),
            "seeded in-memory store"
        );
        Ok(Self::from_seed(seed))
    }

    /// Insert or replace a document
    pub fn insert(&self, keyspace: Keyspace, id: impl Into<String>, document: JsonValue) {
        self.keyspace(keyspace).insert(id.into(), document);
    }

    /// Number of documents in a keyspace
    #[inline]
    #[must_use]
    pub fn len(&self, keyspace: Keyspace) -> usize {
        self.keyspace(keyspace).len()
    }

    /// Number of statements executed so far
    #[inline]
    #[must_use]
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    fn keyspace(&self, keyspace: Keyspace) -> &DashMap<String, JsonValue> {
        match keyspace {
            Keyspace::Common => &self.common,
            Keyspace::Runtime => &self.runtime,
        }
    }

    fn evaluate(&self, plan: &QueryPlan) -> Vec<JsonValue> {
        // Sorted by id so results do not depend on shard iteration order
        let mut matched: Vec<(String, JsonValue)> = self
            .keyspace(plan.keyspace)
            .iter()
            .filter(|entry| plan.matches(entry.key(), entry.value()))
            .map(|entry| (entry.key().clone(), plan.project(entry.key(), entry.value())))
            .collect();
        matched.sort_by(|a, b| a.0.cmp(&b.0));

        let mut rows: Vec<JsonValue> = Vec::with_capacity(matched.len());
        for (_, row) in matched {
            if plan.distinct && rows.contains(&row) {
                continue;
            }
            rows.push(row);
        }
        rows
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn query(&self, statement: &Statement) -> Result<Vec<JsonValue>, StoreError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let rows = self.evaluate(&statement.plan());
        tracing::debug!(statement = %statement, rows = rows.len(), "in-memory query");
        Ok(rows)
    }

    async fn get(&self, keyspace: Keyspace, id: &str) -> Result<Option<JsonValue>, StoreError> {
        Ok(self.keyspace(keyspace).get(id).map(|doc| doc.value().clone()))
    }

    async fn upsert(
        &self,
        keyspace: Keyspace,
        id: &str,
        document: JsonValue,
    ) -> Result<(), StoreError> {
        self.insert(keyspace, id, document);
        Ok(())
    }
}
