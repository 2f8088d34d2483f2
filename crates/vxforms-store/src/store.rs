//! Document store trait
//!
//! The single seam between the application and the document database.
//! Connection and authentication lifecycle belong to implementations.

use crate::error::StoreError;
use crate::statement::{Keyspace, Statement};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Document database operations used by the application
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a catalog statement, returning its rows
    async fn query(&self, statement: &Statement) -> Result<Vec<JsonValue>, StoreError>;

    /// Fetch one document by id
    async fn get(&self, keyspace: Keyspace, id: &str) -> Result<Option<JsonValue>, StoreError>;

    /// Insert or replace one document
    async fn upsert(&self, keyspace: Keyspace, id: &str, document: JsonValue)
        -> Result<(), StoreError>;
}

/// Shared handle to a store
pub type SharedStore = Arc<dyn DocumentStore>;

