//! Form submission
//!
//! Collects posted form values into a document and moves documents in and
//! out of the `RUNTIME` keyspace.

use crate::error::SubmissionError;
use serde_json::{Map, Value as JsonValue};
use vxforms_store::{Keyspace, SharedStore, Statement};

/// Version stamped on collected documents that do not post one
pub const DEFAULT_VERSION: &str = "V01";

/// Document type listed when the caller names none
pub const DEFAULT_DOC_TYPE: &str = "DS";

/// Character that may not appear in a committed id
const WILDCARD: char = '*';

/// Collect posted form pairs into a document
///
/// Keys posted once become strings, keys posted more than once become
/// string arrays in posting order.
#[must_use]
pub fn collect_form_fields<I, K, V>(pairs: I) -> JsonValue
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut document = Map::new();
    for (key, value) in pairs {
        let value = JsonValue::String(value.into());
        match document.entry(key.into()) {
            serde_json::map::Entry::Vacant(slot) => {
                slot.insert(value);
            }
            serde_json::map::Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if let JsonValue::Array(values) = existing {
                    values.push(value);
                } else {
                    let first = existing.take();
                    *existing = JsonValue::Array(vec![first, value]);
                }
            }
        }
    }
    document
        .entry("version")
        .or_insert_with(|| JsonValue::String(DEFAULT_VERSION.to_string()));
    JsonValue::Object(document)
}

/// Check a document can be committed and return its id
///
/// # Errors
/// - `SubmissionError::NotAnObject` for non-object documents
/// - `SubmissionError::InvalidId` for a missing, empty or wildcard id
pub fn document_id(document: &JsonValue) -> Result<&str, SubmissionError> {
    let object = document
        .as_object()
        .ok_or_else(|| SubmissionError::NotAnObject(json_kind(document)))?;
    match object.get("id").and_then(JsonValue::as_str) {
        None => Err(SubmissionError::invalid_id("the id field is missing")),
        Some("") => Err(SubmissionError::invalid_id("the id field is empty")),
        Some(id) if id.contains(WILDCARD) => Err(SubmissionError::invalid_id(format!(
            "'{id}' contains '{WILDCARD}'"
        ))),
        Some(id) => Ok(id),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Commits, retrieves and lists runtime documents
#[derive(Clone)]
pub struct FormSubmission {
    store: SharedStore,
}

impl FormSubmission {
    /// Create handler over a store
    #[inline]
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Upsert a document under its own id, returning the id
    ///
    /// # Errors
    /// - `SubmissionError::NotAnObject` / `SubmissionError::InvalidId` for bad documents
    /// - `SubmissionError::Store` if the upsert fails
    pub async fn commit(&self, document: JsonValue) -> Result<String, SubmissionError> {
        let id = document_id(&document)?.to_string();
        self.store.upsert(Keyspace::Runtime, &id, document).await?;
        tracing::info!(%id, "document committed");
        Ok(id)
    }

    /// Fetch a runtime document
    ///
    /// # Errors
    /// - `SubmissionError::NotFound` if no document has the id
    /// - `SubmissionError::Store` if the read fails
    pub async fn retrieve(&self, id: &str) -> Result<JsonValue, SubmissionError> {
        self.store
            .get(Keyspace::Runtime, id)
            .await?
            .ok_or_else(|| SubmissionError::NotFound(id.to_string()))
    }

    /// Ids of runtime documents of a type
    ///
    /// # Errors
    /// - `SubmissionError::NoIds` if there are none
    /// - `SubmissionError::Store` if the query fails
    pub async fn list_ids(&self, doc_type: Option<&str>) -> Result<Vec<String>, SubmissionError> {
        let doc_type = doc_type.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_DOC_TYPE);
        let statement = Statement::IdsByType(doc_type.to_string());
        let rows = self.store.query(&statement).await?;

        let ids: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get(statement.column()).and_then(JsonValue::as_str))
            .map(ToString::to_string)
            .collect();
        if ids.is_empty() {
            return Err(SubmissionError::NoIds(doc_type.to_string()));
        }
        tracing::debug!(doc_type, count = ids.len(), "listed ids");
        Ok(ids)
    }
}

impl std::fmt::Debug for FormSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSubmission").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_collect_single_and_repeated_keys() {
        let doc = collect_form_fields([
            ("id", "DS:METAR"),
            ("subset", "METAR"),
            ("region", "CONUS"),
            ("region", "ALL_HRRR"),
            ("region", "E_US"),
        ]);
        assert_eq!(
            doc,
            json!({
                "id": "DS:METAR",
                "subset": "METAR",
                "region": ["CONUS", "ALL_HRRR", "E_US"],
                "version": "V01"
            })
        );
    }

    #[test]
    fn test_collect_keeps_posted_version() {
        let doc = collect_form_fields([("version", "V02")]);
        assert_eq!(doc, json!({"version": "V02"}));
    }

    #[test]
    fn test_document_id_rules() {
        assert_eq!(document_id(&json!({"id": "DS:1"})).unwrap(), "DS:1");
        assert!(matches!(
            document_id(&json!({"id": "DS:*"})),
            Err(SubmissionError::InvalidId(_))
        ));
        assert!(matches!(
            document_id(&json!({"id": ""})),
            Err(SubmissionError::InvalidId(_))
        ));
        assert!(matches!(
            document_id(&json!({"id": 7})),
            Err(SubmissionError::InvalidId(_))
        ));
        assert!(matches!(
            document_id(&json!(["id"])),
            Err(SubmissionError::NotAnObject("an array"))
        ));
    }
}
