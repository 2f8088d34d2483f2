//! Named lookup provider
//!
//! Maps every [`Lookup`] to its source (a catalog [`Statement`] or a fixed
//! list), projects result rows to strings and caches successful results in
//! a [`LookupCache`].

use crate::cache::LookupCache;
use futures::future::join_all;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use vxforms_store::{ReferenceList, SharedStore, Statement};
use vxforms_template::{requested_lookups, Lookup, LookupError, RawTemplate, ResolvedLookups};

/// Fixed CTC sub document types
pub const CTC_SUB_DOC_TYPES: [&str; 2] = ["CEILING", "VISIBILITY"];

/// Sub document type dropped from the sub document type list
const EXCLUDED_SUB_DOC_TYPE: &str = "SQL";

/// Where a lookup gets its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSource {
    /// Result rows of a store statement
    Store(Statement),
    /// Fixed list
    Constant(&'static [&'static str]),
}

impl LookupSource {
    /// Source of a lookup
    #[must_use]
    pub fn of(lookup: Lookup) -> Self {
        let statement = match lookup {
            Lookup::CtcSubDocTypes => return Self::Constant(&CTC_SUB_DOC_TYPES),
            Lookup::SubTypes => Statement::DistinctSubTypes,
            Lookup::SubDocTypes => Statement::DistinctSubDocTypes,
            Lookup::Subsets => Statement::DistinctSubsets,
            Lookup::Regions => Statement::Regions,
            Lookup::DataSourceIds => Statement::DataSourceIds,
            Lookup::ProcessSpecIds => Statement::ProcessSpecIds,
            Lookup::IngestDocumentIds => Statement::IngestDocumentIds,
            Lookup::JobSpecIds => Statement::JobSpecIds,
            Lookup::DataSourceTypes => Statement::Reference(ReferenceList::DataSourceTypes),
            Lookup::TtlTiers => Statement::Reference(ReferenceList::TtlTiers),
            Lookup::TtlTierSeconds => Statement::Reference(ReferenceList::TtlTierSeconds),
            Lookup::DataSourceSubTypes => Statement::Reference(ReferenceList::DataSourceSubTypes),
            Lookup::DataSourceStatuses => Statement::Reference(ReferenceList::DataSourceStatuses),
            Lookup::Statuses => Statement::Reference(ReferenceList::Statuses),
            Lookup::ProcessSpecStatuses => {
                Statement::Reference(ReferenceList::ProcessSpecStatuses)
            }
        };
        Self::Store(statement)
    }
}

/// Project result rows to strings
///
/// String columns are taken as-is, array columns contribute every non-null
/// element rendered as text. Rows without the column, and rows whose column
/// holds a non-string scalar, are ignored.
#[must_use]
pub fn project_rows(rows: &[JsonValue], column: &str) -> Vec<String> {
    let mut values = Vec::with_capacity(rows.len());
    for row in rows {
        match row.get(column) {
            Some(JsonValue::String(s)) => values.push(s.clone()),
            Some(JsonValue::Array(items)) => {
                values.extend(items.iter().filter(|v| !v.is_null()).map(render));
            }
            None | Some(JsonValue::Null) => {}
            Some(other) => tracing::debug!(column, value = %other, "skipping non-string column"),
        }
    }
    values
}

fn render(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolves named lookups against a document store
#[derive(Clone)]
pub struct NamedLookupProvider {
    store: SharedStore,
    cache: LookupCache,
}

impl NamedLookupProvider {
    /// Create provider over a store and cache
    #[inline]
    #[must_use]
    pub fn new(store: SharedStore, cache: LookupCache) -> Self {
        Self { store, cache }
    }

    /// Get the cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Resolve one lookup, from cache when possible
    ///
    /// # Errors
    /// Returns `LookupError` when the store query fails
    pub async fn fetch(&self, lookup: Lookup) -> Result<Arc<[String]>, LookupError> {
        let statement = match LookupSource::of(lookup) {
            LookupSource::Constant(values) => {
                return Ok(values.iter().map(ToString::to_string).collect());
            }
            LookupSource::Store(statement) => statement,
        };

        if let Some(cached) = self.cache.get(lookup).await {
            tracing::debug!(%lookup, "lookup cache hit");
            return Ok(cached);
        }

        self.cache
            .try_get_with(lookup, self.query(lookup, statement))
            .await
    }

    async fn query(&self, lookup: Lookup, statement: Statement) -> Result<Arc<[String]>, LookupError> {
        let rows = self.store.query(&statement).await.map_err(|err| {
            tracing::warn!(%lookup, error = %err, "lookup query failed");
            LookupError::new(lookup, err.to_string())
        })?;

        let mut values = project_rows(&rows, statement.column());
        if lookup == Lookup::SubDocTypes {
            values.retain(|v| v != EXCLUDED_SUB_DOC_TYPE);
        }
        tracing::debug!(%lookup, count = values.len(), "lookup resolved");
        Ok(values.into())
    }

    /// Resolve a set of lookups concurrently
    pub async fn resolve<I>(&self, lookups: I) -> ResolvedLookups
    where
        I: IntoIterator<Item = Lookup>,
    {
        let lookups: Vec<Lookup> = lookups.into_iter().collect();
        let results = join_all(lookups.iter().map(|&lookup| self.fetch(lookup))).await;

        let mut resolved = ResolvedLookups::new();
        for (lookup, result) in lookups.into_iter().zip(results) {
            resolved.insert(lookup, result);
        }
        resolved
    }

    /// Resolve every lookup a template requests, each once
    pub async fn resolve_template(&self, raw: &RawTemplate) -> ResolvedLookups {
        self.resolve(requested_lookups(raw)).await
    }
}

impl std::fmt::Debug for NamedLookupProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedLookupProvider")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_project_scalar_and_array_columns() {
        let rows = vec![
            json!({"subset": "METAR"}),
            json!({}),
            json!({"subset": null}),
            json!({"subset": "RAOB"}),
        ];
        assert_eq!(project_rows(&rows, "subset"), vec!["METAR", "RAOB"]);

        let rows = vec![json!({"TierSeconds": [3600, 86400]})];
        assert_eq!(project_rows(&rows, "TierSeconds"), vec!["3600", "86400"]);
    }

    #[test]
    fn test_non_string_scalars_are_skipped() {
        let rows = vec![
            json!({"name": "CONUS"}),
            json!({"name": 5}),
            json!({"name": true}),
            json!({"name": {"nested": "E_US"}}),
            json!({"name": "E_US"}),
        ];
        assert_eq!(project_rows(&rows, "name"), vec!["CONUS", "E_US"]);
    }

    #[test]
    fn test_every_lookup_has_a_source() {
        for lookup in Lookup::ALL {
            match LookupSource::of(lookup) {
                LookupSource::Constant(values) => {
                    assert_eq!(lookup, Lookup::CtcSubDocTypes);
                    assert_eq!(values, &CTC_SUB_DOC_TYPES);
                }
                LookupSource::Store(statement) => assert!(!statement.n1ql().is_empty()),
            }
        }
    }

    #[test]
    fn test_reference_sources() {
        assert_eq!(
            LookupSource::of(Lookup::TtlTiers),
            LookupSource::Store(Statement::Reference(ReferenceList::TtlTiers))
        );
        assert_eq!(
            LookupSource::of(Lookup::DataSourceIds),
            LookupSource::Store(Statement::DataSourceIds)
        );
    }
}
