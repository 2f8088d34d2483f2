//! Template catalog loader
//!
//! Fetches every stored template document and interprets it. Rows that do
//! not decode into `{templateName, template}` are skipped with a warning;
//! only a failure of the templates query itself is an error.

use crate::error::CatalogError;
use crate::lookup::NamedLookupProvider;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use vxforms_store::{Keyspace, SharedStore, Statement};
use vxforms_template::{requested_lookups, FormTemplate, Interpreter, RawTemplate};

/// A stored template document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredTemplate {
    /// Template name
    #[serde(rename = "templateName", default)]
    pub template_name: String,
    /// Raw field map
    pub template: RawTemplate,
}

impl StoredTemplate {
    /// Decode one templates query row
    ///
    /// # Errors
    /// Returns the decode error when the row does not have the stored shape
    pub fn from_row(row: &JsonValue) -> Result<Self, serde_json::Error> {
        let document = row
            .get(Keyspace::Common.collection())
            .cloned()
            .unwrap_or(JsonValue::Null);
        serde_json::from_value(document)
    }
}

/// Loads and interprets stored templates
#[derive(Clone)]
pub struct TemplateCatalog {
    store: SharedStore,
    lookups: NamedLookupProvider,
}

impl TemplateCatalog {
    /// Create catalog over a store, resolving lookups through `lookups`
    #[inline]
    #[must_use]
    pub fn new(store: SharedStore, lookups: NamedLookupProvider) -> Self {
        Self { store, lookups }
    }

    /// Get the lookup provider
    #[inline]
    #[must_use]
    pub fn lookups(&self) -> &NamedLookupProvider {
        &self.lookups
    }

    /// Fetch and decode every stored template
    ///
    /// # Errors
    /// Returns `CatalogError::Store` if the templates query fails
    pub async fn stored(&self) -> Result<Vec<StoredTemplate>, CatalogError> {
        let rows = self.store.query(&Statement::FormTemplates).await?;
        let mut templates = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match StoredTemplate::from_row(row) {
                Ok(template) => templates.push(template),
                Err(err) => tracing::warn!(row = index, error = %err, "skipping undecodable template row"),
            }
        }
        Ok(templates)
    }

    /// Load the whole catalog
    ///
    /// # Errors
    /// Returns `CatalogError::Store` if the templates query fails
    pub async fn load(&self) -> Result<Vec<FormTemplate>, CatalogError> {
        self.load_at(Utc::now()).await
    }

    /// Load the whole catalog, stamping epoch fields with `now`
    ///
    /// # Errors
    /// Returns `CatalogError::Store` if the templates query fails
    pub async fn load_at(&self, now: DateTime<Utc>) -> Result<Vec<FormTemplate>, CatalogError> {
        let stored = self.stored().await?;
        let wanted: BTreeSet<_> = stored
            .iter()
            .flat_map(|t| requested_lookups(&t.template))
            .collect();
        let resolved = self.lookups.resolve(wanted).await;

        let interpreter = Interpreter::new(&resolved, now);
        let forms: Vec<FormTemplate> = stored
            .iter()
            .map(|t| interpreter.interpret(t.template_name.clone(), &t.template))
            .collect();
        tracing::info!(templates = forms.len(), "catalog loaded");
        Ok(forms)
    }

    /// Load one template by name
    ///
    /// # Errors
    /// - `CatalogError::Store` if the templates query fails
    /// - `CatalogError::TemplateNotFound` if no template has that name
    pub async fn find(&self, name: &str) -> Result<FormTemplate, CatalogError> {
        self.find_at(name, Utc::now()).await
    }

    /// Load one template by name, stamping epoch fields with `now`
    ///
    /// # Errors
    /// As [`Self::find`]
    pub async fn find_at(&self, name: &str, now: DateTime<Utc>) -> Result<FormTemplate, CatalogError> {
        let stored = self
            .stored()
            .await?
            .into_iter()
            .find(|t| t.template_name == name)
            .ok_or_else(|| CatalogError::TemplateNotFound(name.to_string()))?;

        let resolved = self.lookups.resolve_template(&stored.template).await;
        Ok(Interpreter::new(&resolved, now).interpret(stored.template_name, &stored.template))
    }
}

impl std::fmt::Debug for TemplateCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateCatalog")
            .field("lookups", &self.lookups)
            .finish_non_exhaustive()
    }
}
