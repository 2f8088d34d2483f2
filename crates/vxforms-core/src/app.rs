//! Application context
//!
//! Wires one store into the lookup provider, catalog and submission
//! handler so request handlers share a single lookup cache.

use crate::catalog::TemplateCatalog;
use crate::config::VxFormsConfig;
use crate::lookup::NamedLookupProvider;
use crate::submission::FormSubmission;
use vxforms_store::SharedStore;

/// Shared services of a running vxForms instance
#[derive(Debug, Clone)]
pub struct VxForms {
    catalog: TemplateCatalog,
    submission: FormSubmission,
}

impl VxForms {
    /// Build services over a store
    #[must_use]
    pub fn new(store: SharedStore, config: &VxFormsConfig) -> Self {
        let lookups = NamedLookupProvider::new(store.clone(), config.lookup_cache());
        Self {
            catalog: TemplateCatalog::new(store.clone(), lookups),
            submission: FormSubmission::new(store),
        }
    }

    /// Get the template catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Get the lookup provider
    #[inline]
    #[must_use]
    pub fn lookups(&self) -> &NamedLookupProvider {
        self.catalog.lookups()
    }

    /// Get the submission handler
    #[inline]
    #[must_use]
    pub fn submission(&self) -> &FormSubmission {
        &self.submission
    }
}
