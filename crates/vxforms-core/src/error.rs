//! Error types for vxForms core
//!
//! Provides error handling for:
//! - Template catalog loading
//! - Form submission (commit, retrieve, id listing)
//! - Application configuration
//!
//! Field-level failures never surface here; they degrade into placeholder
//! values inside the interpreted template.

use vxforms_store::{CredentialsError, StoreError};
use vxforms_template::LookupError;

/// Main vxForms error type
#[derive(Debug, thiserror::Error)]
pub enum VxFormsError {
    /// Catalog could not be loaded
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Submission failed
    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// Configuration invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Named lookup failed
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Store failed outside a more specific operation
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl VxFormsError {
    /// Check if the caller supplied bad input rather than hitting a fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Catalog(err) => matches!(err, CatalogError::TemplateNotFound(_)),
            Self::Submission(err) => err.is_client_error(),
            _ => false,
        }
    }
}

/// Errors loading the template catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Templates query failed
    #[error("could not load templates: {0}")]
    Store(#[from] StoreError),

    /// No template with the given name
    #[error("template '{0}' not found")]
    TemplateNotFound(String),
}

/// Errors handling submitted documents
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Document is not a JSON object
    #[error("document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Missing, empty or wildcard id
    #[error("invalid document id: {0}")]
    InvalidId(String),

    /// No document with the given id
    #[error("document '{0}' not found")]
    NotFound(String),

    /// No documents of the requested type
    #[error("no ids found for type '{0}'")]
    NoIds(String),

    /// Store rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmissionError {
    /// Create invalid id error
    pub fn invalid_id(reason: impl Into<String>) -> Self {
        Self::InvalidId(reason.into())
    }

    /// Check if the caller supplied bad input
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotAnObject(_) | Self::InvalidId(_) | Self::NotFound(_))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Bind address does not parse
    #[error("invalid bind address '{0}'")]
    InvalidBind(String),

    /// Cache capacity too small to hold every lookup
    #[error("lookup cache capacity {capacity} is below the minimum of {minimum}")]
    CapacityTooSmall {
        /// Configured capacity
        capacity: u64,
        /// One slot per lookup
        minimum: u64,
    },

    /// Credentials could not be loaded
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// Seed file could not be loaded
    #[error(transparent)]
    Seed(#[from] StoreError),
}
