//! Error types for template interpretation
//!
//! None of these errors escape the interpreter. Each one degrades a single
//! field to a placeholder value and is recorded as a [`FieldDiagnostic`]
//! on the produced [`FormTemplate`](crate::FormTemplate).

use crate::directive::Lookup;

/// Failure of a named lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lookup '{lookup}' failed: {reason}")]
pub struct LookupError {
    /// Lookup that failed
    pub lookup: Lookup,
    /// Human-readable reason
    pub reason: String,
}

impl LookupError {
    /// Create lookup error
    #[inline]
    pub fn new(lookup: Lookup, reason: impl Into<String>) -> Self {
        Self {
            lookup,
            reason: reason.into(),
        }
    }

    /// Error for a lookup the caller never resolved
    #[inline]
    #[must_use]
    pub fn unresolved(lookup: Lookup) -> Self {
        Self::new(lookup, "lookup was not resolved before interpretation")
    }
}

/// Field-level interpretation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Named lookup provider errored
    #[error("lookup failure: {0}")]
    LookupFailure(#[from] LookupError),

    /// Nested value could not be embedded as JSON text
    #[error("serialization failure: {reason}")]
    SerializationFailure {
        /// Serializer message
        reason: String,
    },

    /// `&name` did not name a known lookup
    #[error("unknown function: '{0}'")]
    UnknownDirective(String),
}

impl FieldError {
    /// Create serialization failure
    #[inline]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::SerializationFailure {
            reason: reason.into(),
        }
    }
}

/// A degraded field together with its cause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    /// Field name in the raw template
    pub field: String,
    /// What went wrong
    pub error: FieldError,
}
