//! vxForms Template Interpreter
//!
//! Turns loosely-typed template documents into typed form field
//! specifications.
//!
//! # Core Operations
//!
//! - **Decode**: any JSON document into a [`RawTemplate`]
//! - **Scan**: find the named lookups a template requests
//! - **Interpret**: resolve values, infer select fields, apply directives
//!
//! # Architecture
//!
//! ```text
//! RawTemplate ──scan──→ {Lookup} ──(provider, async)──→ ResolvedLookups
//!      │                                                     │
//!      └──────────────────→ Interpreter (sync) ←─────────────┘
//!                                │
//!                                ↓
//!                           FormTemplate
//! ```
//!
//! # Example
//!
//! ```rust
//! use vxforms_template::{interpret, Lookup, RawTemplate, ResolvedLookups, SelectMode};
//!
//! let raw: RawTemplate = serde_json::from_str(r#"{"subType": "&getSubTypes"}"#).unwrap();
//! let lookups = ResolvedLookups::new().with(Lookup::SubTypes, &["GRIB2", "NETCDF"]);
//!
//! let form = interpret("ingest", &raw, &lookups, chrono::Utc::now());
//! assert_eq!(form.select_mode, SelectMode::LookupDriven);
//! assert_eq!(form.select_options("subType").unwrap().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod directive;
pub mod error;
pub mod field;
pub mod interpreter;
pub mod value;

// Re-exports for convenience
pub use directive::{requested_lookups, Directive, Lookup, LookupKind};
pub use error::{FieldDiagnostic, FieldError, LookupError};
pub use field::{FieldSpec, FormTemplate, ResolvedValue, SelectMode};
pub use interpreter::{interpret, Interpreter, ResolvedLookups};
pub use value::{RawTemplate, RawValue, SequenceShape};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with templates
    pub use crate::{
        interpret, FieldSpec, FormTemplate, Lookup, LookupKind, RawTemplate, RawValue,
        ResolvedLookups, ResolvedValue, SelectMode,
    };
}
