//! vxForms Core
//!
//! Asynchronous services around the template interpreter.
//!
//! # Core Components
//!
//! - **NamedLookupProvider**: resolves `&name` lookups against the store,
//!   caching each successful result process-wide
//! - **TemplateCatalog**: loads stored templates and interprets them
//! - **FormSubmission**: collects, commits, retrieves and lists documents
//! - **VxForms**: one shared context wiring the above to a store
//!
//! # Data Flow
//!
//! ```text
//! DocumentStore ──rows──→ TemplateCatalog ──RawTemplate──→ Interpreter
//!       ↑                                                      ↑
//!       └──── NamedLookupProvider (LookupCache) ──ResolvedLookups┘
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod app;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lookup;
pub mod submission;

pub use app::VxForms;
pub use cache::{LookupCache, MIN_CAPACITY};
pub use catalog::{StoredTemplate, TemplateCatalog};
pub use config::VxFormsConfig;
pub use error::{CatalogError, ConfigError, SubmissionError, VxFormsError};
pub use lookup::{project_rows, LookupSource, NamedLookupProvider};
pub use submission::{collect_form_fields, document_id, FormSubmission};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with vxForms services
    pub use crate::{
        collect_form_fields, FormSubmission, LookupCache, NamedLookupProvider, TemplateCatalog,
        VxForms, VxFormsConfig, VxFormsError,
    };
}
