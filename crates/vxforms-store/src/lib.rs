//! vxForms Document Store
//!
//! The seam between vxForms and its document database.
//!
//! # Core Concepts
//!
//! - **Statement**: every query the application issues, as a closed enum
//! - **DocumentStore**: async trait for query, get and upsert
//! - **InMemoryStore**: store evaluating statement plans over seeded documents
//! - **StoreCredentials**: YAML connection settings from `CREDENTIALS_FILE`
//!
//! # Example
//!
//! ```rust
//! use vxforms_store::{InMemoryStore, Keyspace, Statement};
//!
//! let store = InMemoryStore::new();
//! store.insert(Keyspace::Runtime, "DS:METAR", serde_json::json!({"type": "DS"}));
//!
//! let plan = Statement::DataSourceIds.plan();
//! assert_eq!(plan.keyspace, Keyspace::Runtime);
//! assert_eq!(store.len(Keyspace::Runtime), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod credentials;
pub mod error;
pub mod memory;
pub mod statement;
pub mod store;

pub use credentials::{StoreCredentials, CREDENTIALS_ENV};
pub use error::{CredentialsError, StoreError};
pub use memory::{InMemoryStore, Seed};
pub use statement::{Filter, Keyspace, Projection, QueryPlan, ReferenceList, Statement};
pub use store::{DocumentStore, SharedStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
