//! vxForms HTTP server
//!
//! JSON surface over the template catalog and document submission.
//! HTML rendering is left to clients.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod routes;

pub use routes::routes;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global tracing subscriber
///
/// Filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
