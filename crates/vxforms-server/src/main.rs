//! vxForms server binary

use anyhow::Context;
use std::sync::Arc;
use vxforms_core::VxForms;
use vxforms_store::{CredentialsError, InMemoryStore, StoreCredentials, CREDENTIALS_ENV};
use vxforms_server::{cli, init_tracing, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli::command().get_matches();
    let (config, log) = cli::config_from(&matches);
    init_tracing(log.json);

    config.validate().context("invalid configuration")?;
    let addr = config.bind_addr()?;

    match StoreCredentials::from_env() {
        Ok(credentials) => tracing::info!(
            target_host = %credentials.connection_string(),
            bucket = %credentials.cb_bucket,
            "loaded store credentials"
        ),
        Err(CredentialsError::MissingEnv(_)) => {
            tracing::info!("{CREDENTIALS_ENV} not set, serving from the in-memory store only");
        }
        Err(err) => return Err(err).context("could not load store credentials"),
    }

    let store = match &config.seed_file {
        Some(path) => InMemoryStore::load_seed(path)
            .with_context(|| format!("could not seed store from {}", path.display()))?,
        None => InMemoryStore::new(),
    };

    let app = VxForms::new(Arc::new(store), &config);
    tracing::info!(%addr, "vxforms server listening");
    warp::serve(routes(app)).run(addr).await;
    Ok(())
}
