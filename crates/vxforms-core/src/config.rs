//! Application configuration

use crate::cache::{LookupCache, DEFAULT_CAPACITY, MIN_CAPACITY};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// vxForms configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VxFormsConfig {
    /// Listen address
    pub bind: String,
    /// Maximum cached lookup results
    pub cache_capacity: u64,
    /// Lookup result lifetime in seconds; `None` keeps results for the process lifetime
    pub cache_ttl_secs: Option<u64>,
    /// JSON seed file for the in-memory store
    pub seed_file: Option<PathBuf>,
}

impl VxFormsConfig {
    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// With lookup cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With lookup result lifetime
    #[inline]
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = Some(ttl.as_secs());
        self
    }

    /// With seed file
    #[inline]
    #[must_use]
    pub fn with_seed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_file = Some(path.into());
        self
    }

    /// Parsed listen address
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBind` if the address does not parse
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(self.bind.clone()))
    }

    /// Check the configuration
    ///
    /// # Errors
    /// - `ConfigError::InvalidBind` for an unparsable address
    /// - `ConfigError::CapacityTooSmall` when the cache cannot hold every lookup
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.cache_capacity < MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.cache_capacity,
                minimum: MIN_CAPACITY,
            });
        }
        Ok(())
    }

    /// Build the lookup cache described by this configuration
    #[must_use]
    pub fn lookup_cache(&self) -> LookupCache {
        match self.cache_ttl_secs {
            Some(secs) => LookupCache::with_ttl(self.cache_capacity, Duration::from_secs(secs)),
            None => LookupCache::new(self.cache_capacity),
        }
    }
}

impl Default for VxFormsConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl_secs: None,
            seed_file: None,
        }
    }
}
