//! Error types for the document store seam
//!
//! Provides error handling for:
//! - Statement execution
//! - Credential and seed file loading

use std::path::PathBuf;

/// Errors raised by a [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Statement execution failed
    #[error("query failed [{statement}]: {reason}")]
    Query {
        /// Statement text
        statement: String,
        /// Failure reported by the store
        reason: String,
    },

    /// Store cannot be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Seed file could not be read
    #[error("io error reading seed {path}: {source}")]
    SeedIo {
        /// Seed file path
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid
    #[error("invalid seed {path}: {source}")]
    SeedFormat {
        /// Seed file path
        path: PathBuf,
        /// Decode error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create query error
    pub fn query(statement: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Query {
            statement: statement.into(),
            reason: reason.into(),
        }
    }
}

/// Errors loading store credentials
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    /// `CREDENTIALS_FILE` is not set
    #[error("{0} environment variable not set - should contain the path to the credentials.yaml file")]
    MissingEnv(&'static str),

    /// File does not exist
    #[error("credentials file {0} not found")]
    NotFound(PathBuf),

    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Credentials file path
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid YAML for the credentials shape
    #[error("invalid credentials yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::query("SELECT 1", "timeout");
        assert_eq!(err.to_string(), "query failed [SELECT 1]: timeout");
    }

    #[test]
    fn seed_error_keeps_source() {
        use std::error::Error as _;

        let err = StoreError::SeedIo {
            path: PathBuf::from("seed.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "io error reading seed seed.json: missing");
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_env_display() {
        let err = CredentialsError::MissingEnv("CREDENTIALS_FILE");
        assert!(err.to_string().starts_with("CREDENTIALS_FILE environment variable not set"));
    }
}
