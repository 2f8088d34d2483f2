//! Store credentials
//!
//! YAML credentials file located through the `CREDENTIALS_FILE`
//! environment variable.

use crate::error::CredentialsError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Environment variable naming the credentials file
pub const CREDENTIALS_ENV: &str = "CREDENTIALS_FILE";

/// Connection settings for the document database
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct StoreCredentials {
    /// Host name or connection string
    pub cb_host: String,
    /// User name
    pub cb_user: String,
    /// Password
    pub cb_password: String,
    /// Bucket
    pub cb_bucket: String,
    /// Scope
    #[serde(default)]
    pub cb_scope: String,
    /// Collection
    #[serde(default)]
    pub cb_collection: String,
    /// Additional target names
    #[serde(default)]
    pub targets: Vec<String>,
}

impl StoreCredentials {
    /// Parse from YAML text
    ///
    /// # Errors
    /// Returns `CredentialsError::Yaml` if the text does not match
    pub fn from_yaml(yaml: &str) -> Result<Self, CredentialsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    /// - `CredentialsError::NotFound` if the file does not exist
    /// - `CredentialsError::Io` if it cannot be read
    /// - `CredentialsError::Yaml` if it does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CredentialsError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Load from the file named by `CREDENTIALS_FILE`
    ///
    /// # Errors
    /// `CredentialsError::MissingEnv` when the variable is unset, otherwise as [`Self::load`]
    pub fn from_env() -> Result<Self, CredentialsError> {
        let path = std::env::var_os(CREDENTIALS_ENV)
            .filter(|p| !p.is_empty())
            .ok_or(CredentialsError::MissingEnv(CREDENTIALS_ENV))?;
        Self::load(path)
    }

    /// Connection string; bare hosts get the TLS `couchbases://` scheme
    #[must_use]
    pub fn connection_string(&self) -> String {
        if self.cb_host.contains("couchbase") {
            self.cb_host.clone()
        } else {
            format!("couchbases://{}", self.cb_host)
        }
    }
}

impl fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("cb_host", &self.cb_host)
            .field("cb_user", &self.cb_user)
            .field("cb_password", &"<redacted>")
            .field("cb_bucket", &self.cb_bucket)
            .field("cb_scope", &self.cb_scope)
            .field("cb_collection", &self.cb_collection)
            .field("targets", &self.targets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = "\
cb_host: adb-cb1.gsd.esrl.noaa.gov
cb_user: avid
cb_password: secret
cb_bucket: vxdata
cb_scope: _default
cb_collection: METAR
";

    #[test]
    fn parses_yaml() {
        let creds = StoreCredentials::from_yaml(YAML).unwrap();
        assert_eq!(creds.cb_bucket, "vxdata");
        assert_eq!(creds.cb_collection, "METAR");
        assert!(creds.targets.is_empty());
    }

    #[test]
    fn connection_string_adds_scheme() {
        let mut creds = StoreCredentials::from_yaml(YAML).unwrap();
        assert_eq!(
            creds.connection_string(),
            "couchbases://adb-cb1.gsd.esrl.noaa.gov"
        );

        creds.cb_host = "couchbase://localhost".into();
        assert_eq!(creds.connection_string(), "couchbase://localhost");
    }

    #[test]
    fn debug_redacts_password() {
        let creds = StoreCredentials::from_yaml(YAML).unwrap();
        let text = format!("{creds:?}");
        assert!(!text.contains("secret"));
        assert!(text.contains("<redacted>"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let creds = StoreCredentials::load(file.path()).unwrap();
        assert_eq!(creds.cb_user, "avid");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = StoreCredentials::load("/nonexistent/credentials.yaml").unwrap_err();
        assert!(matches!(err, CredentialsError::NotFound(_)));
    }

    #[test]
    fn missing_field_is_yaml_error() {
        let err = StoreCredentials::from_yaml("cb_host: x\n").unwrap_err();
        assert!(matches!(err, CredentialsError::Yaml(_)));
    }
}
