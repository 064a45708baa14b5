//! OAuth client credentials for the Chrome Web Store API.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PublishError, Result};

pub const CLIENT_ID_ENV: &str = "NANO_WEBSTORE_CLIENT";
pub const CLIENT_SECRET_ENV: &str = "NANO_WEBSTORE_SECRET";
pub const REFRESH_TOKEN_ENV: &str = "NANO_WEBSTORE_ACCOUNT";

/// Client id, client secret and refresh token of the publishing account.
///
/// The on-disk field names match the credential file shared with the rest of
/// the build tooling.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "WebStoreClient", default)]
    pub client_id: String,
    #[serde(rename = "WebStoreSecret", default)]
    pub client_secret: String,
    #[serde(rename = "WebStoreAccount", default)]
    pub refresh_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Load credentials from a JSON file.
    ///
    /// A missing file is not an error: it yields `None` and the publisher
    /// reports the problem when a publish is actually attempted.
    pub async fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credential file at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(PublishError::Io {
                    operation: "read credentials".to_string(),
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let credentials = serde_json::from_str(&content).map_err(|e| {
            PublishError::Configuration(format!(
                "Malformed credential file '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!("Loaded credentials from {}", path.display());
        Ok(Some(credentials))
    }

    /// Read credentials from the environment. All three variables must be set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Credentials::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(CLIENT_ID_ENV)?;
        let client_secret = lookup(CLIENT_SECRET_ENV)?;
        let refresh_token = lookup(REFRESH_TOKEN_ENV)?;
        Some(Self::new(client_id, client_secret, refresh_token))
    }

    /// Ensure every field is populated.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("client id", &self.client_id),
            ("client secret", &self.client_secret),
            ("refresh token", &self.refresh_token),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PublishError::Configuration(format!(
                "Web Store credentials are missing: {}",
                missing.join(", ")
            )))
        }
    }
}
