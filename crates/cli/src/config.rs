use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use eyre::{Result, WrapErr};
use nano_manifest::{DEFAULT_DIST_DIR, ids};
use nano_webstore::WebStoreEndpoints;
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
    #[serde(default)]
    pub credentials_path: Option<String>,
    #[serde(default)]
    pub webstore: WebStoreConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WebStoreConfig {
    pub extension_id: String,
    pub timeout_secs: Option<u64>,
    pub token_url: String,
    pub api_base: String,
    pub upload_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
            credentials_path: None,
            webstore: WebStoreConfig::default(),
        }
    }
}

impl Default for WebStoreConfig {
    fn default() -> Self {
        let endpoints = WebStoreEndpoints::default();
        Self {
            extension_id: ids::CHROMIUM.to_string(),
            timeout_secs: None,
            token_url: endpoints.token_url,
            api_base: endpoints.api_base,
            upload_base: endpoints.upload_base,
        }
    }
}

impl WebStoreConfig {
    pub fn endpoints(&self) -> WebStoreEndpoints {
        WebStoreEndpoints {
            token_url: self.token_url.clone(),
            api_base: self.api_base.clone(),
            upload_base: self.upload_base.clone(),
        }
    }
}

fn default_dist_dir() -> String {
    DEFAULT_DIST_DIR.to_string()
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        get_default_config_dir().join("config.json")
    }

    /// Credential file used when neither the command line nor the config names one.
    pub fn get_default_credentials_path() -> PathBuf {
        get_default_config_dir().join("credentials.json")
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(Self::get_default_credentials_path)
    }

    /// Load the configuration, falling back to defaults when the file is absent.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["dist_dir"] => {
                self.dist_dir = value.to_string();
            }
            ["credentials_path"] => {
                self.credentials_path = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            ["webstore", "extension_id"] => {
                self.webstore.extension_id = value.to_string();
            }
            ["webstore", "timeout_secs"] => {
                self.webstore.timeout_secs = if value.is_empty() {
                    None
                } else {
                    Some(
                        value
                            .parse::<u64>()
                            .map_err(|_| eyre::eyre!("Invalid number of seconds: {}", value))?,
                    )
                };
            }
            ["webstore", "token_url"] => {
                self.webstore.token_url = value.to_string();
            }
            ["webstore", "api_base"] => {
                self.webstore.api_base = value.to_string();
            }
            ["webstore", "upload_base"] => {
                self.webstore.upload_base = value.to_string();
            }
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        let value = match parts.as_slice() {
            ["dist_dir"] => self.dist_dir.clone(),
            ["credentials_path"] => self.credentials_path().display().to_string(),
            ["webstore", "extension_id"] => self.webstore.extension_id.clone(),
            ["webstore", "timeout_secs"] => self
                .webstore
                .timeout_secs
                .map(|t| t.to_string())
                .unwrap_or_default(),
            ["webstore", "token_url"] => self.webstore.token_url.clone(),
            ["webstore", "api_base"] => self.webstore.api_base.clone(),
            ["webstore", "upload_base"] => self.webstore.upload_base.clone(),
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        };

        Ok(value)
    }

    pub fn show_all(&self) -> String {
        format!(
            "Configuration:\n\
             ├─ dist_dir: {}\n\
             └─ credentials_path: {}\n\
             Web Store:\n\
             ├─ extension_id: {}\n\
             ├─ timeout_secs: {}\n\
             ├─ token_url: {}\n\
             ├─ api_base: {}\n\
             └─ upload_base: {}",
            self.dist_dir,
            self.credentials_path().display(),
            self.webstore.extension_id,
            self.webstore
                .timeout_secs
                .map(|t| t.to_string())
                .unwrap_or_else(|| "(not set)".to_string()),
            self.webstore.token_url,
            self.webstore.api_base,
            self.webstore.upload_base,
        )
    }
}

/// Get the default configuration directory
fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "nano", "nano-build") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory if we can't determine project dirs
        PathBuf::from(".nano-build").join("config")
    }
}
