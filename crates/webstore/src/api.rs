//! Chrome Web Store endpoints and the response bodies we rely on.

use serde::Deserialize;
use url::Url;

use crate::error::{PublishError, PublishStep, Result};
use crate::http::HttpResponse;

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/chromewebstore/v1.1";
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/chromewebstore/v1.1";

pub const API_VERSION_HEADER: &str = "x-goog-api-version";
pub const API_VERSION: &str = "2";

pub const UPLOAD_SUCCESS: &str = "SUCCESS";
pub const STATUS_OK: &str = "OK";
pub const STATUS_PENDING_REVIEW: &str = "ITEM_PENDING_REVIEW";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebStoreEndpoints {
    pub token_url: String,
    pub api_base: String,
    pub upload_base: String,
}

impl Default for WebStoreEndpoints {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
        }
    }
}

impl WebStoreEndpoints {
    pub fn token_url(&self) -> Result<Url> {
        parse_endpoint(&self.token_url)
    }

    /// `PUT` target for a new package of `extension_id`.
    pub fn upload_url(&self, extension_id: &str) -> Result<Url> {
        item_url(&parse_endpoint(&self.upload_base)?, extension_id, None)
    }

    /// `POST` target that submits the last upload of `extension_id`.
    pub fn publish_url(&self, extension_id: &str, target: PublishTarget) -> Result<Url> {
        let mut url = item_url(&parse_endpoint(&self.api_base)?, extension_id, Some("publish"))?;
        if let Some(value) = target.query_value() {
            url.query_pairs_mut().append_pair("publishTarget", value);
        }
        Ok(url)
    }
}

fn parse_endpoint(value: &str) -> Result<Url> {
    Url::parse(value)
        .map_err(|e| PublishError::Configuration(format!("Invalid endpoint '{}': {}", value, e)))
}

fn item_url(base: &Url, extension_id: &str, action: Option<&str>) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            PublishError::Configuration(format!("Endpoint '{}' cannot be a base URL", base))
        })?;
        segments.pop_if_empty().push("items").push(extension_id);
        if let Some(action) = action {
            segments.push(action);
        }
    }
    Ok(url)
}

/// Audience of a publish request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishTarget {
    #[default]
    Default,
    TrustedTesters,
}

impl PublishTarget {
    fn query_value(self) -> Option<&'static str> {
        match self {
            PublishTarget::Default => None,
            PublishTarget::TrustedTesters => Some("trustedTesters"),
        }
    }
}

impl std::str::FromStr for PublishTarget {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(PublishTarget::Default),
            "trusted-testers" | "trustedTesters" => Ok(PublishTarget::TrustedTesters),
            other => Err(PublishError::Configuration(format!(
                "Unknown publish target '{}', expected 'default' or 'trusted-testers'",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<serde_json::Value>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadResponse {
    pub upload_state: Option<String>,
    #[serde(default)]
    pub item_error: Vec<ItemError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemError {
    pub error_code: Option<String>,
    pub error_detail: Option<String>,
}

impl ItemError {
    pub fn describe(&self) -> String {
        match (&self.error_code, &self.error_detail) {
            (Some(code), Some(detail)) => format!("{}: {}", code, detail),
            (Some(code), None) => code.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublishResponse {
    pub status: Option<PublishStatus>,
    #[serde(default)]
    pub status_detail: Vec<String>,
}

/// The store reports `status` as a list, older responses used a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PublishStatus {
    One(String),
    Many(Vec<String>),
}

impl PublishStatus {
    /// A bare string matches on substring, a list on whole elements.
    pub fn contains(&self, code: &str) -> bool {
        match self {
            PublishStatus::One(status) => status.contains(code),
            PublishStatus::Many(statuses) => statuses.iter().any(|status| status == code),
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            PublishStatus::One(status) => vec![status],
            PublishStatus::Many(statuses) => statuses,
        }
    }
}

/// Decode a JSON body, keeping the raw value around for reporting.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    step: PublishStep,
    response: &HttpResponse,
) -> Result<(T, serde_json::Value)> {
    let value: serde_json::Value =
        serde_json::from_slice(&response.data).map_err(|e| PublishError::Protocol {
            step,
            message: format!(
                "response (HTTP {}) is not valid JSON: {}",
                response.status, e
            ),
        })?;

    let typed = serde_json::from_value(value.clone()).map_err(|e| PublishError::Protocol {
        step,
        message: format!("unexpected response shape: {}", e),
    })?;

    Ok((typed, value))
}
