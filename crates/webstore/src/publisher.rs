//! Upload and publish flow for the Chrome Web Store.
//!
//! A publish is three strictly ordered calls: the stored refresh token is
//! exchanged for an access token, the package is uploaded, and the uploaded
//! item is submitted for publication. Every failure aborts the flow.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{
    self, API_VERSION, API_VERSION_HEADER, PublishResponse, PublishStatus, PublishTarget, STATUS_OK,
    STATUS_PENDING_REVIEW, TokenResponse, UPLOAD_SUCCESS, UploadResponse, WebStoreEndpoints,
};
use crate::credentials::Credentials;
use crate::error::{PublishError, PublishStep, Result};
use crate::http::{HttpExecutor, HttpRequest, HttpResponse, Method, RequestBody};

/// File extension every package must carry.
pub const PACKAGE_EXTENSION: &str = ".zip";

/// Server responses collected while publishing.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub extension_id: String,
    pub upload_response: serde_json::Value,
    pub publish_response: serde_json::Value,
    pub status: PublishStatus,
}

impl PublishReport {
    /// The item went into the review queue instead of going live.
    pub fn is_pending_review(&self) -> bool {
        self.status.contains(STATUS_PENDING_REVIEW)
    }
}

pub struct WebStorePublisher {
    executor: Arc<dyn HttpExecutor>,
    credentials: Option<Credentials>,
    endpoints: WebStoreEndpoints,
    target: PublishTarget,
}

impl WebStorePublisher {
    pub fn new(executor: Arc<dyn HttpExecutor>, credentials: Option<Credentials>) -> Self {
        Self {
            executor,
            credentials,
            endpoints: WebStoreEndpoints::default(),
            target: PublishTarget::Default,
        }
    }

    pub fn with_endpoints(mut self, endpoints: WebStoreEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_target(mut self, target: PublishTarget) -> Self {
        self.target = target;
        self
    }

    /// Upload `file_path` as the new package of `extension_id` and publish it.
    pub async fn publish(
        &self,
        file_path: impl AsRef<Path>,
        extension_id: &str,
    ) -> Result<PublishReport> {
        let file_path = file_path.as_ref();

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            PublishError::Configuration("Web Store credentials are not configured".to_string())
        })?;
        credentials.validate()?;

        if extension_id.trim().is_empty() {
            return Err(PublishError::Configuration(
                "Extension id must not be empty".to_string(),
            ));
        }

        validate_package(file_path).await?;

        info!(
            "Publishing {} as extension {}",
            file_path.display(),
            extension_id
        );

        let token = self.fetch_access_token(credentials).await?;
        let upload_response = self.upload_package(&token, file_path, extension_id).await?;
        let (status, publish_response) = self.request_publish(&token, extension_id).await?;

        Ok(PublishReport {
            extension_id: extension_id.to_string(),
            upload_response,
            publish_response,
            status,
        })
    }

    async fn fetch_access_token(&self, credentials: &Credentials) -> Result<String> {
        let step = PublishStep::TokenExchange;
        let url = self.endpoints.token_url()?;
        debug!("Requesting access token from {}", url);

        let request = HttpRequest::new(Method::Post, url.as_str()).body(RequestBody::Form(vec![
            ("client_id".to_string(), credentials.client_id.clone()),
            ("client_secret".to_string(), credentials.client_secret.clone()),
            ("refresh_token".to_string(), credentials.refresh_token.clone()),
            ("grant_type".to_string(), "refresh_token".to_string()),
        ]));

        let response = self.send(step, request).await?;
        let (body, _) = api::decode::<TokenResponse>(step, &response)?;

        match body.access_token {
            Some(serde_json::Value::String(token)) => {
                debug!("Access token obtained");
                Ok(token)
            }
            _ => {
                let reason = match (body.error, body.error_description) {
                    (Some(error), Some(description)) => format!("{} ({})", error, description),
                    (Some(error), None) => error,
                    (None, Some(description)) => description,
                    (None, None) => format!("HTTP {}", response.status),
                };
                Err(PublishError::Protocol {
                    step,
                    message: format!("response carries no access token: {}", reason),
                })
            }
        }
    }

    async fn upload_package(
        &self,
        token: &str,
        file_path: &Path,
        extension_id: &str,
    ) -> Result<serde_json::Value> {
        let step = PublishStep::Upload;
        let url = self.endpoints.upload_url(extension_id)?;
        debug!("Uploading {} to {}", file_path.display(), url);

        let request = HttpRequest::new(Method::Put, url.as_str())
            .header("Authorization", format!("Bearer {}", token))
            .header(API_VERSION_HEADER, API_VERSION)
            .body(RequestBody::File(file_path.to_path_buf()));

        let response = self.send(step, request).await?;
        let (body, raw) = api::decode::<UploadResponse>(step, &response)?;
        debug!("Item uploaded, server response: {}", raw);

        let state = body.upload_state.ok_or_else(|| PublishError::Protocol {
            step,
            message: "response carries no uploadState".to_string(),
        })?;

        if state != UPLOAD_SUCCESS {
            return Err(PublishError::UploadRejected {
                state,
                details: body.item_error.iter().map(|e| e.describe()).collect(),
            });
        }

        Ok(raw)
    }

    async fn request_publish(
        &self,
        token: &str,
        extension_id: &str,
    ) -> Result<(PublishStatus, serde_json::Value)> {
        let step = PublishStep::Publish;
        let url = self.endpoints.publish_url(extension_id, self.target)?;
        debug!("Requesting publication at {}", url);

        let request = HttpRequest::new(Method::Post, url.as_str())
            .header("Authorization", format!("Bearer {}", token))
            .header(API_VERSION_HEADER, API_VERSION);

        let response = self.send(step, request).await?;
        let (body, raw) = api::decode::<PublishResponse>(step, &response)?;
        debug!("Publish requested, server response: {}", raw);

        let status = body.status.ok_or_else(|| PublishError::Protocol {
            step,
            message: "response carries no status".to_string(),
        })?;

        if status.contains(STATUS_OK) || status.contains(STATUS_PENDING_REVIEW) {
            Ok((status, raw))
        } else {
            Err(PublishError::PublishRejected {
                status: status.into_vec(),
                details: body.status_detail,
            })
        }
    }

    async fn send(&self, step: PublishStep, request: HttpRequest) -> Result<HttpResponse> {
        self.executor
            .execute(request)
            .await
            .map_err(|source| PublishError::Network { step, source })
    }
}

/// Check that `path` names a package archive: a `.zip` regular file that is
/// not a symbolic link.
pub async fn validate_package(path: &Path) -> Result<()> {
    let invalid = |reason: &str| PublishError::InvalidPackage {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let has_extension = path
        .to_str()
        .is_some_and(|name| name.ends_with(PACKAGE_EXTENSION));
    if !has_extension {
        return Err(invalid("package file must end with .zip"));
    }

    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(invalid("file does not exist"));
        }
        Err(e) => {
            return Err(PublishError::Io {
                operation: "stat package".to_string(),
                path: PathBuf::from(path),
                source: e,
            });
        }
    };

    if metadata.file_type().is_symlink() {
        return Err(invalid("package must not be a symbolic link"));
    }
    if !metadata.is_file() {
        return Err(invalid("package is not a regular file"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_package_accepts_zip_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nano_defender_chromium.zip");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        assert!(validate_package(&path).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_package_rejects_wrong_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nano_defender_chromium.crx");
        std::fs::write(&path, b"Cr24").unwrap();

        let err = validate_package(&path).await.unwrap_err();
        assert!(matches!(err, PublishError::InvalidPackage { .. }));
    }

    #[tokio::test]
    async fn test_validate_package_rejects_directory_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("build.zip");
        std::fs::create_dir(&dir).unwrap();

        let err = validate_package(&dir).await.unwrap_err();
        assert!(err.to_string().contains("not a regular file"));

        let missing = temp_dir.path().join("missing.zip");
        let err = validate_package(&missing).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_validate_package_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real.zip");
        std::fs::write(&real, b"PK\x03\x04").unwrap();
        let link = temp_dir.path().join("link.zip");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let err = validate_package(&link).await.unwrap_err();
        assert!(err.to_string().contains("symbolic link"));
    }

    fn report_with(status: PublishStatus) -> PublishReport {
        PublishReport {
            extension_id: "abc".to_string(),
            upload_response: serde_json::json!({}),
            publish_response: serde_json::json!({}),
            status,
        }
    }

    #[test]
    fn test_report_pending_review() {
        let report = report_with(PublishStatus::Many(vec!["ITEM_PENDING_REVIEW".to_string()]));
        assert!(report.is_pending_review());

        let report = report_with(PublishStatus::Many(vec!["OK".to_string()]));
        assert!(!report.is_pending_review());
    }

    #[test]
    fn test_report_pending_review_in_bare_string_status() {
        let report = report_with(PublishStatus::One(
            "ITEM_PENDING_REVIEW: queued for manual review".to_string(),
        ));
        assert!(report.is_pending_review());
    }
}
