//! Publish command handler for Chrome Web Store releases.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, WrapErr};
use nano_webstore::http::ReqwestExecutor;
use nano_webstore::{Credentials, PublishTarget, WebStorePublisher};
use tracing::{debug, error, info};

use crate::cli::TargetOption;
use crate::config::Config;

#[derive(Debug)]
pub struct PublishArgs {
    pub package: PathBuf,
    pub extension_id: Option<String>,
    pub target: TargetOption,
    pub credentials: Option<PathBuf>,
    pub timeout: Option<u64>,
}

pub async fn handle_publish_command(args: PublishArgs, config: &Config) -> Result<()> {
    let credentials =
        resolve_credentials(Credentials::from_env(), args.credentials, config).await?;

    let executor = match args.timeout.or(config.webstore.timeout_secs) {
        Some(secs) => ReqwestExecutor::with_timeout(Duration::from_secs(secs))
            .wrap_err("Failed to build HTTP client")?,
        None => ReqwestExecutor::new(),
    };

    let target = match args.target {
        TargetOption::Default => PublishTarget::Default,
        TargetOption::TrustedTesters => PublishTarget::TrustedTesters,
    };

    let extension_id = args
        .extension_id
        .unwrap_or_else(|| config.webstore.extension_id.clone());

    let publisher = WebStorePublisher::new(Arc::new(executor), credentials)
        .with_endpoints(config.webstore.endpoints())
        .with_target(target);

    info!(
        "Publishing {:?} to Web Store item '{}'",
        args.package, extension_id
    );

    match publisher.publish(&args.package, &extension_id).await {
        Ok(report) => {
            println!(
                "Item uploaded, server response: {}",
                serde_json::to_string_pretty(&report.upload_response)?
            );
            println!(
                "Publish requested, server response: {}",
                serde_json::to_string_pretty(&report.publish_response)?
            );
            if report.is_pending_review() {
                println!("✅ Extension {} submitted for review", report.extension_id);
            } else {
                println!("✅ Extension {} published", report.extension_id);
            }
            Ok(())
        }
        Err(e) => {
            error!("Failed to publish extension: {}", e);
            Err(e.into())
        }
    }
}

/// Environment variables win over the credential file when all three are set.
async fn resolve_credentials(
    from_env: Option<Credentials>,
    path: Option<PathBuf>,
    config: &Config,
) -> Result<Option<Credentials>> {
    if let Some(credentials) = from_env {
        debug!("Using Web Store credentials from the environment");
        return Ok(Some(credentials));
    }

    let path = path.unwrap_or_else(|| config.credentials_path());
    let credentials = Credentials::load(&path)
        .await
        .wrap_err_with(|| format!("Failed to load credentials from {}", path.display()))?;
    Ok(credentials)
}
