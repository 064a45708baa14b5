use std::path::PathBuf;

use eyre::{Result, WrapErr};
use nano_manifest::{Browser, BuildTarget, Capability, PatchOutcome, patch_manifest};
use tracing::info;

use crate::config::Config;

pub async fn handle_patch_manifest_command(
    browser: Browser,
    capability: Option<Capability>,
    amo_unsigned: bool,
    dist: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let target = if amo_unsigned {
        BuildTarget::amo_unsigned(browser)?
    } else {
        BuildTarget::new(browser)
    };
    let dist_root = dist.unwrap_or_else(|| PathBuf::from(&config.dist_dir));

    info!(
        "Patching {} manifest under {}",
        target.dir_name(),
        dist_root.display()
    );

    let outcome = patch_manifest(&dist_root, target, capability)
        .await
        .wrap_err_with(|| format!("Failed to patch manifest for {}", browser))?;

    match outcome {
        PatchOutcome::Unchanged => {
            println!("No manifest changes needed for {}", browser);
        }
        PatchOutcome::Patched { path, version } => {
            println!("✅ Patched {} (source version {})", path.display(), version);
            if let Some(capability) = capability {
                println!("  Edition: {}", capability.display_name());
            }
        }
    }

    Ok(())
}
