//! Load, patch and write back a build's `manifest.json`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ManifestError, Result};
use crate::manifest::Manifest;
use crate::overrides::apply_overrides;
use crate::target::{Browser, BuildTarget, Capability};

/// Default location of the build outputs, relative to the working directory.
pub const DEFAULT_DIST_DIR: &str = "./dist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Nothing to do for this target; the file was not touched.
    Unchanged,
    Patched {
        path: PathBuf,
        /// Version declared by the manifest before patching.
        version: String,
    },
}

/// Patch the manifest of `target` under `dist_root` in place.
///
/// Chromium builds without a capability need no changes and are skipped
/// without any file access.
pub async fn patch_manifest(
    dist_root: impl AsRef<Path>,
    target: BuildTarget,
    capability: Option<Capability>,
) -> Result<PatchOutcome> {
    if target.browser() == Browser::Chromium && capability.is_none() {
        debug!("No manifest changes needed for chromium");
        return Ok(PatchOutcome::Unchanged);
    }

    let path = target.manifest_path(dist_root.as_ref());
    let mut manifest = load_manifest(&path).await?;
    let version = manifest.version.clone();

    apply_overrides(&mut manifest, target.browser(), capability)?;
    write_manifest(&path, &manifest).await?;

    info!(
        "Patched {} manifest at {} (version {})",
        target.browser(),
        path.display(),
        version
    );

    Ok(PatchOutcome::Patched { path, version })
}

pub async fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ManifestError::NotFound(path.to_path_buf())
        } else {
            ManifestError::Io {
                operation: "read manifest".to_string(),
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    Manifest::from_json(&content).map_err(|source| ManifestError::InvalidManifestFile {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let content = manifest.to_json()?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ManifestError::Io {
            operation: "write manifest".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
}
