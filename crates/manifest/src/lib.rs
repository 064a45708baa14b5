//! Per-browser manifest patching for Nano Defender builds.
//!
//! The build emits one directory per browser under `dist/`, all starting from
//! the same Chromium manifest. [`patch_manifest`] rewrites the Firefox and Edge
//! copies and optionally brands any copy as the standard or pro edition.

pub mod error;
pub mod ids;
pub mod manifest;
pub mod overrides;
pub mod patch;
pub mod target;

pub use error::{ManifestError, Result};
pub use manifest::Manifest;
pub use overrides::{apply_overrides, edge_version};
pub use patch::{DEFAULT_DIST_DIR, PatchOutcome, load_manifest, patch_manifest, write_manifest};
pub use target::{Browser, BuildTarget, Capability};
