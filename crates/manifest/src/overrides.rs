//! Per-browser and per-capability manifest overrides.

use serde_json::Map;
use tracing::debug;

use crate::error::{ManifestError, Result};
use crate::ids;
use crate::manifest::{
    ActionIcon, Background, BrowserAction, BrowserSpecificSettings, ContentScript, EdgeSettings,
    GeckoSettings, IconSet, Incognito, Manifest, MsPreload,
};
use crate::target::{Browser, Capability};

/// Name and action title of the unbranded source manifest.
pub const DEV_BUILD_NAME: &str = "Nano Defender Dev Build";
pub const STANDARD_NAME: &str = "Nano Defender";
pub const PRO_NAME: &str = "Nano Defender Pro";

pub const FIREFOX_UPDATE_URL: &str = "https://raw.githubusercontent.com/LiCybora/NanoDefenderFirefox/master/Extension%20Compiler/updates.json";
pub const FIREFOX_MIN_VERSION: &str = "55.0";

pub const EDGE_PRELOAD_SCRIPT: &str = "edgyfy.js";
pub const EDGE_ICON: &str = "icon128.png";
pub const EDGE_DESCRIPTION: &str = "An anti-adblock defuser for Nano Adblocker";
pub const EDGE_MIN_VERSION: &str = "41.16299.248.0";

pub const FIREFOX_BACKGROUND_SCRIPTS: &[&str] = &[
    "common.js",
    "platform/firefox-vars.js",
    "background/core.js",
    "platform/firefox-background.js",
    "background/rules.js",
    "background/debug.js",
];

pub const FIREFOX_CONTENT_SCRIPTS: &[&str] = &[
    "common.js",
    "libdom.js",
    "content/core.js",
    "platform/firefox-content.js",
    "content/rules-common.js",
    "content/rules-specific.js",
    "content/rules-sticky.js",
    "content/debug.js",
];

pub const EDGE_BACKGROUND_SCRIPTS: &[&str] = &[
    "common.js",
    "platform/edge-vars.js",
    "background/core.js",
    "background/rules.js",
    "background/debug.js",
];

pub const EDGE_CONTENT_SCRIPTS: &[&str] = &[
    "common.js",
    "libdom.js",
    "content/core.js",
    "platform/edge-content.js",
    "content/rules-common.js",
    "content/rules-specific.js",
    "content/rules-sticky.js",
    "content/debug.js",
];

impl Capability {
    /// Display name and action title for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Capability::Standard => STANDARD_NAME,
            Capability::Pro => PRO_NAME,
        }
    }
}

/// Apply every override for `browser` and, when given, `capability`.
///
/// Nothing is modified if any check fails.
pub fn apply_overrides(
    manifest: &mut Manifest,
    browser: Browser,
    capability: Option<Capability>,
) -> Result<()> {
    if capability.is_some() {
        check_dev_build(manifest)?;
    }
    if browser != Browser::Chromium {
        check_patchable(manifest)?;
    }

    if let Some(capability) = capability {
        apply_capability(manifest, capability);
    }

    match browser {
        Browser::Chromium => {}
        Browser::Firefox => apply_firefox(manifest)?,
        Browser::Edge => apply_edge(manifest)?,
    }

    Ok(())
}

/// The source manifest must still carry the dev-build branding.
pub fn check_dev_build(manifest: &Manifest) -> Result<()> {
    if manifest.name != DEV_BUILD_NAME {
        return Err(ManifestError::IntegrityMismatch {
            field: "name".to_string(),
            expected: DEV_BUILD_NAME.to_string(),
            found: Some(manifest.name.clone()),
        });
    }

    let title = manifest
        .browser_action
        .as_ref()
        .and_then(|action| action.default_title.as_deref());
    if title != Some(DEV_BUILD_NAME) {
        return Err(ManifestError::IntegrityMismatch {
            field: "browser_action.default_title".to_string(),
            expected: DEV_BUILD_NAME.to_string(),
            found: title.map(str::to_string),
        });
    }

    Ok(())
}

fn check_patchable(manifest: &Manifest) -> Result<()> {
    if manifest.background.is_none() {
        return Err(ManifestError::InvalidShape(
            "missing 'background' section".to_string(),
        ));
    }
    if manifest.browser_action.is_none() {
        return Err(ManifestError::InvalidShape(
            "missing 'browser_action' section".to_string(),
        ));
    }
    if manifest.content_scripts.is_empty() {
        return Err(ManifestError::InvalidShape(
            "'content_scripts' must have at least one entry".to_string(),
        ));
    }
    Ok(())
}

fn apply_capability(manifest: &mut Manifest, capability: Capability) {
    let name = capability.display_name().to_string();
    debug!("Branding manifest as '{}'", name);

    if let Some(action) = manifest.browser_action.as_mut() {
        action.default_title = Some(name.clone());
    }
    manifest.name = name;
}

fn apply_firefox(manifest: &mut Manifest) -> Result<()> {
    manifest.browser_specific_settings = Some(BrowserSpecificSettings {
        gecko: Some(GeckoSettings {
            id: ids::FIREFOX.to_string(),
            update_url: Some(FIREFOX_UPDATE_URL.to_string()),
            strict_min_version: Some(FIREFOX_MIN_VERSION.to_string()),
            extra: Map::new(),
        }),
        edge: None,
        extra: Map::new(),
    });

    background_mut(manifest)?.scripts = Some(to_owned(FIREFOX_BACKGROUND_SCRIPTS));
    browser_action_mut(manifest)?.browser_style = Some(false);
    first_content_script_mut(manifest)?.js = Some(to_owned(FIREFOX_CONTENT_SCRIPTS));

    manifest.incognito = Some(Incognito::Spanning);
    manifest.minimum_chrome_version = None;

    Ok(())
}

fn apply_edge(manifest: &mut Manifest) -> Result<()> {
    manifest.ms_preload = Some(MsPreload {
        background_script: EDGE_PRELOAD_SCRIPT.to_string(),
        content_script: EDGE_PRELOAD_SCRIPT.to_string(),
        extra: Map::new(),
    });

    let background = background_mut(manifest)?;
    background.persistent = Some(true);
    background.scripts = Some(to_owned(EDGE_BACKGROUND_SCRIPTS));

    // Edge ignores whether the size matches the image, only the key name.
    browser_action_mut(manifest)?.default_icon = Some(ActionIcon::Sized(icon_set(&["38"])));

    manifest.browser_specific_settings = Some(BrowserSpecificSettings {
        gecko: None,
        edge: Some(EdgeSettings {
            browser_action_next_to_addressbar: true,
            extra: Map::new(),
        }),
        extra: Map::new(),
    });

    first_content_script_mut(manifest)?.js = Some(to_owned(EDGE_CONTENT_SCRIPTS));

    manifest.description = Some(EDGE_DESCRIPTION.to_string());
    manifest.icons = Some(icon_set(&["128", "16"]));

    manifest.incognito = Some(Incognito::Spanning);
    manifest.minimum_chrome_version = None;
    manifest.minimum_edge_version = Some(EDGE_MIN_VERSION.to_string());

    manifest.version = edge_version(&manifest.version);

    Ok(())
}

/// Drop the leading version component and append `.0`: `2.1.3` becomes `1.3.0`.
/// A version without a dot only gains the suffix.
pub fn edge_version(version: &str) -> String {
    let rest = match version.split_once('.') {
        Some((_, rest)) => rest,
        None => version,
    };
    format!("{}.0", rest)
}

fn background_mut(manifest: &mut Manifest) -> Result<&mut Background> {
    manifest
        .background
        .as_mut()
        .ok_or_else(|| ManifestError::InvalidShape("missing 'background' section".to_string()))
}

fn browser_action_mut(manifest: &mut Manifest) -> Result<&mut BrowserAction> {
    manifest.browser_action.as_mut().ok_or_else(|| {
        ManifestError::InvalidShape("missing 'browser_action' section".to_string())
    })
}

fn first_content_script_mut(manifest: &mut Manifest) -> Result<&mut ContentScript> {
    manifest.content_scripts.first_mut().ok_or_else(|| {
        ManifestError::InvalidShape("'content_scripts' must have at least one entry".to_string())
    })
}

fn to_owned(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

fn icon_set(sizes: &[&str]) -> IconSet {
    sizes
        .iter()
        .map(|size| (size.to_string(), EDGE_ICON.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_manifest() -> Manifest {
        Manifest::from_json(
            r#"{
                "name": "Nano Defender Dev Build",
                "version": "2.1.3",
                "background": { "scripts": ["common.js", "background/core.js"] },
                "browser_action": {
                    "default_icon": { "128": "icon128.png" },
                    "default_title": "Nano Defender Dev Build"
                },
                "content_scripts": [{ "matches": ["<all_urls>"], "js": ["common.js"] }],
                "incognito": "split",
                "minimum_chrome_version": "60.0"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_edge_version() {
        assert_eq!(edge_version("2.1.3"), "1.3.0");
        assert_eq!(edge_version("15.0.0.206"), "0.0.206.0");
        assert_eq!(edge_version("7"), "7.0");
    }

    #[test]
    fn test_chromium_leaves_manifest_untouched() {
        let mut manifest = dev_manifest();
        let before = manifest.clone();
        apply_overrides(&mut manifest, Browser::Chromium, None).unwrap();
        assert_eq!(manifest, before);
    }

    #[test]
    fn test_firefox_overrides() {
        let mut manifest = dev_manifest();
        apply_overrides(&mut manifest, Browser::Firefox, None).unwrap();

        let gecko = manifest
            .browser_specific_settings
            .as_ref()
            .and_then(|s| s.gecko.as_ref())
            .unwrap();
        assert_eq!(gecko.id, ids::FIREFOX);
        assert_eq!(gecko.strict_min_version.as_deref(), Some("55.0"));

        assert_eq!(
            manifest.background.as_ref().unwrap().scripts,
            Some(to_owned(FIREFOX_BACKGROUND_SCRIPTS))
        );
        assert_eq!(
            manifest.content_scripts[0].js,
            Some(to_owned(FIREFOX_CONTENT_SCRIPTS))
        );
        assert_eq!(
            manifest.browser_action.as_ref().unwrap().browser_style,
            Some(false)
        );
        assert_eq!(manifest.incognito, Some(Incognito::Spanning));
        assert!(manifest.minimum_chrome_version.is_none());
        assert_eq!(manifest.version, "2.1.3");
        assert!(manifest.ms_preload.is_none());
    }

    #[test]
    fn test_edge_overrides() {
        let mut manifest = dev_manifest();
        apply_overrides(&mut manifest, Browser::Edge, None).unwrap();

        assert_eq!(manifest.version, "1.3.0");
        assert_eq!(manifest.incognito, Some(Incognito::Spanning));
        assert!(manifest.minimum_chrome_version.is_none());
        assert_eq!(
            manifest.minimum_edge_version.as_deref(),
            Some(EDGE_MIN_VERSION)
        );

        let background = manifest.background.as_ref().unwrap();
        assert_eq!(background.persistent, Some(true));
        assert_eq!(background.scripts, Some(to_owned(EDGE_BACKGROUND_SCRIPTS)));
        assert_eq!(
            manifest.content_scripts[0].js,
            Some(to_owned(EDGE_CONTENT_SCRIPTS))
        );

        assert_eq!(
            manifest.browser_action.as_ref().unwrap().default_icon,
            Some(ActionIcon::Sized(icon_set(&["38"])))
        );
        assert_eq!(
            manifest
                .browser_specific_settings
                .as_ref()
                .and_then(|s| s.edge.as_ref()),
            Some(&EdgeSettings {
                browser_action_next_to_addressbar: true,
                extra: Map::new(),
            })
        );
        assert_eq!(
            manifest.ms_preload.as_ref().map(|p| p.background_script.as_str()),
            Some(EDGE_PRELOAD_SCRIPT)
        );
        assert_eq!(manifest.description.as_deref(), Some(EDGE_DESCRIPTION));
    }

    #[test]
    fn test_capability_branding() {
        let mut pro = dev_manifest();
        apply_overrides(&mut pro, Browser::Chromium, Some(Capability::Pro)).unwrap();
        assert!(pro.name.ends_with("Pro"));
        assert!(
            pro.browser_action
                .as_ref()
                .and_then(|a| a.default_title.as_deref())
                .unwrap()
                .ends_with("Pro")
        );

        let mut standard = dev_manifest();
        apply_overrides(&mut standard, Browser::Firefox, Some(Capability::Standard)).unwrap();
        assert_eq!(standard.name, STANDARD_NAME);
        assert!(!standard.name.ends_with("Pro"));
        assert_eq!(
            standard
                .browser_action
                .as_ref()
                .and_then(|a| a.default_title.as_deref()),
            Some(STANDARD_NAME)
        );
    }

    #[test]
    fn test_capability_requires_dev_build_source() {
        let mut manifest = dev_manifest();
        manifest.name = PRO_NAME.to_string();
        let before = manifest.clone();

        let err = apply_overrides(&mut manifest, Browser::Edge, Some(Capability::Standard))
            .unwrap_err();
        assert!(matches!(err, ManifestError::IntegrityMismatch { ref field, .. } if field == "name"));
        assert_eq!(manifest, before);

        let mut manifest = dev_manifest();
        manifest.browser_action.as_mut().unwrap().default_title = None;
        let err =
            apply_overrides(&mut manifest, Browser::Chromium, Some(Capability::Pro)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected value for 'browser_action.default_title': expected 'Nano Defender Dev Build', found nothing"
        );
    }

    #[test]
    fn test_missing_sections_are_rejected_before_changes() {
        let mut manifest = dev_manifest();
        manifest.content_scripts.clear();
        let before = manifest.clone();

        let err = apply_overrides(&mut manifest, Browser::Firefox, Some(Capability::Pro))
            .unwrap_err();
        assert!(matches!(err, ManifestError::InvalidShape(_)));
        assert_eq!(manifest, before);
    }
}
