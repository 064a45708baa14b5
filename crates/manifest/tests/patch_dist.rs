//! Patches manifests laid out the way the build writes them under `dist/`.

use std::fs;
use std::path::Path;

use nano_manifest::{
    Browser, BuildTarget, Capability, ManifestError, PatchOutcome, patch_manifest,
};
use serde_json::Value;
use tempfile::TempDir;

const SOURCE_MANIFEST: &str = r#"{
  "manifest_version": 2,
  "name": "Nano Defender Dev Build",
  "description": "An anti-adblock defuser",
  "version": "15.0.0.206",
  "icons": { "128": "icon128.png" },
  "permissions": ["tabs", "webRequest", "webRequestBlocking", "<all_urls>"],
  "background": {
    "scripts": ["common.js", "background/core.js", "background/rules.js", "background/debug.js"]
  },
  "browser_action": {
    "default_icon": { "128": "icon128.png" },
    "default_title": "Nano Defender Dev Build"
  },
  "content_scripts": [
    {
      "matches": ["http://*/*", "https://*/*"],
      "js": ["common.js", "libdom.js", "content/core.js"],
      "run_at": "document_start",
      "all_frames": true
    }
  ],
  "incognito": "split",
  "minimum_chrome_version": "60.0"
}"#;

fn write_build(dist: &Path, dir_name: &str) -> std::path::PathBuf {
    let dir = dist.join(dir_name);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("manifest.json");
    fs::write(&path, SOURCE_MANIFEST).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_chromium_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_build(temp_dir.path(), "nano_defender_chromium");

    let outcome = patch_manifest(temp_dir.path(), BuildTarget::new(Browser::Chromium), None)
        .await
        .unwrap();

    assert_eq!(outcome, PatchOutcome::Unchanged);
    assert_eq!(fs::read_to_string(&path).unwrap(), SOURCE_MANIFEST);
}

#[tokio::test]
async fn test_chromium_without_build_still_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let outcome = patch_manifest(temp_dir.path(), BuildTarget::new(Browser::Chromium), None)
        .await
        .unwrap();
    assert_eq!(outcome, PatchOutcome::Unchanged);
}

#[tokio::test]
async fn test_firefox_and_edge_share_incognito_and_drop_chrome_minimum() {
    for browser in [Browser::Firefox, Browser::Edge] {
        let temp_dir = TempDir::new().unwrap();
        let path = write_build(temp_dir.path(), &format!("nano_defender_{}", browser));

        let outcome = patch_manifest(temp_dir.path(), BuildTarget::new(browser), None)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            PatchOutcome::Patched {
                path: path.clone(),
                version: "15.0.0.206".to_string()
            }
        );

        let json = read_json(&path);
        assert_eq!(json["incognito"], "spanning", "{browser}");
        assert!(json.get("minimum_chrome_version").is_none(), "{browser}");
        assert_eq!(json["manifest_version"], 2, "{browser}");
        assert_eq!(json["permissions"][3], "<all_urls>", "{browser}");
        assert_eq!(json["content_scripts"][0]["run_at"], "document_start", "{browser}");
    }
}

#[tokio::test]
async fn test_edge_manifest_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_build(temp_dir.path(), "nano_defender_edge");

    patch_manifest(temp_dir.path(), BuildTarget::new(Browser::Edge), None)
        .await
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("{\n  \""));

    let json = read_json(&path);
    assert_eq!(json["version"], "0.0.206.0");
    assert_eq!(json["minimum_edge_version"], "41.16299.248.0");
    assert_eq!(json["background"]["persistent"], true);
    assert_eq!(json["browser_action"]["default_icon"]["38"], "icon128.png");
    assert!(json["browser_action"]["default_icon"].get("128").is_none());
    assert_eq!(
        json["browser_specific_settings"]["edge"]["browser_action_next_to_addressbar"],
        true
    );
    assert_eq!(json["-ms-preload"]["contentScript"], "edgyfy.js");
    assert_eq!(json["content_scripts"][0]["js"][3], "platform/edge-content.js");
}

#[tokio::test]
async fn test_amo_unsigned_firefox_build() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_build(temp_dir.path(), "nano_defender_firefox_amo_unsigned");

    let target = BuildTarget::amo_unsigned(Browser::Firefox).unwrap();
    patch_manifest(temp_dir.path(), target, None).await.unwrap();

    let json = read_json(&path);
    assert_eq!(
        json["browser_specific_settings"]["gecko"]["id"],
        "{f9cacf2e-cafc-4f0f-b6ad-8e1a01b4b4d0}"
    );
    assert_eq!(json["background"]["scripts"][3], "platform/firefox-background.js");
    assert_eq!(json["browser_action"]["browser_style"], false);
    assert_eq!(json["version"], "15.0.0.206");
}

#[tokio::test]
async fn test_capability_names() {
    let temp_dir = TempDir::new().unwrap();
    let pro = write_build(temp_dir.path(), "nano_defender_chromium");
    patch_manifest(
        temp_dir.path(),
        BuildTarget::new(Browser::Chromium),
        Some(Capability::Pro),
    )
    .await
    .unwrap();

    let json = read_json(&pro);
    assert!(json["name"].as_str().unwrap().ends_with("Pro"));
    assert!(
        json["browser_action"]["default_title"]
            .as_str()
            .unwrap()
            .ends_with("Pro")
    );

    let standard = write_build(temp_dir.path(), "nano_defender_edge");
    patch_manifest(
        temp_dir.path(),
        BuildTarget::new(Browser::Edge),
        Some(Capability::Standard),
    )
    .await
    .unwrap();

    let json = read_json(&standard);
    assert!(!json["name"].as_str().unwrap().ends_with("Pro"));
    assert!(
        !json["browser_action"]["default_title"]
            .as_str()
            .unwrap()
            .ends_with("Pro")
    );
}

#[tokio::test]
async fn test_patching_twice_with_capability_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_build(temp_dir.path(), "nano_defender_firefox");
    let target = BuildTarget::new(Browser::Firefox);

    patch_manifest(temp_dir.path(), target, Some(Capability::Pro))
        .await
        .unwrap();
    let after_first = fs::read_to_string(&path).unwrap();

    let err = patch_manifest(temp_dir.path(), target, Some(Capability::Pro))
        .await
        .unwrap_err();
    assert!(matches!(err, ManifestError::IntegrityMismatch { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
}

#[tokio::test]
async fn test_missing_manifest_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let err = patch_manifest(temp_dir.path(), BuildTarget::new(Browser::Edge), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ManifestError::NotFound(_)));
}

#[tokio::test]
async fn test_malformed_manifest_is_left_alone() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("nano_defender_firefox");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("manifest.json");
    let content = r#"{"name": "Nano Defender Dev Build", "version": "1.0", "content_scripts": "common.js"}"#;
    fs::write(&path, content).unwrap();

    let err = patch_manifest(temp_dir.path(), BuildTarget::new(Browser::Firefox), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ManifestError::InvalidManifestFile { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[tokio::test]
async fn test_chromium_capability_only_renames() {
    let source = r#"{
  "manifest_version": 2,
  "name": "Nano Defender Dev Build",
  "version": "15.0.0.206",
  "background": { "page": "background.html" },
  "browser_action": { "default_title": "Nano Defender Dev Build", "default_popup": "popup.html" },
  "content_scripts": [{ "matches": ["<all_urls>"], "css": ["a.css"] }],
  "browser_specific_settings": {
    "gecko": { "id": "x@y", "strict_max_version": "99.0" },
    "edge": { "browser_action_next_to_addressbar": false, "pinned": true }
  },
  "-ms-preload": { "backgroundScript": "a.js", "contentScript": "b.js", "sandbox": 1 },
  "permissions": ["tabs"]
}"#;
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("nano_defender_chromium");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("manifest.json");
    fs::write(&path, source).unwrap();

    patch_manifest(
        temp_dir.path(),
        BuildTarget::new(Browser::Chromium),
        Some(Capability::Pro),
    )
    .await
    .unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let mut expected: Value = serde_json::from_str(source).unwrap();
    expected["name"] = "Nano Defender Pro".into();
    expected["browser_action"]["default_title"] = "Nano Defender Pro".into();
    assert_eq!(serde_json::from_str::<Value>(&written).unwrap(), expected);
    assert_eq!(written, serde_json::to_string_pretty(&expected).unwrap());
}
