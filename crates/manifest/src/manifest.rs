//! Typed view of an extension `manifest.json`.
//!
//! Only the fields the build patches are modelled; everything else is kept in
//! the `extra` maps and written back untouched. A known field with the wrong
//! JSON type fails deserialization instead of being overwritten blindly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Icon paths keyed by pixel size.
pub type IconSet = BTreeMap<String, String>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<IconSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_action: Option<BrowserAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_scripts: Vec<ContentScript>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incognito: Option<Incognito>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_chrome_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_edge_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_specific_settings: Option<BrowserSpecificSettings>,
    #[serde(
        rename = "-ms-preload",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ms_preload: Option<MsPreload>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Top-level key order of the source document.
    #[serde(skip)]
    key_order: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BrowserAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_icon: Option<ActionIcon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_style: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `default_icon` is either a single path or a set of sized paths.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ActionIcon {
    Path(String),
    Sized(IconSet),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContentScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Incognito {
    Spanning,
    Split,
    NotAllowed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BrowserSpecificSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gecko: Option<GeckoSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeckoSettings {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_min_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EdgeSettings {
    pub browser_action_next_to_addressbar: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MsPreload {
    pub background_script: String,
    pub content_script: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        let key_order = match &value {
            Value::Object(fields) => fields.keys().cloned().collect(),
            _ => Vec::new(),
        };

        let mut manifest: Manifest = serde_json::from_value(value)?;
        manifest.key_order = key_order;
        Ok(manifest)
    }

    /// Pretty-printed JSON with 2-space indentation. Keys that were present
    /// in the source keep their position; added keys go at the end.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => serde_json::to_string_pretty(&self.in_source_order(fields)),
            other => serde_json::to_string_pretty(&other),
        }
    }

    fn in_source_order(&self, mut fields: Map<String, Value>) -> Map<String, Value> {
        let mut ordered = Map::with_capacity(fields.len());
        for key in &self.key_order {
            if let Some((key, value)) = fields.shift_remove_entry(key) {
                ordered.insert(key, value);
            }
        }
        ordered.extend(fields);
        ordered
    }
}
