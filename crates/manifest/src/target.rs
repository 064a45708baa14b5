use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ManifestError, Result};

/// Browser family a build is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Browser {
    Chromium,
    Firefox,
    Edge,
}

impl Browser {
    pub const ALL: [Browser; 3] = [Browser::Chromium, Browser::Firefox, Browser::Edge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Edge => "edge",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "edge" => Ok(Browser::Edge),
            other => Err(ManifestError::InvalidArgument(format!(
                "Unknown browser '{}', expected one of chromium, firefox, edge",
                other
            ))),
        }
    }
}

/// Feature tier a build is branded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Capability {
    Standard,
    Pro,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Standard => "standard",
            Capability::Pro => "pro",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(Capability::Standard),
            "pro" => Ok(Capability::Pro),
            other => Err(ManifestError::InvalidArgument(format!(
                "Unknown capability '{}', expected standard or pro",
                other
            ))),
        }
    }
}

/// A build output directory under `dist/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTarget {
    browser: Browser,
    amo_unsigned: bool,
}

impl BuildTarget {
    pub fn new(browser: Browser) -> Self {
        Self {
            browser,
            amo_unsigned: false,
        }
    }

    /// The unsigned Firefox build submitted to addons.mozilla.org.
    pub fn amo_unsigned(browser: Browser) -> Result<Self> {
        if browser != Browser::Firefox {
            return Err(ManifestError::InvalidArgument(format!(
                "AMO unsigned builds exist only for firefox, not {}",
                browser
            )));
        }
        Ok(Self {
            browser,
            amo_unsigned: true,
        })
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    pub fn dir_name(&self) -> String {
        let suffix = if self.amo_unsigned { "_amo_unsigned" } else { "" };
        format!("nano_defender_{}{}", self.browser, suffix)
    }

    pub fn manifest_path(&self, dist_root: &Path) -> PathBuf {
        dist_root.join(self.dir_name()).join("manifest.json")
    }
}
