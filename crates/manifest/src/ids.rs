//! Store identifiers of the published builds.

/// Chrome Web Store item id.
pub const CHROMIUM: &str = "ggolfgbegefeeoocgjbmkembbncoadlb";

/// Gecko add-on id, also written into the Firefox manifest.
pub const FIREFOX: &str = "{f9cacf2e-cafc-4f0f-b6ad-8e1a01b4b4d0}";
