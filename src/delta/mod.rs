//! The change report: what changed under a component root since the
//! reference point.

pub mod engine;
pub mod report;

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Marker emitted in place of manifest details that could not be parsed.
pub const UNPARSEABLE: &str = "unparseable";

/// Dependency tables surfaced from a parsed project manifest.
pub const DEPENDENCY_SECTIONS: [&str; 4] =
    ["dependencies", "devDependencies", "peerDependencies", "optionalDependencies"];

/// Current project manifest content attached to a report.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestDetails {
    /// The manifest parsed as a JSON object.
    Parsed(serde_json::Map<String, serde_json::Value>),
    /// The manifest text did not parse.
    Unparseable,
}

impl ManifestDetails {
    /// Returns `true` for the unparseable marker.
    #[must_use]
    pub fn is_unparseable(&self) -> bool {
        matches!(self, Self::Unparseable)
    }

    /// Name → version range for one dependency table, e.g. `"dependencies"`.
    ///
    /// Non-string ranges are skipped. Empty for a missing table or an
    /// unparseable manifest.
    #[must_use]
    pub fn dependencies(&self, section: &str) -> BTreeMap<&str, &str> {
        let Self::Parsed(map) = self else {
            return BTreeMap::new();
        };
        map.get(section)
            .and_then(serde_json::Value::as_object)
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(name, range)| Some((name.as_str(), range.as_str()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of declared dependencies across all dependency tables.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        DEPENDENCY_SECTIONS.iter().map(|section| self.dependencies(section).len()).sum()
    }
}

impl Serialize for ManifestDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Parsed(map) => map.serialize(serializer),
            Self::Unparseable => serializer.serialize_str(UNPARSEABLE),
        }
    }
}

/// The single structured artifact produced per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    /// Component name from the manifest.
    pub component_name: String,
    /// New files, sorted.
    pub added: Vec<String>,
    /// Changed files, sorted.
    pub modified: Vec<String>,
    /// Files that no longer exist, sorted.
    pub removed: Vec<String>,
    /// Whether the scanner flagged the project manifest as changed.
    pub manifest_changed: bool,
    /// Current project manifest content when it changed.
    pub manifest_details: Option<ManifestDetails>,
    /// Copied from the manifest.
    pub uses_source_dir: bool,
}

impl DiffReport {
    /// Returns `true` if no file is classified and the manifest is unchanged.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty()
            && self.modified.is_empty()
            && self.removed.is_empty()
            && !self.manifest_changed
    }
}
