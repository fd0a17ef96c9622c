//! Component manifest and project manifest types.

pub mod reader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DeltaError, Result};
use crate::model::normalize_path;

/// A declared metadata value from the component manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// `true` / `false`.
    Boolean(bool),
    /// Any JSON number.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    List(Vec<MetadataValue>),
    /// A nested mapping.
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Converts a JSON value, returning `None` for `null`.
    ///
    /// `null` entries inside lists and maps are dropped.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Boolean(*b)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Array(items) => {
                Some(Self::List(items.iter().filter_map(Self::from_json).collect()))
            }
            Value::Object(map) => Some(Self::Map(metadata_from_object(map))),
        }
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Converts a JSON object into a metadata mapping, dropping `null` entries.
#[must_use]
pub fn metadata_from_object(
    map: &serde_json::Map<String, serde_json::Value>,
) -> BTreeMap<String, MetadataValue> {
    map.iter().filter_map(|(k, v)| MetadataValue::from_json(v).map(|v| (k.clone(), v))).collect()
}

/// Declared identity and layout of a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentManifest {
    name: String,
    uses_source_dir: bool,
    declared_metadata: BTreeMap<String, MetadataValue>,
}

impl ComponentManifest {
    /// Creates a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidManifest`] if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        uses_source_dir: bool,
        declared_metadata: BTreeMap<String, MetadataValue>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DeltaError::InvalidManifest("component name is empty".into()));
        }
        Ok(Self { name, uses_source_dir, declared_metadata })
    }

    /// Replaces the component name, keeping layout and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::InvalidManifest`] if `name` is blank.
    pub fn with_name(self, name: impl Into<String>) -> Result<Self> {
        Self::new(name, self.uses_source_dir, self.declared_metadata)
    }

    /// The component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a conventional `src` directory existed when read.
    #[must_use]
    pub fn uses_source_dir(&self) -> bool {
        self.uses_source_dir
    }

    /// Every key declared in the manifest file.
    #[must_use]
    pub fn declared_metadata(&self) -> &BTreeMap<String, MetadataValue> {
        &self.declared_metadata
    }
}

/// Raw current text of the project manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifestText {
    /// Root-relative path, also the key consulted in the scanner's tracked flags.
    pub path: String,
    /// File contents; empty when the file is absent.
    pub raw: String,
}

impl ProjectManifestText {
    /// Creates the text for the project manifest at `path`.
    pub fn new(path: &str, raw: impl Into<String>) -> Self {
        Self { path: normalize_path(path), raw: raw.into() }
    }

    /// Parses the text as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::UnparseableProjectManifest`] when the text is not
    /// JSON or its top level is not an object.
    pub fn parse(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        let value: serde_json::Value = serde_json::from_str(&self.raw)
            .map_err(|e| DeltaError::UnparseableProjectManifest(format!("{}: {e}", self.path)))?;
        match value {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(DeltaError::UnparseableProjectManifest(format!(
                "{}: expected an object at top level, found {}",
                self.path,
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_name_is_rejected() {
        let err = ComponentManifest::new("  ", false, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, DeltaError::InvalidManifest(_)));
    }

    #[test]
    fn with_name_keeps_layout() {
        let manifest = ComponentManifest::new("button", true, BTreeMap::new()).unwrap();
        let renamed = manifest.with_name("widget").unwrap();
        assert_eq!(renamed.name(), "widget");
        assert!(renamed.uses_source_dir());
        assert!(renamed.clone().with_name("").is_err());
    }

    #[test]
    fn metadata_drops_nulls_and_keeps_nesting() {
        let value = json!({
            "style": "default",
            "tsx": true,
            "version": 3,
            "removed": null,
            "aliases": {"ui": "@/components/ui", "gone": null},
            "tags": ["a", null, "b"]
        });
        let meta = metadata_from_object(value.as_object().unwrap());
        assert_eq!(meta.len(), 5);
        assert_eq!(meta["style"], MetadataValue::String("default".into()));
        assert_eq!(meta["tsx"], MetadataValue::Boolean(true));
        assert_eq!(meta["version"], MetadataValue::Number(3.0));
        let MetadataValue::Map(aliases) = &meta["aliases"] else { panic!("expected map") };
        assert_eq!(aliases.len(), 1);
        let MetadataValue::List(tags) = &meta["tags"] else { panic!("expected list") };
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn project_manifest_parses_objects_only() {
        let ok = ProjectManifestText::new("./package.json", r#"{"name":"w","version":"1.0.0"}"#);
        assert_eq!(ok.path, "package.json");
        assert_eq!(ok.parse().unwrap()["version"], json!("1.0.0"));

        let array = ProjectManifestText::new("package.json", "[1, 2]");
        assert!(matches!(array.parse(), Err(DeltaError::UnparseableProjectManifest(_))));

        let broken = ProjectManifestText::new("package.json", "{\"name\": ");
        assert!(matches!(broken.parse(), Err(DeltaError::UnparseableProjectManifest(_))));

        let empty = ProjectManifestText::new("package.json", "");
        assert!(empty.parse().is_err());
    }
}
