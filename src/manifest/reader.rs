//! Reads the component manifest (`components.json`) from a component root.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::{metadata_from_object, ComponentManifest};
use crate::context::ServiceContext;
use crate::error::{DeltaError, Result};

/// File name of the component manifest, relative to the component root.
pub const COMPONENT_MANIFEST_FILE: &str = "components.json";

/// Conventional source directory whose presence sets `usesSourceDir`.
pub const SOURCE_DIR: &str = "src";

/// Reads and validates the component manifest under `root`.
///
/// The component name comes from a string `name` key when declared and from
/// the root directory name otherwise.
///
/// # Errors
///
/// - [`DeltaError::ManifestMissing`] when no manifest file exists.
/// - [`DeltaError::InvalidManifest`] when the file is not a JSON object or no
///   usable name can be determined.
/// - [`DeltaError::Collaborator`] when the file exists but cannot be read.
pub fn read_manifest(ctx: &ServiceContext, root: &Path) -> Result<ComponentManifest> {
    let path = root.join(COMPONENT_MANIFEST_FILE);
    if !ctx.fs.exists(&path) {
        return Err(DeltaError::ManifestMissing(path));
    }

    let contents =
        ctx.fs.read_to_string(&path).map_err(|e| DeltaError::collaborator("read manifest", e))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| DeltaError::InvalidManifest(format!("{}: {e}", path.display())))?;
    let Some(object) = value.as_object() else {
        return Err(DeltaError::InvalidManifest(format!(
            "{}: expected a JSON object",
            path.display()
        )));
    };

    let metadata = metadata_from_object(object);
    let name = match metadata.get("name").and_then(|v| v.as_str()) {
        Some(declared) => declared.to_string(),
        None => root_name(root),
    };
    let uses_source_dir = has_source_dir(ctx, root);
    debug!(
        path = %path.display(),
        %name,
        uses_source_dir,
        keys = metadata.len(),
        "read component manifest"
    );

    ComponentManifest::new(name, uses_source_dir, metadata)
}

/// Builds the manifest substituted when no manifest file exists.
///
/// # Errors
///
/// Returns [`DeltaError::InvalidManifest`] if the root has no usable name.
pub fn default_manifest(ctx: &ServiceContext, root: &Path) -> Result<ComponentManifest> {
    ComponentManifest::new(root_name(root), has_source_dir(ctx, root), BTreeMap::new())
}

/// Returns `true` if `<root>/src` is a directory.
#[must_use]
pub fn has_source_dir(ctx: &ServiceContext, root: &Path) -> bool {
    ctx.fs.is_dir(&root.join(SOURCE_DIR))
}

fn root_name(root: &Path) -> String {
    root.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;
    use crate::manifest::MetadataValue;
    use chrono::Utc;
    use serde_json::json;

    fn fs_context(interactions: Vec<Interaction>) -> ServiceContext {
        let cassette = Cassette {
            name: "manifest".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        ServiceContext::from_replayers(Some(CassetteReplayer::new(&cassette)), None)
    }

    fn fs(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "fs".into(),
            method: method.into(),
            input: json!({}),
            output,
        }
    }

    #[test]
    fn missing_manifest_is_reported() {
        let ctx = fs_context(vec![fs(0, "exists", json!(false))]);
        let err = read_manifest(&ctx, Path::new("/work/button")).unwrap_err();
        assert!(matches!(err, DeltaError::ManifestMissing(p) if p.ends_with("components.json")));
    }

    #[test]
    fn declared_name_wins_over_directory() {
        let ctx = fs_context(vec![
            fs(0, "exists", json!(true)),
            fs(1, "read_to_string", json!({"ok": r#"{"name": "fancy-button", "tsx": true}"#})),
            fs(2, "is_dir", json!(true)),
        ]);
        let manifest = read_manifest(&ctx, Path::new("/work/button")).unwrap();
        assert_eq!(manifest.name(), "fancy-button");
        assert!(manifest.uses_source_dir());
        assert_eq!(manifest.declared_metadata()["tsx"], MetadataValue::Boolean(true));
    }

    #[test]
    fn name_falls_back_to_root_directory() {
        let ctx = fs_context(vec![
            fs(0, "exists", json!(true)),
            fs(1, "read_to_string", json!({"ok": r#"{"style": "new-york"}"#})),
            fs(2, "is_dir", json!(false)),
        ]);
        let manifest = read_manifest(&ctx, Path::new("/work/button")).unwrap();
        assert_eq!(manifest.name(), "button");
        assert!(!manifest.uses_source_dir());
    }

    #[test]
    fn malformed_manifest_is_invalid() {
        let ctx = fs_context(vec![
            fs(0, "exists", json!(true)),
            fs(1, "read_to_string", json!({"ok": "[\"not\", \"an object\"]"})),
        ]);
        let err = read_manifest(&ctx, Path::new("/work/button")).unwrap_err();
        assert!(matches!(err, DeltaError::InvalidManifest(_)));
    }

    #[test]
    fn default_manifest_uses_directory_name() {
        let ctx = fs_context(vec![fs(0, "is_dir", json!(false))]);
        let manifest = default_manifest(&ctx, Path::new("/work/widget")).unwrap();
        assert_eq!(manifest.name(), "widget");
        assert!(manifest.declared_metadata().is_empty());
    }
}
