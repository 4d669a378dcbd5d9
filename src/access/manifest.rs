//! Loading and validating the sidecar protection manifest.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AssetError, Result};

/// File name of the manifest looked up in every resolved root directory.
pub const MANIFEST_FILE: &str = "assetscomposer.json";

/// Deserialised allow-list restricting which files under a root may be served.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProtectionManifest {
  /// Paths, relative to the root, that may always be served.
  pub files: BTreeSet<String>,
  /// Paths additionally allowed outside production.
  #[serde(default, rename = "files-dev")]
  pub files_dev: Option<BTreeSet<String>>,
}

impl ProtectionManifest {
  /// Parse manifest JSON, insisting on an object with a `files` array.
  pub fn from_json(path: &Path, content: &str) -> Result<Self> {
    let invalid = |reason: String| AssetError::InvalidManifest {
      path: path.to_path_buf(),
      reason,
    };

    let value: Value = serde_json::from_str(content).map_err(|err| invalid(err.to_string()))?;
    if !value.is_object() {
      return Err(invalid("expected a JSON object".into()));
    }
    if !value.get("files").is_some_and(Value::is_array) {
      return Err(invalid("missing `files` array".into()));
    }

    serde_json::from_value(value).map_err(|err| invalid(err.to_string()))
  }
}

/// Load the manifest for `root`, returning `None` when the root has no manifest.
pub fn load_manifest(root: &Path) -> Result<Option<ProtectionManifest>> {
  let path = root.join(MANIFEST_FILE);
  let content = match fs::read_to_string(&path) {
    Ok(content) => content,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
    Err(err) => return Err(AssetError::unreadable(path, err)),
  };

  ProtectionManifest::from_json(&path, &content).map(Some)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind as AssetErrorKind;
  use tempfile::tempdir;

  #[test]
  fn missing_manifest_means_no_restriction() {
    let dir = tempdir().unwrap();
    assert_eq!(load_manifest(dir.path()).unwrap(), None);
  }

  #[test]
  fn reads_files_and_dev_files() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(MANIFEST_FILE),
      r#"{"name": "test-package", "files": ["a.css"], "files-dev": ["b.css"]}"#,
    )
    .unwrap();

    let manifest = load_manifest(dir.path()).unwrap().unwrap();
    assert!(manifest.files.contains("a.css"));
    assert!(manifest.files_dev.unwrap().contains("b.css"));
  }

  #[test]
  fn dev_files_are_optional() {
    let manifest = ProtectionManifest::from_json(Path::new("m.json"), r#"{"files": []}"#).unwrap();
    assert!(manifest.files.is_empty());
    assert!(manifest.files_dev.is_none());
  }

  #[test]
  fn rejects_malformed_manifests() {
    for content in [
      "not json",
      r#"["a.css"]"#,
      r#"[["a.css"]]"#,
      r#"{"name": "missing-files"}"#,
      r#"{"files": "a.css"}"#,
      r#"{"files": [1, 2]}"#,
      r#"{"files": [], "files-dev": "b.css"}"#,
    ] {
      let err = ProtectionManifest::from_json(Path::new("m.json"), content).unwrap_err();
      assert_eq!(err.kind(), AssetErrorKind::InvalidManifest, "{content}");
    }
  }
}
