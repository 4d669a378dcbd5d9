//! Data structures passed between the resolver, the access engine and the adapter layer.

use std::fmt;
use std::path::PathBuf;

use crate::error::{AssetError, Result};

/// Namespace reserved for application-owned assets.
pub const APP_NAMESPACE: &str = "app";
/// Package paired with [`APP_NAMESPACE`] for application-owned assets.
pub const APP_PACKAGE: &str = "assets";
/// Directory below the project root that holds application-owned assets.
pub const APP_ASSETS_DIR: &str = "assets";

/// Logical reference to an asset, independent of the root directory it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetReference {
  /// First identifier level, usually the vendor.
  pub namespace: String,
  /// Second identifier level, usually the package name.
  pub package: String,
  /// Path of the file below the package directory.
  pub asset_path: String,
}

impl AssetReference {
  /// Create a reference from its three parts.
  pub fn new(
    namespace: impl Into<String>,
    package: impl Into<String>,
    asset_path: impl Into<String>,
  ) -> Self {
    Self {
      namespace: namespace.into(),
      package: package.into(),
      asset_path: asset_path.into(),
    }
  }

  /// Parse a `namespace/package/rest...` logical path.
  ///
  /// At least three non-empty segments are required; everything after the package is kept
  /// verbatim as the asset path.
  pub fn parse(logical_path: &str) -> Result<Self> {
    let mut parts = logical_path.splitn(3, '/');
    let (Some(namespace), Some(package), Some(asset_path)) =
      (parts.next(), parts.next(), parts.next())
    else {
      return Err(AssetError::InvalidPath(logical_path.to_string()));
    };

    if namespace.is_empty() || package.is_empty() || asset_path.is_empty() {
      return Err(AssetError::InvalidPath(logical_path.to_string()));
    }

    Ok(Self::new(namespace, package, asset_path))
  }

  /// Whether this reference targets the application's own asset directory.
  pub fn is_app_assets(&self) -> bool {
    self.namespace == APP_NAMESPACE && self.package == APP_PACKAGE
  }

  /// The `namespace/package/asset` string version tokens are derived from.
  pub fn logical_path(&self) -> String {
    self.to_string()
  }
}

impl fmt::Display for AssetReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}/{}", self.namespace, self.package, self.asset_path)
  }
}

/// A file located on disk for a given [`AssetReference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
  /// Canonical path of the file.
  pub file_path: PathBuf,
  /// Directory the file was resolved against (`{prefix}{namespace}/{package}` or the app
  /// asset directory).
  pub root_dir: PathBuf,
  /// Directory logical paths of referenced files are computed relative to.
  pub versioning_root: PathBuf,
  /// Modification time in seconds since the Unix epoch, read at resolution time.
  pub modified: i64,
}

/// Content and response headers produced for a served asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
  /// Response body, rewritten when the asset is a stylesheet or script.
  pub body: Vec<u8>,
  /// Header name/value pairs in emission order.
  pub headers: Vec<(&'static str, String)>,
}

impl AssetResponse {
  /// Look up a header value by case-insensitive name.
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(key, _)| key.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }

  /// Body interpreted as UTF-8, replacing invalid sequences.
  pub fn text(&self) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(&self.body)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_logical_paths_with_nested_assets() {
    let reference = AssetReference::parse("twbs/bootstrap/dist/css/bootstrap.css").unwrap();
    assert_eq!(reference.namespace, "twbs");
    assert_eq!(reference.package, "bootstrap");
    assert_eq!(reference.asset_path, "dist/css/bootstrap.css");
    assert_eq!(reference.logical_path(), "twbs/bootstrap/dist/css/bootstrap.css");
  }

  #[test]
  fn rejects_short_or_blank_logical_paths() {
    for value in ["invalid", "ns/pkg", "ns//a.css", "/pkg/a.css", "ns/pkg/"] {
      let err = AssetReference::parse(value).unwrap_err();
      assert!(matches!(err, AssetError::InvalidPath(_)), "{value}");
    }
  }

  #[test]
  fn detects_app_assets() {
    assert!(AssetReference::new("app", "assets", "app.css").is_app_assets());
    assert!(!AssetReference::new("app", "other", "app.css").is_app_assets());
  }

  #[test]
  fn header_lookup_ignores_case() {
    let response = AssetResponse {
      body: b"body{}".to_vec(),
      headers: vec![("Content-Type", "text/css".into())],
    };
    assert_eq!(response.header("content-type"), Some("text/css"));
    assert_eq!(response.header("Expires"), None);
    assert_eq!(response.text(), "body{}");
  }
}
