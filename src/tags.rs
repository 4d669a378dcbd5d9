//! Collect stylesheets and scripts per page position and render their HTML tags.

use std::collections::BTreeMap;
use std::path::Path;

use crate::composer::AssetComposer;
use crate::content_type::extension;
use crate::error::{AssetError, Result};

/// Position used when callers do not name one.
pub const DEFAULT_POSITION: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
  Stylesheet,
  Script,
}

impl TagKind {
  fn of(logical_path: &str) -> Result<Self> {
    match extension(Path::new(logical_path)).as_deref() {
      Some("css") => Ok(Self::Stylesheet),
      Some("js") => Ok(Self::Script),
      Some(other) => Err(AssetError::UnsupportedType(other.to_string())),
      None => Err(AssetError::InvalidPath(format!(
        "{logical_path} (missing file extension)"
      ))),
    }
  }
}

#[derive(Debug, Clone, Default)]
struct PositionAssets {
  stylesheets: Vec<String>,
  scripts: Vec<String>,
}

impl PositionAssets {
  fn list_mut(&mut self, kind: TagKind) -> &mut Vec<String> {
    match kind {
      TagKind::Stylesheet => &mut self.stylesheets,
      TagKind::Script => &mut self.scripts,
    }
  }
}

/// Registry of logical asset paths grouped by page position.
///
/// Paths are kept in insertion order and registering the same path twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct AssetTags {
  positions: BTreeMap<String, PositionAssets>,
}

impl AssetTags {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a `.css` or `.js` logical path under `position`.
  pub fn add(&mut self, logical_path: &str, position: &str) -> Result<()> {
    let kind = TagKind::of(logical_path)?;
    let list = self
      .positions
      .entry(position.to_string())
      .or_default()
      .list_mut(kind);
    if !list.iter().any(|existing| existing == logical_path) {
      list.push(logical_path.to_string());
    }
    Ok(())
  }

  /// Remove a previously registered path. Unknown paths are ignored.
  pub fn remove(&mut self, logical_path: &str, position: &str) -> Result<()> {
    let kind = TagKind::of(logical_path)?;
    if let Some(assets) = self.positions.get_mut(position) {
      assets.list_mut(kind).retain(|existing| existing != logical_path);
    }
    Ok(())
  }

  /// Stylesheets registered under `position`.
  pub fn stylesheets(&self, position: &str) -> &[String] {
    self
      .positions
      .get(position)
      .map(|assets| assets.stylesheets.as_slice())
      .unwrap_or_default()
  }

  /// Scripts registered under `position`.
  pub fn scripts(&self, position: &str) -> &[String] {
    self
      .positions
      .get(position)
      .map(|assets| assets.scripts.as_slice())
      .unwrap_or_default()
  }

  /// `<link rel="stylesheet">` tags for every stylesheet under `position`.
  pub fn render_stylesheets(&self, composer: &AssetComposer, position: &str) -> Result<String> {
    self
      .stylesheets(position)
      .iter()
      .map(|path| {
        let url = composer.get_asset_url(path)?;
        Ok(format!("<link rel=\"stylesheet\" href=\"{}\">", escape_attribute(&url)))
      })
      .collect()
  }

  /// `<script>` tags for every script under `position`.
  pub fn render_scripts(&self, composer: &AssetComposer, position: &str) -> Result<String> {
    self
      .scripts(position)
      .iter()
      .map(|path| {
        let url = composer.get_asset_url(path)?;
        Ok(format!("<script src=\"{}\"></script>", escape_attribute(&url)))
      })
      .collect()
  }
}

fn escape_attribute(value: &str) -> String {
  let mut escaped = String::with_capacity(value.len());
  for ch in value.chars() {
    match ch {
      '&' => escaped.push_str("&amp;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#039;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      _ => escaped.push(ch),
    }
  }
  escaped
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ComposerConfig, UrlStyle};
  use crate::error::ErrorKind;
  use std::fs;
  use tempfile::tempdir;

  #[test]
  fn groups_assets_by_position_and_type() {
    let mut tags = AssetTags::new();
    tags.add("ns/pkg/a.css", DEFAULT_POSITION).unwrap();
    tags.add("ns/pkg/a.js", "footer").unwrap();
    tags.add("ns/pkg/a.css", DEFAULT_POSITION).unwrap();

    assert_eq!(tags.stylesheets(DEFAULT_POSITION), ["ns/pkg/a.css"]);
    assert_eq!(tags.scripts("footer"), ["ns/pkg/a.js"]);
    assert!(tags.scripts(DEFAULT_POSITION).is_empty());
  }

  #[test]
  fn removes_assets() {
    let mut tags = AssetTags::new();
    tags.add("ns/pkg/a.css", DEFAULT_POSITION).unwrap();
    tags.remove("ns/pkg/a.css", DEFAULT_POSITION).unwrap();
    tags.remove("ns/pkg/never-added.js", "header").unwrap();

    assert!(tags.stylesheets(DEFAULT_POSITION).is_empty());
  }

  #[test]
  fn rejects_unsupported_assets() {
    let mut tags = AssetTags::new();
    let err = tags.add("ns/pkg/logo.png", DEFAULT_POSITION).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);

    let err = tags.remove("ns/pkg/README", DEFAULT_POSITION).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPath);
  }

  #[test]
  fn renders_versioned_tags() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("vendor/ns/pkg")).unwrap();
    fs::write(dir.path().join("vendor/ns/pkg/a.css"), "").unwrap();
    fs::write(dir.path().join("vendor/ns/pkg/a.js"), "").unwrap();
    let composer = AssetComposer::new(dir.path(), ComposerConfig {
      url_style: UrlStyle::Relative,
      route: "/assets?ns={namespace}&pkg={package}&file={asset}".into(),
      ..ComposerConfig::default()
    });

    let mut tags = AssetTags::new();
    tags.add("ns/pkg/a.css", DEFAULT_POSITION).unwrap();
    tags.add("ns/pkg/a.js", DEFAULT_POSITION).unwrap();

    let links = tags.render_stylesheets(&composer, DEFAULT_POSITION).unwrap();
    assert!(links.starts_with("<link rel=\"stylesheet\" href=\"/assets?ns=ns&amp;pkg=pkg&amp;file=a.css&amp;v="));

    let scripts = tags.render_scripts(&composer, DEFAULT_POSITION).unwrap();
    assert!(scripts.starts_with("<script src=\"/assets?ns=ns&amp;pkg=pkg&amp;file=a.js&amp;v="));
    assert!(scripts.ends_with("\"></script>"));

    assert_eq!(tags.render_scripts(&composer, "footer").unwrap(), "");
  }

  #[test]
  fn rendering_fails_for_missing_assets() {
    let dir = tempdir().unwrap();
    let composer = AssetComposer::new(dir.path(), ComposerConfig::default());
    let mut tags = AssetTags::new();
    tags.add("ns/pkg/missing.css", DEFAULT_POSITION).unwrap();

    let err = tags.render_stylesheets(&composer, DEFAULT_POSITION).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
  }
}
