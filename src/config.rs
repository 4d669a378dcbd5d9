//! Composer configuration loaded from JSON or YAML.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::access::Environment;
use crate::paths::SearchPath;

const CONFIG_CANDIDATES: &[&str] = &[
  "asset_composer.yaml",
  "asset_composer.yml",
  "asset_composer.json",
];

/// Default route template used when generating asset URLs.
pub const DEFAULT_ROUTE: &str = "/assetscomposer/{namespace}/{package}/{asset}";

/// Whether generated URLs carry scheme and host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStyle {
  /// Prefix the rendered route with the configured base URL.
  #[default]
  Absolute,
  /// Emit the rendered route only.
  Relative,
}

/// Settings consumed by [`crate::AssetComposer`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
  /// Additional search prefixes tried before `/vendor/`.
  pub paths: Vec<String>,
  /// Environment tag; `prod` enables the production allow-list rules.
  pub environment: Environment,
  /// Secret mixed into every version token.
  pub secret: String,
  /// Route template with `{namespace}`, `{package}` and `{asset}` placeholders.
  pub route: String,
  /// Absolute or relative URL generation.
  pub url_style: UrlStyle,
  /// Scheme and host used for absolute URLs, e.g. `https://example.com`.
  pub base_url: Option<String>,
}

impl Default for ComposerConfig {
  fn default() -> Self {
    Self {
      paths: Vec::new(),
      environment: Environment::Production,
      secret: String::new(),
      route: DEFAULT_ROUTE.into(),
      url_style: UrlStyle::Absolute,
      base_url: None,
    }
  }
}

impl ComposerConfig {
  /// Look for a configuration file in `project_dir`.
  ///
  /// The first existing candidate is used. Files that fail to parse are reported and the
  /// defaults are returned so the composer still starts.
  pub fn discover(project_dir: &Path) -> Self {
    let Some(candidate) = Self::candidate_path(project_dir) else {
      return Self::default();
    };

    match Self::from_path(&candidate) {
      Ok(config) => config,
      Err(err) => {
        warn!(path = %candidate.display(), error = %err, "ignoring unreadable composer config");
        Self::default()
      }
    }
  }

  /// Read configuration from a specific file, choosing the format by extension.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse YAML config {}", path.display()))
    } else {
      serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON config {}", path.display()))
    }
  }

  /// Search prefixes in lookup order, ending with `/vendor/`.
  pub fn search_path(&self) -> SearchPath {
    SearchPath::new(self.paths.iter().cloned())
  }

  fn candidate_path(project_dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
      .iter()
      .map(|name| project_dir.join(name))
      .find(|path| path.is_file())
  }
}
