//! Environment-aware allow-list decisions.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::access::manifest::{ProtectionManifest, load_manifest};
use crate::error::{AssetError, Result};

/// Environment tag selecting which allow-list entries apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Environment {
  /// Only `files` entries are served.
  #[default]
  Production,
  /// `files` and `files-dev` entries are served. Holds the original tag.
  Development(String),
}

impl Environment {
  /// Tag that selects [`Environment::Production`].
  pub const PRODUCTION_TAG: &'static str = "prod";

  /// Interpret an environment tag; anything other than `prod` is non-production.
  pub fn from_tag(tag: &str) -> Self {
    if tag == Self::PRODUCTION_TAG {
      Self::Production
    } else {
      Self::Development(tag.to_string())
    }
  }

  /// Whether the production rules apply.
  pub fn is_production(&self) -> bool {
    matches!(self, Self::Production)
  }
}

impl From<String> for Environment {
  fn from(tag: String) -> Self {
    Self::from_tag(&tag)
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Production => f.write_str(Self::PRODUCTION_TAG),
      Self::Development(tag) => f.write_str(tag),
    }
  }
}

impl ProtectionManifest {
  /// Check `asset_path` against the allow-list for `environment`.
  pub fn permits(&self, asset_path: &str, environment: &Environment) -> Result<()> {
    if self.files.contains(asset_path) {
      return Ok(());
    }

    let dev_listed = self
      .files_dev
      .as_ref()
      .is_some_and(|files| files.contains(asset_path));

    match environment {
      Environment::Production if dev_listed => Err(AssetError::Forbidden(
        "asset not allowed in production environment".into(),
      )),
      Environment::Production => Err(AssetError::Forbidden("asset not allowed".into())),
      Environment::Development(_) if dev_listed => Ok(()),
      Environment::Development(_) => Err(AssetError::Forbidden("asset not allowed".into())),
    }
  }
}

/// Apply the manifest of `root`, if any, to a request for `asset_path`.
pub fn authorize(root: &Path, asset_path: &str, environment: &Environment) -> Result<()> {
  let Some(manifest) = load_manifest(root)? else {
    return Ok(());
  };

  manifest.permits(asset_path, environment).inspect_err(|_| {
    warn!(asset = asset_path, %environment, "asset rejected by allow-list");
  })
}
