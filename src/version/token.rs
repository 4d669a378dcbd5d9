//! Deterministic cache-busting tokens.

use std::fmt;

use md5::{Digest, Md5};
use tracing::warn;

use crate::error::{AssetError, Result};
use crate::models::{AssetReference, ResolvedAsset};

/// Hex digest of `{logical path}#{secret}#{modification time}`.
///
/// The digest is not a security boundary. It changes whenever the file is touched or the
/// logical path changes, which busts client caches, and it cannot be guessed without the
/// secret, which discourages hand-crafted URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
  /// Derive the token for a logical path at a given modification time.
  pub fn compute(logical_path: &str, modified: i64, secret: &str) -> Self {
    let mut hasher = Md5::new();
    hasher.update(format!("{logical_path}#{secret}#{modified}").as_bytes());
    let digest = hasher.finalize();
    Self(digest.iter().map(|byte| format!("{byte:02x}")).collect())
  }

  /// The 32 character lowercase hex representation.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Exact comparison against a token supplied by a client.
  pub fn matches(&self, supplied: &str) -> bool {
    !supplied.is_empty() && self.0 == supplied
  }
}

impl fmt::Display for VersionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Check that `supplied` is the current token for `reference`.
pub fn validate_token(
  reference: &AssetReference,
  supplied: &str,
  resolved: &ResolvedAsset,
  secret: &str,
) -> Result<()> {
  let expected = VersionToken::compute(&reference.logical_path(), resolved.modified, secret);
  if expected.matches(supplied) {
    return Ok(());
  }

  warn!(asset = %reference, "rejected request with stale or missing version");
  Err(AssetError::InvalidVersion)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  fn resolved(modified: i64) -> ResolvedAsset {
    ResolvedAsset {
      file_path: PathBuf::from("/p/vendor/ns/pkg/a.css"),
      root_dir: PathBuf::from("/p/vendor/ns/pkg"),
      versioning_root: PathBuf::from("/p/vendor"),
      modified,
    }
  }

  #[test]
  fn matches_md5_of_joined_inputs() {
    let token = VersionToken::compute("ns/pkg/a.css", 1_700_000_000, "s");
    assert_eq!(token.as_str(), "ed601dd5a3650811505c043736eab35d");
    assert_eq!(token.as_str().len(), 32);
  }

  #[test]
  fn is_deterministic_and_tracks_modification_time() {
    let first = VersionToken::compute("ns/pkg/a.css", 1_700_000_000, "s");
    let again = VersionToken::compute("ns/pkg/a.css", 1_700_000_000, "s");
    let touched = VersionToken::compute("ns/pkg/a.css", 1_700_000_001, "s");

    assert_eq!(first, again);
    assert_eq!(touched.as_str(), "3f9ee3cd546d0967f424e0082f31b039");
    assert_ne!(first, touched);
    assert_ne!(first, VersionToken::compute("ns/pkg/b.css", 1_700_000_000, "s"));
  }

  #[test]
  fn validates_exact_tokens_only() {
    let reference = AssetReference::new("ns", "pkg", "a.css");
    let token = VersionToken::compute("ns/pkg/a.css", 42, "s");

    assert!(validate_token(&reference, token.as_str(), &resolved(42), "s").is_ok());
    assert!(matches!(
      validate_token(&reference, "wrong", &resolved(42), "s"),
      Err(AssetError::InvalidVersion)
    ));
    assert!(matches!(
      validate_token(&reference, "", &resolved(42), "s"),
      Err(AssetError::InvalidVersion)
    ));
    assert!(matches!(
      validate_token(&reference, token.as_str(), &resolved(43), "s"),
      Err(AssetError::InvalidVersion)
    ));
    assert!(validate_token(&reference, &token.as_str().to_uppercase(), &resolved(42), "s").is_err());
  }
}
