//! Locate asset files beneath the configured search roots.
//!
//! Two lookup directions exist. Serving starts from a request for a namespace/package pair and
//! picks the first package directory that exists. Naming starts from a logical path and picks
//! the first search root that actually holds the file. Both end with the same canonical
//! containment check against the matched root.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AssetError, Result};
use crate::models::{APP_ASSETS_DIR, AssetReference, ResolvedAsset};
use crate::paths::{
  SearchPath, canonical_dir, has_traversal, join_prefix, modification_time, resolve_within,
};

/// Resolves asset references to files under a project directory.
#[derive(Debug, Clone)]
pub struct Resolver {
  project_dir: PathBuf,
  search_path: SearchPath,
}

/// Candidate directories for a reference under one search prefix.
struct Candidate {
  root: PathBuf,
  versioning_root: PathBuf,
}

impl Resolver {
  /// Create a resolver rooted at `project_dir`.
  pub fn new(project_dir: impl Into<PathBuf>, search_path: SearchPath) -> Self {
    Self {
      project_dir: project_dir.into(),
      search_path,
    }
  }

  /// Project directory every search prefix is joined onto.
  pub fn project_dir(&self) -> &Path {
    &self.project_dir
  }

  /// Search prefixes in lookup order.
  pub fn search_path(&self) -> &SearchPath {
    &self.search_path
  }

  /// Resolve a request for `reference` to a readable file.
  ///
  /// The first search root whose `{namespace}/{package}` directory exists wins, even when the
  /// file itself lives under a later root.
  pub fn locate_for_serving(&self, reference: &AssetReference) -> Result<ResolvedAsset> {
    reject_traversal(reference)?;

    let candidate = self
      .candidates(reference)
      .into_iter()
      .find(|candidate| candidate.root.is_dir())
      .ok_or_else(|| AssetError::NotFound("vendor directory not found".into()))?;
    debug!(root = %candidate.root.display(), asset = %reference, "matched package directory");

    let file = candidate.root.join(&reference.asset_path);
    if !file.is_file() {
      return Err(AssetError::NotFound("asset file not found".into()));
    }

    self.finish(reference, candidate, &file)
  }

  /// Resolve a logical `namespace/package/rest...` path to the file a URL should name.
  ///
  /// Unlike [`Resolver::locate_for_serving`], the first root that holds the file itself wins.
  pub fn locate_for_naming(&self, logical_path: &str) -> Result<(AssetReference, ResolvedAsset)> {
    let reference = AssetReference::parse(logical_path)?;
    reject_traversal(&reference)?;

    let (candidate, file) = self
      .candidates(&reference)
      .into_iter()
      .map(|candidate| {
        let file = candidate.root.join(&reference.asset_path);
        (candidate, file)
      })
      .find(|(_, file)| file.is_file())
      .ok_or_else(|| AssetError::NotFound(format!("asset not found: {logical_path}")))?;
    debug!(file = %file.display(), asset = %reference, "matched asset file");

    let resolved = self.finish(&reference, candidate, &file)?;
    Ok((reference, resolved))
  }

  fn candidates(&self, reference: &AssetReference) -> Vec<Candidate> {
    if reference.is_app_assets() {
      let root = self.project_dir.join(APP_ASSETS_DIR);
      return vec![Candidate {
        versioning_root: root.clone(),
        root,
      }];
    }

    self
      .search_path
      .iter()
      .map(|prefix| {
        let versioning_root = join_prefix(&self.project_dir, prefix);
        let root = versioning_root
          .join(&reference.namespace)
          .join(&reference.package);
        Candidate {
          root,
          versioning_root,
        }
      })
      .collect()
  }

  fn finish(
    &self,
    reference: &AssetReference,
    candidate: Candidate,
    file: &Path,
  ) -> Result<ResolvedAsset> {
    let Some(file_path) = resolve_within(file, &candidate.root) else {
      warn!(asset = %reference, "resolved file escapes its package directory");
      return Err(AssetError::TraversalDetected(reference.to_string()));
    };
    let root_dir = canonical_dir(&candidate.root).unwrap_or(candidate.root);
    let modified = modification_time(&file_path)?;

    Ok(ResolvedAsset {
      file_path,
      root_dir,
      versioning_root: candidate.versioning_root,
      modified,
    })
  }
}

fn reject_traversal(reference: &AssetReference) -> Result<()> {
  let bad_segment = |segment: &str| has_traversal(segment) || segment.contains(['/', '\\']);

  if has_traversal(&reference.asset_path)
    || bad_segment(&reference.namespace)
    || bad_segment(&reference.package)
  {
    warn!(asset = %reference, "rejected traversal sequence in asset reference");
    return Err(AssetError::TraversalDetected(reference.to_string()));
  }
  Ok(())
}
