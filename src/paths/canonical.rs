use std::fs;
use std::path::{Component, Path, PathBuf};

/// Returns `true` when a requested asset path could step outside the directory it is joined to.
///
/// Any `..` sequence is rejected outright, as are absolute and drive-rooted paths, because
/// `Path::join` would otherwise discard the root directory entirely.
pub fn has_traversal(asset_path: &str) -> bool {
  if asset_path.contains("..") || asset_path.starts_with(['/', '\\']) {
    return true;
  }

  Path::new(asset_path)
    .components()
    .any(|component| matches!(component, Component::Prefix(_) | Component::RootDir))
}

/// Canonical form of `dir`, or `None` when it does not exist as a directory.
pub fn canonical_dir(dir: &Path) -> Option<PathBuf> {
  let canonical = fs::canonicalize(dir).ok()?;
  canonical.is_dir().then_some(canonical)
}

/// Component-wise check that `path` sits strictly below `root`.
///
/// Both paths are expected to be canonical already. Comparing components rather than string
/// prefixes keeps `/vendor/ab` from counting as a child of `/vendor/a`.
pub fn is_descendant(path: &Path, root: &Path) -> bool {
  path != root && path.starts_with(root)
}

/// Canonicalize `candidate` and return it only if it resolves below the canonical `root`.
///
/// Symlinks are followed on both sides, so a link inside `root` pointing elsewhere is rejected
/// the same way a literal `..` escape would be.
pub fn resolve_within(candidate: &Path, root: &Path) -> Option<PathBuf> {
  let root = canonical_dir(root)?;
  let resolved = fs::canonicalize(candidate).ok()?;
  is_descendant(&resolved, &root).then_some(resolved)
}
