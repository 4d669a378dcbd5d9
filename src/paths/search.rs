use std::path::{Path, PathBuf};

/// Prefix every search path ends with.
pub const DEFAULT_SEARCH_PREFIX: &str = "/vendor/";

/// Ordered list of directory prefixes tried when resolving a namespace/package pair.
///
/// The first matching entry wins; later entries never override earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
  prefixes: Vec<String>,
}

impl SearchPath {
  /// Build a search path from caller-supplied prefixes, always ending with
  /// [`DEFAULT_SEARCH_PREFIX`].
  pub fn new(custom: impl IntoIterator<Item = String>) -> Self {
    let mut prefixes: Vec<String> = custom.into_iter().collect();
    prefixes.push(DEFAULT_SEARCH_PREFIX.to_string());
    Self { prefixes }
  }

  /// Prefixes in lookup order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.prefixes.iter().map(String::as_str)
  }
}

impl Default for SearchPath {
  fn default() -> Self {
    Self::new(Vec::new())
  }
}

/// Join a slash-delimited prefix such as `/vendor/` onto `base`.
pub fn join_prefix(base: &Path, prefix: &str) -> PathBuf {
  prefix
    .split(['/', '\\'])
    .filter(|segment| !segment.is_empty())
    .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_to_vendor_only() {
    let search = SearchPath::default();
    assert_eq!(search.iter().collect::<Vec<_>>(), vec!["/vendor/"]);
  }

  #[test]
  fn appends_vendor_after_custom_prefixes() {
    let search = SearchPath::new(vec!["/custom/".to_string(), "/lib/".to_string()]);
    assert_eq!(search.iter().collect::<Vec<_>>(), vec![
      "/custom/", "/lib/", "/vendor/"
    ]);
  }

  #[test]
  fn joins_prefix_segments() {
    assert_eq!(
      join_prefix(Path::new("/p"), "/vendor/"),
      PathBuf::from("/p/vendor")
    );
    assert_eq!(
      join_prefix(Path::new("/p"), "/node_modules/@scope/"),
      PathBuf::from("/p/node_modules/@scope")
    );
    assert_eq!(join_prefix(Path::new("/p"), "/"), PathBuf::from("/p"));
  }
}
