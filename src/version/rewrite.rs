//! Append version tokens to relative `url(...)` references inside stylesheets and scripts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::content_type::{extension, is_text_asset};
use crate::models::{APP_NAMESPACE, APP_PACKAGE, AssetReference};
use crate::paths::{canonical_dir, modification_time};
use crate::version::VersionToken;

fn url_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"(?i:url)\(\s*(?:"([^"]*)"|'([^']*)'|([^'"()\s]+))\s*\)"#)
      .expect("invalid url() regex")
  })
}

/// Inputs describing where the content being rewritten came from.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
  /// Directory logical paths of referenced files are computed from.
  pub versioning_root: &'a Path,
  /// File the content was read from; relative URLs resolve against its directory.
  pub source_file: &'a Path,
  /// Reference the content was requested through.
  pub reference: &'a AssetReference,
  /// Secret mixed into every token.
  pub secret: &'a str,
}

/// Version every relative `url(...)` reference in `content` that points at an existing file.
///
/// Absolute and `data:` URLs, references to missing files and references leaving the
/// versioning root are left byte-for-byte untouched. Referenced files are versioned but never
/// scanned themselves. When the versioning root does not exist the content is returned as-is.
pub fn rewrite_urls(content: &str, context: &RewriteContext<'_>) -> String {
  let is_text = extension(context.source_file)
    .as_deref()
    .is_some_and(is_text_asset);
  if !is_text {
    return content.to_string();
  }

  let Some(root) = canonical_dir(context.versioning_root) else {
    debug!(
      root = %context.versioning_root.display(),
      "versioning root missing; serving content without rewritten URLs"
    );
    return content.to_string();
  };

  let base_dir = context
    .source_file
    .parent()
    .map(Path::to_path_buf)
    .unwrap_or_default();

  // Keyed by the literal construct; `None` marks constructs left as they are.
  let mut rewrites: BTreeMap<String, Option<String>> = BTreeMap::new();
  for caps in url_pattern().captures_iter(content) {
    if rewrites.contains_key(&caps[0]) {
      continue;
    }
    let replacement = rewrite_construct(&caps, &base_dir, &root, context);
    rewrites.insert(caps[0].to_string(), replacement);
  }

  if rewrites.values().all(Option::is_none) {
    return content.to_string();
  }

  url_pattern()
    .replace_all(content, |caps: &Captures<'_>| {
      match rewrites.get(&caps[0]) {
        Some(Some(replacement)) => replacement.clone(),
        _ => caps[0].to_string(),
      }
    })
    .into_owned()
}

/// Insert `v=<token>` into `url`, keeping any `#fragment` at the end.
pub fn append_version(url: &str, token: &VersionToken) -> String {
  let (base, fragment) = match url.find('#') {
    Some(index) => url.split_at(index),
    None => (url, ""),
  };
  let separator = if base.contains('?') { '&' } else { '?' };
  format!("{base}{separator}v={token}{fragment}")
}

fn is_external_or_inline(value: &str) -> bool {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN
    .get_or_init(|| Regex::new(r"(?i)^(?:https?://|data:)").expect("invalid external url regex"))
    .is_match(value)
}

fn rewrite_construct(
  caps: &Captures<'_>,
  base_dir: &Path,
  root: &Path,
  context: &RewriteContext<'_>,
) -> Option<String> {
  let url = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
  let value = url.as_str();
  if is_external_or_inline(value) {
    return None;
  }

  let file_part = value.split(['?', '#']).next().unwrap_or_default();
  if file_part.is_empty() {
    return None;
  }

  let target = base_dir.join(file_part);
  if !target.is_file() {
    debug!(url = value, "referenced file missing; leaving url untouched");
    return None;
  }

  let canonical = fs::canonicalize(&target).ok()?;
  let logical = logical_path_within(&canonical, root, context.reference)?;
  let modified = modification_time(&canonical).ok()?;
  let token = VersionToken::compute(&logical, modified, context.secret);

  let construct = &caps[0];
  let start = url.start() - caps.get(0)?.start();
  let end = start + value.len();
  Some(format!(
    "{}{}{}",
    &construct[..start],
    append_version(value, &token),
    &construct[end..]
  ))
}

fn logical_path_within(file: &Path, root: &Path, reference: &AssetReference) -> Option<String> {
  let relative: PathBuf = file.strip_prefix(root).ok()?.to_path_buf();
  let joined = relative
    .components()
    .map(|component| component.as_os_str().to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join("/");

  if reference.is_app_assets() {
    Some(format!("{APP_NAMESPACE}/{APP_PACKAGE}/{joined}"))
  } else {
    Some(joined)
  }
}
