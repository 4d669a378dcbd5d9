//! Public entry points consumed by the web adapter layer.

use std::path::PathBuf;

use chrono::{DateTime, Months, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::debug;

use crate::access::{Environment, authorize};
use crate::config::{ComposerConfig, UrlStyle};
use crate::content_type::{self, FALLBACK_CONTENT_TYPE};
use crate::error::{AssetError, Result};
use crate::models::{AssetReference, AssetResponse, ResolvedAsset};
use crate::paths::read_file;
use crate::resolver::Resolver;
use crate::version::{RewriteContext, VersionToken, rewrite_urls, validate_token};

/// `Cache-Control` max-age: ten years in seconds.
pub const CACHE_MAX_AGE: u64 = 315_360_000;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Bytes escaped inside one route path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'#')
  .add(b'%')
  .add(b'&')
  .add(b'/')
  .add(b'<')
  .add(b'>')
  .add(b'?')
  .add(b'`')
  .add(b'{')
  .add(b'}');

/// How files whose extension is missing from the content-type table are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownTypes {
  /// Fail with [`AssetError::UnsupportedType`].
  #[default]
  Reject,
  /// Serve as `text/plain`.
  Fallback,
}

/// Resolves, authorizes, versions and serves assets for one project directory.
///
/// Every call reads the filesystem afresh; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct AssetComposer {
  resolver: Resolver,
  environment: Environment,
  secret: String,
  route: String,
  url_style: UrlStyle,
  base_url: Option<String>,
  unknown_types: UnknownTypes,
}

impl AssetComposer {
  /// Build a composer for `project_dir` from `config`.
  pub fn new(project_dir: impl Into<PathBuf>, config: ComposerConfig) -> Self {
    let resolver = Resolver::new(project_dir, config.search_path());
    Self {
      resolver,
      environment: config.environment,
      secret: config.secret,
      route: config.route,
      url_style: config.url_style,
      base_url: config.base_url,
      unknown_types: UnknownTypes::Reject,
    }
  }

  /// Change how unknown extensions are served.
  pub fn with_unknown_types(mut self, unknown_types: UnknownTypes) -> Self {
    self.unknown_types = unknown_types;
    self
  }

  /// Underlying resolver.
  pub fn resolver(&self) -> &Resolver {
    &self.resolver
  }

  /// Environment the allow-list is evaluated for.
  pub fn environment(&self) -> &Environment {
    &self.environment
  }

  /// Serve `namespace/package/asset_path` if `supplied_token` is its current version.
  ///
  /// The request is located, checked against the allow-list, checked against the version
  /// token and finally read. The first failing step aborts the request.
  pub fn get_asset_file(
    &self,
    namespace: &str,
    package: &str,
    asset_path: &str,
    supplied_token: &str,
  ) -> Result<AssetResponse> {
    let reference = AssetReference::new(namespace, package, asset_path);
    let resolved = self.resolver.locate_for_serving(&reference)?;
    authorize(&resolved.root_dir, &reference.asset_path, &self.environment)?;
    validate_token(&reference, supplied_token, &resolved, &self.secret)?;

    let content = read_file(&resolved.file_path)?;
    self.serve(&reference, &resolved, content)
  }

  /// Versioned public URL for a logical `namespace/package/rest...` path.
  pub fn get_asset_url(&self, logical_path: &str) -> Result<String> {
    let (reference, resolved) = self.resolver.locate_for_naming(logical_path)?;
    let token = VersionToken::compute(&reference.logical_path(), resolved.modified, &self.secret);
    let route = self.render_route(&reference);
    let separator = if route.contains('?') { '&' } else { '?' };
    Ok(format!("{route}{separator}v={token}"))
  }

  /// Current version token for a logical path.
  pub fn version_token(&self, logical_path: &str) -> Result<VersionToken> {
    let (reference, resolved) = self.resolver.locate_for_naming(logical_path)?;
    Ok(VersionToken::compute(
      &reference.logical_path(),
      resolved.modified,
      &self.secret,
    ))
  }

  /// Build the response for already authorized and validated content.
  pub fn serve(
    &self,
    reference: &AssetReference,
    resolved: &ResolvedAsset,
    content: Vec<u8>,
  ) -> Result<AssetResponse> {
    let extension = content_type::extension(&resolved.file_path).unwrap_or_default();
    let content_type = match (content_type::lookup(&extension), self.unknown_types) {
      (Some(mime), _) => mime,
      (None, UnknownTypes::Fallback) => FALLBACK_CONTENT_TYPE,
      (None, UnknownTypes::Reject) => {
        return Err(AssetError::UnsupportedType(if extension.is_empty() {
          reference.asset_path.clone()
        } else {
          extension
        }));
      }
    };

    let body = if content_type::is_text_asset(&extension) {
      self.rewrite_body(reference, resolved, content)
    } else {
      content
    };

    Ok(AssetResponse {
      body,
      headers: cache_headers(resolved.modified, content_type),
    })
  }

  fn rewrite_body(
    &self,
    reference: &AssetReference,
    resolved: &ResolvedAsset,
    content: Vec<u8>,
  ) -> Vec<u8> {
    let text = match String::from_utf8(content) {
      Ok(text) => text,
      Err(err) => {
        debug!(asset = %reference, "content is not UTF-8; serving without rewriting");
        return err.into_bytes();
      }
    };

    rewrite_urls(&text, &RewriteContext {
      versioning_root: &resolved.versioning_root,
      source_file: &resolved.file_path,
      reference,
      secret: &self.secret,
    })
    .into_bytes()
  }

  fn render_route(&self, reference: &AssetReference) -> String {
    let asset = reference
      .asset_path
      .split('/')
      .map(encode_segment)
      .collect::<Vec<_>>()
      .join("/");
    let path = self
      .route
      .replace("{namespace}", &encode_segment(&reference.namespace))
      .replace("{package}", &encode_segment(&reference.package))
      .replace("{asset}", &asset);

    match (self.url_style, self.base_url.as_deref()) {
      (UrlStyle::Absolute, Some(base)) => format!("{}{}", base.trim_end_matches('/'), path),
      _ => path,
    }
  }
}

fn encode_segment(segment: &str) -> String {
  utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn cache_headers(modified: i64, content_type: &'static str) -> Vec<(&'static str, String)> {
  let now = Utc::now();
  let expires = now.checked_add_months(Months::new(120)).unwrap_or(now);
  let last_modified = DateTime::<Utc>::from_timestamp(modified, 0).unwrap_or_default();

  vec![
    ("Expires", expires.format(HTTP_DATE_FORMAT).to_string()),
    ("Cache-Control", format!("max-age={CACHE_MAX_AGE}, public")),
    ("Pragma", "cache".to_string()),
    ("Last-Modified", last_modified.format(HTTP_DATE_FORMAT).to_string()),
    ("Content-Type", content_type.to_string()),
  ]
}
