//! Static extension to MIME type table.

use std::path::Path;

/// Content type used where callers prefer a generic fallback over rejection.
pub const FALLBACK_CONTENT_TYPE: &str = "text/plain";

const CONTENT_TYPES: &[(&str, &str)] = &[
  ("csv", "text/csv"),
  ("css", "text/css"),
  ("doc", "application/msword"),
  (
    "docx",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
  ),
  ("eot", "font/eot"),
  ("gif", "image/gif"),
  ("gz", "application/gzip"),
  ("html", "text/html"),
  ("jpeg", "image/jpeg"),
  ("jpg", "image/jpeg"),
  ("js", "application/javascript"),
  ("json", "application/json"),
  ("mp3", "audio/mpeg"),
  ("mp4", "video/mp4"),
  ("oga", "audio/ogg"),
  ("ogv", "video/ogg"),
  ("otf", "font/otf"),
  ("pdf", "application/pdf"),
  ("png", "image/png"),
  ("rar", "application/vnd.rar"),
  ("svg", "image/svg+xml"),
  ("tar", "application/x-tar"),
  ("ttf", "font/ttf"),
  ("wav", "audio/wav"),
  ("webm", "video/webm"),
  ("webp", "image/webp"),
  ("woff", "font/woff"),
  ("woff2", "font/woff2"),
  ("xls", "application/vnd.ms-excel"),
  (
    "xlsx",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
  ),
  ("xml", "application/xml"),
  ("zip", "application/zip"),
];

/// Lowercase extension of `path`, if it has one.
pub fn extension(path: &Path) -> Option<String> {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_ascii_lowercase)
}

/// MIME type registered for a lowercase extension.
pub fn lookup(extension: &str) -> Option<&'static str> {
  CONTENT_TYPES
    .iter()
    .find(|(ext, _)| *ext == extension)
    .map(|(_, mime)| *mime)
}

/// MIME type for `path`, or [`FALLBACK_CONTENT_TYPE`] when the extension is unknown.
pub fn lookup_or_fallback(path: &Path) -> &'static str {
  extension(path)
    .as_deref()
    .and_then(lookup)
    .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Stylesheets and scripts have their embedded `url(...)` references versioned.
pub fn is_text_asset(extension: &str) -> bool {
  matches!(extension, "css" | "js")
}
