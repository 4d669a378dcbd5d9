//! Error types surfaced to the adapter layer.

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised while resolving, authorizing or serving an asset.
///
/// Every variant is a client-facing condition. Nothing here is fatal to the process, and the
/// adapter decides which status code each [`ErrorKind`] maps to.
#[derive(Debug, Error)]
pub enum AssetError {
  /// A root directory or file could not be found.
  #[error("{0}")]
  NotFound(String),

  /// The requested path escapes the directory it was resolved against.
  #[error("directory traversal detected: {0}")]
  TraversalDetected(String),

  /// The protection manifest exists but is not a valid allow-list.
  #[error("invalid asset composer file {}: {reason}", path.display())]
  InvalidManifest {
    /// Manifest that failed validation.
    path: PathBuf,
    /// Why the manifest was rejected.
    reason: String,
  },

  /// The asset is not in the allow-list for the current environment.
  #[error("{0}")]
  Forbidden(String),

  /// The supplied version token is missing or does not match.
  #[error("invalid version")]
  InvalidVersion,

  /// The file extension has no registered content type.
  #[error("unsupported asset type: {0}")]
  UnsupportedType(String),

  /// Reading file content, the manifest or file metadata failed.
  #[error("unable to read {}: {source}", path.display())]
  UnreadableFile {
    /// Path that could not be read.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },

  /// The logical asset path is malformed.
  #[error("invalid asset path: {0}")]
  InvalidPath(String),
}

/// Fieldless discriminant of [`AssetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// See [`AssetError::NotFound`].
  NotFound,
  /// See [`AssetError::TraversalDetected`].
  TraversalDetected,
  /// See [`AssetError::InvalidManifest`].
  InvalidManifest,
  /// See [`AssetError::Forbidden`].
  Forbidden,
  /// See [`AssetError::InvalidVersion`].
  InvalidVersion,
  /// See [`AssetError::UnsupportedType`].
  UnsupportedType,
  /// See [`AssetError::UnreadableFile`].
  UnreadableFile,
  /// See [`AssetError::InvalidPath`].
  InvalidPath,
}

impl ErrorKind {
  /// Suggested HTTP status code for adapters that do not need finer control.
  pub fn status_code(self) -> u16 {
    match self {
      Self::NotFound => 404,
      Self::TraversalDetected | Self::Forbidden => 403,
      _ => 400,
    }
  }
}

impl AssetError {
  /// Discriminant used by adapters to pick a response.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::TraversalDetected(_) => ErrorKind::TraversalDetected,
      Self::InvalidManifest { .. } => ErrorKind::InvalidManifest,
      Self::Forbidden(_) => ErrorKind::Forbidden,
      Self::InvalidVersion => ErrorKind::InvalidVersion,
      Self::UnsupportedType(_) => ErrorKind::UnsupportedType,
      Self::UnreadableFile { .. } => ErrorKind::UnreadableFile,
      Self::InvalidPath(_) => ErrorKind::InvalidPath,
    }
  }

  /// Check if this error should result in a 403 Forbidden response.
  pub fn is_forbidden(&self) -> bool {
    self.kind().status_code() == 403
  }

  /// Check if this error should result in a 404 Not Found response.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound(_))
  }

  pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::UnreadableFile {
      path: path.into(),
      source,
    }
  }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AssetError>;
