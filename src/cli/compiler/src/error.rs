/* src/cli/compiler/src/error.rs */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a build. No partial bundle survives any of them.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Two page files resolve to the same route.
  #[error("route conflict: \"{route}\" is produced by both {first} and {second}")]
  ClassificationConflict { route: String, first: String, second: String },

  /// A route uses the bracket syntax incorrectly.
  #[error("malformed route \"{path}\": {reason}")]
  MalformedRoutePath { path: String, reason: String },

  /// The framework did not emit a serverless pages manifest.
  #[error(
    "pages manifest not found at {} -- check that next.config.js sets target to \"serverless\"",
    .path.display()
  )]
  MissingPagesManifest { path: PathBuf },

  /// A framework metadata document could not be parsed.
  #[error("invalid build metadata in {}: {source}", .path.display())]
  InvalidMetadata {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// A compiled route pattern failed to build as a regex.
  #[error("invalid pattern for route \"{route}\": {source}")]
  InvalidPattern {
    route: String,
    #[source]
    source: regex::Error,
  },

  /// Manifest serialization failed.
  #[error("failed to serialize manifest: {0}")]
  Serialize(#[from] serde_json::Error),

  /// Copy, empty, write or remove failed.
  #[error("failed to {action} {}: {source}", .path.display())]
  Filesystem {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl BuildError {
  pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
    Self::MalformedRoutePath { path: path.to_string(), reason: reason.into() }
  }

  pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Filesystem { action, path: path.into(), source }
  }
}
