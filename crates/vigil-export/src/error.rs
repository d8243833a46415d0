//! Error type for `vigil-export`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input is not well-formed JSON, or a field has the wrong shape.
  /// The message carries the parse failure reason.
  #[error("invalid export file: {0}")]
  Json(#[from] serde_json::Error),

  /// The top-level object lacks the `currentDeadline` payload.
  #[error("export file is missing the `currentDeadline` payload")]
  MissingDeadline,

  #[error("unsupported export format version: {0:?}")]
  UnsupportedVersion(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
