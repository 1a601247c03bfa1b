//! Error type for `ironlog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Domain-level rejection (validation, not-found, ownership, conflict).
  #[error("{0}")]
  Core(#[from] ironlog_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be decoded back into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

impl From<ironlog_core::score::ScoreViolation> for Error {
  fn from(v: ironlog_core::score::ScoreViolation) -> Self {
    Self::Core(ironlog_core::Error::Score(v))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
