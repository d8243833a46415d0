//! Error types for `vigil-core`.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("deadline name must not be empty")]
  EmptyName,

  #[error("end date {end} is not after start date {start}")]
  EndNotAfterStart {
    start: DateTime<Utc>,
    end:   DateTime<Utc>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
