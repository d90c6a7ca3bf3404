//! Error type for `cxr-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column held a value the domain type cannot represent.
  #[error("invalid stored value: {0}")]
  InvalidValue(String),

  /// An update addressed an id with no row behind it.
  #[error("country not found: id {0}")]
  CountryNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
