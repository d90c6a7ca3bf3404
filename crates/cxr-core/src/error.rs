//! Error types for `cxr-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One of the two upstream sources could not be reached, answered with a
  /// non-success status, timed out, or sent a body that could not be decoded.
  #[error("external data source unavailable: {source_name}: {details}")]
  UpstreamUnavailable {
    source_name: String,
    details:     String,
  },

  #[error("country not found: {0}")]
  NotFound(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error (store, renderer) as [`Error::Internal`].
  pub fn internal<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
