//! Error type for `cxr-summary`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("svg error: {0}")]
  Svg(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
