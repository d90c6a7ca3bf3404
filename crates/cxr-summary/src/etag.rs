//! ETag computation for rendered summaries.
//!
//! ETags are SHA-256 hashes over the artifact bytes, so identical renders
//! share a validator no matter when they were written.

use sha2::{Digest, Sha256};

/// Compute a quoted strong ETag for `bytes`.
pub fn compute_etag(bytes: &[u8]) -> String {
  let hash = Sha256::digest(bytes);
  format!("\"{}\"", hex::encode(hash))
}
