//! Core types and trait definitions for the cxr country/exchange service.
//!
//! This crate is free of HTTP and database dependencies. Storage, upstream
//! fetching and summary rendering are expressed as traits implemented by the
//! adapter crates (`cxr-store-sqlite`, `cxr-gateway`, `cxr-summary`); the
//! refresh pipeline itself lives here and is generic over all three.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod country;
pub mod error;
pub mod gateway;
pub mod join;
pub mod reconcile;
pub mod refresh;
pub mod store;
pub mod summary;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
