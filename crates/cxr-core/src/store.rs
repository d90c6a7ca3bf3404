//! The `CountryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `cxr-store-sqlite`).
//! The refresh pipeline and the HTTP layer depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::country::{Country, RefreshMetadata};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Orderings accepted by [`CountryStore::list_countries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  GdpDesc,
  GdpAsc,
  PopulationDesc,
  PopulationAsc,
}

impl SortKey {
  /// Look up a sort key by its wire name. Unknown or empty names yield `None`
  /// and leave the listing in storage order.
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "gdp_desc" => Some(Self::GdpDesc),
      "gdp_asc" => Some(Self::GdpAsc),
      "population_desc" => Some(Self::PopulationDesc),
      "population_asc" => Some(Self::PopulationAsc),
      _ => None,
    }
  }
}

/// Parameters for [`CountryStore::list_countries`].
///
/// Ties under `sort` (and the unsorted listing) keep storage order, which is
/// the order records were first inserted in.
#[derive(Debug, Clone, Default)]
pub struct CountryQuery {
  /// Case-insensitive exact match on `region`.
  pub region:   Option<String>,
  /// Exact match on `currency_code`.
  pub currency: Option<String>,
  pub sort:     Option<SortKey>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a country store backend.
///
/// Name arguments are natural keys and are matched case-insensitively (see
/// [`crate::country::fold_name`]).
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CountryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Countries ─────────────────────────────────────────────────────────

  /// Retrieve a country by name. Returns `None` if not found.
  fn find_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;

  /// Insert a new record. Fails if its id or natural key is already taken.
  fn insert_country(
    &self,
    country: Country,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Overwrite every field of the record with `country.id`.
  fn update_country(
    &self,
    country: Country,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List countries matching `query`.
  fn list_countries<'a>(
    &'a self,
    query: &'a CountryQuery,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + 'a;

  /// Delete a country by name. Returns `false` if nothing matched.
  fn delete_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Identifier allocation ─────────────────────────────────────────────

  /// Atomically increment the durable id counter and return its new value.
  ///
  /// The counter starts at 1. Concurrent callers never observe the same
  /// value, and every value is greater than all previously returned ones.
  fn next_id(&self) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Refresh metadata ──────────────────────────────────────────────────

  /// The last successful refresh, if any.
  fn get_metadata(
    &self,
  ) -> impl Future<Output = Result<Option<RefreshMetadata>, Self::Error>> + Send + '_;

  /// Replace the refresh metadata singleton wholesale.
  fn put_metadata(
    &self,
    metadata: RefreshMetadata,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
