//! Country records and the raw upstream payloads they are built from.
//!
//! A [`RawCountry`] is whatever the country-facts source sent us. After it is
//! joined with the exchange-rate table it becomes a [`NewCountry`], which the
//! reconciler turns into a persisted [`Country`] by attaching a surrogate id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Upstream payloads ───────────────────────────────────────────────────────

/// A currency descriptor as reported by the country-facts source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCurrency {
  pub code:   Option<String>,
  pub name:   Option<String>,
  pub symbol: Option<String>,
}

/// One entry from the country-facts source.
///
/// Every field is optional on the wire; a missing field decodes to `None`
/// (or an empty list) rather than rejecting the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCountry {
  pub name:       Option<String>,
  pub capital:    Option<String>,
  pub region:     Option<String>,
  pub population: Option<u64>,
  pub currencies: Option<Vec<RawCurrency>>,
  pub flag:       Option<String>,
}

impl RawCountry {
  /// Code of the first listed currency. Later entries are ignored.
  pub fn first_currency_code(&self) -> Option<&str> {
    self
      .currencies
      .as_deref()
      .and_then(<[RawCurrency]>::first)
      .and_then(|c| c.code.as_deref())
  }
}

/// Currency code → units of that currency per one USD.
pub type RateTable = HashMap<String, f64>;

// ─── Records ─────────────────────────────────────────────────────────────────

/// A joined, normalized country ready to be reconciled against storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCountry {
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        u64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  /// Zero when the estimate could not be computed; never absent.
  pub estimated_gdp:     f64,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: DateTime<Utc>,
}

/// A persisted country record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
  /// Surrogate id; assigned on first insert and never changed afterwards.
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        u64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     f64,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: DateTime<Utc>,
}

impl Country {
  /// Attach `id` to an incoming record.
  pub fn from_new(id: i64, new: NewCountry) -> Self {
    Self {
      id,
      name: new.name,
      capital: new.capital,
      region: new.region,
      population: new.population,
      currency_code: new.currency_code,
      exchange_rate: new.exchange_rate,
      estimated_gdp: new.estimated_gdp,
      flag_url: new.flag_url,
      last_refreshed_at: new.last_refreshed_at,
    }
  }

  /// The case-folded natural key of this record.
  pub fn name_key(&self) -> String { fold_name(&self.name) }
}

/// Fold a country name into its lookup key.
///
/// Two names denote the same country iff their folded forms are equal. This
/// is plain Unicode lowercasing; no pattern matching is involved, so names
/// containing `.` or `*` match only themselves.
pub fn fold_name(name: &str) -> String { name.to_lowercase() }

// ─── Refresh metadata ────────────────────────────────────────────────────────

/// The singleton describing the last successful refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshMetadata {
  pub timestamp:       DateTime<Utc>,
  pub total_countries: u64,
}
