//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Populations are stored as
//! `INTEGER` (signed 64-bit) and checked on the way back out.

use chrono::{DateTime, Utc};
use cxr_core::country::{Country, RefreshMetadata};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn encode_count(n: u64) -> Result<i64> {
  i64::try_from(n).map_err(|_| Error::InvalidValue(format!("count {n} overflows INTEGER")))
}

pub fn decode_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::InvalidValue(format!("negative count {n}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawCountry`].
pub const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, \
   currency_code, exchange_rate, estimated_gdp, flag_url, last_refreshed_at";

/// Values read directly from a `countries` row.
pub struct RawCountry {
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        i64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     f64,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: String,
}

impl RawCountry {
  /// Read a row selected with [`COUNTRY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      name:              row.get(1)?,
      capital:           row.get(2)?,
      region:            row.get(3)?,
      population:        row.get(4)?,
      currency_code:     row.get(5)?,
      exchange_rate:     row.get(6)?,
      estimated_gdp:     row.get(7)?,
      flag_url:          row.get(8)?,
      last_refreshed_at: row.get(9)?,
    })
  }

  pub fn into_country(self) -> Result<Country> {
    Ok(Country {
      id:                self.id,
      name:              self.name,
      capital:           self.capital,
      region:            self.region,
      population:        decode_count(self.population)?,
      currency_code:     self.currency_code,
      exchange_rate:     self.exchange_rate,
      estimated_gdp:     self.estimated_gdp,
      flag_url:          self.flag_url,
      last_refreshed_at: decode_dt(&self.last_refreshed_at)?,
    })
  }
}

/// Values read directly from the `refresh_metadata` row.
pub struct RawMetadata {
  pub timestamp:       String,
  pub total_countries: i64,
}

impl RawMetadata {
  pub fn into_metadata(self) -> Result<RefreshMetadata> {
    Ok(RefreshMetadata {
      timestamp:       decode_dt(&self.timestamp)?,
      total_countries: decode_count(self.total_countries)?,
    })
  }
}
