//! [`SqliteStore`] — the SQLite implementation of [`CountryStore`].

use std::path::Path;

use cxr_core::{
  country::{Country, RefreshMetadata, fold_name},
  store::{CountryQuery, CountryStore, SortKey},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{COUNTRY_COLUMNS, RawCountry, RawMetadata, encode_count, encode_dt},
  schema::{COUNTRY_ID_COUNTER, METADATA_KEY, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A country store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// `ORDER BY` clause for `sort`. Ties fall back to insertion order.
fn order_by(sort: Option<SortKey>) -> &'static str {
  match sort {
    Some(SortKey::GdpDesc) => "ORDER BY estimated_gdp DESC, rowid ASC",
    Some(SortKey::GdpAsc) => "ORDER BY estimated_gdp ASC, rowid ASC",
    Some(SortKey::PopulationDesc) => "ORDER BY population DESC, rowid ASC",
    Some(SortKey::PopulationAsc) => "ORDER BY population ASC, rowid ASC",
    None => "ORDER BY rowid ASC",
  }
}

// ─── CountryStore impl ───────────────────────────────────────────────────────

impl CountryStore for SqliteStore {
  type Error = Error;

  // ── Countries ─────────────────────────────────────────────────────────────

  async fn find_by_name(&self, name: &str) -> Result<Option<Country>> {
    let key = fold_name(name);

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE name_key = ?1"),
            rusqlite::params![key],
            RawCountry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCountry::into_country).transpose()
  }

  async fn insert_country(&self, country: Country) -> Result<()> {
    let key        = country.name_key();
    let population = encode_count(country.population)?;
    let at_str     = encode_dt(country.last_refreshed_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO countries (
             name_key, id, name, capital, region, population,
             currency_code, exchange_rate, estimated_gdp, flag_url,
             last_refreshed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            key,
            country.id,
            country.name,
            country.capital,
            country.region,
            population,
            country.currency_code,
            country.exchange_rate,
            country.estimated_gdp,
            country.flag_url,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn update_country(&self, country: Country) -> Result<()> {
    let id         = country.id;
    let key        = country.name_key();
    let population = encode_count(country.population)?;
    let at_str     = encode_dt(country.last_refreshed_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE countries SET
             name_key = ?1, name = ?2, capital = ?3, region = ?4,
             population = ?5, currency_code = ?6, exchange_rate = ?7,
             estimated_gdp = ?8, flag_url = ?9, last_refreshed_at = ?10
           WHERE id = ?11",
          rusqlite::params![
            key,
            country.name,
            country.capital,
            country.region,
            population,
            country.currency_code,
            country.exchange_rate,
            country.estimated_gdp,
            country.flag_url,
            at_str,
            id,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::CountryNotFound(id));
    }
    Ok(())
  }

  async fn list_countries(&self, query: &CountryQuery) -> Result<Vec<Country>> {
    let currency = query.currency.clone();
    let sql = format!(
      "SELECT {COUNTRY_COLUMNS} FROM countries
       WHERE (?1 IS NULL OR currency_code = ?1)
       {}",
      order_by(query.sort)
    );

    let raws: Vec<RawCountry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![currency], RawCountry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut countries: Vec<Country> = raws
      .into_iter()
      .map(RawCountry::into_country)
      .collect::<Result<_>>()?;

    // SQLite's lower() only folds ASCII, so region matching happens here.
    if let Some(region) = &query.region {
      let wanted = fold_name(region);
      countries.retain(|c| c.region.as_deref().is_some_and(|r| fold_name(r) == wanted));
    }

    Ok(countries)
  }

  async fn delete_by_name(&self, name: &str) -> Result<bool> {
    let key = fold_name(name);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM countries WHERE name_key = ?1",
          rusqlite::params![key],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Identifier allocation ─────────────────────────────────────────────────

  async fn next_id(&self) -> Result<i64> {
    let id: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "INSERT INTO id_counters (name, seq) VALUES (?1, 1)
           ON CONFLICT(name) DO UPDATE SET seq = seq + 1
           RETURNING seq",
          rusqlite::params![COUNTRY_ID_COUNTER],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(id)
  }

  // ── Refresh metadata ──────────────────────────────────────────────────────

  async fn get_metadata(&self) -> Result<Option<RefreshMetadata>> {
    let raw: Option<RawMetadata> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT timestamp, total_countries FROM refresh_metadata WHERE key = ?1",
            rusqlite::params![METADATA_KEY],
            |row| {
              Ok(RawMetadata {
                timestamp:       row.get(0)?,
                total_countries: row.get(1)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMetadata::into_metadata).transpose()
  }

  async fn put_metadata(&self, metadata: RefreshMetadata) -> Result<()> {
    let at_str = encode_dt(metadata.timestamp);
    let total  = encode_count(metadata.total_countries)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO refresh_metadata (key, timestamp, total_countries)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             timestamp       = excluded.timestamp,
             total_countries = excluded.total_countries",
          rusqlite::params![METADATA_KEY, at_str, total],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
