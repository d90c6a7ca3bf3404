//! In-memory test doubles for the core traits.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  country::{Country, RateTable, RawCountry, RefreshMetadata, fold_name},
  gateway::DataGateway,
  store::{CountryQuery, CountryStore, SortKey},
  summary::{SummaryArtifact, SummaryRenderer},
};

#[derive(Debug, thiserror::Error)]
pub enum TestError {
  #[error("{0}")]
  Injected(&'static str),

  #[error("country already stored: {0}")]
  Duplicate(String),

  #[error("country not found: id {0}")]
  CountryNotFound(i64),
}

pub fn country(id: i64, name: &str, estimated_gdp: f64) -> Country {
  Country {
    id,
    name: name.into(),
    capital: None,
    region: None,
    population: 0,
    currency_code: None,
    exchange_rate: None,
    estimated_gdp,
    flag_url: None,
    last_refreshed_at: Utc::now(),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StoreState {
  countries: Vec<Country>,
  counter:   i64,
  metadata:  Option<RefreshMetadata>,
  writes:    usize,
}

/// A `Vec`-backed store. Optionally fails every country write after the
/// first `n` have succeeded.
#[derive(Default)]
pub struct MemoryStore {
  state:      Mutex<StoreState>,
  fail_after: Option<usize>,
}

impl MemoryStore {
  pub fn failing_after(writes: usize) -> Self {
    Self { fail_after: Some(writes), ..Default::default() }
  }

  pub fn countries(&self) -> Vec<Country> {
    self.state.lock().unwrap().countries.clone()
  }

  pub fn metadata(&self) -> Option<RefreshMetadata> {
    self.state.lock().unwrap().metadata.clone()
  }

  pub fn set_metadata(&self, metadata: RefreshMetadata) {
    self.state.lock().unwrap().metadata = Some(metadata);
  }

  fn write(
    &self,
    f: impl FnOnce(&mut StoreState) -> Result<(), TestError>,
  ) -> Result<(), TestError> {
    let mut state = self.state.lock().unwrap();
    if self.fail_after.is_some_and(|n| state.writes >= n) {
      return Err(TestError::Injected("injected write failure"));
    }
    state.writes += 1;
    f(&mut state)
  }
}

impl CountryStore for MemoryStore {
  type Error = TestError;

  async fn find_by_name(&self, name: &str) -> Result<Option<Country>, TestError> {
    let key = fold_name(name);
    let state = self.state.lock().unwrap();
    Ok(state.countries.iter().find(|c| c.name_key() == key).cloned())
  }

  async fn insert_country(&self, country: Country) -> Result<(), TestError> {
    self.write(|state| {
      let key = country.name_key();
      if state.countries.iter().any(|c| c.id == country.id || c.name_key() == key) {
        return Err(TestError::Duplicate(country.name));
      }
      state.countries.push(country);
      Ok(())
    })
  }

  async fn update_country(&self, country: Country) -> Result<(), TestError> {
    self.write(|state| {
      let slot = state
        .countries
        .iter_mut()
        .find(|c| c.id == country.id)
        .ok_or(TestError::CountryNotFound(country.id))?;
      *slot = country;
      Ok(())
    })
  }

  async fn list_countries(
    &self,
    query: &CountryQuery,
  ) -> Result<Vec<Country>, TestError> {
    let mut rows: Vec<Country> = self
      .countries()
      .into_iter()
      .filter(|c| {
        query.region.as_deref().is_none_or(|r| {
          c.region.as_deref().is_some_and(|cr| fold_name(cr) == fold_name(r))
        })
      })
      .filter(|c| {
        query.currency.is_none() || c.currency_code == query.currency
      })
      .collect();

    match query.sort {
      Some(SortKey::GdpDesc) => {
        rows.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp))
      }
      Some(SortKey::GdpAsc) => {
        rows.sort_by(|a, b| a.estimated_gdp.total_cmp(&b.estimated_gdp))
      }
      Some(SortKey::PopulationDesc) => {
        rows.sort_by(|a, b| b.population.cmp(&a.population))
      }
      Some(SortKey::PopulationAsc) => rows.sort_by_key(|c| c.population),
      None => {}
    }
    Ok(rows)
  }

  async fn delete_by_name(&self, name: &str) -> Result<bool, TestError> {
    let key = fold_name(name);
    let mut state = self.state.lock().unwrap();
    let before = state.countries.len();
    state.countries.retain(|c| c.name_key() != key);
    Ok(state.countries.len() != before)
  }

  async fn next_id(&self) -> Result<i64, TestError> {
    let mut state = self.state.lock().unwrap();
    state.counter += 1;
    Ok(state.counter)
  }

  async fn get_metadata(&self) -> Result<Option<RefreshMetadata>, TestError> {
    Ok(self.metadata())
  }

  async fn put_metadata(&self, metadata: RefreshMetadata) -> Result<(), TestError> {
    self.set_metadata(metadata);
    Ok(())
  }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

pub struct StubGateway {
  countries:  Mutex<Vec<RawCountry>>,
  rates:      RateTable,
  fail_rates: bool,
}

impl StubGateway {
  pub fn new(countries: Vec<RawCountry>, rates: RateTable) -> Self {
    Self { countries: Mutex::new(countries), rates, fail_rates: false }
  }

  pub fn failing_rates(self) -> Self { Self { fail_rates: true, ..self } }

  pub fn set_countries(&self, countries: Vec<RawCountry>) {
    *self.countries.lock().unwrap() = countries;
  }
}

impl DataGateway for StubGateway {
  async fn fetch_country_facts(&self) -> Result<Vec<RawCountry>> {
    Ok(self.countries.lock().unwrap().clone())
  }

  async fn fetch_exchange_rates(&self) -> Result<RateTable> {
    if self.fail_rates {
      return Err(Error::UpstreamUnavailable {
        source_name: "rates.example".into(),
        details:     "connection refused".into(),
      });
    }
    Ok(self.rates.clone())
  }
}

// ─── Renderer ────────────────────────────────────────────────────────────────

/// Records `(country count, timestamp)` for every render call.
#[derive(Default)]
pub struct RecordingRenderer {
  calls: Mutex<Vec<(usize, DateTime<Utc>)>>,
  fail:  bool,
}

impl RecordingRenderer {
  pub fn failing() -> Self { Self { fail: true, ..Default::default() } }

  pub fn calls(&self) -> Vec<(usize, DateTime<Utc>)> {
    self.calls.lock().unwrap().clone()
  }
}

impl SummaryRenderer for RecordingRenderer {
  type Error = TestError;

  async fn render(
    &self,
    countries: &[Country],
    refreshed_at: DateTime<Utc>,
  ) -> Result<(), TestError> {
    if self.fail {
      return Err(TestError::Injected("injected render failure"));
    }
    self.calls.lock().unwrap().push((countries.len(), refreshed_at));
    Ok(())
  }

  async fn load(&self) -> Result<Option<SummaryArtifact>, TestError> { Ok(None) }
}

mod tests {
  use super::*;

  #[tokio::test]
  async fn update_of_unknown_id_fails() {
    let store = MemoryStore::default();
    store.insert_country(country(1, "France", 0.0)).await.unwrap();

    let err = store.update_country(country(7, "France", 1.0)).await.unwrap_err();
    assert!(matches!(err, TestError::CountryNotFound(7)), "{err:?}");
    assert_eq!(store.countries()[0].estimated_gdp, 0.0);
  }

  #[tokio::test]
  async fn insert_of_taken_name_fails() {
    let store = MemoryStore::default();
    store.insert_country(country(1, "France", 0.0)).await.unwrap();

    let err = store.insert_country(country(2, "FRANCE", 0.0)).await.unwrap_err();
    assert!(matches!(err, TestError::Duplicate(_)), "{err:?}");
    assert_eq!(store.countries().len(), 1);
  }
}
