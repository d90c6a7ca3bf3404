//! The refresh cycle: fetch, join, reconcile, record metadata, render.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::{
  Error, Result,
  country::RefreshMetadata,
  gateway::DataGateway,
  join::{GdpMultiplier, normalize},
  reconcile::reconcile,
  store::CountryStore,
  summary::SummaryRenderer,
};

/// Drives refresh cycles against a store, an upstream gateway and a summary
/// renderer.
///
/// A cycle is fail-fast: the first fetch or storage error aborts it and is
/// returned unchanged. Records written before the failure stay written, and
/// the refresh metadata is only replaced once every record has been
/// reconciled. Rendering happens after that and cannot fail the cycle.
pub struct Refresher<S, G, R> {
  store:      Arc<S>,
  gateway:    Arc<G>,
  renderer:   Arc<R>,
  multiplier: GdpMultiplier,
}

impl<S, G, R> Refresher<S, G, R>
where
  S: CountryStore,
  G: DataGateway,
  R: SummaryRenderer,
{
  pub fn new(
    store: Arc<S>,
    gateway: Arc<G>,
    renderer: Arc<R>,
    multiplier: GdpMultiplier,
  ) -> Self {
    Self { store, gateway, renderer, multiplier }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn renderer(&self) -> &Arc<R> { &self.renderer }

  /// Run one refresh cycle and return the metadata it recorded.
  pub async fn refresh(&self) -> Result<RefreshMetadata> {
    let refreshed_at = Utc::now();
    info!(%refreshed_at, "refresh started");

    let (raw_countries, rates) = tokio::try_join!(
      self.gateway.fetch_country_facts(),
      self.gateway.fetch_exchange_rates(),
    )?;
    info!(
      countries = raw_countries.len(),
      rates = rates.len(),
      "fetched upstream data"
    );

    let mut processed = Vec::with_capacity(raw_countries.len());
    for raw in raw_countries {
      let Some(incoming) = normalize(raw, &rates, self.multiplier, refreshed_at)
      else {
        warn!("skipping upstream country without a name");
        continue;
      };
      processed.push(reconcile(self.store.as_ref(), incoming).await?);
    }

    let metadata = RefreshMetadata {
      timestamp:       refreshed_at,
      total_countries: processed.len() as u64,
    };
    self
      .store
      .put_metadata(metadata.clone())
      .await
      .map_err(Error::internal)?;

    if let Err(e) = self.renderer.render(&processed, refreshed_at).await {
      warn!(error = %e, "failed to render refresh summary");
    }

    info!(total = metadata.total_countries, "refresh finished");
    Ok(metadata)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};

  use super::*;
  use crate::{
    country::{RateTable, RawCountry, RawCurrency},
    testing::{MemoryStore, RecordingRenderer, StubGateway},
  };

  fn raw(name: &str, code: &str, population: u64) -> RawCountry {
    RawCountry {
      name: Some(name.into()),
      capital: Some(format!("{name} City")),
      region: Some("Testland".into()),
      population: Some(population),
      currencies: Some(vec![RawCurrency {
        code: Some(code.into()),
        ..Default::default()
      }]),
      flag: Some(format!("https://flags.example/{name}.svg")),
    }
  }

  fn rates() -> RateTable {
    [("AAA".to_owned(), 2.0), ("BBB".to_owned(), 4.0)].into()
  }

  fn five_countries() -> Vec<RawCountry> {
    vec![
      raw("One", "AAA", 10),
      raw("Two", "BBB", 20),
      raw("Three", "AAA", 30),
      raw("Four", "BBB", 40),
      raw("Five", "AAA", 50),
    ]
  }

  type TestRefresher = Refresher<MemoryStore, StubGateway, RecordingRenderer>;

  fn refresher(
    store: MemoryStore,
    gateway: StubGateway,
  ) -> (TestRefresher, Arc<MemoryStore>, Arc<RecordingRenderer>) {
    let store = Arc::new(store);
    let renderer = Arc::new(RecordingRenderer::default());
    let refresher = Refresher::new(
      store.clone(),
      Arc::new(gateway),
      renderer.clone(),
      GdpMultiplier::Fixed { value: 1_000.0 },
    );
    (refresher, store, renderer)
  }

  #[tokio::test]
  async fn refresh_persists_joined_records_and_metadata() {
    let (refresher, store, renderer) =
      refresher(MemoryStore::default(), StubGateway::new(five_countries(), rates()));

    let meta = refresher.refresh().await.unwrap();
    assert_eq!(meta.total_countries, 5);
    assert_eq!(store.metadata(), Some(meta.clone()));

    let stored = store.countries();
    assert_eq!(stored.len(), 5);
    let two = stored.iter().find(|c| c.name == "Two").unwrap();
    assert_eq!(two.exchange_rate, Some(4.0));
    assert_eq!(two.estimated_gdp, 20.0 * 1_000.0 / 4.0);
    assert!(stored.iter().all(|c| c.last_refreshed_at == meta.timestamp));

    let rendered = renderer.calls();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].0, 5);
    assert_eq!(rendered[0].1, meta.timestamp);
  }

  #[tokio::test]
  async fn identical_refreshes_keep_ids() {
    let (refresher, store, _) =
      refresher(MemoryStore::default(), StubGateway::new(five_countries(), rates()));

    refresher.refresh().await.unwrap();
    let first: Vec<(String, i64)> =
      store.countries().into_iter().map(|c| (c.name, c.id)).collect();

    refresher.refresh().await.unwrap();
    let second: Vec<(String, i64)> =
      store.countries().into_iter().map(|c| (c.name, c.id)).collect();

    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn stale_records_survive_refresh() {
    let gateway = Arc::new(StubGateway::new(five_countries(), rates()));
    let store = Arc::new(MemoryStore::default());
    let refresher = Refresher::new(
      store.clone(),
      gateway.clone(),
      Arc::new(RecordingRenderer::default()),
      GdpMultiplier::Random,
    );
    refresher.refresh().await.unwrap();

    gateway.set_countries(vec![raw("One", "AAA", 11)]);
    let meta = refresher.refresh().await.unwrap();

    assert_eq!(meta.total_countries, 1);
    assert_eq!(store.countries().len(), 5);
  }

  #[tokio::test]
  async fn nameless_entries_are_not_counted() {
    let mut countries = five_countries();
    countries.insert(2, RawCountry::default());
    countries.push(RawCountry { name: Some(String::new()), ..Default::default() });

    let (refresher, store, _) =
      refresher(MemoryStore::default(), StubGateway::new(countries, rates()));
    let meta = refresher.refresh().await.unwrap();
    assert_eq!(meta.total_countries, 5);
    assert_eq!(store.countries().len(), 5);
  }

  #[tokio::test]
  async fn only_missing_or_empty_names_are_skipped() {
    let countries = vec![
      RawCountry { name: None, ..Default::default() },
      RawCountry { name: Some(String::new()), ..Default::default() },
      RawCountry { name: Some(" ".into()), ..Default::default() },
    ];

    let (refresher, store, _) =
      refresher(MemoryStore::default(), StubGateway::new(countries, rates()));
    let meta = refresher.refresh().await.unwrap();
    assert_eq!(meta.total_countries, 1);
    assert_eq!(store.countries()[0].name, " ");
  }

  #[tokio::test]
  async fn upstream_failure_aborts_before_any_write() {
    let (refresher, store, renderer) = refresher(
      MemoryStore::default(),
      StubGateway::new(five_countries(), rates()).failing_rates(),
    );

    let err = refresher.refresh().await.unwrap_err();
    match err {
      Error::UpstreamUnavailable { source_name, .. } => {
        assert_eq!(source_name, "rates.example");
      }
      other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.countries().is_empty());
    assert_eq!(store.metadata(), None);
    assert!(renderer.calls().is_empty());
  }

  #[tokio::test]
  async fn mid_cycle_write_failure_keeps_previous_metadata() {
    let previous = RefreshMetadata {
      timestamp:       "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap(),
      total_countries: 42,
    };
    let store = MemoryStore::failing_after(3);
    store.set_metadata(previous.clone());

    let (refresher, store, renderer) =
      refresher(store, StubGateway::new(five_countries(), rates()));

    let err = refresher.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Internal(_)), "{err:?}");
    assert_eq!(store.countries().len(), 3);
    assert_eq!(store.metadata(), Some(previous));
    assert!(renderer.calls().is_empty());
  }

  #[tokio::test]
  async fn render_failure_does_not_fail_refresh() {
    let store = Arc::new(MemoryStore::default());
    let refresher = Refresher::new(
      store.clone(),
      Arc::new(StubGateway::new(five_countries(), rates())),
      Arc::new(RecordingRenderer::failing()),
      GdpMultiplier::Random,
    );

    let meta = refresher.refresh().await.unwrap();
    assert_eq!(meta.total_countries, 5);
    assert_eq!(store.metadata(), Some(meta));
  }
}
