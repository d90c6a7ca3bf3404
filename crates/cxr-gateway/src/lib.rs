//! HTTP implementation of [`DataGateway`] for the two upstream sources.
//!
//! One request per fetch, bounded by the client timeout, never retried. Any
//! failure is mapped to [`Error::UpstreamUnavailable`] carrying the host of
//! the source that failed. Individual country entries that do not decode are
//! dropped with a warning rather than failing the whole payload.

use std::time::Duration;

use cxr_core::{
  Error, Result,
  country::{RateTable, RawCountry},
  gateway::DataGateway,
};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

pub const DEFAULT_COUNTRIES_URL: &str =
  "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the two datasets live and how long to wait for each.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
  pub countries_url: String,
  pub rates_url:     String,
  pub timeout:       Duration,
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self {
      countries_url: DEFAULT_COUNTRIES_URL.to_owned(),
      rates_url:     DEFAULT_RATES_URL.to_owned(),
      timeout:       DEFAULT_TIMEOUT,
    }
  }
}

/// Shape of the exchange-rate document; only `rates` is used.
#[derive(Debug, Deserialize)]
struct RatesDocument {
  #[serde(default)]
  rates: RateTable,
}

/// Fetches upstream data over HTTP.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpGateway {
  client: Client,
  config: GatewayConfig,
}

impl HttpGateway {
  pub fn new(config: GatewayConfig) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
    let source = source_name(url);
    let unavailable = |e: reqwest::Error| {
      let details = if e.is_timeout() {
        format!("request timed out after {}s", self.config.timeout.as_secs_f32())
      } else {
        error_chain(&e)
      };
      tracing::warn!(source = %source, %details, "upstream fetch failed");
      Error::UpstreamUnavailable { source_name: source.clone(), details }
    };

    let resp = self
      .client
      .get(url)
      .send()
      .await
      .and_then(reqwest::Response::error_for_status)
      .map_err(unavailable)?;

    resp.json::<T>().await.map_err(unavailable)
  }
}

/// `err` followed by each of its sources, joined with `: `.
fn error_chain(err: &dyn std::error::Error) -> String {
  let mut out = err.to_string();
  let mut source = err.source();
  while let Some(cause) = source {
    out.push_str(": ");
    out.push_str(&cause.to_string());
    source = cause.source();
  }
  out
}

/// Decode each entry of the country payload on its own, dropping the ones
/// that do not fit [`RawCountry`].
fn decode_countries(entries: Vec<Value>) -> Vec<RawCountry> {
  entries
    .into_iter()
    .enumerate()
    .filter_map(|(index, entry)| match RawCountry::deserialize(&entry) {
      Ok(country) => Some(country),
      Err(e) => {
        let name = entry.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
        tracing::warn!(index, %name, error = %e, "skipping malformed upstream country");
        None
      }
    })
    .collect()
}

/// Host part of `url`, used to name the source in errors.
fn source_name(url: &str) -> String {
  reqwest::Url::parse(url)
    .ok()
    .and_then(|u| u.host_str().map(str::to_owned))
    .unwrap_or_else(|| url.to_owned())
}

impl DataGateway for HttpGateway {
  async fn fetch_country_facts(&self) -> Result<Vec<RawCountry>> {
    let entries: Vec<Value> = self.get_json(&self.config.countries_url).await?;
    Ok(decode_countries(entries))
  }

  async fn fetch_exchange_rates(&self) -> Result<RateTable> {
    let doc: RatesDocument = self.get_json(&self.config.rates_url).await?;
    Ok(doc.rates)
  }
}
