//! The `DataGateway` trait: the two upstream datasets a refresh joins.
//!
//! Implementations issue exactly one request per call and never retry. Every
//! failure (transport, timeout, non-2xx, undecodable body) is reported as
//! [`Error::UpstreamUnavailable`](crate::Error::UpstreamUnavailable) naming
//! the offending source.

use std::future::Future;

use crate::{
  Result,
  country::{RateTable, RawCountry},
};

pub trait DataGateway: Send + Sync {
  /// Fetch every country from the country-facts source.
  fn fetch_country_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<RawCountry>>> + Send + '_;

  /// Fetch the USD-based exchange-rate table.
  fn fetch_exchange_rates(&self) -> impl Future<Output = Result<RateTable>> + Send + '_;
}
