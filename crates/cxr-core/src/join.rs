//! Joining a raw country with the exchange-rate table.
//!
//! Everything here is a pure function of its inputs apart from the GDP
//! multiplier, whose source is chosen by configuration (see
//! [`GdpMultiplier`]).

use chrono::{DateTime, Utc};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::country::{NewCountry, RateTable, RawCountry};

/// Lower bound (inclusive) of the random GDP multiplier.
pub const MULTIPLIER_MIN: f64 = 1000.0;
/// Upper bound (exclusive) of the random GDP multiplier.
pub const MULTIPLIER_MAX: f64 = 2000.0;

// ─── Multiplier ──────────────────────────────────────────────────────────────

/// Where the per-capita scaling factor of the GDP estimate comes from.
///
/// The estimate is `population * multiplier / exchange_rate`. With
/// [`GdpMultiplier::Random`] every computation draws a fresh value, so two
/// refreshes of identical inputs store different estimates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GdpMultiplier {
  /// Uniform in `[MULTIPLIER_MIN, MULTIPLIER_MAX)`, drawn per computation.
  #[default]
  Random,
  /// The same value for every computation.
  Fixed { value: f64 },
}

impl GdpMultiplier {
  pub fn sample(&self) -> f64 {
    match self {
      Self::Random => rand::thread_rng().gen_range(MULTIPLIER_MIN..MULTIPLIER_MAX),
      Self::Fixed { value } => *value,
    }
  }
}

// ─── Join ────────────────────────────────────────────────────────────────────

/// The currency-derived fields of a country.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
  pub currency_code: Option<String>,
  pub exchange_rate: Option<f64>,
  /// `None` when either the rate or the population rules out an estimate.
  pub estimated_gdp: Option<f64>,
}

/// Resolve the currency, rate and GDP estimate for `raw`.
pub fn join(
  raw: &RawCountry,
  rates: &RateTable,
  multiplier: GdpMultiplier,
) -> Joined {
  let currency_code = raw.first_currency_code().map(str::to_owned);
  let exchange_rate = currency_code
    .as_deref()
    .and_then(|code| rates.get(code))
    .copied();
  let population = raw.population.unwrap_or(0);

  let estimated_gdp = match exchange_rate {
    Some(rate) if rate != 0.0 && population > 0 => {
      Some(population as f64 * multiplier.sample() / rate)
    }
    _ => None,
  };

  Joined { currency_code, exchange_rate, estimated_gdp }
}

/// Join `raw` and build the record to persist, stamped with `at`.
///
/// Returns `None` for entries without a usable name; those are skipped by the
/// refresh cycle and do not count towards its total.
pub fn normalize(
  raw: RawCountry,
  rates: &RateTable,
  multiplier: GdpMultiplier,
  at: DateTime<Utc>,
) -> Option<NewCountry> {
  let joined = join(&raw, rates, multiplier);
  let name = raw.name.filter(|n| !n.is_empty())?;

  Some(NewCountry {
    name,
    capital: raw.capital,
    region: raw.region,
    population: raw.population.unwrap_or(0),
    currency_code: joined.currency_code,
    exchange_rate: joined.exchange_rate,
    estimated_gdp: joined.estimated_gdp.unwrap_or(0.0),
    flag_url: raw.flag,
    last_refreshed_at: at,
  })
}
