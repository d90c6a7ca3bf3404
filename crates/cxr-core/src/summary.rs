//! The summary artifact rendered after each refresh.
//!
//! Selection and formatting are pure functions here; drawing and persisting
//! the artifact is left to a [`SummaryRenderer`] implementation.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::country::Country;

/// How many countries the summary ranks.
pub const TOP_COUNT: usize = 5;

/// A rendered summary loaded back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryArtifact {
  pub bytes:      Vec<u8>,
  pub media_type: &'static str,
  /// Quoted strong validator for HTTP caching.
  pub etag:       String,
}

pub trait SummaryRenderer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Render the summary of one refresh cycle, replacing any previous one.
  fn render<'a>(
    &'a self,
    countries: &'a [Country],
    refreshed_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Load the most recent artifact. Returns `None` if nothing was rendered.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Option<SummaryArtifact>, Self::Error>> + Send + '_;
}

/// Up to `limit` countries with the largest non-zero GDP estimate, largest
/// first. Equal estimates keep their input order.
pub fn top_by_gdp(countries: &[Country], limit: usize) -> Vec<&Country> {
  let mut ranked: Vec<&Country> =
    countries.iter().filter(|c| c.estimated_gdp != 0.0).collect();
  ranked.sort_by(|a, b| b.estimated_gdp.total_cmp(&a.estimated_gdp));
  ranked.truncate(limit);
  ranked
}

/// Format `value` as US dollars with thousands separators, e.g. `$1,234.50`.
pub fn format_usd(value: f64) -> String {
  let fixed = format!("{:.2}", value.abs());
  let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, ch) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  let sign = if value < 0.0 { "-" } else { "" };
  format!("{sign}${grouped}.{frac}")
}
