//! Handlers for the stored country records.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/countries` | Optional `?region=`, `?currency=`, `?sort=gdp_desc\|gdp_asc\|population_desc\|population_asc` |
//! | `GET`    | `/countries/{name}` | Case-insensitive; 404 if not found |
//! | `DELETE` | `/countries/{name}` | Case-insensitive; 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
};
use cxr_core::{
  country::Country,
  gateway::DataGateway,
  store::{CountryQuery, CountryStore, SortKey},
  summary::SummaryRenderer,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub region:   Option<String>,
  pub currency: Option<String>,
  pub sort:     Option<String>,
}

impl ListParams {
  /// Empty filter values are treated as absent; an unrecognised `sort`
  /// leaves the listing unsorted.
  fn into_query(self) -> CountryQuery {
    let present = |v: Option<String>| v.filter(|s| !s.is_empty());
    CountryQuery {
      region:   present(self.region),
      currency: present(self.currency),
      sort:     self.sort.as_deref().and_then(SortKey::from_name),
    }
  }
}

/// `GET /countries[?region=..][&currency=..][&sort=..]`
pub async fn list<S, G, R>(
  State(state): State<AppState<S, G, R>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Country>>, ApiError>
where
  S: CountryStore + 'static,
  G: DataGateway + 'static,
  R: SummaryRenderer + 'static,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let countries = state
    .store()
    .list_countries(&params.into_query())
    .await
    .map_err(ApiError::internal)?;
  Ok(Json(countries))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /countries/{name}`
pub async fn get_one<S, G, R>(
  State(state): State<AppState<S, G, R>>,
  Path(name): Path<String>,
) -> Result<Json<Country>, ApiError>
where
  S: CountryStore + 'static,
  G: DataGateway + 'static,
  R: SummaryRenderer + 'static,
{
  let country = state
    .store()
    .find_by_name(&name)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(ApiError::country_not_found)?;
  Ok(Json(country))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub message: String,
}

/// `DELETE /countries/{name}`
pub async fn delete_one<S, G, R>(
  State(state): State<AppState<S, G, R>>,
  Path(name): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError>
where
  S: CountryStore + 'static,
  G: DataGateway + 'static,
  R: SummaryRenderer + 'static,
{
  let deleted = state
    .store()
    .delete_by_name(&name)
    .await
    .map_err(ApiError::internal)?;
  if !deleted {
    return Err(ApiError::country_not_found());
  }

  tracing::info!(%name, "deleted country");
  Ok(Json(DeleteResponse {
    message: format!("Country '{name}' deleted successfully"),
  }))
}
