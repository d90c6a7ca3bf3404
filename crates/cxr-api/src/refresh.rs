//! Handlers for refresh cycles and their status.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/countries/refresh` | 503 if an upstream source fails |
//! | `GET`  | `/status` | Totals from the last successful refresh |

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use cxr_core::{
  gateway::DataGateway, store::CountryStore, summary::SummaryRenderer,
};
use serde::Serialize;

use crate::{AppState, error::ApiError};

// ─── Refresh ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
  pub message:           &'static str,
  pub total_countries:   u64,
  pub last_refreshed_at: DateTime<Utc>,
}

/// `POST /countries/refresh`
///
/// The cycle runs on its own task, so a client that disconnects early does
/// not cut it short.
pub async fn trigger<S, G, R>(
  State(state): State<AppState<S, G, R>>,
) -> Result<Json<RefreshResponse>, ApiError>
where
  S: CountryStore + 'static,
  G: DataGateway + 'static,
  R: SummaryRenderer + 'static,
{
  let refresher = state.refresher.clone();
  let metadata = tokio::spawn(async move { refresher.refresh().await })
    .await
    .map_err(ApiError::internal)??;

  Ok(Json(RefreshResponse {
    message:           "Countries data refreshed successfully",
    total_countries:   metadata.total_countries,
    last_refreshed_at: metadata.timestamp,
  }))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusResponse {
  pub total_countries:   u64,
  pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// `GET /status`
pub async fn status<S, G, R>(
  State(state): State<AppState<S, G, R>>,
) -> Result<Json<StatusResponse>, ApiError>
where
  S: CountryStore + 'static,
  G: DataGateway + 'static,
  R: SummaryRenderer + 'static,
{
  let metadata = state.store().get_metadata().await.map_err(ApiError::internal)?;
  Ok(Json(StatusResponse {
    total_countries:   metadata.as_ref().map_or(0, |m| m.total_countries),
    last_refreshed_at: metadata.map(|m| m.timestamp),
  }))
}
