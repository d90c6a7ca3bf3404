//! JSON REST API for the country/exchange service.
//!
//! Exposes an axum [`Router`] backed by any [`CountryStore`],
//! [`DataGateway`] and [`SummaryRenderer`]. Listening, tracing and other
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = cxr_api::api_router(AppState::new(refresher));
//! ```

pub mod countries;
pub mod error;
pub mod image;
pub mod refresh;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use cxr_core::{
  gateway::DataGateway, refresh::Refresher, store::CountryStore,
  summary::SummaryRenderer,
};
use serde_json::{Value, json};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, G, R> {
  pub refresher: Arc<Refresher<S, G, R>>,
}

// Derived `Clone` would demand `S: Clone` and friends.
impl<S, G, R> Clone for AppState<S, G, R> {
  fn clone(&self) -> Self { Self { refresher: self.refresher.clone() } }
}

impl<S, G, R> AppState<S, G, R>
where
  S: CountryStore,
  G: DataGateway,
  R: SummaryRenderer,
{
  pub fn new(refresher: Refresher<S, G, R>) -> Self {
    Self { refresher: Arc::new(refresher) }
  }

  pub fn store(&self) -> &S { self.refresher.store() }

  pub fn summary(&self) -> &R { self.refresher.renderer() }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested or layered by the caller
/// regardless of its own state type.
pub fn api_router<S, G, R>(state: AppState<S, G, R>) -> Router<()>
where
  S: CountryStore + 'static,
  G: DataGateway + 'static,
  R: SummaryRenderer + 'static,
{
  Router::new()
    .route("/", get(root))
    .route("/status", get(refresh::status::<S, G, R>))
    .route("/countries", get(countries::list::<S, G, R>))
    .route("/countries/refresh", post(refresh::trigger::<S, G, R>))
    .route("/countries/image", get(image::handler::<S, G, R>))
    .route(
      "/countries/{name}",
      get(countries::get_one::<S, G, R>).delete(countries::delete_one::<S, G, R>),
    )
    .with_state(state)
}

/// `GET /`
async fn root() -> Json<Value> {
  Json(json!({
    "message": "Country Currency & Exchange API",
    "status": "running",
  }))
}
