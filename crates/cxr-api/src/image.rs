//! `GET /countries/image`: the summary rendered by the last refresh.

use axum::{
  extract::State,
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use cxr_core::{
  gateway::DataGateway, store::CountryStore, summary::SummaryRenderer,
};

use crate::{AppState, error::ApiError};

pub async fn handler<S, G, R>(
  State(state): State<AppState<S, G, R>>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: CountryStore + 'static,
  G: DataGateway + 'static,
  R: SummaryRenderer + 'static,
{
  let artifact = state
    .summary()
    .load()
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::NotFound("Summary image not found".into()))?;

  let etag = HeaderValue::from_str(&artifact.etag).map_err(ApiError::internal)?;

  let fresh = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| etag_matches(v, &artifact.etag));
  if fresh {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      [
        (header::CONTENT_TYPE, HeaderValue::from_static(artifact.media_type)),
        (header::ETAG, etag),
      ],
      artifact.bytes,
    )
      .into_response(),
  )
}

/// Whether an `If-None-Match` value names `etag`. Accepts `*`, lists, weak
/// validators and unquoted tags.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
  let wanted = strip_etag(etag);
  if_none_match
    .split(',')
    .map(str::trim)
    .any(|candidate| candidate == "*" || strip_etag(candidate) == wanted)
}

fn strip_etag(tag: &str) -> &str {
  tag.trim_start_matches("W/").trim_matches('"')
}
