//! File-backed [`SummaryRenderer`] that draws the refresh summary as SVG.

mod error;
mod etag;
mod svg;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use cxr_core::{
  country::Country,
  summary::{SummaryArtifact, SummaryRenderer},
};

pub use self::{
  error::{Error, Result},
  etag::compute_etag,
  svg::{MEDIA_TYPE, render_svg},
};

/// Writes the summary to a single file, replacing it on every render.
#[derive(Debug, Clone)]
pub struct SvgSummary {
  path: PathBuf,
}

impl SvgSummary {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl SummaryRenderer for SvgSummary {
  type Error = Error;

  async fn render(
    &self,
    countries: &[Country],
    refreshed_at: DateTime<Utc>,
  ) -> Result<()> {
    let bytes = render_svg(countries, refreshed_at)?;

    if let Some(parent) =
      self.path.parent().filter(|p| !p.as_os_str().is_empty())
    {
      tokio::fs::create_dir_all(parent).await?;
    }

    // Write beside the target and rename so readers never see a partial file.
    let staging = self.path.with_extension("svg.tmp");
    tokio::fs::write(&staging, &bytes).await?;
    tokio::fs::rename(&staging, &self.path).await?;

    tracing::debug!(
      path = %self.path.display(),
      bytes = bytes.len(),
      "wrote refresh summary"
    );
    Ok(())
  }

  async fn load(&self) -> Result<Option<SummaryArtifact>> {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };

    let etag = compute_etag(&bytes);
    Ok(Some(SummaryArtifact { bytes, media_type: MEDIA_TYPE, etag }))
  }
}
