//! Resolve a cover reference to image bytes.

use std::sync::Arc;

use super::CoverArt;
use crate::enrichment::traits::ArtworkSource;

/// Fetches cover art, turning every failure into "no art".
#[derive(Clone)]
pub struct CoverArtAcquirer {
    source: Arc<dyn ArtworkSource>,
}

impl CoverArtAcquirer {
    pub fn new(source: Arc<dyn ArtworkSource>) -> Self {
        Self { source }
    }

    /// Download and identify the image at `reference`.
    ///
    /// Returns `None` for a missing or blank reference, any download error
    /// (timeout, non-2xx, network), or an empty payload.
    pub async fn fetch(&self, reference: Option<&str>) -> Option<CoverArt> {
        let url = reference.map(str::trim).filter(|url| !url.is_empty())?;

        match self.source.download_image(url).await {
            Ok(data) => {
                let cover = CoverArt::from_bytes(data);
                match &cover {
                    Some(cover) => tracing::debug!(
                        url,
                        bytes = cover.data.len(),
                        mime = cover.mime_type(),
                        "cover art downloaded"
                    ),
                    None => tracing::warn!(url, "cover art download was empty"),
                }
                cover
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to download cover art");
                None
            }
        }
    }
}
