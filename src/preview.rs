// src/preview.rs
use crate::client::ExplorerClient;
use crate::error::ExplorerError;
use crate::types::ImageryCandidate;

impl ExplorerClient {
    /// Downloads the static preview image (1024px thumbnail, else 2048px).
    ///
    /// Nothing is cached; each call hits the image CDN.
    pub async fn fetch_preview(
        &self,
        candidate: &ImageryCandidate,
    ) -> Result<Vec<u8>, ExplorerError> {
        let url = candidate.preview_url().ok_or_else(|| {
            ExplorerError::InvalidInput(format!("Image {} has no thumbnail URL.", candidate.id))
        })?;
        self._get_bytes(url, None).await
    }

    /// Downloads the panorama-resolution image (2048px thumbnail, else 1024px) with the longer
    /// panorama timeout.
    pub async fn fetch_panorama(
        &self,
        candidate: &ImageryCandidate,
    ) -> Result<Vec<u8>, ExplorerError> {
        if !candidate.is_panoramic {
            return Err(ExplorerError::InvalidInput(format!(
                "Image {} is not a panorama.",
                candidate.id
            )));
        }
        let url = candidate.panorama_url().ok_or_else(|| {
            ExplorerError::InvalidInput(format!("Image {} has no thumbnail URL.", candidate.id))
        })?;
        self._get_bytes(url, Some(self.config.panorama_timeout))
            .await
    }
}
