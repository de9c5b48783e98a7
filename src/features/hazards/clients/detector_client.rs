use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use thiserror::Error;

use crate::core::config::DetectorConfig;
use crate::features::hazards::models::Detection;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("detector request failed: {0}")]
    Request(String),

    #[error("detector returned status {0}")]
    Status(u16),

    #[error("failed to parse detector response: {0}")]
    Decode(String),
}

/// One forward pass of a pretrained object detector over an image on disk
#[async_trait]
pub trait HazardDetector: Send + Sync {
    async fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, DetectorError>;
}

/// Detector served over HTTP.
///
/// Posts the image as multipart (`file`, `model`) and expects the Ultralytics
/// JSON result list back: `[{name, class, confidence, box: {x1, y1, x2, y2}}]`.
pub struct HttpDetectorClient {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl HttpDetectorClient {
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DetectorError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl HazardDetector for HttpDetectorClient {
    async fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, DetectorError> {
        let bytes = tokio::fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("model", self.model.clone());

        tracing::debug!("Running detector {} on {}", self.model, image_path.display());

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DetectorError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DetectorError::Status(response.status().as_u16()));
        }

        response
            .json::<Vec<Detection>>()
            .await
            .map_err(|e| DetectorError::Decode(e.to_string()))
    }
}
