use async_trait::async_trait;
use std::time::Duration;

use crate::domain::invoice::{ExportPayload, InvoiceRenderer, RenderError};

/// Remote backend: posts the export payload as JSON and expects PDF bytes back.
pub struct HttpRenderer {
  client: reqwest::Client,
  endpoint: String,
}

impl HttpRenderer {
  pub fn new(endpoint: impl Into<String>, timeout_seconds: u64) -> Result<Self, RenderError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_seconds))
      .build()
      .map_err(|e| RenderError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

    Ok(Self {
      client,
      endpoint: endpoint.into(),
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl InvoiceRenderer for HttpRenderer {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, RenderError> {
    tracing::debug!("Posting invoice to render service at {}", self.endpoint);

    let response = self
      .client
      .post(&self.endpoint)
      .json(payload)
      .send()
      .await
      .map_err(|e| RenderError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(RenderError::Rejected(format!("{}: {}", status, body)));
    }

    let content_type = response
      .headers()
      .get(reqwest::header::CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
      .unwrap_or_default()
      .to_string();
    if !content_type.starts_with("application/pdf") {
      tracing::warn!(
        "Render service answered with content type '{}', expected application/pdf",
        content_type
      );
      return Err(RenderError::Rejected(format!(
        "expected application/pdf, got '{}'",
        content_type
      )));
    }

    let bytes = response
      .bytes()
      .await
      .map_err(|e| RenderError::Transport(format!("Failed to read response: {}", e)))?;

    Ok(bytes.to_vec())
  }
}
