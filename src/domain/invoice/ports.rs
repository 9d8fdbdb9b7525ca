use async_trait::async_trait;

use super::errors::RenderError;
use super::export::ExportPayload;

/// Backend that turns an export payload into a PDF.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
  /// Short backend name used in logs.
  fn name(&self) -> &'static str;

  async fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, RenderError>;
}
