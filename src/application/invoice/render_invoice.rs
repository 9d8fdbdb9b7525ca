use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::domain::invoice::{
  DocumentTree, ExportError, ExportPayload, InvoiceRenderer, PdfArtifact, handle_export_result,
};

pub struct RenderInvoiceCommand {
  pub payload: ExportPayload,
}

/// Renders an already validated payload received from a client.
pub struct RenderInvoiceUseCase {
  renderer: Arc<dyn InvoiceRenderer>,
}

impl RenderInvoiceUseCase {
  pub fn new(renderer: Arc<dyn InvoiceRenderer>) -> Self {
    Self { renderer }
  }

  pub async fn execute(&self, command: RenderInvoiceCommand) -> Result<PdfArtifact, ExportError> {
    tracing::info!(
      "Rendering invoice {} via {} renderer",
      command.payload.invoice_number.as_deref().unwrap_or("(unnumbered)"),
      self.renderer.name()
    );

    handle_export_result(self.renderer.render(&command.payload).await)
  }

  /// Document tree for on-screen preview, no renderer involved.
  pub fn preview(&self, command: RenderInvoiceCommand) -> DocumentTree {
    self.preview_on(command, Utc::now().date_naive())
  }

  pub fn preview_on(&self, command: RenderInvoiceCommand, today: NaiveDate) -> DocumentTree {
    command.payload.to_document(today)
  }
}
