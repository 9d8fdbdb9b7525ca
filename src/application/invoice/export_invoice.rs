use std::sync::Arc;

use crate::domain::invoice::{
  ExportError, InvoiceRenderer, PdfArtifact, SharedInvoiceSession, handle_export_result,
};

pub struct ExportInvoiceCommand {
  pub session: SharedInvoiceSession,
}

/// Exports the current state of an editing session through the configured renderer.
pub struct ExportInvoiceUseCase {
  renderer: Arc<dyn InvoiceRenderer>,
}

impl ExportInvoiceUseCase {
  pub fn new(renderer: Arc<dyn InvoiceRenderer>) -> Self {
    Self { renderer }
  }

  pub async fn execute(&self, command: ExportInvoiceCommand) -> Result<PdfArtifact, ExportError> {
    let _guard = command.session.begin_export().inspect_err(|_| {
      tracing::warn!("Rejecting export: another export is still in flight");
    })?;

    let payload = command.session.snapshot();
    tracing::info!(
      "Exporting invoice with {} line items via {} renderer",
      payload.items.len(),
      self.renderer.name()
    );

    handle_export_result(self.renderer.render(&payload).await)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{LineItemField, RenderError};
  use crate::test_support::{FAKE_PDF, FailingRenderer, GatedRenderer, StaticRenderer};
  use rust_decimal_macros::dec;
  use std::sync::atomic::Ordering;

  #[tokio::test]
  async fn test_export_renders_latest_state() {
    let renderer = Arc::new(StaticRenderer::default());
    let use_case = ExportInvoiceUseCase::new(renderer.clone());
    let session = SharedInvoiceSession::default();
    let id = session.with(|s| s.add_item());
    session.with(|s| s.update_item(id, LineItemField::UnitPrice(dec!(12.5))));

    let artifact = use_case
      .execute(ExportInvoiceCommand {
        session: session.clone(),
      })
      .await
      .unwrap();

    assert_eq!(artifact.bytes, FAKE_PDF.to_vec());
    assert_eq!(artifact.content_type, "application/pdf");
    let payload = renderer.last_payload.lock().unwrap().clone().unwrap();
    assert_eq!(payload.items.len(), 2);
    assert_eq!(payload.items[1].unit_price, dec!(12.5));
    assert!(!session.is_exporting());
  }

  #[tokio::test]
  async fn test_export_failure_is_tagged_and_releases_slot() {
    let use_case = ExportInvoiceUseCase::new(Arc::new(FailingRenderer(RenderError::Transport(
      "connection refused".to_string(),
    ))));
    let session = SharedInvoiceSession::default();

    let result = use_case
      .execute(ExportInvoiceCommand {
        session: session.clone(),
      })
      .await;

    assert_eq!(
      result,
      Err(ExportError::Render(RenderError::Transport(
        "connection refused".to_string()
      )))
    );
    assert!(!session.is_exporting());
  }

  #[tokio::test]
  async fn test_concurrent_export_is_rejected() {
    let (renderer, release) = GatedRenderer::new();
    let use_case = Arc::new(ExportInvoiceUseCase::new(Arc::new(renderer)));
    let session = SharedInvoiceSession::default();

    let first = tokio::spawn({
      let use_case = use_case.clone();
      let session = session.clone();
      async move { use_case.execute(ExportInvoiceCommand { session }).await }
    });

    while !session.is_exporting() {
      tokio::task::yield_now().await;
    }

    let second = use_case
      .execute(ExportInvoiceCommand {
        session: session.clone(),
      })
      .await;
    assert_eq!(second, Err(ExportError::AlreadyInProgress));

    release.send(()).unwrap();
    assert!(first.await.unwrap().is_ok());
    assert!(!session.is_exporting());

    let third = use_case.execute(ExportInvoiceCommand { session }).await;
    assert!(third.is_ok());
  }

  #[tokio::test]
  async fn test_export_counts_one_render_per_call() {
    let renderer = Arc::new(StaticRenderer::default());
    let use_case = ExportInvoiceUseCase::new(renderer.clone());
    let session = SharedInvoiceSession::default();

    for _ in 0..3 {
      use_case
        .execute(ExportInvoiceCommand {
          session: session.clone(),
        })
        .await
        .unwrap();
    }
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 3);
  }
}
