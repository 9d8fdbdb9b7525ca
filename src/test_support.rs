//! Renderer doubles shared by unit tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

use crate::domain::invoice::{ExportPayload, InvoiceRenderer, RenderError};

pub const FAKE_PDF: &[u8] = b"%PDF-1.4 fake";

/// Returns a fixed document and remembers the last payload it saw.
#[derive(Default)]
pub struct StaticRenderer {
  pub calls: AtomicUsize,
  pub last_payload: Mutex<Option<ExportPayload>>,
}

#[async_trait]
impl InvoiceRenderer for StaticRenderer {
  fn name(&self) -> &'static str {
    "static"
  }

  async fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, RenderError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    *self.last_payload.lock().unwrap() = Some(payload.clone());
    Ok(FAKE_PDF.to_vec())
  }
}

/// Always fails with the configured error.
pub struct FailingRenderer(pub RenderError);

#[async_trait]
impl InvoiceRenderer for FailingRenderer {
  fn name(&self) -> &'static str {
    "failing"
  }

  async fn render(&self, _payload: &ExportPayload) -> Result<Vec<u8>, RenderError> {
    Err(self.0.clone())
  }
}

/// Blocks the first render until the paired sender fires.
pub struct GatedRenderer {
  gate: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedRenderer {
  pub fn new() -> (Self, oneshot::Sender<()>) {
    let (tx, rx) = oneshot::channel();
    let renderer = Self {
      gate: tokio::sync::Mutex::new(Some(rx)),
    };
    (renderer, tx)
  }
}

#[async_trait]
impl InvoiceRenderer for GatedRenderer {
  fn name(&self) -> &'static str {
    "gated"
  }

  async fn render(&self, _payload: &ExportPayload) -> Result<Vec<u8>, RenderError> {
    let gate = self.gate.lock().await.take();
    if let Some(rx) = gate {
      let _ = rx.await;
    }
    Ok(FAKE_PDF.to_vec())
  }
}
