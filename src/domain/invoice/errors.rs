use thiserror::Error;

/// Failure reported by a rendering backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
  #[error("Renderer unavailable: {0}")]
  Unavailable(String),

  #[error("Template error: {0}")]
  Template(String),

  #[error("Renderer transport failed: {0}")]
  Transport(String),

  #[error("Renderer rejected the invoice: {0}")]
  Rejected(String),

  #[error("Renderer failed: {0}")]
  Failed(String),
}

/// Outcome of an export that did not produce a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
  #[error("An export is already in progress for this invoice")]
  AlreadyInProgress,

  #[error("Renderer returned an empty document")]
  EmptyDocument,

  #[error(transparent)]
  Render(#[from] RenderError),
}
