use std::sync::Arc;

use super::{HtmlInvoiceTemplate, HttpRenderer, WkHtmlToPdfRenderer};
use crate::domain::invoice::{InvoiceRenderer, RenderError};
use crate::infrastructure::config::{RendererBackend, RendererConfig};

pub struct RendererFactory;

impl RendererFactory {
  /// Builds the rendering backend selected in configuration.
  pub fn create(config: &RendererConfig) -> Result<Arc<dyn InvoiceRenderer>, RenderError> {
    match config.backend {
      RendererBackend::Wkhtmltopdf => {
        let template =
          HtmlInvoiceTemplate::new().map_err(|e| RenderError::Template(e.to_string()))?;
        tracing::debug!("Using wkhtmltopdf invoice renderer");
        Ok(Arc::new(WkHtmlToPdfRenderer::new(
          template,
          config.wkhtmltopdf_path.clone(),
        )))
      }

      RendererBackend::Http => {
        let http = config.http.as_ref().ok_or_else(|| {
          RenderError::Unavailable("renderer.http section is required for the http backend".into())
        })?;
        tracing::debug!("Using remote invoice renderer at {}", http.url);
        Ok(Arc::new(HttpRenderer::new(
          http.url.clone(),
          http.timeout_seconds,
        )?))
      }
    }
  }
}
