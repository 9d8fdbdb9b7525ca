use actix_web::web;
use std::sync::Arc;

use crate::application::invoice::RenderInvoiceUseCase;

use super::errors::ApiError;

use super::handlers::invoices::{
  health_check, preview_invoice_handler, render_invoice_handler, sample_invoice_handler,
};

/// Configure invoice render routes
///
/// # Routes
///
/// - POST /invoice - Render the posted invoice as a PDF
/// - GET /invoice - Render the built-in sample invoice
/// - POST /invoice/preview - Document tree of the posted invoice as JSON
/// - GET /health - Liveness probe
pub fn configure_invoice_routes(
  cfg: &mut web::ServiceConfig,
  render_use_case: Arc<RenderInvoiceUseCase>,
) {
  // Body deserialization failures answer with the same JSON error body as validation
  let json_config = web::JsonConfig::default()
    .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

  cfg
    .app_data(json_config)
    .app_data(web::Data::new(render_use_case))
    .route("/invoice", web::post().to(render_invoice_handler))
    .route("/invoice", web::get().to(sample_invoice_handler))
    .route("/invoice/preview", web::post().to(preview_invoice_handler))
    .route("/health", web::get().to(health_check));
}
