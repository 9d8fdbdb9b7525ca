use actix_web::{HttpResponse, http::header, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::errors::ApiError;
use crate::application::invoice::{RenderInvoiceCommand, RenderInvoiceUseCase};
use crate::domain::invoice::{ExportPayload, PdfArtifact};

fn pdf_response(artifact: PdfArtifact) -> HttpResponse {
  HttpResponse::Ok()
    .content_type(artifact.content_type)
    .insert_header((header::CONTENT_DISPOSITION, artifact.content_disposition()))
    .body(artifact.bytes)
}

/// Handler for rendering a client-supplied invoice
///
/// POST /invoice
/// Body: ExportPayload (JSON)
/// Response: application/pdf, shown inline
pub async fn render_invoice_handler(
  payload: web::Json<ExportPayload>,
  use_case: web::Data<Arc<RenderInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  payload.validate()?;

  let artifact = use_case
    .execute(RenderInvoiceCommand {
      payload: payload.into_inner(),
    })
    .await?;

  Ok(pdf_response(artifact))
}

/// Handler for the demo invoice
///
/// GET /invoice
pub async fn sample_invoice_handler(
  use_case: web::Data<Arc<RenderInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let artifact = use_case
    .execute(RenderInvoiceCommand {
      payload: ExportPayload::sample(),
    })
    .await?;

  Ok(pdf_response(artifact))
}

/// Handler for the on-screen preview
///
/// POST /invoice/preview
/// Body: ExportPayload (JSON)
/// Response: document tree (JSON)
pub async fn preview_invoice_handler(
  payload: web::Json<ExportPayload>,
  use_case: web::Data<Arc<RenderInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  payload.validate()?;

  let document = use_case.preview(RenderInvoiceCommand {
    payload: payload.into_inner(),
  });

  Ok(HttpResponse::Ok().json(document))
}

pub async fn health_check() -> &'static str {
  "OK"
}
