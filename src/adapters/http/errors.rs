use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::invoice::{ExportError, RenderError};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Invalid invoice payload (400 Bad Request)
  Validation(String),

  /// Export already running (409 Conflict)
  Conflict(String),

  /// Rendering backend failed (502 Bad Gateway)
  Upstream(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Upstream(msg) => write!(f, "Renderer error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Conflict(msg) => ("export_in_progress", msg.clone()),
      ApiError::Upstream(msg) => {
        tracing::error!("Renderer error: {}", msg);
        ("render_failed", "Error generating PDF".to_string())
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details: None,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<ExportError> for ApiError {
  fn from(error: ExportError) -> Self {
    match error {
      ExportError::AlreadyInProgress => ApiError::Conflict(error.to_string()),
      ExportError::EmptyDocument => ApiError::Upstream(error.to_string()),
      ExportError::Render(RenderError::Template(msg)) => {
        ApiError::Internal(format!("Template error: {}", msg))
      }
      ExportError::Render(err) => ApiError::Upstream(err.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self {
    let mut messages = Vec::new();
    collect_messages(&errors, "", &mut messages);
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

/// Flattens nested party and item errors into their messages.
fn collect_messages(errors: &ValidationErrors, path: &str, out: &mut Vec<String>) {
  for (field, kind) in errors.errors() {
    let field_path = if path.is_empty() {
      field.to_string()
    } else {
      format!("{}.{}", path, field)
    };

    match kind {
      ValidationErrorsKind::Field(errors) => {
        out.extend(errors.iter().map(|error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field_path))
        }));
      }
      ValidationErrorsKind::Struct(nested) => collect_messages(nested, &field_path, out),
      ValidationErrorsKind::List(items) => {
        for (index, nested) in items {
          collect_messages(nested, &format!("{}[{}]", field_path, index), out);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::ExportPayload;
  use validator::Validate;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Conflict("test".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Upstream("test".to_string()).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_export_error_conversion() {
    let api_error: ApiError = ExportError::AlreadyInProgress.into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError =
      ExportError::Render(RenderError::Transport("connection refused".to_string())).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_GATEWAY);

    let api_error: ApiError =
      ExportError::Render(RenderError::Template("bad tag".to_string())).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn test_nested_validation_messages() {
    let mut payload = ExportPayload::sample();
    payload.customer.email = "nope".to_string();
    payload.items[1].quantity = 0;

    let api_error: ApiError = payload.validate().unwrap_err().into();
    let ApiError::Validation(message) = api_error else {
      panic!("expected validation error");
    };
    assert!(message.contains("Invalid email format"));
    assert!(message.contains("Quantity must be between 1 and 1,000,000"));
  }
}
