use serde::Serialize;

/// Body returned with every error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_response_omits_empty_details() {
    let response = ErrorResponse {
      error: "validation_error".to_string(),
      message: "Invalid email format".to_string(),
      details: None,
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["error"], "validation_error");
    assert!(json.get("details").is_none());
  }
}
