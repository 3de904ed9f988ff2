//! Analyze endpoint input validation
//!
//! The boundary has exactly one rule: `code` must be present, textual and
//! non-empty. The metadata fields are advisory text and pass through
//! untouched.

use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use shared_types_rs::{AnalysisRequest, ErrorResponse};

/// Validation error for analyze requests
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ApiValidationError {
    #[error("Code is required")]
    MissingCode,
}

impl ApiValidationError {
    /// Convert to HTTP status code and error response
    pub fn to_response(&self) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
    }
}

/// Parse and validate a raw analyze request body.
///
/// A body that is not valid JSON is treated the same as a missing `code`
/// field: the caller gets a validation error, never a crash. A non-string
/// `problemName` or `pattern` falls back to the prompt defaults.
pub fn parse_analysis_request(body: &[u8]) -> Result<AnalysisRequest, ApiValidationError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ApiValidationError::MissingCode)?;

    let code = match value.get("code") {
        Some(Value::String(code)) if !code.is_empty() => code.clone(),
        _ => return Err(ApiValidationError::MissingCode),
    };

    let problem_name = value
        .get("problemName")
        .and_then(Value::as_str)
        .map(str::to_string);
    let pattern = value
        .get("pattern")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(AnalysisRequest {
        problem_name,
        code,
        pattern,
    })
}
