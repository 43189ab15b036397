use log::debug;
use serde::Deserialize;

use crate::error::ClientError;

/// Server error response structure
#[derive(Debug, Deserialize)]
struct ServerErrorResponse {
    code: Option<u16>,
    message: String,
    error_type: Option<String>,
}

/// Map a non-success API response to a ClientError.
///
/// Structured server errors are mapped by `error_type`; anything else falls
/// back to the HTTP status code.
pub fn map_server_error(status_code: u16, response_text: &str) -> ClientError {
    debug!("Mapping server error: status={}, response={}", status_code, response_text);

    if let Ok(error_response) = serde_json::from_str::<ServerErrorResponse>(response_text) {
        let error_type = error_response.error_type.unwrap_or_else(|| "unknown_error".to_string());
        let message = error_response.message;

        match error_type.as_str() {
            "authentication_error" => ClientError::Unauthenticated(message),
            "authorization_error" => ClientError::AccessDenied(message),
            "validation_error" | "bad_request" => ClientError::Validation(message),
            "not_found" => ClientError::NotFound(message),
            _ => ClientError::Server {
                status: error_response.code.unwrap_or(status_code),
                message,
            },
        }
    } else {
        let text = if response_text.trim().is_empty() {
            status_reason(status_code).to_string()
        } else {
            response_text.to_string()
        };

        match status_code {
            400 => ClientError::Validation(text),
            401 => ClientError::Unauthenticated(text),
            403 => ClientError::AccessDenied(text),
            404 => ClientError::NotFound(text),
            _ => ClientError::Server {
                status: status_code,
                message: text,
            },
        }
    }
}

fn status_reason(status_code: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unexpected response")
}
