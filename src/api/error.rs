// src/api/error.rs
// =============================================================================
// Errors coming back from the business API.
//
// The server answers with plain HTTP status codes plus a JSON body of field
// errors on 400. We sort those into the few cases the editor reacts to
// differently: the path is taken, the input was rejected, the session is no
// longer valid, or something else went wrong.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: no business at this path (or not one we can see)
    #[error("business not found")]
    NotFound,

    /// 400 with a `path` field error: another business already uses it
    #[error("path is already taken: {0}")]
    PathConflict(String),

    /// Any other 400: the server rejected one of the fields
    #[error("rejected by server: {0}")]
    Validation(String),

    #[error("not authorized, please log in again")]
    Unauthorized,

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid API base URL: {0}")]
    BaseUrl(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

pub(crate) const NO_DETAILS: &str = "no details from the server";

// Turns a non-success response into an ApiError.
//
// Parameters:
//   status: the HTTP status of the response
//   body: the raw response body (may be empty or not JSON)
pub(crate) fn classify(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::BAD_REQUEST => match field_error(body, "path") {
            Some(message) => ApiError::PathConflict(message),
            None => ApiError::Validation(summarize(body)),
        },
        other => ApiError::Status(other.as_u16()),
    }
}

// Field errors look like {"path": ["business with this path already exists."]}
fn field_error(body: &str, field: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let errors = value.get(field)?;

    let message = match errors {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    Some(message)
}

// Flattens a field-error body into "field: message; field: message"
fn summarize(body: &str) -> String {
    if body.trim().is_empty() {
        return NO_DETAILS.to_string();
    }
    let Ok(serde_json::Value::Object(fields)) = serde_json::from_str::<serde_json::Value>(body)
    else {
        return body.trim().to_string();
    };

    fields
        .iter()
        .map(|(field, errors)| {
            let text = match errors {
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
                    .collect::<Vec<_>>()
                    .join(" "),
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            format!("{}: {}", field, text)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
