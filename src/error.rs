//! Unified API error handling
//!
//! Every failure leaves the service as one JSON body: `{code, message, request_id?, errors?}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{FieldError, ValidationErrors};
use crate::services::{StorageError, SubmissionError};

const STORAGE_UNAVAILABLE_MESSAGE: &str =
    "Impossible d'enregistrer votre demande pour le moment. Veuillez réessayer dans quelques instants.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input to a read-only computation (estimate)
    #[error("Bad request: {0}")]
    BadRequest(ValidationErrors),

    /// Submission rejected by validation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Storage unavailable")]
    Storage(#[from] StorageError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// Render with `status`; the body also rides along as a response
    /// extension so the request-id middleware can stamp it.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        let mut response = (status, Json(&self)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl ApiError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(errors: impl Into<ValidationErrors>) -> Self {
        Self::BadRequest(errors.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Forbidden(msg) | Self::NotFound(msg) => msg.clone(),
            Self::BadRequest(errors) | Self::Validation(errors) => errors.to_string(),
            Self::Storage(_) => STORAGE_UNAVAILABLE_MESSAGE.to_string(),
            // Don't leak internal error details
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn field_errors(&self) -> Option<Vec<FieldError>> {
        match self {
            Self::BadRequest(errors) | Self::Validation(errors) => {
                Some(errors.iter().cloned().collect())
            }
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Body that could not be read as the expected JSON shape
impl From<JsonRejection> for ValidationErrors {
    fn from(rejection: JsonRejection) -> Self {
        let error = match &rejection {
            JsonRejection::JsonDataError(_) => {
                let text = rejection.body_text();
                FieldError::new(rejected_field(&text).unwrap_or("body"), "Type de valeur invalide")
            }
            JsonRejection::JsonSyntaxError(_) => FieldError::new("body", "Corps JSON invalide"),
            JsonRejection::MissingJsonContentType(_) => {
                FieldError::new("body", "Content-Type application/json attendu")
            }
            _ => FieldError::new("body", "Corps de requête illisible"),
        };
        error.into()
    }
}

/// Field path in a deserialization message such as
/// `...target type: surface_area: invalid type: string "x", expected f64`
fn rejected_field(text: &str) -> Option<&str> {
    let (_, detail) = text.split_once(": ")?;
    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path != "."
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then_some(path)
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.into())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(errors) => Self::Validation(errors),
            SubmissionError::Storage(e) => Self::Storage(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            Self::Storage(e) => {
                tracing::error!(error = ?e, "Storage error");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            request_id: None,
            errors: self.field_errors(),
        }
        .into_response_with(status)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn body(err: ApiError) -> (StatusCode, ErrorResponse) {
        let status = err.status_code();
        let body = ErrorResponse {
            code: err.error_code().to_string(),
            message: err.public_message(),
            request_id: None,
            errors: err.field_errors(),
        };
        (status, body)
    }

    #[test]
    fn validation_errors_map_to_422_with_field_list() {
        let mut errors = ValidationErrors::new();
        errors.push("surface_area", "Surface minimum 10m²");
        errors.push("project_type", "Type de projet requis");

        let (status, body) = body(SubmissionError::Validation(errors).into());
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.message, "Surface minimum 10m², Type de projet requis");
        assert_eq!(body.errors.map(|e| e.len()), Some(2));
    }

    #[test]
    fn storage_errors_hide_the_cause() {
        let err = StorageError::Unavailable("connection refused to 10.0.0.3".into());
        let (status, body) = body(SubmissionError::Storage(err).into());
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "STORAGE_UNAVAILABLE");
        assert!(!body.message.contains("10.0.0.3"));
        assert!(body.errors.is_none());
    }

    #[test]
    fn internal_errors_are_generic() {
        let (status, body) = body(anyhow::anyhow!("secret detail").into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "An internal error occurred");
    }

    #[test]
    fn field_is_read_from_deserialization_message() {
        let prefix = "Failed to deserialize the JSON body into the target type";
        assert_eq!(
            rejected_field(&format!(
                "{prefix}: surface_area: invalid type: string \"cent\", expected f64 at line 1 column 24"
            )),
            Some("surface_area")
        );
        assert_eq!(
            rejected_field(&format!("{prefix}: loan.duration_months: invalid type: null, expected u32")),
            Some("loan.duration_months")
        );
        assert_eq!(
            rejected_field(&format!("{prefix}: invalid type: integer `3`, expected a map at line 1 column 1")),
            None
        );
    }
}
