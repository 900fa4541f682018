//! API error type and the JSON error body it renders to.
//!
//! Every error body has the same shape:
//! `{"error":{"code":"GAME_NOT_FOUND","message":"Game not found","context":"<id>"}}`.
//! Validation failures add an `errors` array with one entry per field.

use actix_web::{HttpResponse, ResponseError, error::BlockingError, http::StatusCode};
use log::error;
use serde::Serialize;

use crate::store::StoreError;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub msg: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Game not found")]
    NotFound { context: String },

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid request payload: {0}")]
    BadPayload(String),

    /// Anything the client cannot act on. Details are logged, not returned.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(context: impl ToString) -> Self {
        Self::NotFound { context: context.to_string() }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingToken => "MISSING_TOKEN",
            ApiError::InvalidToken => "INVALID_TOKEN",
            ApiError::NotFound { .. } => "GAME_NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::BadPayload(_) => "INVALID_PAYLOAD",
            ApiError::Internal(_) => "SERVER_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(format!("store: {}", e))
    }
}

impl From<BlockingError> for ApiError {
    fn from(e: BlockingError) -> Self {
        ApiError::Internal(format!("blocking pool: {}", e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("serialization: {}", e))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            ApiError::Internal(detail) => {
                error!("[Api] Internal error: {}", detail);
                http_error_response(self.code(), "Server Error", None, status)
            }
            ApiError::NotFound { context } => {
                http_error_response(self.code(), &self.to_string(), Some(context.as_str()), status)
            }
            ApiError::Validation(fields) => HttpResponse::build(status).json(serde_json::json!({
                "error": error_body(self.code(), &self.to_string(), None),
                "errors": fields,
            })),
            _ => http_error_response(self.code(), &self.to_string(), None, status),
        }
    }
}

fn error_body(code: &str, message: &str, context: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "code": code,
        "message": message,
        "context": context.unwrap_or(""),
    })
}

/// Returns an HTTP error response with a JSON body.
///
/// # Arguments
/// - `code`: Unique error code.
/// - `message`: Human-readable error message.
/// - `context`: Optional context string (e.g. the requested game id).
/// - `status`: HTTP status code.
pub fn http_error_response(
    code: &str,
    message: &str,
    context: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error_body(code, message, context),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let err = ApiError::Internal("disk on fire".into());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["message"], "Server Error");
        assert!(!body.to_string().contains("disk"));
    }

    #[actix_web::test]
    async fn validation_lists_fields() {
        let err = ApiError::Validation(vec![FieldError {
            field: "title",
            msg: "Title is required",
        }]);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(body["errors"][0]["msg"], "Title is required");
    }

    #[test]
    fn auth_failures_are_401() {
        assert_eq!(ApiError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
    }
}
