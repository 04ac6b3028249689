// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug, Clone)]
pub enum ClientesError {
    #[error("Customer not found with id: {0}")]
    NotFound(i32),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
}

impl ClientesError {
    fn code(&self) -> &'static str {
        match self {
            ClientesError::NotFound(_) => "NOT_FOUND",
            ClientesError::DatabaseError(_) => "DATABASE_ERROR",
            ClientesError::ValidationError(_) => "VALIDATION_ERROR",
            ClientesError::InvalidInput(_) => "INVALID_INPUT",
            ClientesError::ConfigError(_) => "CONFIG_ERROR",
            ClientesError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

/// Pool exhaustion is the only driver error callers can reasonably wait out
impl From<sqlx::Error> for ClientesError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => ClientesError::ServiceUnavailable,
            other => ClientesError::DatabaseError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ClientesError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientesError::ValidationError(err.to_string())
    }
}

/// Convert ClientesError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for ClientesError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ClientesError::NotFound(_) => StatusCode::NOT_FOUND,
            ClientesError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClientesError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ClientesError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ClientesError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClientesError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(ClientesError::NotFound(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ClientesError::ValidationError("nome".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ClientesError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ClientesError::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_pool_timeout_maps_to_service_unavailable() {
        let err: ClientesError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ClientesError::ServiceUnavailable));

        let err: ClientesError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ClientesError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ClientesError::NotFound(42).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Customer not found with id: 42");
        assert!(body["error"]["timestamp"].is_string());
    }
}
