use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Per-service operation reference, suffixed with `/{service}.html`.
pub const DOCS_BASE: &str =
    "https://boto3.amazonaws.com/v1/documentation/api/latest/reference/services";

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(
        "Operation '{operation}' was not found on either the control plane ({control_service}) \
         or data plane ({data_service}) client. Valid operations are listed at \
         {docs}/{control_service}.html and {docs}/{data_service}.html",
        docs = DOCS_BASE
    )]
    OperationNotFound {
        operation: String,
        control_service: String,
        data_service: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Upstream error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Header error: {0}")]
    Header(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RouterError {
    pub fn operation_not_found(operation: &str, control_service: &str, data_service: &str) -> Self {
        RouterError::OperationNotFound {
            operation: operation.to_string(),
            control_service: control_service.to_string(),
            data_service: data_service.to_string(),
        }
    }

    /// True only for the error the facade raises itself when neither plane
    /// exposes an operation.
    pub fn is_operation_not_found(&self) -> bool {
        matches!(self, RouterError::OperationNotFound { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RouterError::OperationNotFound { .. } => StatusCode::NOT_FOUND,
            RouterError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouterError::Backend(_) => StatusCode::BAD_GATEWAY,
            RouterError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RouterError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RouterError::Json(_) => StatusCode::BAD_REQUEST,
            RouterError::Header(_) => StatusCode::BAD_REQUEST,
            RouterError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &str {
        match self {
            RouterError::OperationNotFound { .. } => "operation_not_found",
            RouterError::Config(_) => "configuration_error",
            RouterError::Backend(_) => "backend_error",
            RouterError::Upstream { .. } => "upstream_error",
            RouterError::InvalidRequest(_) => "invalid_request",
            RouterError::Json(_) => "json_error",
            RouterError::Header(_) => "header_error",
            RouterError::Internal(_) => "internal_error",
        }
    }
}

// Gateway handlers return RouterError directly; render it as a JSON error body.
impl IntoResponse for RouterError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type().to_string();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(
                error_type = %error_type,
                status = status.as_u16(),
                message = %message,
                "Request failed"
            );
        } else {
            tracing::warn!(
                error_type = %error_type,
                status = status.as_u16(),
                message = %message,
                "Request failed"
            );
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
                "code": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
