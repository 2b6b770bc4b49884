use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rusqlite;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorCode {
    MissingApiKey,
    Forbidden,
    HttpTimeout,
    RateLimited,
    InvalidResponse,
    InvalidRequest,
    ProviderUnavailable,
    Unknown,
}

impl LlmErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmErrorCode::MissingApiKey => "MISSING_API_KEY",
            LlmErrorCode::Forbidden => "FORBIDDEN",
            LlmErrorCode::HttpTimeout => "HTTP_TIMEOUT",
            LlmErrorCode::RateLimited => "RATE_LIMITED",
            LlmErrorCode::InvalidResponse => "INVALID_RESPONSE",
            LlmErrorCode::InvalidRequest => "INVALID_REQUEST",
            LlmErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            LlmErrorCode::Unknown => "UNKNOWN_LLM_ERROR",
        }
    }
}

impl fmt::Display for LlmErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {message}")]
    Database { message: String },

    #[error("record not found")]
    NotFound,

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        details: Option<JsonValue>,
    },

    #[error("{message}")]
    Llm {
        code: LlmErrorCode,
        message: String,
        correlation_id: Option<String>,
        details: Option<JsonValue>,
    },

    #[error("upstream service {service} failed: {message}")]
    Upstream { service: String, message: String },

    #[error("integration {0} is not configured")]
    NotConfigured(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            source: None,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            source: None,
            details: Some(details),
        }
    }

    pub fn llm(code: LlmErrorCode, message: impl Into<String>) -> Self {
        Self::llm_with_details(code, message, None, None)
    }

    pub fn llm_with_details(
        code: LlmErrorCode,
        message: impl Into<String>,
        correlation_id: Option<&str>,
        details: Option<JsonValue>,
    ) -> Self {
        let message = message.into();
        let correlation = correlation_id.map(|value| value.to_string());
        match (&correlation, &details) {
            (Some(id), Some(payload)) => {
                warn!(
                    target: "app::llm::error",
                    code = %code,
                    correlation_id = %id,
                    details = %payload,
                    %message
                );
            }
            (Some(id), None) => {
                warn!(target: "app::llm::error", code = %code, correlation_id = %id, %message);
            }
            (None, Some(payload)) => {
                warn!(target: "app::llm::error", code = %code, details = %payload, %message);
            }
            (None, None) => {
                warn!(target: "app::llm::error", code = %code, %message);
            }
        }

        AppError::Llm {
            code,
            message,
            correlation_id: correlation,
            details,
        }
    }

    pub fn llm_code(&self) -> Option<LlmErrorCode> {
        match self {
            AppError::Llm { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        let service = service.into();
        let message = message.into();
        warn!(target: "app::integrations", %service, %message, "upstream failure");
        AppError::Upstream { service, message }
    }

    pub fn not_configured(service: impl Into<String>) -> Self {
        let service = service.into();
        warn!(target: "app::integrations", %service, "integration not configured");
        AppError::NotConfigured(service)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::conflict", %message, "conflict error");
        AppError::Conflict { message }
    }

    pub fn not_found() -> Self {
        warn!(target: "app::database", "resource not found");
        AppError::NotFound
    }

    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::database", %message, "database error");
        AppError::Database { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        use rusqlite::Error::{QueryReturnedNoRows, SqliteFailure};
        use rusqlite::ErrorCode;

        match &error {
            QueryReturnedNoRows => AppError::not_found(),
            SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                AppError::conflict("unique or constraint violation")
            }
            _ => {
                error!(target: "app::database", error = ?error, "sqlite error");
                AppError::database(error.to_string())
            }
        }
    }
}

/// Structured JSON error body returned by every API endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "record not found".to_string(),
                    code: None,
                    details: None,
                },
            ),
            AppError::Validation {
                message, details, ..
            } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message.clone(),
                    code: None,
                    details: details.clone(),
                },
            ),
            AppError::Conflict { message } => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: message.clone(),
                    code: None,
                    details: None,
                },
            ),
            AppError::Llm {
                code,
                message,
                correlation_id,
                ..
            } => {
                let status = match code {
                    LlmErrorCode::MissingApiKey => StatusCode::PRECONDITION_FAILED,
                    LlmErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
                    LlmErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (
                    status,
                    ErrorBody {
                        error: message.clone(),
                        code: Some(code.as_str().to_string()),
                        details: correlation_id
                            .as_ref()
                            .map(|id| json!({ "correlation_id": id })),
                    },
                )
            }
            AppError::NotConfigured(service) => (
                StatusCode::PRECONDITION_FAILED,
                ErrorBody {
                    error: format!("integration {service} is not configured"),
                    code: Some("NOT_CONFIGURED".to_string()),
                    details: None,
                },
            ),
            AppError::Upstream { service, message } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: message.clone(),
                    code: Some("UPSTREAM_FAILED".to_string()),
                    details: Some(json!({ "service": service })),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: self.to_string(),
                    code: None,
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
