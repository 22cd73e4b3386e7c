//! Error types and JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stowage_signer::SignerError;
use thiserror::Error;

/// Error codes reported in the `{"error": {"code", ...}}` envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidSecretKey,
    InvalidConfig,
    Forbidden,
    NotFound,
    InternalError,
}

impl ErrorCode {
    /// Get the error code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSecretKey => "invalid_secret_key",
            Self::InvalidConfig => "invalid_config",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::InternalError => "internal_error",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSecretKey | Self::InvalidConfig | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Api { code: ErrorCode, message: String },

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Error code reported to the caller
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Api { code, .. } => *code,
            Self::Signer(SignerError::BrowserContext) => ErrorCode::Forbidden,
            Self::Signer(SignerError::MissingSecretKey | SignerError::SecretKeyIsPublic) => {
                ErrorCode::InvalidSecretKey
            }
            Self::Signer(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        // Signer details stay in the log.
        let message = match &self {
            Self::Signer(err) => {
                tracing::error!("Signing failed: {}", err);
                "Failed to generate signature".to_string()
            }
            Self::Api { message, .. } => message.clone(),
        };

        (
            code.status_code(),
            Json(json!({
                "error": {
                    "code": code.as_str(),
                    "message": message,
                }
            })),
        )
            .into_response()
    }
}
