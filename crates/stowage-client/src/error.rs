//! Client error types

use serde::Deserialize;
use stowage_signer::SignerError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// No public key configured
    #[error("Public key is required")]
    MissingPublicKey,

    /// A secret key was configured as the public key
    #[error("Public key is invalid. Make sure you are not using a secret key")]
    PublicKeyIsSecret,

    /// The file is missing a name, a type, or content
    #[error("File passed in is invalid")]
    InvalidFile,

    /// Signature endpoint unreachable or returned a non-success status
    #[error("Failed to get signature")]
    SignatureFetch {
        status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Signature endpoint answered without a usable signature
    #[error("Signature endpoint did not return a valid signature")]
    InvalidSignature,

    /// Stowage API error
    #[error("{message}")]
    Api {
        code: Option<String>,
        message: String,
        status: u16,
    },

    /// Response body is missing required fields
    #[error("Invalid response from {0}")]
    InvalidResponse(String),

    /// Presigned destination rejected the file or was unreachable
    #[error("Failed to upload file")]
    UploadFailed {
        status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

impl ClientError {
    /// Build an API error from a `{"error": {"code", "message"}}` body.
    ///
    /// Falls back to `"Failed to {action} (HTTP {status})"` when the body does
    /// not carry a message.
    pub fn from_api_response(body: &str, status: u16, action: &str) -> Self {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error);

        let code = detail.as_ref().and_then(|d| d.code.clone());
        let message = detail
            .and_then(|d| d.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Failed to {} (HTTP {})", action, status));

        Self::Api {
            code,
            message,
            status,
        }
    }

    /// Check if this error was raised before any network activity
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingPublicKey | Self::PublicKeyIsSecret | Self::InvalidFile | Self::Config(_)
        )
    }

    /// API error code, when the service supplied one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<SignerError> for ClientError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::MissingPublicKey => Self::MissingPublicKey,
            SignerError::PublicKeyIsSecret => Self::PublicKeyIsSecret,
            other => Self::Config(other.to_string()),
        }
    }
}
