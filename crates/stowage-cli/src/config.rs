//! Signature server configuration

use crate::{routes::HEALTH_ROUTE, ApiError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature endpoint server configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SignatureServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Secret key used to sign payloads (`sk_...`)
    pub secret_key: String,
    /// Route serving signatures
    pub signature_route: String,
    /// Enable CORS
    pub cors_enabled: bool,
    /// CORS allowed origins (`*` allows any)
    pub cors_origins: Vec<String>,
}

impl Default for SignatureServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            secret_key: String::new(),
            signature_route: "/api/signature".to_string(),
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl SignatureServerConfig {
    /// Create a config signing with `secret_key`
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that the signature route can be mounted.
    ///
    /// The route is a literal path: it starts with `/`, holds only unreserved
    /// URL characters, and does not shadow the health route.
    pub fn validate(&self) -> Result<(), ApiError> {
        let route = self.signature_route.as_str();

        if !route.starts_with('/') {
            return Err(ApiError::new(
                ErrorCode::InvalidConfig,
                format!("Signature route must start with '/': {}", route),
            ));
        }
        if let Some(c) = route
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '~')))
        {
            return Err(ApiError::new(
                ErrorCode::InvalidConfig,
                format!("Signature route contains unsupported character {:?}: {}", c, route),
            ));
        }
        if route.trim_end_matches('/') == HEALTH_ROUTE {
            return Err(ApiError::new(
                ErrorCode::InvalidConfig,
                format!("Signature route conflicts with {}", HEALTH_ROUTE),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for SignatureServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret_key", &"<redacted>")
            .field("signature_route", &self.signature_route)
            .field("cors_enabled", &self.cors_enabled)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}
