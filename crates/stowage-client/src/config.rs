//! Client configuration

use crate::{ClientError, Result};
use std::time::Duration;
use url::Url;

/// Base URL of the hosted Stowage API
pub const DEFAULT_ENDPOINT: &str = "https://api.stowage.dev";

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// API base URL
    pub endpoint: String,
    /// Public key identifying the calling application (`pk_...`)
    pub public_key: String,
    /// Timeout for each API request (signature, prepare, confirm)
    pub timeout: Duration,
    /// Timeout for establishing any connection
    pub connect_timeout: Duration,
    /// Overall timeout for the transfer step; unbounded by default since it
    /// grows with the file size
    pub transfer_timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
    /// Value for the `Origin` header on API requests, for harnesses that
    /// need to impersonate an allowed web origin
    pub origin: Option<String>,
    /// Size of the body chunks handed to the transport during transfer;
    /// one progress event is emitted per chunk
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            public_key: String::new(),
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            transfer_timeout: None,
            user_agent: format!("stowage-client/{}", env!("CARGO_PKG_VERSION")),
            origin: None,
            chunk_size: 64 * 1024, // 64 KB
        }
    }
}

impl Config {
    /// Create a new config with the given public key
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            ..Default::default()
        }
    }

    /// Point the client at a different API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound the whole transfer step
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = Some(timeout);
        self
    }

    /// Send an explicit `Origin` header
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Set the transfer chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Build the base URL for API requests
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Full URL of an API route
    pub fn api_url(&self, route: &str) -> String {
        format!("{}{}", self.base_url(), route)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        Url::parse(&self.endpoint)
            .map_err(|e| ClientError::Config(format!("invalid endpoint {}: {}", self.endpoint, e)))?;
        if self.chunk_size == 0 {
            return Err(ClientError::Config("chunk size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let config = Config::new("pk_test").with_endpoint("http://localhost:8080/");
        assert_eq!(
            config.api_url("/v1/uploads/prepare"),
            "http://localhost:8080/v1/uploads/prepare"
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.public_key.is_empty());
        assert!(config.user_agent.starts_with("stowage-client/"));
        assert!(config.transfer_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = Config::new("pk_test").with_endpoint("not a url");
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
    }
}
