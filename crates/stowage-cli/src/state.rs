//! Application state

use crate::{ApiError, SignatureServerConfig};
use stowage_signer::{ExecutionContext, Signer};

/// Shared state for the signature server
pub struct AppState {
    /// Server configuration
    pub config: SignatureServerConfig,
    /// Signer bound to the configured secret key
    pub signer: Signer,
}

impl AppState {
    /// Validate the configuration and secret key, then build the state.
    ///
    /// The server always runs in a trusted context.
    pub fn new(config: SignatureServerConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let signer = Signer::new(config.secret_key.clone(), ExecutionContext::Server)?;
        Ok(Self { config, signer })
    }
}
