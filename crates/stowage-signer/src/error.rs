//! Error types for the stowage-signer crate

use thiserror::Error;

/// Result type alias using `SignerError`
pub type Result<T> = std::result::Result<T, SignerError>;

/// Errors that can occur while validating keys or signing payloads
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignerError {
    /// No public key was supplied
    #[error("Public key is required")]
    MissingPublicKey,

    /// A secret key was passed where the public key belongs
    #[error("Public key is invalid. Make sure you are not using a secret key")]
    PublicKeyIsSecret,

    /// No secret key was supplied
    #[error("Secret key is required")]
    MissingSecretKey,

    /// A public key was passed where the secret key belongs
    #[error("Secret key is invalid. Make sure you are not using a public key")]
    SecretKeyIsPublic,

    /// Signing was attempted from an untrusted browser context
    #[error("Secret key should not be used in the browser. Only use it in a trusted server environment")]
    BrowserContext,

    /// Payload does not have the `nonce:timestamp` shape
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Signature does not match the payload
    #[error("signature verification failed")]
    SignatureMismatch,

    /// Payload timestamp is older than the accepted window
    #[error("signature expired: issued {age_ms} ms ago, max {max_age_ms} ms")]
    Expired { age_ms: i64, max_age_ms: i64 },

    /// Payload timestamp lies further in the future than clock skew allows
    #[error("signature issued in the future: {ahead_ms} ms ahead")]
    IssuedInFuture { ahead_ms: i64 },

    /// Random identifier policy cannot produce identifiers
    #[error("invalid id policy: {0}")]
    InvalidPolicy(String),

    /// Hex decode error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
