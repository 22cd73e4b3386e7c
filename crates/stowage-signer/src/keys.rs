//! Key roles
//!
//! Stowage issues two kinds of credentials:
//! - Public keys (`pk_...`): identify the calling application, safe to ship to clients
//! - Secret keys (`sk_...`): authorize signing, never leave the server
//!
//! The only cross-check performed is that neither key carries the other's prefix.

use crate::{Result, SignerError};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Prefix carried by every public key
pub const PUBLIC_KEY_PREFIX: &str = "pk_";

/// Prefix carried by every secret key
pub const SECRET_KEY_PREFIX: &str = "sk_";

/// Check that `key` is usable as a public key
pub fn validate_public_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(SignerError::MissingPublicKey);
    }
    if key.starts_with(SECRET_KEY_PREFIX) {
        return Err(SignerError::PublicKeyIsSecret);
    }
    Ok(())
}

/// Check that `key` is usable as a secret key
pub fn validate_secret_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(SignerError::MissingSecretKey);
    }
    if key.starts_with(PUBLIC_KEY_PREFIX) {
        return Err(SignerError::SecretKeyIsPublic);
    }
    Ok(())
}

/// A validated secret key, wiped from memory on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    key: String,
}

impl SecretKey {
    /// Validate and wrap a secret key
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_secret_key(&key)?;
        Ok(Self { key })
    }

    /// Get the key bytes for MAC computation
    pub fn as_bytes(&self) -> &[u8] {
        self.key.as_bytes()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}
