//! # Stowage Signer
//!
//! Request signing for the Stowage presigned upload workflow.
//!
//! This crate provides:
//! - **Signature generation**: nonce-salted, timestamped HMAC-SHA256 over a payload string
//! - **Signature verification**: constant-time check with optional max-age enforcement
//! - **Key roles**: validation of public (`pk_`) and secret (`sk_`) keys
//! - **Random identifiers**: configurable length/alphabet policy for nonces and names
//!
//! ## Security Model
//!
//! Secret keys authorize uploads and must stay inside a trusted server. The
//! caller states where the signer runs through [`ExecutionContext`]; signing is
//! refused in a browser context before any HMAC is computed.
//!
//! ## Example
//!
//! ```rust
//! use stowage_signer::{generate_signature, ExecutionContext};
//!
//! let signed = generate_signature("sk_live_123", ExecutionContext::Server).unwrap();
//! assert_eq!(signed.signature.len(), 64);
//! ```

pub mod context;
pub mod error;
pub mod id;
pub mod keys;
pub mod signature;

pub use context::ExecutionContext;
pub use error::{Result, SignerError};
pub use id::IdPolicy;
pub use keys::{validate_public_key, validate_secret_key, SecretKey, PUBLIC_KEY_PREFIX, SECRET_KEY_PREFIX};
pub use signature::{
    generate_signature, verify_signature, SignaturePayload, Signer, MAX_CLOCK_SKEW,
};

/// Separator between the nonce and the timestamp in a signed payload
pub const PAYLOAD_SEPARATOR: char = ':';
