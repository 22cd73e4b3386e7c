//! # Stowage
//!
//! Presigned-URL uploads with optional HMAC request signing.
//!
//! - [`client`]: the uploader (prepare → transfer → confirm)
//! - [`signer`]: signature generation and verification for your server

pub use stowage_client as client;
pub use stowage_signer as signer;

pub use stowage_client::{create_uploader, Config, UploadFile, UploadOptions, UploadResult, Uploader};
pub use stowage_signer::{generate_signature, ExecutionContext, SignaturePayload};
