//! # Stowage CLI
//!
//! Companion tooling for the Stowage upload SDK.
//!
//! This crate provides:
//! - **Signature endpoint**: a small HTTP server that signs upload payloads with
//!   your secret key, for uploaders configured with a signature endpoint
//! - **Commands**: one-shot signing and file uploads from the command line
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  GET /api/signature   ┌─────────────────────┐
//! │   Uploader   │ ────────────────────▶ │  Signature server   │
//! │ (public key) │ ◀──────────────────── │   (secret key)      │
//! └──────┬───────┘  {payload,signature}  └─────────────────────┘
//!        │
//!        │ prepare → transfer → confirm
//!        ▼
//! ┌──────────────┐
//! │ Stowage API  │
//! └──────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::SignatureServerConfig;
pub use error::{ApiError, ErrorCode};
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
