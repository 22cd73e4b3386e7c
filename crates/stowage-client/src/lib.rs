//! # Stowage Client SDK
//!
//! Uploads files to Stowage through presigned URLs.
//!
//! ## Protocol
//!
//! Every upload runs these steps strictly in order, and any failure ends the
//! upload (there are no retries):
//!
//! 1. **Signature** (optional): fetch `{payload, signature}` from your own server
//! 2. **Prepare**: exchange file metadata for a presigned destination and a confirm token
//! 3. **Transfer**: send the file as a multipart form to the destination, reporting progress
//! 4. **Confirm**: exchange the confirm token for the stored object's metadata
//!
//! ## Example
//!
//! ```rust,ignore
//! use stowage_client::{create_uploader, UploadFile, UploadOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let uploader = create_uploader("pk_live_...")?;
//!
//!     let file = UploadFile::from_path("report.pdf").await?;
//!     let options = UploadOptions::new()
//!         .with_path("reports/2024")
//!         .with_signature_endpoint("https://example.com/api/signature")
//!         .with_progress(|p| println!("{}%", p.percent));
//!
//!     let result = uploader.upload(file, options).await?;
//!     println!("Stored at {}", result.url);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod file;
mod progress;
mod types;

pub use client::{create_uploader, Uploader, CONFIRM_ROUTE, FILE_FIELD, PREPARE_ROUTE, PUBLIC_KEY_HEADER};
pub use config::{Config, DEFAULT_ENDPOINT};
pub use error::{ClientError, Result};
pub use file::{UploadFile, DEFAULT_CONTENT_TYPE};
pub use progress::{progress_stream, ProgressCallback, ProgressTracker};
pub use types::{UploadOptions, UploadProgress, UploadResult};

// Re-export signer types used in the public API
pub use stowage_signer::{IdPolicy, SignaturePayload};
