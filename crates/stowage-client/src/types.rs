//! Common types for the client SDK

use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use stowage_signer::SignaturePayload;

/// Per-upload options
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// Display name, overriding the file's own name
    pub name: Option<String>,
    /// Destination path within the application's storage
    pub path: Option<String>,
    /// Progress callback invoked during the transfer step
    pub on_progress: Option<ProgressCallback>,
    /// URL of a server route returning a fresh [`SignaturePayload`]
    pub signature_endpoint: Option<String>,
}

impl UploadOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the destination path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(UploadProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Fetch a signature from `url` before preparing the upload
    pub fn with_signature_endpoint(mut self, url: impl Into<String>) -> Self {
        self.signature_endpoint = Some(url.into());
        self
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("on_progress", &self.on_progress.is_some())
            .field("signature_endpoint", &self.signature_endpoint)
            .finish()
    }
}

/// Transfer progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    /// Percentage complete, rounded to the nearest integer (0-100)
    pub percent: u32,
    /// Bytes handed to the transport so far
    pub loaded: u64,
    /// Total bytes to transfer (at least 1)
    pub total: u64,
}

impl UploadProgress {
    /// Build a progress value, defaulting an unknown (zero) total to 1
    pub fn new(loaded: u64, total: u64) -> Self {
        let total = total.max(1);
        let percent = ((loaded as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u32;
        Self {
            percent,
            loaded,
            total,
        }
    }
}

/// Stored object description, returned by the confirm step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Object ID
    pub id: String,
    /// Public URL of the object
    pub url: String,
    /// Storage key
    pub key: String,
    /// Display name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type
    pub content_type: String,
}

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
pub(crate) struct PrepareRequest<'a> {
    pub file: FileDescriptor<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FileDescriptor<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub content_type: &'a str,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrepareResponse {
    pub url: Option<String>,
    pub fields: Option<BTreeMap<String, String>>,
    pub confirm_token: Option<String>,
}

/// A validated presigned destination
#[derive(Clone, Debug)]
pub(crate) struct PresignedTarget {
    pub url: String,
    pub fields: BTreeMap<String, String>,
    pub confirm_token: String,
}

impl PrepareResponse {
    pub fn into_target(self) -> Option<PresignedTarget> {
        let url = self.url.filter(|u| !u.is_empty())?;
        let fields = self.fields?;
        let confirm_token = self.confirm_token.filter(|t| !t.is_empty())?;
        Some(PresignedTarget {
            url,
            fields,
            confirm_token,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmRequest<'a> {
    pub confirm_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignatureResponse {
    pub signature: Option<String>,
    pub payload: Option<String>,
}

impl SignatureResponse {
    pub fn into_payload(self) -> Option<SignaturePayload> {
        let signature = self.signature.filter(|s| !s.is_empty())?;
        let payload = self.payload.filter(|p| !p.is_empty())?;
        Some(SignaturePayload { payload, signature })
    }
}
