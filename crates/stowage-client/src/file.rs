//! File-like upload input

use crate::{ClientError, Result};
use bytes::Bytes;
use std::path::Path;
use stowage_signer::IdPolicy;

/// Content type used when nothing better is known
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A named, typed blob of bytes ready for upload
#[derive(Clone, Debug)]
pub struct UploadFile {
    /// File name
    pub name: String,
    /// MIME type
    pub content_type: String,
    /// Raw content
    pub data: Bytes,
}

impl UploadFile {
    /// Create from explicit parts
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, guessing its type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or(ClientError::InvalidFile)?;
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = tokio::fs::read(path).await?;

        Ok(Self::new(name, content_type, data))
    }

    /// Wrap an anonymous blob, generating a display name from `policy`.
    ///
    /// The name gets an extension matching `content_type` when one is known.
    pub fn from_blob(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        policy: &IdPolicy,
    ) -> Self {
        let content_type = content_type.into();
        let id = policy.generate();
        let name = match mime_guess::get_mime_extensions_str(&content_type)
            .and_then(|exts| exts.first())
        {
            Some(ext) => format!("{}.{}", id, ext),
            None => id,
        };

        Self::new(name, content_type, data)
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Check that the file has a name, a type and content
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.content_type.trim().is_empty() || self.data.is_empty() {
            return Err(ClientError::InvalidFile);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate() {
        assert!(UploadFile::new("test.txt", "text/plain", "test").validate().is_ok());
        assert!(UploadFile::new("", "text/plain", "test").validate().is_err());
        assert!(UploadFile::new("test.txt", "", "test").validate().is_err());
        assert!(UploadFile::new("test.txt", "text/plain", "").validate().is_err());
    }

    #[test]
    fn test_from_blob_generates_name() {
        let policy = IdPolicy::new(12, "abcdef0123456789").unwrap();
        let file = UploadFile::from_blob(vec![0u8; 8], "image/png", &policy);

        let (stem, ext) = file.name.split_once('.').unwrap();
        assert!(policy.matches(stem));
        assert_eq!(ext, "png");
        assert_eq!(file.size(), 8);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_from_blob_unknown_type() {
        let file = UploadFile::from_blob(vec![1u8], "application/x-stowage-unknown", &IdPolicy::default());
        assert!(IdPolicy::default().matches(&file.name));
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::File::create(&path).unwrap().write_all(b"test").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.size(), 4);
    }
}
