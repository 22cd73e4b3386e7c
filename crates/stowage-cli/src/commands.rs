//! One-shot CLI commands

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use stowage_client::{Config, UploadFile, UploadOptions, UploadResult, Uploader};
use stowage_signer::{ExecutionContext, SignaturePayload, Signer};

/// Sign a single payload with `secret_key`
pub fn sign(secret_key: &str) -> anyhow::Result<SignaturePayload> {
    Ok(Signer::new(secret_key, ExecutionContext::Server)?.sign())
}

/// Arguments for a single upload
#[derive(Clone, Debug)]
pub struct UploadArgs {
    pub file: PathBuf,
    pub public_key: String,
    pub endpoint: String,
    pub name: Option<String>,
    pub path: Option<String>,
    pub content_type: Option<String>,
    pub signature_url: Option<String>,
}

/// Upload one file from disk, logging progress in 10% steps
pub async fn upload(args: UploadArgs) -> anyhow::Result<UploadResult> {
    let uploader = Uploader::new(Config::new(args.public_key).with_endpoint(args.endpoint))?;

    let mut file = UploadFile::from_path(&args.file).await?;
    if let Some(content_type) = args.content_type {
        file.content_type = content_type;
    }

    let last_step = Arc::new(AtomicU32::new(0));
    let mut options = UploadOptions::new().with_progress(move |p| {
        let step = p.percent / 10;
        if step > last_step.swap(step, Ordering::Relaxed) {
            tracing::info!("Uploaded {}% ({}/{} bytes)", p.percent, p.loaded, p.total);
        }
    });
    options.name = args.name;
    options.path = args.path;
    options.signature_endpoint = args.signature_url;

    Ok(uploader.upload(file, options).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_signer::verify_signature;

    #[test]
    fn test_sign_verifies() {
        let signed = sign("sk_test_cli").unwrap();
        assert!(verify_signature("sk_test_cli", &signed, None).is_ok());
    }

    #[test]
    fn test_sign_rejects_public_key() {
        let err = sign("pk_test_cli").unwrap_err();
        assert!(err.to_string().ends_with("using a public key"));
    }
}
