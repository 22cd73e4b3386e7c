//! Uploader implementation

use crate::{
    progress::{progress_stream, ProgressCallback},
    types::*,
    ClientError, Config, Result, UploadFile,
};
use bytes::Bytes;
use reqwest::{header, multipart, Body, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use stowage_signer::{validate_public_key, SignaturePayload};
use tracing::{debug, info, instrument, warn};

/// Prepare route of the Stowage API
pub const PREPARE_ROUTE: &str = "/v1/uploads/prepare";

/// Confirm route of the Stowage API
pub const CONFIRM_ROUTE: &str = "/v1/uploads/confirm";

/// Header carrying the public key on API requests
pub const PUBLIC_KEY_HEADER: &str = "x-public-key";

/// Multipart field holding the file content
pub const FILE_FIELD: &str = "file";

/// Stowage uploader
///
/// Holds no per-upload state; one instance can serve concurrent uploads.
pub struct Uploader {
    config: Config,
    http: Client,
}

impl Uploader {
    /// Create a new uploader with the given configuration.
    ///
    /// The public key itself is checked on each [`upload`](Self::upload) call.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            config
                .user_agent
                .parse()
                .map_err(|_| ClientError::Config(format!("invalid user agent: {}", config.user_agent)))?,
        );

        // No client-wide timeout: it would also cap the transfer.
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { config, http })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Upload `file` through the prepare → transfer → confirm protocol
    #[instrument(skip(self, file, options), fields(file = %file.name, size = file.size()))]
    pub async fn upload(&self, file: UploadFile, options: UploadOptions) -> Result<UploadResult> {
        validate_public_key(&self.config.public_key)?;
        file.validate()?;

        let name = options
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(file.name.as_str())
            .to_string();

        let signature = match &options.signature_endpoint {
            Some(endpoint) => Some(self.fetch_signature(endpoint).await?),
            None => None,
        };

        let target = self
            .prepare(&file, &name, options.path.as_deref(), signature.as_ref())
            .await?;

        self.transfer(&target, &name, &file, options.on_progress.clone())
            .await?;

        let result = self.confirm(&target.confirm_token).await?;
        info!("Upload confirmed: {} ({} bytes)", result.key, result.size);
        Ok(result)
    }

    // ==================== Protocol Steps ====================

    #[instrument(skip(self))]
    async fn fetch_signature(&self, endpoint: &str) -> Result<SignaturePayload> {
        debug!("Requesting upload signature");

        let response = self
            .http
            .get(endpoint)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!("Signature endpoint unreachable: {}", e);
                ClientError::SignatureFetch {
                    status: None,
                    source: Some(e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Signature endpoint returned HTTP {}", status);
            return Err(ClientError::SignatureFetch {
                status: Some(status.as_u16()),
                source: None,
            });
        }

        let body = response.bytes().await.map_err(|e| ClientError::SignatureFetch {
            status: Some(status.as_u16()),
            source: Some(e),
        })?;

        serde_json::from_slice::<SignatureResponse>(&body)
            .ok()
            .and_then(SignatureResponse::into_payload)
            .ok_or(ClientError::InvalidSignature)
    }

    async fn prepare(
        &self,
        file: &UploadFile,
        name: &str,
        path: Option<&str>,
        signature: Option<&SignaturePayload>,
    ) -> Result<PresignedTarget> {
        let request = PrepareRequest {
            file: FileDescriptor {
                name,
                content_type: &file.content_type,
                size: file.size(),
                path,
            },
            signature: signature.map(|s| s.signature.as_str()),
            payload: signature.map(|s| s.payload.as_str()),
        };

        debug!("Preparing upload");
        let response = self.api_request(PREPARE_ROUTE).json(&request).send().await?;
        let prepared: PrepareResponse = read_api_response(response, "prepare upload").await?;

        prepared
            .into_target()
            .ok_or_else(|| ClientError::InvalidResponse("prepare upload".into()))
    }

    async fn transfer(
        &self,
        target: &PresignedTarget,
        name: &str,
        file: &UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> Result<()> {
        let mut form = multipart::Form::new();
        for (key, value) in &target.fields {
            form = form.text(key.clone(), value.clone());
        }

        let body = Body::wrap_stream(progress_stream(
            file.data.clone(),
            self.config.chunk_size,
            on_progress,
        ));
        let part = multipart::Part::stream_with_length(body, file.size())
            .file_name(name.to_string())
            .mime_str(&file.content_type)?;
        form = form.part(FILE_FIELD, part);

        debug!("Transferring {} bytes to presigned destination", file.size());
        let mut request = self.http.post(&target.url).multipart(form);
        if let Some(timeout) = self.config.transfer_timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                warn!("Transfer failed: {}", e);
                ClientError::UploadFailed {
                    status: None,
                    source: Some(e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Presigned destination returned HTTP {}", status);
            return Err(ClientError::UploadFailed {
                status: Some(status.as_u16()),
                source: None,
            });
        }

        Ok(())
    }

    async fn confirm(&self, confirm_token: &str) -> Result<UploadResult> {
        debug!("Confirming upload");
        let response = self
            .api_request(CONFIRM_ROUTE)
            .json(&ConfirmRequest { confirm_token })
            .send()
            .await?;

        read_api_response(response, "confirm upload").await
    }

    // ==================== Helper Methods ====================

    fn api_request(&self, route: &str) -> RequestBuilder {
        let mut req = self
            .http
            .post(self.config.api_url(route))
            .timeout(self.config.timeout)
            .header(PUBLIC_KEY_HEADER, &self.config.public_key);

        if let Some(origin) = &self.config.origin {
            req = req.header(header::ORIGIN, origin);
        }

        req
    }
}

/// Create an uploader against the hosted API
pub fn create_uploader(public_key: impl Into<String>) -> Result<Uploader> {
    Uploader::new(Config::new(public_key))
}

async fn read_api_response<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
    let status = response.status();
    let body: Bytes = response.bytes().await?;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&body);
        return Err(ClientError::from_api_response(&text, status.as_u16(), action));
    }

    serde_json::from_slice(&body).map_err(|e| {
        debug!("Malformed {} response: {}", action, e);
        ClientError::InvalidResponse(action.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_user_agent() {
        let mut config = Config::new("pk_test");
        config.user_agent = "bad\nagent".to_string();
        assert!(matches!(Uploader::new(config), Err(ClientError::Config(_))));
    }

    #[tokio::test]
    async fn test_validation_before_network() {
        // Unroutable endpoint: any request would fail with an HTTP error instead.
        let uploader = Uploader::new(Config::new("").with_endpoint("http://127.0.0.1:9")).unwrap();
        let file = UploadFile::new("test.txt", "text/plain", "test");

        let err = uploader.upload(file, UploadOptions::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Public key is required");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_invalid_file_before_network() {
        let uploader = Uploader::new(Config::new("pk_test").with_endpoint("http://127.0.0.1:9")).unwrap();
        let file = UploadFile::new("test.txt", "text/plain", Bytes::new());

        let err = uploader.upload(file, UploadOptions::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "File passed in is invalid");
    }
}
