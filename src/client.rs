//! HTTP implementation of [`OcrService`] against the Mistral REST API.
//!
//! Three endpoints are used, all with bearer authentication:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | upload    | `POST {base}/files` (multipart: `purpose`, `file`) |
//! | sign      | `GET {base}/files/{id}/url?expiry={hours}` |
//! | OCR       | `POST {base}/ocr` (JSON: `model`, `document`, `include_image_base64`) |
//!
//! No retries: a failed call is reported once and the pipeline stops.

use crate::config::OcrConfig;
use crate::error::{ApiError, OcrError};
use crate::service::{DocumentSource, FileHandle, OcrRequest, OcrResponse, OcrService, SignedUrl};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Mistral API client.
#[derive(Clone)]
pub struct MistralClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for MistralClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MistralClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl MistralClient {
    /// Build a client from the configuration.
    ///
    /// Fails with [`OcrError::MissingCredential`] when no API key is set.
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let api_key = config.credential()?.to_string();

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("ocr2md/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OcrError::Internal(format!("Failed to build HTTP client: {e}")))?;

        debug!(base_url = %config.base_url, "Mistral client initialised");

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::Url(format!("{raw}: {e}")))
    }
}

#[async_trait]
impl OcrService for MistralClient {
    async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        purpose: &str,
    ) -> Result<FileHandle, ApiError> {
        let url = self.endpoint("files")?;
        debug!(%url, filename, size = bytes.len(), purpose, "Uploading file");

        let form = Form::new()
            .text("purpose", purpose.to_string())
            .part("file", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        read_json(response).await
    }

    async fn signed_url(&self, file: &FileHandle, expiry_hours: u32) -> Result<SignedUrl, ApiError> {
        let url = self.endpoint(&format!("files/{}/url", file.id))?;
        debug!(%url, file_id = %file.id, expiry_hours, "Requesting signed URL");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .query(&[("expiry", expiry_hours)])
            .send()
            .await?;

        read_json(response).await
    }

    async fn process(
        &self,
        model: &str,
        document: &DocumentSource,
        include_image_base64: bool,
    ) -> Result<OcrResponse, ApiError> {
        let url = self.endpoint("ocr")?;
        debug!(%url, model, image = document.is_image(), "Sending OCR request");

        let body = OcrRequest {
            model,
            document,
            include_image_base64,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        read_json(response).await
    }
}

/// Check the status, then decode the body as JSON.
///
/// The body is read as bytes first so a shape mismatch surfaces as
/// [`ApiError::Decode`] with serde's message rather than a generic
/// transport error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> OcrConfig {
        OcrConfig::builder()
            .api_key("sk-test")
            .base_url(base)
            .build()
            .unwrap()
    }

    #[test]
    fn new_requires_credential() {
        let err = MistralClient::new(&OcrConfig::default()).unwrap_err();
        assert!(matches!(err, OcrError::MissingCredential { .. }));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = MistralClient::new(&config("https://api.mistral.ai/v1/")).unwrap();
        assert_eq!(
            client.endpoint("ocr").unwrap().as_str(),
            "https://api.mistral.ai/v1/ocr"
        );
        assert_eq!(
            client.endpoint("files/abc/url").unwrap().as_str(),
            "https://api.mistral.ai/v1/files/abc/url"
        );
    }

    #[test]
    fn debug_hides_key() {
        let client = MistralClient::new(&config("https://api.mistral.ai/v1")).unwrap();
        assert!(!format!("{client:?}").contains("sk-test"));
    }
}
