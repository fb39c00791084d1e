//! Configuration for the OCR pipeline.
//!
//! All pipeline behaviour is controlled through [`OcrConfig`], built via its
//! [`OcrConfigBuilder`]. The credential is an ordinary field rather than an
//! environment lookup buried in the pipeline, so every stage can be exercised
//! in tests without touching the process environment. [`OcrConfig::from_env`]
//! is the one place that reads it.

use crate::error::OcrError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Environment variable holding the Mistral API key.
pub const API_KEY_ENV: &str = "MISTRAL";

/// Default REST base URL of the Mistral API.
pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Default OCR model identifier.
pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

/// Default number of URLs kept in the history file.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Configuration for a single OCR request.
///
/// # Example
/// ```rust
/// use ocr2md::OcrConfig;
///
/// let config = OcrConfig::builder()
///     .api_key("sk-test")
///     .model("mistral-ocr-latest")
///     .build()
///     .unwrap();
/// assert!(config.api_key.is_some());
/// ```
#[derive(Clone)]
pub struct OcrConfig {
    /// API key passed as a bearer token. `None` makes
    /// [`crate::convert::extract`] fail with
    /// [`OcrError::MissingCredential`] before any network call.
    pub api_key: Option<String>,

    /// REST base URL. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// OCR model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Ask the service to return extracted images as base64. Default: true.
    ///
    /// Without payloads every image becomes a warning line in the rendered
    /// markdown.
    pub include_image_base64: bool,

    /// Lifetime of the signed URL requested for uploaded PDFs, in hours. Default: 24.
    pub signed_url_expiry_hours: u32,

    /// Per-request HTTP timeout in seconds. Default: 120.
    ///
    /// Large PDFs can take a minute or more to OCR; this bounds each call
    /// (upload, sign, OCR) separately.
    pub request_timeout_secs: u64,

    /// Maximum number of URLs kept by [`crate::history::HistoryStore`]. Default: 10.
    pub history_capacity: usize,

    /// Optional stage-progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            include_image_base64: true,
            signed_url_expiry_hours: 24,
            request_timeout_secs: 120,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("include_image_base64", &self.include_image_base64)
            .field("signed_url_expiry_hours", &self.signed_url_expiry_hours)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("history_capacity", &self.history_capacity)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl OcrConfig {
    /// Create a new builder for `OcrConfig`.
    pub fn builder() -> OcrConfigBuilder {
        OcrConfigBuilder {
            config: Self::default(),
        }
    }

    /// Default configuration with the API key taken from [`API_KEY_ENV`].
    ///
    /// An unset or blank variable leaves `api_key` as `None`.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// The configured credential, or [`OcrError::MissingCredential`].
    pub fn credential(&self) -> Result<&str, OcrError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(OcrError::MissingCredential {
                env_var: API_KEY_ENV,
            }),
        }
    }
}

/// Builder for [`OcrConfig`].
pub struct OcrConfigBuilder {
    config: OcrConfig,
}

impl OcrConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn include_image_base64(mut self, v: bool) -> Self {
        self.config.include_image_base64 = v;
        self
    }

    pub fn signed_url_expiry_hours(mut self, hours: u32) -> Self {
        self.config.signed_url_expiry_hours = hours.max(1);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn history_capacity(mut self, n: usize) -> Self {
        self.config.history_capacity = n;
        self
    }

    /// Attach a progress callback that receives stage checkpoints.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A missing API key is not a build error; it is reported when the
    /// pipeline runs so the presentation layer gets the usual error triple.
    pub fn build(self) -> Result<OcrConfig, OcrError> {
        let c = &self.config;
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(OcrError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        if c.model.trim().is_empty() {
            return Err(OcrError::InvalidConfig("model must not be empty".into()));
        }
        if c.request_timeout_secs == 0 {
            return Err(OcrError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        if c.history_capacity == 0 {
            return Err(OcrError::InvalidConfig(
                "history capacity must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = OcrConfig::default();
        assert_eq!(c.model, "mistral-ocr-latest");
        assert_eq!(c.base_url, "https://api.mistral.ai/v1");
        assert!(c.include_image_base64);
        assert_eq!(c.history_capacity, 10);
        assert!(c.api_key.is_none());
    }

    #[test]
    fn credential_missing_and_blank() {
        assert!(matches!(
            OcrConfig::default().credential(),
            Err(OcrError::MissingCredential { env_var: "MISTRAL" })
        ));
        let blank = OcrConfig::builder().api_key("   ").build().unwrap();
        assert!(blank.credential().is_err());
    }

    #[test]
    fn credential_present() {
        let c = OcrConfig::builder().api_key("sk-abc").build().unwrap();
        assert_eq!(c.credential().unwrap(), "sk-abc");
    }

    #[test]
    fn debug_redacts_key() {
        let c = OcrConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn build_rejects_bad_base_url() {
        let err = OcrConfig::builder().base_url("ftp://x").build().unwrap_err();
        assert!(matches!(err, OcrError::InvalidConfig(_)));
    }

    #[test]
    fn build_rejects_zero_history_capacity() {
        assert!(OcrConfig::builder().history_capacity(0).build().is_err());
    }
}
