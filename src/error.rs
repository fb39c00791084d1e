//! Error types for the ocr2md library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`OcrError`] — **Fatal**: the request cannot produce a result at all
//!   (no credential, bad input, upload or OCR call failed). Returned as
//!   `Err(OcrError)` from [`crate::convert::extract`] and converted into the
//!   display triple by [`crate::convert::process`].
//!
//! * [`ImageIssue`] — **Non-fatal**: a single extracted image had no payload
//!   or could not be decoded. The markdown gets a warning line and every other
//!   image and page is kept. Stored in
//!   [`crate::output::AssemblyResult::warnings`].
//!
//! * [`ApiError`] — **Transport**: what the HTTP client reports. Each pipeline
//!   stage maps it onto the matching [`OcrError`] variant so callers only see
//!   stage-level failures.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the ocr2md pipeline.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key was configured.
    #[error("Missing API key: set the {env_var} environment variable or pass --api-key.")]
    MissingCredential { env_var: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Empty URL, missing file, or an unrecognised input mode.
    #[error("{0}")]
    InvalidInput(String),

    /// The uploaded file has an extension the service does not accept.
    #[error("Unsupported file type '{extension}'. Supported types: {supported}")]
    UnsupportedFileType {
        extension: String,
        supported: String,
    },

    /// Local file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Local file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A local image file could not be decoded for inlining.
    #[error("Could not decode image '{name}': {detail}")]
    InvalidImage { name: String, detail: String },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// Uploading the document or signing its URL failed.
    #[error("Error uploading document: {reason}")]
    UploadFailed { reason: String },

    /// The OCR call failed (network, auth, or malformed response).
    #[error("Error processing OCR: {reason}")]
    OcrProcessingFailed { reason: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal problem with a single image in the OCR response.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ImageIssue {
    /// The OCR response listed the image without a base64 payload.
    #[error("No base64 data for {id}")]
    MissingPayload { id: String },

    /// The payload was present but not valid base64 or not a decodable image.
    #[error("Could not decode image data for {id}")]
    DecodeFailed { id: String, detail: String },
}

impl ImageIssue {
    /// Id of the image the issue refers to.
    pub fn id(&self) -> &str {
        match self {
            ImageIssue::MissingPayload { id } | ImageIssue::DecodeFailed { id, .. } => id,
        }
    }

    /// The warning line appended to the rendered markdown.
    pub fn warning_line(&self) -> String {
        format!("[Image Warning: {}]", self)
    }
}

/// Errors raised by the HTTP client before a stage gives them meaning.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout, or body-read failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built from the configured base URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(String),
}
