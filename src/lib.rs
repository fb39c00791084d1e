//! # ocr2md
//!
//! Send a document or image to the Mistral OCR service and get back plain
//! text, a self-contained Markdown document, and the extracted images.
//!
//! ## Why this crate?
//!
//! The OCR service answers with per-page Markdown that points at images by
//! opaque id (`![img-0.jpeg](img-0.jpeg)`) and ships the pixels separately as
//! base64. That Markdown does not render on its own. This crate does the
//! plumbing on both sides of the call: it turns a URL or local file into a
//! reference the service accepts, and it rebuilds the response into Markdown
//! with every image inlined as a PNG data URL.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL or file
//!  │
//!  ├─ 1. Classify  image or document, by URL suffix / file extension
//!  ├─ 2. Reference URL as-is │ PDF → upload + signed URL │ image → PNG data URL
//!  ├─ 3. OCR       one call to mistral-ocr-latest, images requested inline
//!  └─ 4. Assemble  plain text + rendered Markdown + decoded images
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr2md::{extract, DocumentRequest, HistoryStore, OcrConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key from the MISTRAL environment variable
//!     let config = OcrConfig::from_env();
//!     let history = HistoryStore::new(HistoryStore::default_path(), config.history_capacity);
//!
//!     let request = DocumentRequest::url("https://example.com/receipt.png");
//!     let result = extract(request, &config, Some(&history)).await?;
//!     println!("{}", result.rendered_markdown);
//!     eprintln!("{} images, {} warnings", result.images.len(), result.warnings.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr2md` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod history;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod service;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::MistralClient;
pub use config::{OcrConfig, OcrConfigBuilder, API_KEY_ENV};
pub use convert::{extract, extract_with, process};
pub use error::{ApiError, ImageIssue, OcrError};
pub use history::HistoryStore;
pub use output::{AssemblyResult, ExtractedImage, PipelineOutput};
pub use pipeline::input::{is_url, DocumentRequest, InputMode, LocalFile};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback, Stage};
pub use service::{DocumentSource, OcrImage, OcrPage, OcrService};
