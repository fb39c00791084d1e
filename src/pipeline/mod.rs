//! Pipeline stages for document-to-markdown OCR.
//!
//! Each submodule implements exactly one step, so each can be tested alone
//! and the network-facing ones can be driven by an in-memory
//! [`crate::service::OcrService`].
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ classify ──▶ upload | inline | passthrough ──▶ ocr ──▶ assemble
//! (URL/file) (suffix)    (signed URL) (data URL)           (service) (markdown)
//! ```
//!
//! 1. [`input`]    — the request model: input mode, URL, local file
//! 2. [`classify`] — route by URL suffix or file extension
//! 3. [`upload`]   — local PDF → stored file → signed URL
//! 4. [`inline`]   — local image → PNG data URL, no network
//! 5. [`ocr`]      — the OCR call; the only stage every request hits remotely
//! 6. [`assemble`] — plain text, self-contained markdown, decoded images
//!
//! [`encode`] holds the PNG/base64 helpers shared by `inline` and `assemble`.

pub mod assemble;
pub mod classify;
pub mod encode;
pub mod inline;
pub mod input;
pub mod ocr;
pub mod upload;
