//! The remote OCR service seam and its wire data model.
//!
//! [`OcrService`] names the three remote operations the pipeline needs.
//! [`crate::client::MistralClient`] implements it over HTTP; tests implement
//! it in memory. The pipeline only ever holds a `&dyn OcrService`, so no stage
//! knows whether a network is involved.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A classified pointer to content for OCR.
///
/// Serialises to the `document` object of the OCR request body, e.g.
/// `{"type": "image_url", "image_url": "https://…/scan.png"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentSource {
    /// An image: a remote image URL or a `data:image/png;base64,…` URL.
    ImageUrl { image_url: String },
    /// Any other document: a remote URL or a signed URL to an uploaded file.
    DocumentUrl { document_url: String },
}

impl DocumentSource {
    pub fn image(url: impl Into<String>) -> Self {
        DocumentSource::ImageUrl {
            image_url: url.into(),
        }
    }

    pub fn document(url: impl Into<String>) -> Self {
        DocumentSource::DocumentUrl {
            document_url: url.into(),
        }
    }

    /// The referenced URL, whichever variant this is.
    pub fn url(&self) -> &str {
        match self {
            DocumentSource::ImageUrl { image_url } => image_url,
            DocumentSource::DocumentUrl { document_url } => document_url,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, DocumentSource::ImageUrl { .. })
    }
}

/// One page of OCR output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrPage {
    /// 0-based page index as reported by the service.
    #[serde(default)]
    pub index: Option<u32>,
    /// Page text with image placeholders of the form `![id](id)`.
    pub markdown: String,
    /// Images extracted from the page, in reading order.
    #[serde(default)]
    pub images: Vec<OcrImage>,
}

/// One image extracted from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrImage {
    /// Placeholder token used verbatim in the page markdown.
    pub id: String,
    /// Base64 payload, possibly prefixed with a data-URL header.
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Response body of the OCR endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrResponse {
    pub pages: Vec<OcrPage>,
}

/// Request body of the OCR endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OcrRequest<'a> {
    pub model: &'a str,
    pub document: &'a DocumentSource,
    pub include_image_base64: bool,
}

/// Handle returned by the file store after an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct FileHandle {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// A time-limited URL for a stored file.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUrl {
    pub url: String,
}

/// Purpose tag attached to uploads destined for OCR.
pub const OCR_PURPOSE: &str = "ocr";

/// The remote operations the pipeline depends on.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Store `bytes` under `filename` with the given purpose tag.
    async fn upload_file(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        purpose: &str,
    ) -> Result<FileHandle, ApiError>;

    /// Exchange a stored file's handle for a signed URL.
    async fn signed_url(&self, file: &FileHandle, expiry_hours: u32) -> Result<SignedUrl, ApiError>;

    /// Run OCR over the referenced document.
    async fn process(
        &self,
        model: &str,
        document: &DocumentSource,
        include_image_base64: bool,
    ) -> Result<OcrResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_source_serialises_tagged() {
        let img = serde_json::to_value(DocumentSource::image("https://x/a.png")).unwrap();
        assert_eq!(img, json!({"type": "image_url", "image_url": "https://x/a.png"}));

        let doc = serde_json::to_value(DocumentSource::document("https://x/a.pdf")).unwrap();
        assert_eq!(
            doc,
            json!({"type": "document_url", "document_url": "https://x/a.pdf"})
        );
    }

    #[test]
    fn request_body_shape() {
        let src = DocumentSource::document("https://x/a.pdf");
        let body = serde_json::to_value(OcrRequest {
            model: "mistral-ocr-latest",
            document: &src,
            include_image_base64: true,
        })
        .unwrap();
        assert_eq!(body["model"], "mistral-ocr-latest");
        assert_eq!(body["include_image_base64"], true);
        assert_eq!(body["document"]["type"], "document_url");
    }

    #[test]
    fn response_tolerates_missing_and_extra_fields() {
        let raw = r##"{
            "model": "mistral-ocr-2505",
            "usage_info": {"pages_processed": 2},
            "pages": [
                {"index": 0, "markdown": "# Title\n\n![img-0.jpeg](img-0.jpeg)",
                 "images": [{"id": "img-0.jpeg", "top_left_x": 10, "image_base64": "data:image/jpeg;base64,AAAA"}],
                 "dimensions": {"dpi": 200, "height": 2200, "width": 1700}},
                {"index": 1, "markdown": "no images here"}
            ]
        }"##;
        let resp: OcrResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.pages.len(), 2);
        assert_eq!(resp.pages[0].images[0].id, "img-0.jpeg");
        assert!(resp.pages[0].images[0].image_base64.is_some());
        assert!(resp.pages[1].images.is_empty());
        assert_eq!(resp.pages[1].index, Some(1));
    }

    #[test]
    fn null_payload_is_none() {
        let img: OcrImage = serde_json::from_str(r#"{"id": "a", "image_base64": null}"#).unwrap();
        assert_eq!(img.image_base64, None);
    }

    #[test]
    fn url_accessor() {
        assert_eq!(DocumentSource::image("u").url(), "u");
        assert!(DocumentSource::image("u").is_image());
        assert!(!DocumentSource::document("u").is_image());
    }
}
