//! Output types returned by the pipeline.

use crate::error::{ImageIssue, OcrError};
use image::DynamicImage;

/// An image extracted from the OCR response and decoded in memory.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// Placeholder id from the OCR response, e.g. `img-0.jpeg`.
    pub id: String,
    /// 0-based position of the page the image came from.
    pub page: usize,
    pub image: DynamicImage,
}

/// The assembled result of one OCR request.
#[derive(Debug, Clone, Default)]
pub struct AssemblyResult {
    /// All page markdown joined with a blank line, placeholders untouched.
    pub plain_text: String,
    /// `plain_text` with image placeholders replaced by PNG data URLs and a
    /// warning line for each image that could not be inlined.
    pub rendered_markdown: String,
    /// Decoded images in page order, then in-page order.
    pub images: Vec<ExtractedImage>,
    /// Per-image problems, in encounter order.
    pub warnings: Vec<ImageIssue>,
}

/// What a presentation layer displays: text, markdown, gallery.
///
/// On failure the first element carries the error message and the other
/// two are empty.
pub type PipelineOutput = (String, String, Vec<ExtractedImage>);

impl AssemblyResult {
    /// Split into the display triple.
    pub fn into_output(self) -> PipelineOutput {
        (self.plain_text, self.rendered_markdown, self.images)
    }
}

/// Collapse a pipeline result into the display triple.
pub fn into_output(result: Result<AssemblyResult, OcrError>) -> PipelineOutput {
    match result {
        Ok(assembled) => assembled.into_output(),
        Err(e) => (e.to_string(), String::new(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_becomes_message_and_empties() {
        let (text, md, images) = into_output(Err(OcrError::InvalidInput(
            "Please provide a valid URL.".into(),
        )));
        assert_eq!(text, "Please provide a valid URL.");
        assert!(md.is_empty());
        assert!(images.is_empty());
    }

    #[test]
    fn success_passes_through() {
        let result = AssemblyResult {
            plain_text: "a".into(),
            rendered_markdown: "b".into(),
            ..Default::default()
        };
        let (text, md, images) = into_output(Ok(result));
        assert_eq!((text.as_str(), md.as_str()), ("a", "b"));
        assert!(images.is_empty());
    }
}
