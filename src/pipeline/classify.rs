//! Source classification: decide how a request reaches the OCR service.
//!
//! URLs are passed straight through, tagged as image or document by their
//! suffix. Local files take one of two routes: PDFs must be uploaded to get
//! a URL the service can fetch, images are small enough to inline as a data
//! URL. Nothing here touches the network.

use crate::error::OcrError;
use crate::pipeline::input::{DocumentRequest, InputMode, LocalFile};
use crate::service::DocumentSource;
use tracing::debug;

/// Extensions classified as images (URL suffix or local file).
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Local file extensions that go through the upload path.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf"];

/// Where a classified request goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// A URL the OCR service can fetch directly.
    Remote(DocumentSource),
    /// A local PDF that must be uploaded and signed first.
    Upload(LocalFile),
    /// A local image to inline as a PNG data URL.
    Inline(LocalFile),
}

/// Classify a request, consuming it.
pub fn classify(request: DocumentRequest) -> Result<Classified, OcrError> {
    match request.mode {
        InputMode::Url => {
            let url = request.url.unwrap_or_default();
            classify_url(&url).map(Classified::Remote)
        }
        InputMode::FileUpload => {
            let file = request
                .file
                .ok_or_else(|| OcrError::InvalidInput("Please upload a file.".into()))?;
            classify_file(file)
        }
    }
}

/// Classify a URL by its suffix.
///
/// The URL is trimmed; an empty result is [`OcrError::InvalidInput`]. A
/// case-insensitive match against [`IMAGE_EXTENSIONS`] yields an image
/// source, everything else (query strings, no extension) a document source.
pub fn classify_url(url: &str) -> Result<DocumentSource, OcrError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(OcrError::InvalidInput("Please provide a valid URL.".into()));
    }

    let lower = url.to_lowercase();
    let source = if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        DocumentSource::image(url)
    } else {
        DocumentSource::document(url)
    };
    debug!(url, image = source.is_image(), "Classified URL");
    Ok(source)
}

/// Route a local file by its extension.
pub fn classify_file(file: LocalFile) -> Result<Classified, OcrError> {
    let ext = file.extension().unwrap_or_default();

    if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        debug!(name = %file.name, "Local document, upload required");
        Ok(Classified::Upload(file))
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        debug!(name = %file.name, "Local image, inlining");
        Ok(Classified::Inline(file))
    } else {
        Err(OcrError::UnsupportedFileType {
            extension: if ext.is_empty() {
                file.name.clone()
            } else {
                ext
            },
            supported: supported_extensions(),
        })
    }
}

/// Every accepted file extension, comma separated.
pub fn supported_extensions() -> String {
    DOCUMENT_EXTENSIONS
        .iter()
        .chain(IMAGE_EXTENSIONS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_suffixes_any_case() {
        for url in [
            "https://x.org/a.png",
            "https://x.org/a.PNG",
            "https://x.org/b.jpg",
            "https://x.org/c.JpEg",
            "  https://x.org/d.jpeg  ",
        ] {
            assert!(classify_url(url).unwrap().is_image(), "{url}");
        }
    }

    #[test]
    fn everything_else_is_a_document() {
        for url in [
            "https://arxiv.org/pdf/2201.04234",
            "https://x.org/a.pdf",
            "https://x.org/a.png?download=1",
            "https://x.org/a.gif",
            "not even a url",
        ] {
            assert!(!classify_url(url).unwrap().is_image(), "{url}");
        }
    }

    #[test]
    fn url_is_trimmed() {
        let src = classify_url("  https://x.org/a.pdf\n").unwrap();
        assert_eq!(src, DocumentSource::document("https://x.org/a.pdf"));
    }

    #[test]
    fn empty_url_is_invalid() {
        for url in ["", "   ", "\n\t"] {
            assert!(matches!(
                classify_url(url),
                Err(OcrError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn url_mode_without_url_is_invalid() {
        let req = DocumentRequest {
            mode: InputMode::Url,
            url: None,
            file: None,
        };
        assert!(matches!(classify(req), Err(OcrError::InvalidInput(_))));
    }

    #[test]
    fn file_mode_without_file_is_invalid() {
        let req = DocumentRequest {
            mode: InputMode::FileUpload,
            url: Some("https://x.org/a.pdf".into()),
            file: None,
        };
        let err = classify(req).unwrap_err();
        assert_eq!(err.to_string(), "Please upload a file.");
    }

    #[test]
    fn pdf_goes_to_upload() {
        let file = LocalFile::new("Report.PDF", b"%PDF".to_vec());
        assert!(matches!(classify_file(file), Ok(Classified::Upload(_))));
    }

    #[test]
    fn images_go_to_inline() {
        for name in ["a.png", "b.JPG", "c.jpeg"] {
            let file = LocalFile::new(name, vec![1, 2, 3]);
            assert!(
                matches!(classify_file(file), Ok(Classified::Inline(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn other_extensions_are_unsupported() {
        let err = classify_file(LocalFile::new("notes.docx", vec![])).unwrap_err();
        match err {
            OcrError::UnsupportedFileType {
                extension,
                supported,
            } => {
                assert_eq!(extension, ".docx");
                assert_eq!(supported, ".pdf, .jpg, .jpeg, .png");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_extension_is_unsupported() {
        let err = classify_file(LocalFile::new("Makefile", vec![])).unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedFileType { .. }));
    }
}
