//! Input model: what the caller asked to OCR.
//!
//! A request is either a URL or a local file, selected by an [`InputMode`].
//! Presentation layers usually hand over the mode as text (a radio button
//! label, a CLI flag), so [`InputMode`] parses from a string and anything
//! unrecognised is an [`OcrError::InvalidInput`] rather than a panic.

use crate::error::OcrError;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// How the document is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A remote URL typed by the user.
    Url,
    /// A local file uploaded by the user.
    FileUpload,
}

impl FromStr for InputMode {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(InputMode::Url),
            "file" | "upload" | "upload file" | "file upload" => Ok(InputMode::FileUpload),
            _ => Err(OcrError::InvalidInput("Invalid input type.".into())),
        }
    }
}

/// A local file loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Base file name, used for extension checks and as the upload name.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its base name.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, OcrError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => OcrError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => OcrError::FileReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        debug!("Read local file {} ({} bytes)", path.display(), bytes.len());
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension including the leading dot, e.g. `".pdf"`.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
    }
}

/// One OCR request as handed over by the presentation layer.
///
/// Only the field matching `mode` is consulted; the other is ignored, the
/// way a form ignores its hidden input.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    pub mode: InputMode,
    pub url: Option<String>,
    pub file: Option<LocalFile>,
}

impl DocumentRequest {
    /// A URL-mode request.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            mode: InputMode::Url,
            url: Some(url.into()),
            file: None,
        }
    }

    /// A file-upload request.
    pub fn file(file: LocalFile) -> Self {
        Self {
            mode: InputMode::FileUpload,
            url: None,
            file: Some(file),
        }
    }

    /// Build a request from a textual mode plus whichever inputs are present.
    pub fn from_parts(
        mode: &str,
        url: Option<String>,
        file: Option<LocalFile>,
    ) -> Result<Self, OcrError> {
        Ok(Self {
            mode: mode.parse()?,
            url,
            file,
        })
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    let input = input.trim_start();
    input.starts_with("http://") || input.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_input_mode_parse() {
        assert_eq!("URL".parse::<InputMode>().unwrap(), InputMode::Url);
        assert_eq!(
            "Upload file".parse::<InputMode>().unwrap(),
            InputMode::FileUpload
        );
        assert_eq!(
            "File upload".parse::<InputMode>().unwrap(),
            InputMode::FileUpload
        );
        assert_eq!(" file ".parse::<InputMode>().unwrap(), InputMode::FileUpload);
    }

    #[test]
    fn test_input_mode_rejects_unknown() {
        let err = "camera".parse::<InputMode>().unwrap_err();
        assert!(matches!(err, OcrError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid input type.");
    }

    #[test]
    fn test_extension_lowercased() {
        assert_eq!(
            LocalFile::new("Scan.PDF", vec![]).extension().as_deref(),
            Some(".pdf")
        );
        assert_eq!(
            LocalFile::new("photo.final.JPeG", vec![]).extension().as_deref(),
            Some(".jpeg")
        );
        assert_eq!(LocalFile::new("README", vec![]).extension(), None);
        assert_eq!(LocalFile::new(".pdf", vec![]).extension(), None);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = LocalFile::read("/definitely/not/here.pdf").await.unwrap_err();
        assert!(matches!(err, OcrError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_read_keeps_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = LocalFile::read(&path).await.unwrap();
        assert_eq!(file.name, "invoice.pdf");
        assert_eq!(file.bytes, b"%PDF-1.7");
    }

    #[test]
    fn test_from_parts_bad_mode() {
        assert!(DocumentRequest::from_parts("fax", None, None).is_err());
        let req = DocumentRequest::from_parts("URL", Some("https://x".into()), None).unwrap();
        assert_eq!(req.mode, InputMode::Url);
    }
}
