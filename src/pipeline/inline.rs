//! Image inlining: local image → `data:image/png;base64,…` source.
//!
//! Small images do not need the upload round-trip. Re-encoding them as PNG
//! and embedding the bytes in the request gives the service a self-contained
//! reference and keeps the file off the remote store entirely.

use crate::error::OcrError;
use crate::pipeline::encode::png_data_url;
use crate::pipeline::input::LocalFile;
use crate::service::DocumentSource;
use tracing::debug;

/// Re-encode a local image as a PNG data URL.
///
/// The source format is sniffed from the bytes, not the file name, so a
/// mislabelled `.jpg` that is really a PNG still works.
pub fn inline_image(file: &LocalFile) -> Result<DocumentSource, OcrError> {
    let img = image::load_from_memory(&file.bytes).map_err(|e| OcrError::InvalidImage {
        name: file.name.clone(),
        detail: e.to_string(),
    })?;

    let url = png_data_url(&img).map_err(|e| OcrError::InvalidImage {
        name: file.name.clone(),
        detail: format!("PNG re-encoding failed: {e}"),
    })?;

    debug!(
        name = %file.name,
        width = img.width(),
        height = img.height(),
        "Inlined image as PNG data URL"
    );
    Ok(DocumentSource::image(url))
}
