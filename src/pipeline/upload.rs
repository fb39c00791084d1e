//! Binary upload: local PDF → signed document URL.
//!
//! The OCR endpoint only accepts references, so a local PDF is stored
//! remotely first and the resulting handle exchanged for a time-limited
//! signed URL. Both calls surface their failure as
//! [`OcrError::UploadFailed`]; there is no retry.

use crate::error::OcrError;
use crate::pipeline::input::LocalFile;
use crate::service::{DocumentSource, OcrService, OCR_PURPOSE};
use tracing::{debug, info};

/// Upload a PDF and return a signed [`DocumentSource::DocumentUrl`].
pub async fn upload_document(
    service: &dyn OcrService,
    file: LocalFile,
    expiry_hours: u32,
) -> Result<DocumentSource, OcrError> {
    let LocalFile { name, bytes } = file;
    info!("Uploading {} ({} bytes)", name, bytes.len());

    let handle = service
        .upload_file(&name, bytes, OCR_PURPOSE)
        .await
        .map_err(|e| OcrError::UploadFailed {
            reason: e.to_string(),
        })?;
    debug!(file_id = %handle.id, "Upload stored");

    let signed = service
        .signed_url(&handle, expiry_hours)
        .await
        .map_err(|e| OcrError::UploadFailed {
            reason: format!("could not sign URL for file {}: {e}", handle.id),
        })?;
    debug!(expiry_hours, "Signed URL issued");

    Ok(DocumentSource::document(signed.url))
}
