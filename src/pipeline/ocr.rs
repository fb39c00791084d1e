//! OCR invocation: one call to the service, pages back in order.
//!
//! Every failure mode (transport, auth, non-2xx status, unexpected JSON) is
//! flattened into [`OcrError::OcrProcessingFailed`] carrying the underlying
//! text, so the caller always receives a structured error.

use crate::config::OcrConfig;
use crate::error::OcrError;
use crate::service::{DocumentSource, OcrPage, OcrService};
use std::time::Instant;
use tracing::{info, warn};

/// Send `source` to the OCR service and return its pages.
///
/// The source is consumed: each classified reference is sent exactly once.
pub async fn run_ocr(
    service: &dyn OcrService,
    source: DocumentSource,
    config: &OcrConfig,
) -> Result<Vec<OcrPage>, OcrError> {
    let start = Instant::now();
    info!(
        model = %config.model,
        image = source.is_image(),
        "Requesting OCR"
    );

    let response = service
        .process(&config.model, &source, config.include_image_base64)
        .await
        .map_err(|e| {
            warn!("OCR call failed: {e}");
            OcrError::OcrProcessingFailed {
                reason: e.to_string(),
            }
        })?;

    info!(
        "OCR returned {} pages in {}ms",
        response.pages.len(),
        start.elapsed().as_millis()
    );
    Ok(response.pages)
}
