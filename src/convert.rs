//! Pipeline entry points.
//!
//! | Function | Returns | Use when |
//! |----------|---------|----------|
//! | [`extract`] | `Result<AssemblyResult, OcrError>` | You want typed errors |
//! | [`extract_with`] | same | You bring your own [`OcrService`] (tests, proxies) |
//! | [`process`] | [`PipelineOutput`] | A UI wants the display triple, never an `Err` |
//!
//! All three run the same strictly sequential flow:
//!
//! ```text
//! classify ──▶ upload (PDF) ─┐
//!          ├─▶ inline (image)├─▶ OCR ──▶ assemble
//!          └─▶ passthrough ──┘
//! ```

use crate::client::MistralClient;
use crate::config::OcrConfig;
use crate::error::OcrError;
use crate::history::HistoryStore;
use crate::output::{into_output, AssemblyResult, PipelineOutput};
use crate::pipeline::classify::{classify, Classified};
use crate::pipeline::input::DocumentRequest;
use crate::pipeline::{assemble, inline, ocr, upload};
use crate::progress::Stage;
use crate::service::OcrService;
use std::time::Instant;
use tracing::info;

/// Run a request against the Mistral API.
///
/// The credential is checked first: without one the call fails with
/// [`OcrError::MissingCredential`] before classification, history, or any
/// network traffic.
///
/// # Example
/// ```rust,no_run
/// use ocr2md::{extract, DocumentRequest, OcrConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OcrConfig::from_env();
/// let request = DocumentRequest::url("https://arxiv.org/pdf/2201.04234");
/// let result = extract(request, &config, None).await?;
/// println!("{}", result.rendered_markdown);
/// # Ok(())
/// # }
/// ```
pub async fn extract(
    request: DocumentRequest,
    config: &OcrConfig,
    history: Option<&HistoryStore>,
) -> Result<AssemblyResult, OcrError> {
    let client = MistralClient::new(config)?;
    extract_with(&client, request, config, history).await
}

/// Run a request against any [`OcrService`].
///
/// URL requests are saved to `history` as soon as they are classified, so
/// a URL is remembered even when the OCR call then fails.
pub async fn extract_with(
    service: &dyn OcrService,
    request: DocumentRequest,
    config: &OcrConfig,
    history: Option<&HistoryStore>,
) -> Result<AssemblyResult, OcrError> {
    let total_start = Instant::now();

    // ── Step 1: Classify ─────────────────────────────────────────────────
    let classified = run_stage(config, Stage::Classify, async { classify(request) }).await?;

    // ── Step 2: Obtain a document reference ──────────────────────────────
    let source = match classified {
        Classified::Remote(source) => {
            if let Some(history) = history {
                history.save(source.url()).await;
            }
            source
        }
        Classified::Upload(file) => {
            run_stage(
                config,
                Stage::Upload,
                upload::upload_document(service, file, config.signed_url_expiry_hours),
            )
            .await?
        }
        Classified::Inline(file) => {
            run_stage(config, Stage::Inline, async { inline::inline_image(&file) }).await?
        }
    };

    // ── Step 3: OCR ──────────────────────────────────────────────────────
    let pages = run_stage(config, Stage::Ocr, ocr::run_ocr(service, source, config)).await?;

    // ── Step 4: Assemble ─────────────────────────────────────────────────
    let result = run_stage(config, Stage::Assemble, async {
        Ok(assemble::assemble(&pages))
    })
    .await?;

    info!(
        "OCR complete: {} pages, {} images, {} warnings, {}ms total",
        pages.len(),
        result.images.len(),
        result.warnings.len(),
        total_start.elapsed().as_millis()
    );
    Ok(result)
}

/// Run a request and collapse any failure into the display triple.
///
/// Never returns an error: on failure the first element is the error message
/// and the markdown and image list are empty.
pub async fn process(
    request: DocumentRequest,
    config: &OcrConfig,
    history: Option<&HistoryStore>,
) -> PipelineOutput {
    into_output(extract(request, config, history).await)
}

/// Wrap a stage with progress callbacks.
async fn run_stage<T, F>(config: &OcrConfig, stage: Stage, fut: F) -> Result<T, OcrError>
where
    F: std::future::Future<Output = Result<T, OcrError>>,
{
    let cb = config.progress_callback.as_ref();
    if let Some(cb) = cb {
        cb.on_stage_start(stage);
    }
    let result = fut.await;
    if let Some(cb) = cb {
        match &result {
            Ok(_) => cb.on_stage_complete(stage),
            Err(e) => cb.on_stage_error(stage, &e.to_string()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_credential_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::new(dir.path().join("history.txt"), 10);

        let err = extract(
            DocumentRequest::url("https://example.com/doc.pdf"),
            &OcrConfig::default(),
            Some(&history),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, OcrError::MissingCredential { .. }));
        assert!(history.load().await.is_empty(), "history must not be touched");
    }

    #[tokio::test]
    async fn process_reports_missing_credential_as_triple() {
        let (text, md, images) = process(
            DocumentRequest::url("https://example.com/scan.png"),
            &OcrConfig::default(),
            None,
        )
        .await;
        assert!(text.contains("MISTRAL"), "got: {text}");
        assert!(md.is_empty());
        assert!(images.is_empty());
    }
}
