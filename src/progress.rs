//! Progress-callback trait for pipeline stage checkpoints.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::OcrConfigBuilder::progress_callback`] to hear about each
//! blocking stage before and after it runs. The upload and OCR calls can take
//! tens of seconds; these checkpoints are what a terminal spinner or a GUI
//! status line hangs off. The pipeline itself never spawns work, so events
//! always arrive in order on the caller's task.
//!
//! # Example
//!
//! ```rust
//! use ocr2md::{OcrConfig, PipelineProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl PipelineProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("{}…", stage.label());
//!     }
//! }
//!
//! let config = OcrConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// A coarse pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Validating and classifying the input.
    Classify,
    /// Uploading a PDF and requesting its signed URL.
    Upload,
    /// Re-encoding a local image as a PNG data URL.
    Inline,
    /// Waiting on the OCR service.
    Ocr,
    /// Rebuilding plain text and markdown from the OCR pages.
    Assemble,
}

impl Stage {
    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Classify => "Checking input",
            Stage::Upload => "Uploading document",
            Stage::Inline => "Encoding image",
            Stage::Ocr => "Running OCR",
            Stage::Assemble => "Assembling markdown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Called by the pipeline around each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called just before a stage starts.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finished successfully.
    fn on_stage_complete(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage failed; the pipeline stops after this.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::OcrConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl PipelineProgressCallback for Recorder {
        fn on_stage_start(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("start {stage:?}"));
        }

        fn on_stage_complete(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("done {stage:?}"));
        }

        fn on_stage_error(&self, stage: Stage, error: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("fail {stage:?}: {error}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage_start(Stage::Ocr);
        cb.on_stage_complete(Stage::Ocr);
        cb.on_stage_error(Stage::Upload, "boom");
    }

    #[test]
    fn recorder_sees_events_in_order() {
        let rec = Recorder::default();
        rec.on_stage_start(Stage::Classify);
        rec.on_stage_complete(Stage::Classify);
        rec.on_stage_start(Stage::Ocr);
        rec.on_stage_error(Stage::Ocr, "timeout");

        let events = rec.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "start Classify",
                "done Classify",
                "start Ocr",
                "fail Ocr: timeout"
            ]
        );
    }

    #[test]
    fn stage_labels_are_distinct() {
        let stages = [
            Stage::Classify,
            Stage::Upload,
            Stage::Inline,
            Stage::Ocr,
            Stage::Assemble,
        ];
        let labels: std::collections::HashSet<_> = stages.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), stages.len());
    }
}
