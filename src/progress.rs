//! Progress-callback trait for conversion stage events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConverterConfigBuilder::progress_callback`] to be told
//! when the converter moves from one network round-trip to the next. An OCR
//! call on a large document can take a minute or more, so a terminal UI
//! wants something to show in the meantime.
//!
//! # Example
//!
//! ```rust
//! use mistral_pdf2md::{ConversionProgressCallback, ConversionStage, ConverterConfig};
//! use std::sync::Arc;
//!
//! struct PrintStages;
//!
//! impl ConversionProgressCallback for PrintStages {
//!     fn on_stage(&self, stage: ConversionStage) {
//!         eprintln!("{}", stage.describe());
//!     }
//! }
//!
//! let config = ConverterConfig::builder()
//!     .api_key("sk-test")
//!     .progress_callback(Arc::new(PrintStages))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// The step a conversion is currently performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    /// Reading the PDF from disk.
    ReadingInput,
    /// Sending the PDF to the files endpoint (upload flow only).
    Uploading,
    /// Requesting a signed URL for the uploaded file (upload flow only).
    FetchingSignedUrl,
    /// Waiting on the OCR endpoint.
    RunningOcr,
    /// Writing the Markdown file.
    WritingOutput,
}

impl ConversionStage {
    /// Short human-readable label, suitable for a spinner message.
    pub fn describe(self) -> &'static str {
        match self {
            ConversionStage::ReadingInput => "Reading PDF…",
            ConversionStage::Uploading => "Uploading PDF…",
            ConversionStage::FetchingSignedUrl => "Fetching signed URL…",
            ConversionStage::RunningOcr => "Running OCR…",
            ConversionStage::WritingOutput => "Writing Markdown…",
        }
    }
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Called by the converter as it moves through each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage(&self, stage: ConversionStage) {
        let _ = stage;
    }

    /// Called once the output file has been written.
    ///
    /// # Arguments
    /// * `page_count`   — pages returned by the OCR endpoint
    /// * `markdown_len` — byte length of the written Markdown
    fn on_conversion_complete(&self, page_count: usize, markdown_len: usize) {
        let _ = (page_count, markdown_len);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConverterConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCallback {
        stages: Mutex<Vec<ConversionStage>>,
        completed: Mutex<Option<(usize, usize)>>,
    }

    impl ConversionProgressCallback for RecordingCallback {
        fn on_stage(&self, stage: ConversionStage) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_conversion_complete(&self, page_count: usize, markdown_len: usize) {
            *self.completed.lock().unwrap() = Some((page_count, markdown_len));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage(ConversionStage::RunningOcr);
        cb.on_conversion_complete(3, 120);
    }

    #[test]
    fn recording_callback_receives_events() {
        let cb = RecordingCallback::default();
        cb.on_stage(ConversionStage::ReadingInput);
        cb.on_stage(ConversionStage::RunningOcr);
        cb.on_conversion_complete(2, 64);

        assert_eq!(
            *cb.stages.lock().unwrap(),
            vec![ConversionStage::ReadingInput, ConversionStage::RunningOcr]
        );
        assert_eq!(*cb.completed.lock().unwrap(), Some((2, 64)));
    }

    #[test]
    fn stage_display_matches_describe() {
        assert_eq!(ConversionStage::Uploading.to_string(), "Uploading PDF…");
    }
}
