//! Conversion entry points.
//!
//! [`Converter`] owns the configuration and one HTTP client and exposes the
//! two request strategies:
//!
//! * [`Converter::convert`] — inline: the PDF rides in the OCR request as a
//!   base64 data URL. One HTTP call.
//! * [`Converter::convert_with_upload`] — upload the PDF, exchange the file id
//!   for a signed URL, then submit that URL. Three HTTP calls.
//!
//! Both end in the same tail (submit, join pages, write file), so the flows
//! differ only in how the [`DocumentSource`] is produced. Calls are awaited
//! one after another; nothing is retried and the first failure is returned.

use crate::config::ConverterConfig;
use crate::error::Pdf2MdError;
use crate::pipeline::ocr::{self, DocumentSource};
use crate::pipeline::{encode, input, upload};
use crate::progress::ConversionStage;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// How the PDF reaches the OCR endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionMode {
    /// Base64 data URL inside the OCR request (default).
    #[default]
    Inline,
    /// Upload to the files endpoint, then submit a signed URL.
    Upload,
}

/// Sends PDFs to the Mistral OCR API and writes the Markdown it returns.
///
/// Holds only immutable configuration, so one instance can be reused for
/// any number of sequential conversions.
///
/// # Example
/// ```rust,no_run
/// use mistral_pdf2md::{Converter, ConverterConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let converter = Converter::new(ConverterConfig::from_env()?)?;
/// let written = converter.convert("report.pdf", None).await?;
/// println!("wrote {}", written.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConverterConfig,
    client: reqwest::Client,
}

impl Converter {
    /// Validate `config` and build the HTTP client.
    ///
    /// Fails with [`Pdf2MdError::MissingApiKey`] when the key is blank.
    pub fn new(config: ConverterConfig) -> Result<Self, Pdf2MdError> {
        config.validate()?;

        // Only Authorization is a default header: the multipart upload must
        // let reqwest pick its own content type.
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
                Pdf2MdError::InvalidConfig("API key contains invalid header characters".into())
            })?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Pdf2MdError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Shorthand for `Converter::new(ConverterConfig::from_env()?)`.
    pub fn from_env() -> Result<Self, Pdf2MdError> {
        Self::new(ConverterConfig::from_env()?)
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a PDF by embedding it inline in the OCR request.
    ///
    /// Writes to `output_path`, or next to the input with a `.md` extension,
    /// and returns the path written.
    ///
    /// # Errors
    /// - [`Pdf2MdError::FileNotFound`] before any network call if the input is missing
    /// - [`Pdf2MdError::OcrApi`] on a non-2xx OCR response (nothing is written)
    pub async fn convert(
        &self,
        pdf_path: impl AsRef<Path>,
        output_path: Option<&Path>,
    ) -> Result<PathBuf, Pdf2MdError> {
        let pdf_path = pdf_path.as_ref();
        input::ensure_exists(pdf_path)?;
        info!("Starting inline conversion: {}", pdf_path.display());

        self.stage(ConversionStage::ReadingInput);
        let pdf = input::read_pdf(pdf_path).await?;
        let source = DocumentSource::Inline {
            data_url: encode::pdf_data_url(&pdf.bytes),
            file_name: pdf.file_name,
        };

        self.run_ocr(&source, pdf_path, output_path).await
    }

    /// Convert a PDF by uploading it first and submitting a signed URL.
    ///
    /// Intended for files too large to embed inline.
    ///
    /// # Errors
    /// - [`Pdf2MdError::FileNotFound`] before any network call if the input is missing
    /// - [`Pdf2MdError::UploadFailed`] / [`Pdf2MdError::Network`] from the upload
    /// - [`Pdf2MdError::SignedUrlFailed`] if no signed URL is issued; OCR is not attempted
    /// - [`Pdf2MdError::OcrApi`] on a non-2xx OCR response
    pub async fn convert_with_upload(
        &self,
        pdf_path: impl AsRef<Path>,
        output_path: Option<&Path>,
    ) -> Result<PathBuf, Pdf2MdError> {
        let pdf_path = pdf_path.as_ref();
        input::ensure_exists(pdf_path)?;
        info!("Starting upload conversion: {}", pdf_path.display());

        self.stage(ConversionStage::ReadingInput);
        let pdf = input::read_pdf(pdf_path).await?;

        self.stage(ConversionStage::Uploading);
        let uploaded = upload::upload_file(
            &self.client,
            &self.config.files_url(),
            &self.config.api_key,
            pdf,
        )
        .await?;

        self.stage(ConversionStage::FetchingSignedUrl);
        let url = upload::get_signed_url(
            &self.client,
            &self.config.signed_url_endpoint(&uploaded.id),
        )
        .await?;

        let source = DocumentSource::Remote { url };
        self.run_ocr(&source, pdf_path, output_path).await
    }

    /// Dispatch on `mode`.
    pub async fn convert_with_mode(
        &self,
        pdf_path: impl AsRef<Path>,
        output_path: Option<&Path>,
        mode: SubmissionMode,
    ) -> Result<PathBuf, Pdf2MdError> {
        match mode {
            SubmissionMode::Inline => self.convert(pdf_path, output_path).await,
            SubmissionMode::Upload => self.convert_with_upload(pdf_path, output_path).await,
        }
    }

    /// Synchronous wrapper around [`Converter::convert_with_mode`].
    ///
    /// Creates a temporary tokio runtime internally; do not call from inside
    /// an async context.
    pub fn convert_sync(
        &self,
        pdf_path: impl AsRef<Path>,
        output_path: Option<&Path>,
        mode: SubmissionMode,
    ) -> Result<PathBuf, Pdf2MdError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| Pdf2MdError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.convert_with_mode(pdf_path, output_path, mode))
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    /// Submit, join pages, write the file. Shared by both flows.
    async fn run_ocr(
        &self,
        source: &DocumentSource,
        pdf_path: &Path,
        output_path: Option<&Path>,
    ) -> Result<PathBuf, Pdf2MdError> {
        self.stage(ConversionStage::RunningOcr);
        let ocr_start = Instant::now();
        let response = ocr::submit(
            &self.client,
            &self.config.ocr_url(),
            &self.config.model,
            source,
        )
        .await?;
        let page_count = response.pages().len();
        info!(
            "OCR complete: {} pages in {}ms",
            page_count,
            ocr_start.elapsed().as_millis()
        );

        let markdown = ocr::assemble_markdown(response.pages());
        let out = input::resolve_output_path(pdf_path, output_path);

        self.stage(ConversionStage::WritingOutput);
        write_output(&out, &markdown).await?;
        info!("Wrote {} bytes to {}", markdown.len(), out.display());

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_conversion_complete(page_count, markdown.len());
        }
        Ok(out)
    }

    fn stage(&self, stage: ConversionStage) {
        debug!("Stage: {}", stage);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_stage(stage);
        }
    }
}

/// Write `markdown` to `path`, replacing any existing file.
///
/// Atomic write: a uniquely named temp file in the target directory is
/// persisted over `path`, so a failed write never leaves a truncated file
/// behind and never touches other files in that directory.
async fn write_output(path: &Path, markdown: &str) -> Result<(), Pdf2MdError> {
    let target = path.to_path_buf();
    let contents = markdown.to_owned();
    tokio::task::spawn_blocking(move || persist_atomically(&target, contents.as_bytes()))
        .await
        .map_err(|e| Pdf2MdError::Internal(format!("output writer task failed: {e}")))?
}

fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), Pdf2MdError> {
    let write_err = |e: std::io::Error| Pdf2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    // On failure the temp file comes back inside the error and is removed on drop.
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
