//! # mistral-pdf2md
//!
//! Convert PDF documents to Markdown with the Mistral OCR API.
//!
//! The heavy lifting happens server-side: this crate gets the PDF to the OCR
//! endpoint, joins the Markdown of every returned page, and writes it to a
//! file.
//!
//! ## Two ways to submit a PDF
//!
//! ```text
//! inline   PDF ─▶ base64 data URL ─────────────────────────▶ POST /v1/ocr ─▶ .md
//! upload   PDF ─▶ POST /v1/files ─▶ GET /v1/files/{id}/url ─▶ POST /v1/ocr ─▶ .md
//! ```
//!
//! Inline is one round-trip and fine for ordinary documents. Upload exists
//! for files too large to embed in a JSON body.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mistral_pdf2md::{Converter, ConverterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConverterConfig::builder()
//!         .api_key(std::env::var("MISTRAL_API_KEY")?)
//!         .build()?;
//!     let converter = Converter::new(config)?;
//!
//!     let path = converter.convert("report.pdf", None).await?;
//!     println!("Markdown written to {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2md` binary (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConverterConfig, ConverterConfigBuilder, API_KEY_ENV, CONNECT_TIMEOUT, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
pub use convert::{Converter, SubmissionMode};
pub use error::Pdf2MdError;
pub use pipeline::ocr::DocumentSource;
pub use progress::{
    ConversionProgressCallback, ConversionStage, NoopProgressCallback, ProgressCallback,
};
