//! Error type for the mistral-pdf2md library.
//!
//! Every failure is fatal: the converter performs no retries and never
//! returns partial output, so a single [`Pdf2MdError`] covers the whole
//! surface. Variants are grouped by the stage that produced them so callers
//! (and tests) can tell a missing input file apart from an upload rejection
//! or an OCR failure without parsing messages.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the mistral-pdf2md library.
#[derive(Debug, Error)]
pub enum Pdf2MdError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// The API key is absent or blank.
    #[error("{var} environment variable is not set\nExport it or add it to a .env file.")]
    MissingApiKey { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r {path:?}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The input exists but could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── HTTP errors ───────────────────────────────────────────────────────
    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("Network error during {operation}: {reason}")]
    Network {
        operation: &'static str,
        reason: String,
    },

    /// The files endpoint rejected the upload.
    #[error("File upload failed: API request error (HTTP {status}): {detail}")]
    UploadFailed { status: u16, detail: String },

    /// The files endpoint refused to issue a signed URL.
    #[error("Failed to get signed URL (HTTP {status}): {body}")]
    SignedUrlFailed { status: u16, body: String },

    /// The OCR endpoint returned a non-2xx status.
    #[error("OCR API request failed (HTTP {status}): {body}")]
    OcrApi { status: u16, body: String },

    /// A 2xx response whose body was not what the API contract promises.
    #[error("Unexpected response from {operation}: {detail}")]
    InvalidResponse {
        operation: &'static str,
        detail: String,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2MdError {
    /// Wrap a `reqwest` transport error for the named operation.
    pub(crate) fn network(operation: &'static str, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out ({err})")
        } else if err.is_connect() {
            format!("could not connect ({err})")
        } else {
            err.to_string()
        };
        Pdf2MdError::Network { operation, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_display() {
        let e = Pdf2MdError::MissingApiKey {
            var: "MISTRAL_API_KEY".into(),
        };
        assert!(e
            .to_string()
            .starts_with("MISTRAL_API_KEY environment variable is not set"));
    }

    #[test]
    fn file_not_found_display() {
        let e = Pdf2MdError::FileNotFound {
            path: PathBuf::from("missing.pdf"),
        };
        assert_eq!(e.to_string(), "PDF file not found: 'missing.pdf'");
    }

    #[test]
    fn upload_and_ocr_messages_are_distinguishable() {
        let upload = Pdf2MdError::UploadFailed {
            status: 400,
            detail: "Bad Request".into(),
        }
        .to_string();
        let ocr = Pdf2MdError::OcrApi {
            status: 400,
            body: "Bad Request".into(),
        }
        .to_string();
        assert!(upload.contains("File upload failed"), "got: {upload}");
        assert!(!ocr.contains("File upload failed"), "got: {ocr}");
        assert!(ocr.contains("Bad Request"));
    }

    #[test]
    fn signed_url_display() {
        let e = Pdf2MdError::SignedUrlFailed {
            status: 404,
            body: "Not Found".into(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Failed to get signed URL"), "got: {msg}");
        assert!(msg.contains("Not Found"));
    }

    #[test]
    fn network_display() {
        let e = Pdf2MdError::Network {
            operation: "file upload",
            reason: "connection refused".into(),
        };
        assert_eq!(
            e.to_string(),
            "Network error during file upload: connection refused"
        );
    }
}
