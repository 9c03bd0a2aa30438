//! PDF bytes → base64 `data:` URL for inline submission.
//!
//! The OCR endpoint accepts a `document_url` that may be a data URI, which
//! lets a small PDF travel in the same request as the OCR call and skip the
//! upload round-trips entirely.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// MIME prefix of every inline document URL.
pub const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

/// Encode `bytes` as `data:application/pdf;base64,<...>`.
pub fn pdf_data_url(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded PDF → {} bytes base64", b64.len());

    let mut url = String::with_capacity(PDF_DATA_URL_PREFIX.len() + b64.len());
    url.push_str(PDF_DATA_URL_PREFIX);
    url.push_str(&b64);
    url
}
