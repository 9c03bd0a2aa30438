//! Input handling: validate the local PDF, read it, and derive the output path.
//!
//! The existence check runs before anything touches the network so a typo in
//! the path fails fast with [`Pdf2MdError::FileNotFound`] instead of a
//! confusing API error.

use crate::error::Pdf2MdError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A PDF read fully into memory.
#[derive(Debug, Clone)]
pub struct PdfSource {
    /// Base name sent to the API (`document_name` or multipart filename).
    pub file_name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

/// Fail with [`Pdf2MdError::FileNotFound`] unless `path` exists.
pub fn ensure_exists(path: &Path) -> Result<(), Pdf2MdError> {
    if !path.exists() {
        return Err(Pdf2MdError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Read the whole PDF into memory.
///
/// Callers run [`ensure_exists`] first; a file that vanishes in between still
/// maps to [`Pdf2MdError::FileNotFound`].
pub async fn read_pdf(path: &Path) -> Result<PdfSource, Pdf2MdError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Pdf2MdError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => Pdf2MdError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Pdf2MdError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(PdfSource {
        file_name: file_name(path),
        bytes,
    })
}

/// Base name of `path`, or `document.pdf` when it has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string())
}

/// Explicit output path if given, else `pdf_path` with its extension replaced by `.md`.
pub fn resolve_output_path(pdf_path: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(p) => p.to_path_buf(),
        None => pdf_path.with_extension("md"),
    }
}
