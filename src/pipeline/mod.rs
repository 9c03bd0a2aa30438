//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements one step. The two conversion flows share every
//! stage except the one that produces the document reference:
//!
//! ```text
//! inline:  input ──▶ encode ─────────────────▶ ocr ──▶ output file
//! upload:  input ──▶ upload ──▶ signed URL ──▶ ocr ──▶ output file
//! ```
//!
//! 1. [`input`]  — existence check, read bytes, derive the `.md` output path
//! 2. [`encode`] — base64 `data:application/pdf` URL for inline submission
//! 3. [`upload`] — multipart upload and signed-URL retrieval
//! 4. [`ocr`]    — wire types, the OCR call, and page concatenation

pub mod encode;
pub mod input;
pub mod ocr;
pub mod upload;
