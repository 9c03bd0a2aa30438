//! Upload flow: push the PDF to the files endpoint, then ask for a signed URL.
//!
//! Large PDFs cannot travel inline (the request body would blow past the
//! API's payload limit), so they go through `POST /v1/files` as multipart
//! form data with `purpose=ocr`. The returned file id is exchanged for a
//! short-lived signed URL that the OCR endpoint can read.

use crate::config::redact;
use crate::error::Pdf2MdError;
use crate::pipeline::input::PdfSource;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// The part of the upload response we rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    url: String,
}

/// Upload `pdf` for OCR and return the created file's id.
///
/// The client must carry only the `Authorization` header; reqwest sets the
/// multipart content type and boundary itself.
pub async fn upload_file(
    client: &reqwest::Client,
    files_url: &str,
    api_key: &str,
    pdf: PdfSource,
) -> Result<UploadedFile, Pdf2MdError> {
    info!("Uploading file: {} ({} bytes)", pdf.file_name, pdf.bytes.len());
    debug!(
        "Upload request: POST {} headers={{Authorization: Bearer {}}} fields=[purpose, file]",
        files_url,
        redact(api_key)
    );

    let part = Part::bytes(pdf.bytes)
        .file_name(pdf.file_name)
        .mime_str("application/pdf")
        .map_err(|e| Pdf2MdError::Internal(format!("multipart part: {e}")))?;
    let form = Form::new().text("purpose", "ocr").part("file", part);

    let response = client
        .post(files_url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| Pdf2MdError::network("file upload", e))?;

    let status = response.status();
    debug!("Upload response status: {}", status);
    debug!("Upload response headers: {:?}", response.headers());

    let body = response
        .text()
        .await
        .map_err(|e| Pdf2MdError::network("file upload", e))?;
    debug!("Upload response body: {}", body);

    if !status.is_success() {
        return Err(Pdf2MdError::UploadFailed {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }

    let uploaded: UploadedFile =
        serde_json::from_str(&body).map_err(|e| Pdf2MdError::InvalidResponse {
            operation: "file upload",
            detail: e.to_string(),
        })?;

    info!("Uploaded as file id {}", uploaded.id);
    Ok(uploaded)
}

/// Fetch a signed URL for an uploaded file.
pub async fn get_signed_url(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<String, Pdf2MdError> {
    debug!("Requesting signed URL: GET {}", endpoint);

    let response = client
        .get(endpoint)
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await
        .map_err(|e| Pdf2MdError::network("signed URL request", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Pdf2MdError::network("signed URL request", e))?;

    if !status.is_success() {
        return Err(Pdf2MdError::SignedUrlFailed {
            status: status.as_u16(),
            body,
        });
    }

    let signed: SignedUrlResponse =
        serde_json::from_str(&body).map_err(|e| Pdf2MdError::InvalidResponse {
            operation: "signed URL request",
            detail: e.to_string(),
        })?;
    Ok(signed.url)
}

/// Pull `detail` out of a JSON error body, falling back to the raw text.
///
/// Validation errors carry `detail` as an array of objects; those are
/// rendered as compact JSON rather than dropped.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_extracted() {
        assert_eq!(error_detail(r#"{"detail": "Invalid file"}"#), "Invalid file");
    }

    #[test]
    fn detail_array_is_rendered_as_json() {
        assert_eq!(
            error_detail(r#"{"detail": [{"msg": "field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
    }

    #[test]
    fn non_json_body_falls_back_to_text() {
        assert_eq!(error_detail("Bad Request"), "Bad Request");
    }

    #[test]
    fn json_without_detail_falls_back_to_text() {
        let body = r#"{"message": "nope"}"#;
        assert_eq!(error_detail(body), body);
    }
}
