//! OCR submission: request/response wire types and page assembly.
//!
//! Both conversion flows end here. The only difference between them is the
//! [`DocumentSource`]: an inline base64 data URL, or a signed URL pointing at
//! a file already uploaded to the files endpoint. On the wire both are a
//! `document_url` chunk; only the inline one carries a `document_name`.

use crate::error::Pdf2MdError;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the OCR endpoint should read the document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// PDF embedded in the request as a base64 data URL.
    Inline { data_url: String, file_name: String },
    /// PDF already on the server, reachable through a signed URL.
    Remote { url: String },
}

impl DocumentSource {
    fn to_chunk(&self) -> DocumentChunk<'_> {
        match self {
            DocumentSource::Inline {
                data_url,
                file_name,
            } => DocumentChunk {
                kind: "document_url",
                document_url: data_url,
                document_name: Some(file_name.as_str()),
            },
            DocumentSource::Remote { url } => DocumentChunk {
                kind: "document_url",
                document_url: url,
                document_name: None,
            },
        }
    }

    /// Short label for log lines; never includes the (possibly huge) data URL.
    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Inline {
                data_url,
                file_name,
            } => format!("inline '{}' ({} bytes base64)", file_name, data_url.len()),
            DocumentSource::Remote { .. } => "signed URL".to_string(),
        }
    }
}

/// JSON body of `POST /v1/ocr`.
#[derive(Debug, Serialize)]
pub struct OcrRequest<'a> {
    pub model: &'a str,
    pub document: DocumentChunk<'a>,
}

impl<'a> OcrRequest<'a> {
    pub fn new(model: &'a str, source: &'a DocumentSource) -> Self {
        Self {
            model,
            document: source.to_chunk(),
        }
    }
}

/// The `document` object of an [`OcrRequest`].
#[derive(Debug, Serialize)]
pub struct DocumentChunk<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub document_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<&'a str>,
}

/// Successful OCR response. Fields we don't use are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrResponse {
    #[serde(default)]
    pub pages: Option<Vec<OcrPage>>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage_info: Option<UsageInfo>,
}

/// One page of an [`OcrResponse`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrPage {
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub markdown: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageInfo {
    #[serde(default)]
    pub pages_processed: Option<u64>,
    #[serde(default)]
    pub doc_size_bytes: Option<u64>,
}

impl OcrResponse {
    /// Pages in document order; an absent `pages` field means none.
    pub fn pages(&self) -> &[OcrPage] {
        self.pages.as_deref().unwrap_or(&[])
    }
}

/// Submit `source` to the OCR endpoint and parse the response.
///
/// The client is expected to carry the `Authorization` header already.
pub async fn submit(
    client: &reqwest::Client,
    ocr_url: &str,
    model: &str,
    source: &DocumentSource,
) -> Result<OcrResponse, Pdf2MdError> {
    info!("Submitting {} to OCR model {}", source.describe(), model);

    let request = OcrRequest::new(model, source);
    let response = client
        .post(ocr_url)
        .header(CONTENT_TYPE, "application/json")
        .json(&request)
        .send()
        .await
        .map_err(|e| Pdf2MdError::network("OCR request", e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Pdf2MdError::network("OCR request", e))?;

    if !status.is_success() {
        return Err(Pdf2MdError::OcrApi {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: OcrResponse =
        serde_json::from_str(&body).map_err(|e| Pdf2MdError::InvalidResponse {
            operation: "OCR request",
            detail: e.to_string(),
        })?;

    debug!(
        "OCR returned {} pages (usage: {:?})",
        parsed.pages().len(),
        parsed.usage_info
    );
    Ok(parsed)
}

/// Concatenate page Markdown in order, each page followed by a blank line.
pub fn assemble_markdown(pages: &[OcrPage]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(page.markdown.as_deref().unwrap_or(""));
        out.push_str("\n\n");
    }
    out
}
