//! Configuration types for the Mistral OCR converter.
//!
//! Everything the [`crate::Converter`] needs is carried by
//! [`ConverterConfig`], built via its [`ConverterConfigBuilder`]. The API key
//! is passed in explicitly rather than read from the process environment
//! inside the library; [`ConverterConfig::from_env`] exists for callers that
//! do want the environment, and the CLI resolves it once at startup.

use crate::error::Pdf2MdError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the Mistral API key.
pub const API_KEY_ENV: &str = "MISTRAL_API_KEY";

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai";

/// OCR model sent with every request unless overridden.
pub const DEFAULT_MODEL: &str = "mistral-ocr-latest";

/// Upper bound on establishing a TCP/TLS connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`crate::Converter`].
///
/// # Example
/// ```rust
/// use mistral_pdf2md::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .api_key("sk-test")
///     .timeout_secs(120)
///     .build()
///     .unwrap();
/// assert_eq!(config.ocr_url(), "https://api.mistral.ai/v1/ocr");
/// ```
#[derive(Clone)]
pub struct ConverterConfig {
    /// Bearer token sent in the `Authorization` header. Must be non-empty.
    pub api_key: String,

    /// API root without a trailing slash. Default: `https://api.mistral.ai`.
    ///
    /// The OCR endpoint is `<base_url>/v1/ocr` and the files endpoint is
    /// `<base_url>/v1/files`.
    pub base_url: String,

    /// OCR model identifier. Default: `mistral-ocr-latest`.
    pub model: String,

    /// Whole-request timeout in seconds for every HTTP call. Default: 300.
    ///
    /// The limit covers the full request, including the multipart body of an
    /// upload, so very large files on slow links may need a higher value.
    /// `0` disables the timeout, in which case a stalled connection blocks
    /// until the server gives up. Connecting is always capped by
    /// [`CONNECT_TIMEOUT`] (or the total timeout, if shorter).
    pub timeout_secs: u64,

    /// Optional stage-progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 300,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build a config whose API key comes from `MISTRAL_API_KEY`.
    ///
    /// Does not load `.env` files; the binary does that before calling in.
    pub fn from_env() -> Result<Self, Pdf2MdError> {
        let key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Self::builder().api_key(key).build()
    }

    /// `POST` target for OCR requests.
    pub fn ocr_url(&self) -> String {
        format!("{}/v1/ocr", self.base_url)
    }

    /// `POST` target for multipart uploads.
    pub fn files_url(&self) -> String {
        format!("{}/v1/files", self.base_url)
    }

    /// `GET` target returning a signed URL for an uploaded file.
    pub fn signed_url_endpoint(&self, file_id: &str) -> String {
        format!("{}/{}/url", self.files_url(), file_id)
    }

    /// The request timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Time allowed to establish a connection.
    pub fn connect_timeout(&self) -> Duration {
        self.timeout().map_or(CONNECT_TIMEOUT, |t| t.min(CONNECT_TIMEOUT))
    }

    /// Check the invariants the converter relies on.
    pub(crate) fn validate(&self) -> Result<(), Pdf2MdError> {
        if self.api_key.trim().is_empty() {
            return Err(Pdf2MdError::MissingApiKey {
                var: API_KEY_ENV.to_string(),
            });
        }
        validate_base_url(&self.base_url)?;
        if self.model.trim().is_empty() {
            return Err(Pdf2MdError::InvalidConfig("model must not be empty".into()));
        }
        Ok(())
    }
}

/// The endpoints are built by appending `/v1/...` to the base URL, so it must
/// be an absolute http(s) URL with a host and nothing after the path.
fn validate_base_url(base_url: &str) -> Result<(), Pdf2MdError> {
    let invalid = |why: String| {
        Pdf2MdError::InvalidConfig(format!("invalid base URL '{base_url}': {why}"))
    };

    let url = reqwest::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme must be http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".into()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".into()));
    }
    Ok(())
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into().trim().to_string();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, Pdf2MdError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Keep enough of a key to recognise it in logs, never the whole secret.
pub(crate) fn redact(key: &str) -> String {
    if key.is_empty() {
        return "<unset>".to_string();
    }
    let visible: String = key.chars().take(4).collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let c = ConverterConfig::builder().api_key("k").build().unwrap();
        assert_eq!(c.model, "mistral-ocr-latest");
        assert_eq!(c.ocr_url(), "https://api.mistral.ai/v1/ocr");
        assert_eq!(c.files_url(), "https://api.mistral.ai/v1/files");
        assert_eq!(c.timeout(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = ConverterConfig::builder().api_key("   ").build().unwrap_err();
        assert!(matches!(err, Pdf2MdError::MissingApiKey { .. }));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        for bad in [
            "api.mistral.ai",
            "ftp://api.mistral.ai",
            "https://exa mple.com",
            "http://[::1",
            "https://api.mistral.ai?x=1",
            "https://api.mistral.ai#frag",
            "https://",
        ] {
            let result = ConverterConfig::builder().api_key("k").base_url(bad).build();
            assert!(
                matches!(result, Err(Pdf2MdError::InvalidConfig(_))),
                "{bad:?} should be rejected, got: {result:?}"
            );
        }
    }

    #[test]
    fn base_url_with_path_prefix_is_accepted() {
        let c = ConverterConfig::builder()
            .api_key("k")
            .base_url("http://127.0.0.1:8080/proxy/")
            .build()
            .unwrap();
        assert_eq!(c.ocr_url(), "http://127.0.0.1:8080/proxy/v1/ocr");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let c = ConverterConfig::builder()
            .api_key("k")
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(
            c.signed_url_endpoint("abc"),
            "http://localhost:8080/v1/files/abc/url"
        );
    }

    #[test]
    fn zero_timeout_disables() {
        let c = ConverterConfig::builder()
            .api_key("k")
            .timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(c.timeout(), None);
        assert_eq!(c.connect_timeout(), CONNECT_TIMEOUT);
    }

    #[test]
    fn connect_timeout_never_exceeds_total() {
        let c = ConverterConfig::builder()
            .api_key("k")
            .timeout_secs(5)
            .build()
            .unwrap();
        assert_eq!(c.connect_timeout(), Duration::from_secs(5));
        let c = ConverterConfig::builder().api_key("k").build().unwrap();
        assert_eq!(c.connect_timeout(), CONNECT_TIMEOUT);
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = ConverterConfig::builder()
            .api_key("sk-very-secret-value")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-very-secret-value"), "got: {dbg}");
        assert!(dbg.contains("sk-v****"));
    }
}
