//! Client configuration.
//!
//! A `ClientConfig` is immutable once built. It names the server, the API
//! key sent with every call, the API version embedded in every path, and the
//! text encoding used for POST bodies. Transport knobs (timeout, certificate
//! checking) live here too so a client never reaches for process-wide state.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::{EtherpadError, Result};

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "1.2.13";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Byte encoding applied to text values before percent-encoding them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1. Characters above U+00FF are replaced with `?`.
    Latin1,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Encode `text` into bytes in this encoding.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = EtherpadError;

    fn from_str(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(TextEncoding::Latin1),
            other => Err(EtherpadError::Config(format!(
                "unsupported text encoding '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable settings for one client instance.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) api_key: String,
    pub(crate) api_version: String,
    pub(crate) encoding: TextEncoding,
    pub(crate) timeout: Option<Duration>,
    pub(crate) danger_accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn danger_accept_invalid_certs(&self) -> bool {
        self.danger_accept_invalid_certs
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("encoding", &self.encoding)
            .field("timeout", &self.timeout)
            .field("danger_accept_invalid_certs", &self.danger_accept_invalid_certs)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    api_version: String,
    encoding: TextEncoding,
    timeout: Option<Duration>,
    danger_accept_invalid_certs: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            encoding: TextEncoding::default(),
            timeout: Some(DEFAULT_TIMEOUT),
            danger_accept_invalid_certs: false,
        }
    }

    /// Absolute URL of the Etherpad instance, including scheme.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Per-request timeout. `None` leaves requests unbounded.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skip TLS certificate and hostname verification.
    ///
    /// Only for testing against servers with self-signed certificates.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let raw = self
            .base_url
            .ok_or_else(|| EtherpadError::Config("base URL is required".to_string()))?;
        let base_url = Url::parse(&raw)
            .map_err(|e| EtherpadError::Config(format!("invalid base URL '{raw}': {e}")))?;
        if base_url.cannot_be_a_base() || base_url.host_str().is_none() {
            return Err(EtherpadError::Config(format!(
                "base URL '{raw}' must be absolute with a host"
            )));
        }
        let api_key = self
            .api_key
            .ok_or_else(|| EtherpadError::Config("API key is required".to_string()))?;
        if self.api_version.is_empty() {
            return Err(EtherpadError::Config("API version must not be empty".to_string()));
        }

        Ok(ClientConfig {
            base_url,
            api_key,
            api_version: self.api_version,
            encoding: self.encoding,
            timeout: self.timeout,
            danger_accept_invalid_certs: self.danger_accept_invalid_certs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ClientBuilder {
        ClientBuilder::new().base_url("http://localhost:9001").api_key("secret")
    }

    #[test]
    fn defaults_are_applied() {
        let config = builder().build().unwrap();
        assert_eq!(config.api_version(), DEFAULT_API_VERSION);
        assert_eq!(config.encoding(), TextEncoding::Utf8);
        assert_eq!(config.timeout(), Some(DEFAULT_TIMEOUT));
        assert!(!config.danger_accept_invalid_certs());
    }

    #[test]
    fn missing_base_url_is_rejected() {
        let err = ClientBuilder::new().api_key("k").build().unwrap_err();
        assert!(matches!(err, EtherpadError::Config(_)));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = ClientBuilder::new().base_url("http://host").build().unwrap_err();
        assert!(matches!(err, EtherpadError::Config(_)));
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let err = builder().base_url("example.com/pads").build().unwrap_err();
        assert!(matches!(err, EtherpadError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = builder().build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn encoding_labels_parse() {
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("utf8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("ISO-8859-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert!(matches!(
            "EBCDIC".parse::<TextEncoding>(),
            Err(EtherpadError::Config(_))
        ));
    }

    #[test]
    fn latin1_replaces_unmappable_chars() {
        assert_eq!(TextEncoding::Latin1.encode("æ€"), vec![0xE6, b'?']);
        assert_eq!(TextEncoding::Utf8.encode("æ"), vec![0xC3, 0xA6]);
    }
}
