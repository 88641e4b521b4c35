//! Blocking transports that execute an [`HttpRequest`].
//!
//! # Design
//! The connection only needs "send this request, give me the body back", so
//! that is the whole trait. `UreqTransport` is the default; tests and
//! embedders can inject their own. HTTP status codes are never errors at
//! this layer because the server reports failures inside the JSON envelope,
//! sometimes alongside a 4xx status.

use std::sync::Arc;

use ureq::tls::TlsConfig;

use crate::config::ClientConfig;
use crate::error::{EtherpadError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Largest response body `UreqTransport` will read. `getHTML` and `getText`
/// on big pads easily pass ureq's 10 MiB default.
pub const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Executes one HTTP round trip.
///
/// Failures that are not already an [`EtherpadError`] should be reported as
/// [`EtherpadError::Transport`]; the connection passes returned errors
/// through unchanged.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Transport backed by a `ureq` agent.
///
/// Certificates are verified unless the config opts out explicitly. The
/// agent's TLS settings are private to this transport. Bodies larger than
/// [`MAX_BODY_BYTES`] fail with [`EtherpadError::Transport`].
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let mut builder = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout());
        if config.danger_accept_invalid_certs() {
            tracing::warn!("TLS certificate verification is disabled for this client");
            builder = builder.tls_config(TlsConfig::builder().disable_verification(true).build());
        }
        Self {
            agent: builder.build().new_agent(),
        }
    }

    /// Wrap an agent configured elsewhere.
    ///
    /// The agent must not treat HTTP status codes as errors, or API failures
    /// reported with a 4xx status will surface as transport errors.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                let body = request.body.as_deref().unwrap_or_default();
                builder.send(body.as_bytes())
            }
        };
        let mut response = result.map_err(|e| EtherpadError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| EtherpadError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
