//! Request building and response decoding for the Etherpad HTTP API.
//!
//! # Design
//! `Connection` owns the immutable [`ClientConfig`] and a [`Transport`].
//! Every call is split the same way: `build_get` / `build_post` turn an API
//! method name plus [`Args`] into an [`HttpRequest`], the transport executes
//! it, and `handle_response` turns the body into a JSON value or an
//! [`EtherpadError`]. Building and decoding never touch the network.
//!
//! GET arguments are written into the query string verbatim; the `url`
//! crate then quotes only what a query cannot contain (spaces, non-ASCII),
//! while `$`, `%`, `&` and `=` pass through. POST arguments percent-encode
//! text values only. Both behaviors are kept for wire compatibility with
//! existing servers.

use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiCode, EtherpadError, Result};
use crate::http::{HttpMethod, HttpRequest, FORM_CONTENT_TYPE};
use crate::transport::{Transport, UreqTransport};
use crate::types::{ArgValue, Args, JsonMap};

/// Argument name carrying the API key.
pub const API_KEY_PARAM: &str = "apikey";

/// The `{code, message, data}` body every API response carries.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Value,
    #[serde(default)]
    data: Value,
}

/// How argument values are written into a query string or body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgEncoding {
    /// Keys and values written as-is. Used for GET.
    Verbatim,
    /// Text values percent-encoded in the configured text encoding; keys,
    /// integers and booleans written as-is. Used for POST.
    Form,
}

/// A configured connection to one Etherpad instance.
#[derive(Debug, Clone)]
pub struct Connection<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl Connection<UreqTransport> {
    /// Create a connection using the default `ureq` transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self { config, transport }
    }
}

impl<T: Transport> Connection<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Path of an API method: the base URL's path without its trailing
    /// slash, then `/api/{version}/{method}`.
    pub fn api_path(&self, api_method: &str) -> String {
        let base_path = self.config.base_url.path().trim_end_matches('/');
        format!(
            "{base_path}/api/{}/{api_method}",
            self.config.api_version
        )
    }

    /// Serialize `args` plus the configured API key as `key=value` pairs
    /// joined by `&`.
    ///
    /// The API key always appears exactly once, replacing any `apikey` the
    /// caller supplied.
    pub fn query_string(&self, args: &Args, encoding: ArgEncoding) -> String {
        let mut args = args.clone();
        args.insert(API_KEY_PARAM, self.config.api_key.as_str());

        args.iter()
            .map(|(key, value)| match (encoding, value) {
                (ArgEncoding::Form, ArgValue::Text(text)) => {
                    format!("{key}={}", self.percent_encode(text))
                }
                _ => format!("{key}={value}"),
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Absolute URL for `path` on the configured host, with an optional
    /// query string.
    pub fn api_url(&self, path: &str, query: Option<&str>) -> Result<Url> {
        if !path.starts_with('/') {
            return Err(EtherpadError::Transport(format!(
                "error in the URL to the Etherpad instance: path '{path}' is not absolute"
            )));
        }
        let mut url = self.config.base_url.clone();
        url.set_path(path);
        url.set_query(query);
        url.set_fragment(None);
        Ok(url)
    }

    pub fn build_get(&self, api_method: &str, args: &Args) -> Result<HttpRequest> {
        let path = self.api_path(api_method);
        let query = self.query_string(args, ArgEncoding::Verbatim);
        let url = self.api_url(&path, Some(&query))?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_post(&self, api_method: &str, args: &Args) -> Result<HttpRequest> {
        let path = self.api_path(api_method);
        let body = self.query_string(args, ArgEncoding::Form);
        let url = self.api_url(&path, None)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body),
        })
    }

    /// Decode a response body into the envelope's `data` value.
    pub fn handle_response(&self, body: &str) -> Result<Value> {
        decode_envelope(body)
    }

    /// GET an API method and return its raw `data` value, which may be null.
    pub fn get_object(&self, api_method: &str, args: &Args) -> Result<Value> {
        let request = self.build_get(api_method, args)?;
        self.call(api_method, request)
    }

    /// POST an API method and return its raw `data` value, which may be null.
    pub fn post_object(&self, api_method: &str, args: &Args) -> Result<Value> {
        let request = self.build_post(api_method, args)?;
        self.call(api_method, request)
    }

    /// GET an API method whose `data` is an object. Null becomes an empty map.
    pub fn get(&self, api_method: &str, args: &Args) -> Result<JsonMap> {
        self.get_object(api_method, args).and_then(into_map)
    }

    /// POST an API method whose `data` is an object. Null becomes an empty map.
    pub fn post(&self, api_method: &str, args: &Args) -> Result<JsonMap> {
        self.post_object(api_method, args).and_then(into_map)
    }

    fn call(&self, api_method: &str, request: HttpRequest) -> Result<Value> {
        tracing::debug!(
            api_method,
            verb = request.method.as_str(),
            path = %self.api_path(api_method),
            "calling Etherpad API"
        );
        let response = self.transport.send(&request)?;
        tracing::debug!(api_method, status = response.status, "received response");

        decode_envelope(&response.body).inspect_err(|err| {
            tracing::warn!(api_method, error = %err, "Etherpad API call failed");
        })
    }

    fn percent_encode(&self, text: &str) -> String {
        let bytes = self.config.encoding.encode(text);
        form_urlencoded::byte_serialize(&bytes).collect()
    }
}

/// Decode a `{code, message, data}` envelope.
///
/// `code == 0` yields `data` (null when absent). Codes 1 to 4 yield
/// [`EtherpadError::Api`] with the envelope's message. Anything else is
/// [`EtherpadError::Parse`] or [`EtherpadError::UnexpectedResponse`].
pub fn decode_envelope(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body).map_err(|source| EtherpadError::Parse {
        body: body.to_string(),
        source,
    })?;
    if !value.is_object() {
        return Err(unexpected(None, body));
    }
    let envelope: Envelope =
        serde_json::from_value(value).map_err(|_| unexpected(None, body))?;

    let code = envelope
        .code
        .as_ref()
        .and_then(Value::as_i64)
        .ok_or_else(|| unexpected(None, body))?;
    if code == 0 {
        return Ok(envelope.data);
    }
    match ApiCode::from_code(code) {
        Some(code) => Err(EtherpadError::Api {
            code,
            message: message_text(envelope.message),
        }),
        None => Err(unexpected(Some(code), body)),
    }
}

/// The envelope's message as text. Null becomes empty; any other non-string
/// value is written as JSON.
fn message_text(message: Value) -> String {
    match message {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Coerce a decoded `data` value into a map; null becomes empty.
pub(crate) fn into_map(value: Value) -> Result<JsonMap> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(JsonMap::new()),
        other => Err(unexpected(Some(0), &other.to_string())),
    }
}

fn unexpected(code: Option<i64>, body: &str) -> EtherpadError {
    EtherpadError::UnexpectedResponse {
        code,
        body: body.to_string(),
    }
}
