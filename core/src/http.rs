//! HTTP request/response types exchanged with a [`Transport`](crate::transport::Transport).
//!
//! # Design
//! Requests and responses are plain data. The connection builds an
//! `HttpRequest` without touching the network and decodes the body of an
//! `HttpResponse` afterwards, so the whole wire contract can be tested
//! without a server. The transport only moves bytes.

/// Content type of POST bodies. The body is a form-encoded argument string.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request. The API only uses GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute. GET requests carry their arguments in the query string
/// and have no body; POST requests carry them in `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
