//! Blocking client for the Etherpad administrative HTTP API.
//!
//! # Overview
//! Maps method calls onto the server's JSON API: groups, authors, sessions,
//! pads, chat. Each call builds one GET or POST request carrying the API key,
//! sends it, and decodes the `{code, message, data}` envelope into a result
//! or an [`EtherpadError`].
//!
//! # Design
//! - [`EtherpadClient`] is the façade, one method per endpoint.
//! - [`Connection`] owns the immutable [`ClientConfig`], builds URLs and
//!   argument strings, and decodes responses. Building and decoding are pure
//!   so the wire contract is testable without a server.
//! - [`Transport`] executes requests; [`UreqTransport`] is the default and
//!   verifies TLS certificates unless explicitly told not to.
//! - No state survives between calls beyond the configuration.

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::EtherpadClient;
pub use config::{ClientBuilder, ClientConfig, TextEncoding, DEFAULT_API_VERSION};
pub use connection::{decode_envelope, ArgEncoding, Connection};
pub use error::{ApiCode, EtherpadError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport, MAX_BODY_BYTES};
pub use types::{ArgValue, Args, JsonMap, ValidUntil};
