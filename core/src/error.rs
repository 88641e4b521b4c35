//! Error types for the Etherpad API client.
//!
//! # Design
//! Every call resolves to exactly one outcome. The server's JSON envelope
//! decides success: a known nonzero `code` becomes `Api` carrying the
//! server's message verbatim, while anything the client cannot interpret
//! lands in `Parse` or `UnexpectedResponse` with the raw body attached for
//! debugging. Faults below the envelope (connect, timeout, bad URL) are
//! `Transport`.

use thiserror::Error;

/// Nonzero response codes the server is documented to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCode {
    /// `1`: a parameter is missing or refers to something that does not exist.
    InvalidParameters,
    /// `2`: the server failed while handling the call.
    InternalError,
    /// `3`: the API method does not exist.
    InvalidMethod,
    /// `4`: the API key is missing or wrong.
    InvalidApiKey,
}

impl ApiCode {
    /// Map a raw envelope code to a known failure code.
    ///
    /// Returns `None` for `0` (success) and for codes outside the documented set.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ApiCode::InvalidParameters),
            2 => Some(ApiCode::InternalError),
            3 => Some(ApiCode::InvalidMethod),
            4 => Some(ApiCode::InvalidApiKey),
            _ => None,
        }
    }

    pub fn as_code(self) -> i64 {
        match self {
            ApiCode::InvalidParameters => 1,
            ApiCode::InternalError => 2,
            ApiCode::InvalidMethod => 3,
            ApiCode::InvalidApiKey => 4,
        }
    }
}

/// Errors returned by the connection and client façade.
#[derive(Debug, Error)]
pub enum EtherpadError {
    /// The server answered with one of the documented failure codes.
    #[error("{message}")]
    Api { code: ApiCode, message: String },

    /// The response body was not valid JSON.
    #[error("unable to parse JSON response ({body})")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body was JSON but not a recognizable envelope: no `code` field,
    /// or a code outside the documented set.
    #[error("unexpected response from the server: {body}")]
    UnexpectedResponse { code: Option<i64>, body: String },

    /// The request could not be built or delivered.
    #[error("unable to connect to the Etherpad instance: {0}")]
    Transport(String),

    /// The client configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EtherpadError {
    /// Check if the server rejected the call with a documented code.
    pub fn is_api_error(&self) -> bool {
        matches!(self, EtherpadError::Api { .. })
    }

    /// The documented failure code, if this is an API error.
    pub fn api_code(&self) -> Option<ApiCode> {
        match self {
            EtherpadError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, EtherpadError>;
