//! Argument and result types for the Etherpad API.
//!
//! # Design
//! Arguments are kept in a sorted map so serialized query strings are
//! deterministic. Values keep their runtime kind (text, integer, boolean)
//! because the encoded serialization only percent-encodes text.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// A decoded JSON object, as returned by most API methods.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A single API argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl ArgValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(text) => f.write_str(text),
            ArgValue::Int(n) => write!(f, "{n}"),
            ArgValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

/// Arguments for one API call, keyed by parameter name.
///
/// The `apikey` entry is injected by the connection; callers never need to
/// add it, and any value they add is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when `value` is present.
    pub fn with_opt<V: Into<ArgValue>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<ArgValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// When a session expires.
///
/// Every variant resolves to epoch seconds before the request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidUntil {
    /// Absolute expiry in seconds since the Unix epoch.
    EpochSeconds(i64),
    /// Expiry a number of hours after the call is made.
    HoursFromNow(i64),
    /// Absolute expiry as a calendar time.
    At(DateTime<Utc>),
}

impl ValidUntil {
    /// Resolve to epoch seconds relative to `now`.
    pub fn to_epoch_seconds(self, now: DateTime<Utc>) -> i64 {
        match self {
            ValidUntil::EpochSeconds(secs) => secs,
            ValidUntil::HoursFromNow(hours) => (now + Duration::hours(hours)).timestamp(),
            ValidUntil::At(at) => at.timestamp(),
        }
    }
}
