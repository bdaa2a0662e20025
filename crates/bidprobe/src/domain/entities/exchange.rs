//! Raw HTTP exchange as returned by a sender

use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP status the endpoint must answer with
pub const HTTP_OK: u16 = 200;

/// Raw response body. `None` when the transport produced no body at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(Option<Vec<u8>>);

impl Payload {
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Some(bytes.into()))
    }

    /// Payload holding the JSON text of `value`
    pub fn json(value: &Value) -> Self {
        Self::from_bytes(value.to_string())
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// True for an absent payload and for a zero-length body
    pub fn is_empty(&self) -> bool {
        self.0.as_ref().map_or(true, |bytes| bytes.is_empty())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Interpret the body as JSON
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.as_bytes())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::from_bytes(text)
    }
}

impl From<Option<Vec<u8>>> for Payload {
    fn from(bytes: Option<Vec<u8>>) -> Self {
        Self(bytes)
    }
}

/// Result of sending one bid request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub status_code: u16,
    pub payload: Payload,
}

impl Exchange {
    pub fn new(status_code: u16, payload: Payload) -> Self {
        Self {
            status_code,
            payload,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == HTTP_OK
    }
}
