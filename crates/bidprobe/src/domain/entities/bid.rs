//! Bid request and bid response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outbound bid request.
///
/// The content is opaque to the record store and the classifier; it is only
/// encoded by the sender and printed in the logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidRequest(Value);

impl BidRequest {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Encode the request as a JSON body
    pub fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}

impl From<Value> for BidRequest {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BidRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured bid response.
///
/// Only `code` is interpreted; everything else the endpoint returns is kept
/// verbatim in `fields`. `code` keeps whatever JSON value the endpoint sent
/// and reads as null when the object has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidResponse {
    #[serde(default)]
    pub code: Value,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl BidResponse {
    /// Split `code` out of a decoded JSON object
    pub fn from_object(mut fields: Map<String, Value>) -> Self {
        let code = fields.remove("code").unwrap_or(Value::Null);
        Self { code, fields }
    }

    /// A numeric zero code (`0`, `0.0`) means the endpoint accepted the request
    pub fn is_ok(&self) -> bool {
        self.code.as_f64() == Some(0.0)
    }
}

impl std::fmt::Display for BidResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}
