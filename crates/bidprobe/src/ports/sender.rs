//! Bid Sender Port
//!
//! Abstract interface for sending a bid request to the endpoint under test.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::{BidRequest, Exchange};
use crate::domain::errors::SendError;

/// Bid request transport
///
/// One call performs one request/response round trip. Implementations must
/// encode the request before touching the network and return
/// [`SendError::Encoding`] without sending anything if encoding fails.
/// No retries.
///
/// # Example
///
/// ```rust,ignore
/// use bidprobe::ports::BidSender;
///
/// struct HttpBidSender { /* reqwest client */ }
///
/// #[async_trait]
/// impl BidSender for HttpBidSender {
///     async fn send(&self, request: &BidRequest) -> Result<Exchange, SendError> {
///         // POST the encoded request, return status and raw body
///     }
/// }
/// ```
#[async_trait]
pub trait BidSender: Send + Sync {
    /// Send a request and return the status code and raw body
    async fn send(&self, request: &BidRequest) -> Result<Exchange, SendError>;
}

pub const DEFAULT_USER_AGENT: &str = concat!("bidprobe/", env!("CARGO_PKG_VERSION"));

/// Immutable sender configuration, built once and handed to the sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    url: String,
    headers: Vec<(String, String)>,
    timeout: Duration,
    user_agent: String,
}

impl SenderConfig {
    /// Create a configuration for the given endpoint URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |config, (name, value)| config.with_header(name, value))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
