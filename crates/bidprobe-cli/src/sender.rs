//! HTTP Bid Sender
//!
//! Posts bid requests to the endpoint under test using reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use bidprobe::{BidRequest, BidSender, Exchange, Payload, SendError, SenderConfig};

/// reqwest implementation of BidSender
pub struct HttpBidSender {
    client: Client,
    config: SenderConfig,
}

impl HttpBidSender {
    pub fn new(config: SenderConfig) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| SendError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }
}

#[async_trait]
impl BidSender for HttpBidSender {
    async fn send(&self, request: &BidRequest) -> Result<Exchange, SendError> {
        // Encode first: a request that cannot be encoded is never sent
        let body = request.to_body()?;

        let mut builder = self
            .client
            .post(self.config.url())
            .header(CONTENT_TYPE, "application/json");

        for (name, value) in self.config.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(body)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let status_code = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SendError::Body(e.to_string()))?;

        debug!(status_code, bytes = bytes.len(), "Received bid response");

        Ok(Exchange::new(status_code, body_payload(&bytes)))
    }
}

/// An empty body is reported as an absent payload
fn body_payload(bytes: &[u8]) -> Payload {
    if bytes.is_empty() {
        Payload::absent()
    } else {
        Payload::from_bytes(bytes)
    }
}
