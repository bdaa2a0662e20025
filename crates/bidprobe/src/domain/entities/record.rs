//! Record - one logged request/response exchange

use chrono::{DateTime, Utc};

use super::{BidRequest, BidResponse, Exchange, Payload};

/// One logged exchange.
///
/// `request`, `status_code`, `payload` and `received_at` are fixed at
/// construction. `problems` is appended to by the classifier only, and
/// `bid_response` is filled in once the payload has been parsed.
#[derive(Debug, Clone)]
pub struct Record {
    request: BidRequest,
    status_code: u16,
    payload: Payload,
    received_at: DateTime<Utc>,
    problems: Vec<String>,
    bid_response: Option<BidResponse>,
}

impl Record {
    pub fn new(request: BidRequest, status_code: u16, payload: Payload) -> Self {
        Self {
            request,
            status_code,
            payload,
            received_at: Utc::now(),
            problems: Vec::new(),
            bid_response: None,
        }
    }

    pub fn from_exchange(request: BidRequest, exchange: Exchange) -> Self {
        Self::new(request, exchange.status_code, exchange.payload)
    }

    pub fn request(&self) -> &BidRequest {
        &self.request
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    pub fn bid_response(&self) -> Option<&BidResponse> {
        self.bid_response.as_ref()
    }

    /// Attach the structured response parsed from the payload
    pub fn set_bid_response(&mut self, response: BidResponse) {
        self.bid_response = Some(response);
    }

    pub(crate) fn add_problem(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record_has_no_metadata() {
        let record = Record::new(BidRequest::new(json!({"id": 1})), 200, Payload::absent());

        assert_eq!(record.status_code(), 200);
        assert!(record.problems().is_empty());
        assert!(record.bid_response().is_none());
        assert!(record.received_at() <= Utc::now());
    }

    #[test]
    fn test_from_exchange() {
        let exchange = Exchange::new(204, Payload::from("ok"));
        let record = Record::from_exchange(BidRequest::new(json!("r")), exchange);

        assert_eq!(record.status_code(), 204);
        assert_eq!(record.payload().as_bytes(), b"ok");
        assert_eq!(record.request().as_value(), &json!("r"));
    }
}
