//! Classifier - buckets the records of a frozen store
//!
//! Every record lands in exactly one bucket. Rules are applied in order and
//! the first match wins:
//!
//! 1. status other than 200 -> `Error`
//! 2. empty or absent payload -> `Invalid`
//! 3. payload that is not a JSON object -> `Invalid`
//! 4. `code` other than a numeric zero (missing, null, string, non-zero)
//!    -> `Problematic`
//! 5. otherwise -> `Good`

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::entities::{BidResponse, Record, HTTP_OK};
use crate::domain::errors::StoreError;
use crate::domain::store::RecordStore;

pub const NOT_OK_STATUS: &str = "The HTTP response code was not 200/OK.";
pub const EMPTY_RESPONSE: &str = "Response is empty (0 bytes).";
pub const PARSE_ERROR: &str = "Response could not be parsed.";
pub const CODE_ERROR: &str = "Response code is not ok.";

/// Classification outcome of a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Good,
    Problematic,
    Invalid,
    Error,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Good,
        Bucket::Problematic,
        Bucket::Invalid,
        Bucket::Error,
    ];
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Problematic => write!(f, "problematic"),
            Self::Invalid => write!(f, "invalid"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Summary counters accumulated during classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// One per record processed
    pub requests_sent: usize,
    /// One per record with a 200 status
    pub responses_ok: usize,
    /// Never incremented: nothing inspects responses for bids yet
    pub responses_successful_without_bids: usize,
}

/// The four disjoint buckets plus counters
#[derive(Debug, Default)]
pub struct Classification {
    pub good: Vec<Record>,
    pub problematic: Vec<Record>,
    pub invalid: Vec<Record>,
    pub error: Vec<Record>,
    pub counters: Counters,
}

impl Classification {
    pub fn bucket(&self, bucket: Bucket) -> &[Record] {
        match bucket {
            Bucket::Good => &self.good,
            Bucket::Problematic => &self.problematic,
            Bucket::Invalid => &self.invalid,
            Bucket::Error => &self.error,
        }
    }

    /// Number of records across all buckets
    pub fn total(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }

    fn push(&mut self, bucket: Bucket, record: Record) {
        match bucket {
            Bucket::Good => self.good.push(record),
            Bucket::Problematic => self.problematic.push(record),
            Bucket::Invalid => self.invalid.push(record),
            Bucket::Error => self.error.push(record),
        }
    }
}

pub struct Classifier;

impl Classifier {
    /// Consume a frozen store and bucket every record in insertion order.
    ///
    /// Fails with [`StoreError::NotLocked`] if the store is still open.
    pub fn classify(store: RecordStore) -> Result<Classification, StoreError> {
        let records = store.into_records()?;
        let mut classification = Classification::default();

        for mut record in records {
            classification.counters.requests_sent += 1;
            if record.status_code() == HTTP_OK {
                classification.counters.responses_ok += 1;
            }

            let bucket = Self::assess(&mut record);
            debug!(%bucket, status_code = record.status_code(), "Classified record");
            classification.push(bucket, record);
        }

        info!(
            requests_sent = classification.counters.requests_sent,
            good = classification.good.len(),
            problematic = classification.problematic.len(),
            invalid = classification.invalid.len(),
            error = classification.error.len(),
            "Classification finished"
        );

        Ok(classification)
    }

    /// Decide the bucket for one record, recording problems and the parsed
    /// response on it.
    pub fn assess(record: &mut Record) -> Bucket {
        if record.status_code() != HTTP_OK {
            record.add_problem(NOT_OK_STATUS);
            return Bucket::Error;
        }

        if record.payload().is_empty() {
            record.add_problem(EMPTY_RESPONSE);
            return Bucket::Invalid;
        }

        let fields = match record.payload().parse::<Value>() {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                debug!(
                    received_at = %record.received_at(),
                    bytes = record.payload().len(),
                    "Payload is JSON but not an object"
                );
                record.add_problem(PARSE_ERROR);
                return Bucket::Invalid;
            }
            Err(e) => {
                debug!(
                    error = %e,
                    received_at = %record.received_at(),
                    bytes = record.payload().len(),
                    "Unparseable payload"
                );
                record.add_problem(PARSE_ERROR);
                return Bucket::Invalid;
            }
        };

        let response = BidResponse::from_object(fields);
        let ok = response.is_ok();
        record.set_bid_response(response);

        if ok {
            Bucket::Good
        } else {
            record.add_problem(CODE_ERROR);
            Bucket::Problematic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BidRequest, Payload};
    use serde_json::json;

    fn request(id: &str) -> BidRequest {
        BidRequest::new(json!({ "id": id }))
    }

    fn record(status_code: u16, payload: Payload) -> Record {
        Record::new(request("r"), status_code, payload)
    }

    #[test]
    fn test_non_200_is_error() {
        let mut rec = record(404, Payload::json(&json!({"code": 0})));
        assert_eq!(Classifier::assess(&mut rec), Bucket::Error);
        assert_eq!(rec.problems(), ["The HTTP response code was not 200/OK."]);
        assert!(rec.bid_response().is_none());
    }

    #[test]
    fn test_empty_payload_is_invalid() {
        let mut absent = record(200, Payload::absent());
        assert_eq!(Classifier::assess(&mut absent), Bucket::Invalid);
        assert!(absent.problems()[0].contains("empty (0 bytes)"));

        let mut zero = record(200, Payload::from_bytes(Vec::new()));
        assert_eq!(Classifier::assess(&mut zero), Bucket::Invalid);
        assert_eq!(zero.problems(), [EMPTY_RESPONSE]);
    }

    #[test]
    fn test_unparseable_payload_is_invalid() {
        for payload in [
            Payload::from("<html>busy</html>"),
            Payload::from("{\"code\": 0"),
            Payload::json(&json!([1, 2, 3])),
            Payload::json(&json!("code")),
            Payload::json(&json!(0)),
        ] {
            let mut rec = record(200, payload);
            assert_eq!(Classifier::assess(&mut rec), Bucket::Invalid);
            assert_eq!(rec.problems(), [PARSE_ERROR]);
            assert!(rec.bid_response().is_none());
        }
    }

    #[test]
    fn test_zero_code_is_good() {
        let mut rec = record(200, Payload::json(&json!({"code": 0, "ads": []})));
        assert_eq!(Classifier::assess(&mut rec), Bucket::Good);
        assert!(rec.problems().is_empty());
        assert_eq!(rec.bid_response().map(|r| r.code.clone()), Some(json!(0)));
    }

    #[test]
    fn test_float_zero_code_is_good() {
        let mut rec = record(200, Payload::from(r#"{"code":0.0}"#));
        assert_eq!(Classifier::assess(&mut rec), Bucket::Good);
        assert!(rec.problems().is_empty());
        assert!(rec.bid_response().is_some());
    }

    #[test]
    fn test_nonzero_code_is_problematic() {
        let mut rec = record(200, Payload::json(&json!({"code": 7, "msg": "no fill"})));
        assert_eq!(Classifier::assess(&mut rec), Bucket::Problematic);
        assert!(rec.problems()[0].contains("code is not ok"));
        assert_eq!(rec.bid_response().map(|r| r.code.clone()), Some(json!(7)));
    }

    fn assert_problematic(body: &str) {
        let mut rec = record(200, Payload::from(body));
        assert_eq!(Classifier::assess(&mut rec), Bucket::Problematic, "{}", body);
        assert_eq!(rec.problems(), [CODE_ERROR], "{}", body);
        assert!(rec.bid_response().is_some(), "{}", body);
    }

    #[test]
    fn test_string_code_is_problematic() {
        assert_problematic(r#"{"code":"7"}"#);
        assert_problematic(r#"{"code":"0"}"#);
    }

    #[test]
    fn test_fractional_code_is_problematic() {
        assert_problematic(r#"{"code":1.5}"#);
    }

    #[test]
    fn test_code_beyond_i64_is_problematic() {
        assert_problematic(r#"{"code":18446744073709551615}"#);
    }

    #[test]
    fn test_null_code_is_problematic() {
        assert_problematic(r#"{"code":null}"#);
    }

    #[test]
    fn test_missing_code_is_problematic() {
        assert_problematic(r#"{"ads":[]}"#);
        assert_problematic("{}");
    }

    #[test]
    fn test_classify_open_store_fails() {
        let store = RecordStore::new();
        store.append(request("a"), 200, Payload::absent());
        assert_eq!(Classifier::classify(store).unwrap_err(), StoreError::NotLocked);
    }

    #[test]
    fn test_classify_end_to_end() {
        let store = RecordStore::new();
        store.append(request("req1"), 200, Payload::json(&json!({"code": 0})));
        store.append(request("req2"), 500, Payload::absent());
        store.append(request("req3"), 200, Payload::json(&json!({"code": 1})));
        store.append(request("req4"), 200, Payload::absent());
        store.freeze();

        let c = Classifier::classify(store).unwrap();

        assert_eq!(c.counters.requests_sent, 4);
        assert_eq!(c.counters.responses_ok, 3);
        assert_eq!(c.counters.responses_successful_without_bids, 0);
        assert_eq!(c.total(), 4);

        let ids = |bucket: Bucket| -> Vec<String> {
            c.bucket(bucket)
                .iter()
                .map(|r| r.request().as_value()["id"].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(ids(Bucket::Good), ["req1"]);
        assert_eq!(ids(Bucket::Error), ["req2"]);
        assert_eq!(ids(Bucket::Problematic), ["req3"]);
        assert_eq!(ids(Bucket::Invalid), ["req4"]);
    }

    #[test]
    fn test_partition_is_total_and_disjoint() {
        let store = RecordStore::new();
        let statuses = [200u16, 204, 200, 503, 200, 200, 301, 200];
        let payloads = [
            Payload::json(&json!({"code": 0})),
            Payload::absent(),
            Payload::from("garbage"),
            Payload::json(&json!({"code": 0})),
            Payload::json(&json!({"code": -1})),
            Payload::from_bytes(Vec::new()),
            Payload::absent(),
            Payload::json(&json!({"code": 0, "bids": [1]})),
        ];
        for (i, (status, payload)) in statuses.iter().zip(payloads).enumerate() {
            store.append(request(&i.to_string()), *status, payload);
        }
        store.freeze();

        let c = Classifier::classify(store).unwrap();
        assert_eq!(c.total(), statuses.len());

        let mut seen: Vec<String> = Bucket::ALL
            .iter()
            .flat_map(|b| c.bucket(*b).iter())
            .map(|r| r.request().as_value()["id"].as_str().unwrap().to_string())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), statuses.len());

        assert_eq!(c.good.len(), 2);
        assert_eq!(c.error.len(), 3);
        assert_eq!(c.invalid.len(), 2);
        assert_eq!(c.problematic.len(), 1);
        assert_eq!(c.counters.responses_ok, 5);
    }
}
