//! RecordStore - append log of exchanges that can be frozen
//!
//! While `Open`, any number of threads may append. `freeze` moves the store
//! to `Locked` for good; from then on it is a fixed, ordered, read-only
//! sequence and reads need no lock.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, info, warn};

use super::entities::{BidRequest, Exchange, Payload, Record};
use super::errors::StoreError;

/// Intake state of a store. There is no transition back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Open,
    Locked,
}

struct Intake {
    state: StoreState,
    records: Vec<Record>,
}

/// Thread-safe append log of [`Record`]s
pub struct RecordStore {
    intake: Mutex<Intake>,
    /// Set exactly once, by `freeze`, while holding `intake`
    frozen: OnceLock<Vec<Record>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            intake: Mutex::new(Intake {
                state: StoreState::Open,
                records: Vec::new(),
            }),
            frozen: OnceLock::new(),
        }
    }

    /// Append an exchange. Returns `false` without recording anything once
    /// the store is locked.
    pub fn append(&self, request: BidRequest, status_code: u16, payload: Payload) -> bool {
        let record = Record::new(request, status_code, payload);

        let mut intake = self.intake();
        if intake.state == StoreState::Locked {
            warn!(status_code, "Rejected append to locked record store");
            return false;
        }
        intake.records.push(record);
        debug!(status_code, position = intake.records.len(), "Recorded exchange");
        true
    }

    pub fn append_exchange(&self, request: BidRequest, exchange: Exchange) -> bool {
        self.append(request, exchange.status_code, exchange.payload)
    }

    /// Stop intake. Repeated calls are no-ops.
    pub fn freeze(&self) {
        let mut intake = self.intake();
        if intake.state == StoreState::Locked {
            return;
        }
        intake.state = StoreState::Locked;

        let records = std::mem::take(&mut intake.records);
        let count = records.len();
        // Cannot already be set: the state check above runs under the same lock.
        if self.frozen.set(records).is_err() {
            warn!("Record store was frozen twice");
        }
        info!(records = count, "Record store frozen");
    }

    pub fn state(&self) -> StoreState {
        self.intake().state
    }

    pub fn is_locked(&self) -> bool {
        self.state() == StoreState::Locked
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.records()?.is_empty())
    }

    /// Record at `index`, in insertion order
    pub fn get(&self, index: usize) -> Result<&Record, StoreError> {
        let records = self.records()?;
        records.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: records.len(),
        })
    }

    /// Fresh traversal over all records in insertion order.
    ///
    /// Each call returns an independent iterator.
    pub fn iter(&self) -> Result<std::slice::Iter<'_, Record>, StoreError> {
        Ok(self.records()?.iter())
    }

    pub fn records(&self) -> Result<&[Record], StoreError> {
        self.frozen
            .get()
            .map(Vec::as_slice)
            .ok_or(StoreError::NotLocked)
    }

    /// Take ownership of the frozen records
    pub fn into_records(self) -> Result<Vec<Record>, StoreError> {
        self.frozen.into_inner().ok_or(StoreError::NotLocked)
    }

    fn intake(&self) -> MutexGuard<'_, Intake> {
        // A panicking producer cannot leave the intake half-written: pushes
        // and the state flip are single operations.
        self.intake.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("state", &self.state())
            .field("records", &self.frozen.get().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn request(n: u64) -> BidRequest {
        BidRequest::new(json!({ "id": n }))
    }

    #[test]
    fn test_length_and_order_after_freeze() {
        let store = RecordStore::new();
        for n in 0..5 {
            assert!(store.append(request(n), 200, Payload::absent()));
        }
        store.freeze();

        assert_eq!(store.len().unwrap(), 5);
        for n in 0..5 {
            assert_eq!(store.get(n as usize).unwrap().request(), &request(n));
        }
    }

    #[test]
    fn test_append_after_freeze_is_rejected() {
        let store = RecordStore::new();
        store.append(request(1), 200, Payload::absent());
        store.freeze();

        assert!(!store.append(request(2), 200, Payload::absent()));
        assert!(!store.append_exchange(request(3), Exchange::new(500, Payload::absent())));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_reads_on_open_store_fail() {
        let store = RecordStore::new();
        store.append(request(1), 200, Payload::absent());

        assert_eq!(store.len(), Err(StoreError::NotLocked));
        assert_eq!(store.get(0).unwrap_err(), StoreError::NotLocked);
        assert_eq!(store.iter().unwrap_err(), StoreError::NotLocked);
        assert_eq!(store.is_empty(), Err(StoreError::NotLocked));
        assert_eq!(StoreError::NotLocked.to_string(), "store not locked");
    }

    #[test]
    fn test_into_records_requires_lock() {
        let store = RecordStore::new();
        store.append(request(1), 200, Payload::absent());
        assert_eq!(store.into_records().unwrap_err(), StoreError::NotLocked);
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let store = RecordStore::new();
        assert_eq!(store.state(), StoreState::Open);
        store.append(request(1), 404, Payload::absent());

        store.freeze();
        store.freeze();

        assert!(store.is_locked());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_out_of_range() {
        let store = RecordStore::new();
        store.freeze();

        assert!(store.is_empty().unwrap());
        assert_eq!(
            store.get(3).unwrap_err(),
            StoreError::IndexOutOfRange { index: 3, len: 0 }
        );
    }

    #[test]
    fn test_iterators_are_independent() {
        let store = RecordStore::new();
        for n in 0..3 {
            store.append(request(n), 200, Payload::absent());
        }
        store.freeze();

        let mut first = store.iter().unwrap();
        first.next();
        let second: Vec<_> = store.iter().unwrap().map(|r| r.request().clone()).collect();
        assert_eq!(second, vec![request(0), request(1), request(2)]);
        assert_eq!(first.next().unwrap().request(), &request(1));

        // Restartable: a finished traversal does not affect the next one
        assert_eq!(store.iter().unwrap().count(), 3);
    }

    #[test]
    fn test_concurrent_appends() {
        let store = Arc::new(RecordStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for n in 0..50 {
                        assert!(store.append(request(t * 100 + n), 200, Payload::absent()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        store.freeze();
        assert_eq!(store.len().unwrap(), 400);

        // Per-thread insertion order is preserved
        for t in 0..8u64 {
            let ids: Vec<u64> = store
                .iter()
                .unwrap()
                .filter_map(|r| r.request().as_value()["id"].as_u64())
                .filter(|id| id / 100 == t)
                .collect();
            let expected: Vec<u64> = (0..50).map(|n| t * 100 + n).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_appends_racing_freeze_are_all_or_nothing() {
        let store = Arc::new(RecordStore::new());
        let producer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..1000)
                    .filter(|n| store.append(request(*n), 200, Payload::absent()))
                    .count()
            })
        };
        store.freeze();
        let accepted = producer.join().unwrap();

        assert_eq!(store.len().unwrap(), accepted);
    }
}
