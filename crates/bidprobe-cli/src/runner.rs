//! Concurrent send driver
//!
//! A fixed number of worker tasks pull requests from a shared queue. Each
//! worker has one request in flight at a time and appends every exchange to
//! the shared record store. Failed sends are logged and not retried.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use bidprobe::{BidRequest, BidSender, RecordStore, SendError};
use tracing::{debug, error, info, info_span, warn, Instrument};

type Queue = Arc<Mutex<VecDeque<BidRequest>>>;

/// Outcome counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Exchanges appended to the store
    pub recorded: usize,
    /// Requests that produced no exchange (encoding or transport failure)
    pub send_failures: usize,
    /// Exchanges the store refused because it was already frozen
    pub rejected: usize,
}

impl RunStats {
    fn merge(&mut self, other: RunStats) {
        self.recorded += other.recorded;
        self.send_failures += other.send_failures;
        self.rejected += other.rejected;
    }
}

/// Send every request and record the exchanges in `store`.
///
/// Returns once all workers have finished; by then no worker holds a
/// reference to `store` any more.
pub async fn run<S>(
    sender: Arc<S>,
    requests: Vec<BidRequest>,
    workers: usize,
    store: Arc<RecordStore>,
) -> RunStats
where
    S: BidSender + ?Sized + 'static,
{
    let total = requests.len();
    let workers = workers.clamp(1, total.max(1));
    let queue: Queue = Arc::new(Mutex::new(VecDeque::from(requests)));

    info!(requests = total, workers, "Sending bid requests");

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let sender = Arc::clone(&sender);
            let queue = Arc::clone(&queue);
            let store = Arc::clone(&store);
            tokio::spawn(
                work(sender, queue, store).instrument(info_span!("worker", id = worker)),
            )
        })
        .collect();

    let mut stats = RunStats::default();
    for handle in handles {
        match handle.await {
            Ok(worker_stats) => stats.merge(worker_stats),
            Err(e) => error!(error = %e, "Worker task failed"),
        }
    }

    info!(
        recorded = stats.recorded,
        send_failures = stats.send_failures,
        rejected = stats.rejected,
        "All workers finished"
    );
    stats
}

async fn work<S>(sender: Arc<S>, queue: Queue, store: Arc<RecordStore>) -> RunStats
where
    S: BidSender + ?Sized,
{
    let mut stats = RunStats::default();

    loop {
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(request) = next else {
            break;
        };

        match sender.send(&request).await {
            Ok(exchange) => {
                debug!(
                    status_code = exchange.status_code,
                    ok = exchange.is_ok(),
                    absent_payload = exchange.payload.is_absent(),
                    bytes = exchange.payload.len(),
                    "Exchange received"
                );
                if store.append_exchange(request, exchange) {
                    stats.recorded += 1;
                } else {
                    stats.rejected += 1;
                }
            }
            Err(SendError::Encoding(e)) => {
                error!(error = %e, request = %request, "Bid request could not be encoded, not sent");
                stats.send_failures += 1;
            }
            Err(e) => {
                warn!(error = %e, "Bid request failed");
                stats.send_failures += 1;
            }
        }
    }

    stats
}
