//! Off-thread lookups with debounce, single-flight and cancellation.
//!
//! Work runs on tokio worker tasks, bounded by a semaphore. Results never
//! touch presentation state directly: each finished request is queued on a
//! [`DeliveryQueue`] which only the presentation loop drains, so view state
//! can be mutated there without locks.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures::FutureExt;
use log::{debug, info, warn};
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;

use super::error::{QueryError, QueryResult};
use super::handle::{InFlight, QueryHandle, Request};
use super::options::QueryOptions;

/// Executor-wide limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Maximum number of `work` futures running at once.
    pub max_workers: usize,

    /// Timeout applied when a submission does not set its own.
    pub default_timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            default_timeout: None,
        }
    }
}

struct Envelope<M> {
    request: Arc<Request>,
    msg: M,
}

struct Shared {
    inflight: Arc<InFlight>,
    workers: Arc<Semaphore>,
    next_id: AtomicU64,
    shutdown: CancellationToken,
    config: ExecutorConfig,
}

/// Submits lookups and routes their results to a [`DeliveryQueue`].
///
/// `M` is the presentation-side message type; every submission supplies a
/// `deliver` function turning its typed result into an `M`.
pub struct QueryExecutor<M> {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<Envelope<M>>,
}

impl<M> Clone for QueryExecutor<M> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<M: Send + 'static> QueryExecutor<M> {
    pub fn new(config: ExecutorConfig) -> (Self, DeliveryQueue<M>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let inflight = Arc::new(InFlight::default());
        let shared = Arc::new(Shared {
            inflight: inflight.clone(),
            workers: Arc::new(Semaphore::new(config.max_workers.max(1))),
            next_id: AtomicU64::new(1),
            shutdown: CancellationToken::new(),
            config,
        });

        (Self { shared, tx }, DeliveryQueue { rx, inflight })
    }

    /// Schedule `work` under the logical `key`.
    ///
    /// Must be called from within a tokio runtime. Unless the live request
    /// for `key` is single-flight (which rejects this submission), any live
    /// request for `key` is cancelled and replaced by this one.
    pub fn submit<T, W, Fut, D>(
        &self,
        key: impl Into<String>,
        options: QueryOptions,
        work: W,
        deliver: D,
    ) -> Result<QueryHandle, QueryError>
    where
        T: Send + 'static,
        W: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        D: FnOnce(QueryResult<T>) -> M + Send + 'static,
    {
        if self.shared.shutdown.is_cancelled() {
            return Err(QueryError::ShutDown);
        }

        let key = key.into();
        let request = {
            let mut entries = self.shared.inflight.lock();
            // `shutdown` drains under this lock; checking again here keeps a
            // racing submission from slipping in after the drain.
            if self.shared.shutdown.is_cancelled() {
                return Err(QueryError::ShutDown);
            }
            if let Some(live) = entries.get(&key) {
                if options.single_flight || live.single_flight {
                    debug!("Rejected '{}': request #{} still in flight", key, live.id);
                    return Err(QueryError::AlreadyInFlight(key));
                }
                if live.cancel() {
                    debug!("Superseded request #{} for '{}'", live.id, key);
                }
            }

            let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
            let request = Arc::new(Request::new(
                id,
                key.clone(),
                options.single_flight,
                self.shared.shutdown.child_token(),
            ));
            entries.insert(key, request.clone());
            request
        };

        debug!(
            "Submitted request #{} for '{}' (debounce {:?}, single_flight {})",
            request.id, request.key, options.debounce, options.single_flight
        );

        let timeout = options.timeout.or(self.shared.config.default_timeout);
        tokio::spawn(run_request(
            request.clone(),
            self.shared.inflight.clone(),
            self.shared.workers.clone(),
            options.debounce,
            timeout,
            work,
            deliver,
            self.tx.clone(),
        ));

        Ok(QueryHandle::new(request, self.shared.inflight.clone()))
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.shared.inflight.lock().contains_key(key)
    }

    /// Number of requests that have not yet been delivered or cancelled.
    pub fn live_requests(&self) -> usize {
        self.shared.inflight.lock().len()
    }

    /// Cancel every live request and refuse further submissions.
    pub fn shutdown(&self) {
        self.shared.shutdown.cancel();
        let drained: Vec<_> = self.shared.inflight.lock().drain().collect();
        let cancelled = drained
            .iter()
            .filter(|(_, request)| request.cancel())
            .count();
        info!("Query executor shut down, cancelled {} live requests", cancelled);
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.shutdown.is_cancelled()
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_request<T, W, Fut, D, M>(
    request: Arc<Request>,
    inflight: Arc<InFlight>,
    workers: Arc<Semaphore>,
    debounce: Duration,
    timeout: Option<Duration>,
    work: W,
    deliver: D,
    tx: mpsc::UnboundedSender<Envelope<M>>,
) where
    T: Send + 'static,
    W: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    D: FnOnce(QueryResult<T>) -> M + Send + 'static,
    M: Send + 'static,
{
    let token = request.token.clone();

    if !debounce.is_zero() {
        tokio::select! {
            _ = token.cancelled() => return abandon(&request, &inflight),
            _ = tokio::time::sleep(debounce) => {}
        }
    }

    let permit = tokio::select! {
        _ = token.cancelled() => return abandon(&request, &inflight),
        permit = workers.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => return abandon(&request, &inflight),
        },
    };

    if !request.begin() {
        return abandon(&request, &inflight);
    }

    let started = Instant::now();
    // Calling `work` inside the guarded future also catches panics raised
    // before it hands back its future.
    let work_token = token.clone();
    let guarded = AssertUnwindSafe(async move { work(work_token).await }).catch_unwind();
    let outcome = tokio::select! {
        _ = token.cancelled() => {
            debug!("Request #{} for '{}' cancelled while running", request.id, request.key);
            abandon(&request, &inflight);
            return;
        }
        outcome = with_timeout(timeout, guarded) => outcome,
    };
    drop(permit);

    let result = match outcome {
        None => Err(QueryError::TimedOut(timeout.unwrap_or_default())),
        Some(Err(panic)) => Err(QueryError::WorkFailed(panic_message(panic.as_ref()))),
        Some(Ok(Err(err))) => Err(QueryError::WorkFailed(format!("{err:#}"))),
        Some(Ok(Ok(value))) => Ok(value),
    };

    if let Err(err) = &result {
        warn!("Request #{} for '{}' failed: {}", request.id, request.key, err);
    } else {
        debug!(
            "Request #{} for '{}' finished in {:?}",
            request.id,
            request.key,
            started.elapsed()
        );
    }

    if !request.finish() {
        return abandon(&request, &inflight);
    }

    let msg = deliver(result);
    if tx
        .send(Envelope {
            request: request.clone(),
            msg,
        })
        .is_err()
    {
        // Nobody is draining deliveries any more.
        abandon(&request, &inflight);
    }
}

/// Settle a request that will never be delivered. A token cancelled by
/// `shutdown` leaves the request state untouched, so it is moved to
/// `Cancelled` here and its key is freed.
fn abandon(request: &Request, inflight: &InFlight) {
    request.cancel();
    inflight.release(request);
}

async fn with_timeout<F: Future>(timeout: Option<Duration>, future: F) -> Option<F::Output> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("work panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("work panicked: {message}")
    } else {
        "work panicked".to_string()
    }
}

/// Presentation-side end of the executor.
///
/// Owned by the single presentation loop. A result is handed out only if
/// its request was not cancelled in the meantime, and handing it out is
/// what completes the request.
pub struct DeliveryQueue<M> {
    rx: mpsc::UnboundedReceiver<Envelope<M>>,
    inflight: Arc<InFlight>,
}

impl<M> DeliveryQueue<M> {
    /// Next deliverable result, without waiting.
    pub fn try_next(&mut self) -> Option<M> {
        while let Ok(envelope) = self.rx.try_recv() {
            if let Some(msg) = self.accept(envelope) {
                return Some(msg);
            }
        }
        None
    }

    /// Wait for the next deliverable result.
    ///
    /// Resolves to `None` once every executor handle has been dropped.
    pub async fn next(&mut self) -> Option<M> {
        while let Some(envelope) = self.rx.recv().await {
            if let Some(msg) = self.accept(envelope) {
                return Some(msg);
            }
        }
        None
    }

    /// All results deliverable right now.
    pub fn drain(&mut self) -> Vec<M> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    fn accept(&self, envelope: Envelope<M>) -> Option<M> {
        let delivered = envelope.request.deliver();
        self.inflight.release(&envelope.request);
        if delivered {
            Some(envelope.msg)
        } else {
            debug!(
                "Discarded result of cancelled request #{} for '{}'",
                envelope.request.id, envelope.request.key
            );
            None
        }
    }
}
