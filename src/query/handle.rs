use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use log::debug;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::error::QueryError;

/// Lifecycle of a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Waiting for its debounce window or a free worker.
    Pending,

    /// Work is executing.
    Running,

    /// Work finished; the result is queued for the presentation context.
    Ready,

    /// The result was handed to the presentation context. Terminal.
    Delivered,

    /// Cancelled or superseded before delivery. Terminal.
    Cancelled,
}

impl RequestState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestState::Delivered | RequestState::Cancelled)
    }
}

/// State of one request shared between its worker, its handle and the
/// delivery queue.
pub(crate) struct Request {
    pub(crate) id: u64,
    pub(crate) key: String,
    pub(crate) issued_at: DateTime<Utc>,
    pub(crate) single_flight: bool,
    pub(crate) token: CancellationToken,
    state: watch::Sender<RequestState>,
}

impl Request {
    pub(crate) fn new(
        id: u64,
        key: String,
        single_flight: bool,
        token: CancellationToken,
    ) -> Self {
        Self {
            id,
            key,
            issued_at: Utc::now(),
            single_flight,
            token,
            state: watch::Sender::new(RequestState::Pending),
        }
    }

    pub(crate) fn state(&self) -> RequestState {
        *self.state.borrow()
    }

    fn transition(&self, from: &[RequestState], to: RequestState) -> bool {
        self.state.send_if_modified(|state| {
            if from.contains(state) {
                *state = to;
                true
            } else {
                false
            }
        })
    }

    pub(crate) fn begin(&self) -> bool {
        self.transition(&[RequestState::Pending], RequestState::Running)
    }

    pub(crate) fn finish(&self) -> bool {
        self.transition(&[RequestState::Running], RequestState::Ready)
    }

    pub(crate) fn deliver(&self) -> bool {
        self.transition(&[RequestState::Ready], RequestState::Delivered)
    }

    /// Returns false when the request had already reached a terminal state.
    pub(crate) fn cancel(&self) -> bool {
        let cancelled = self.transition(
            &[
                RequestState::Pending,
                RequestState::Running,
                RequestState::Ready,
            ],
            RequestState::Cancelled,
        );
        if cancelled {
            self.token.cancel();
        }
        cancelled
    }

    fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }
}

/// The live request per logical key.
#[derive(Default)]
pub(crate) struct InFlight {
    entries: Mutex<HashMap<String, Arc<Request>>>,
}

impl InFlight {
    pub(crate) fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Request>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop the entry for `request` unless a newer request replaced it.
    pub(crate) fn release(&self, request: &Request) {
        let mut entries = self.lock();
        if entries
            .get(&request.key)
            .is_some_and(|current| current.id == request.id)
        {
            entries.remove(&request.key);
        }
    }
}

/// Caller-side handle for a submitted request.
///
/// Dropping the handle does not cancel the request.
pub struct QueryHandle {
    request: Arc<Request>,
    inflight: Arc<InFlight>,
}

impl QueryHandle {
    pub(crate) fn new(request: Arc<Request>, inflight: Arc<InFlight>) -> Self {
        Self { request, inflight }
    }

    pub fn id(&self) -> u64 {
        self.request.id
    }

    pub fn key(&self) -> &str {
        &self.request.key
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.request.issued_at
    }

    pub fn state(&self) -> RequestState {
        self.request.state()
    }

    pub fn is_live(&self) -> bool {
        !self.state().is_terminal()
    }

    /// Cancel the request. Idempotent, and a no-op once delivered.
    pub fn cancel(&self) {
        if self.request.cancel() {
            debug!("Cancelled request #{} for '{}'", self.request.id, self.request.key);
            self.inflight.release(&self.request);
        }
    }

    /// Wait for the request to reach a terminal state.
    ///
    /// Resolves to `Ok(())` once the result has been delivered (whether the
    /// work succeeded or failed) and to `Err(Cancelled)` otherwise.
    pub async fn wait(&self) -> Result<(), QueryError> {
        let mut state = self.request.subscribe();
        loop {
            match *state.borrow_and_update() {
                RequestState::Delivered => return Ok(()),
                RequestState::Cancelled => return Err(QueryError::Cancelled),
                _ => {}
            }
            // The sender lives inside `self.request`, so this cannot close
            // while the handle exists.
            if state.changed().await.is_err() {
                return Err(QueryError::ShutDown);
            }
        }
    }
}

impl std::fmt::Debug for QueryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryHandle")
            .field("id", &self.request.id)
            .field("key", &self.request.key)
            .field("state", &self.state())
            .finish()
    }
}
