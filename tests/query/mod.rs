/// Query executor tests
///
/// Run on a paused tokio clock so debounce windows elapse instantly and
/// deterministically.

pub mod debounce;
pub mod single_flight;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use angel_tracker::query::{DeliveryQueue, ExecutorConfig, QueryExecutor, QueryResult};

pub type Results = QueryResult<u32>;

pub fn executor() -> (QueryExecutor<Results>, DeliveryQueue<Results>) {
    QueryExecutor::new(ExecutorConfig::default())
}

/// Counts how many times a unit of work actually started.
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
