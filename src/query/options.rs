use std::time::Duration;

/// Scheduling options for a single submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Settle delay before dispatch; a newer submission for the same key
    /// inside the window cancels this one. Zero dispatches immediately.
    pub debounce: Duration,

    /// Reject the submission while another request for the key is live,
    /// and keep this one from being superseded until it is delivered.
    pub single_flight: bool,

    /// Upper bound on the running time of the work. `None` falls back to
    /// the executor default, which itself defaults to no timeout.
    pub timeout: Option<Duration>,
}

impl QueryOptions {
    /// Options for keystroke-driven lookups that should wait for input to
    /// settle.
    pub fn debounced(window: Duration) -> Self {
        Self {
            debounce: window,
            ..Self::default()
        }
    }

    /// Options for checks that gate a transition and must run exactly once.
    pub fn single_flight() -> Self {
        Self {
            single_flight: true,
            ..Self::default()
        }
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
