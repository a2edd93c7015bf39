use thiserror::Error;

/// Recoverable navigation failures, surfaced to the invoking controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no view registered for {0}")]
    UnknownView(String),

    #[error("a view is already registered for {0}")]
    DuplicateView(String),

    #[error("there is no previous view")]
    EmptyStack,

    #[error("controller registered for {id} is not a {expected}")]
    ControllerMismatch { id: String, expected: &'static str },
}

impl NavigationError {
    pub(crate) fn unknown(id: impl std::fmt::Debug) -> Self {
        Self::UnknownView(format!("{id:?}"))
    }

    pub(crate) fn duplicate(id: impl std::fmt::Debug) -> Self {
        Self::DuplicateView(format!("{id:?}"))
    }
}
