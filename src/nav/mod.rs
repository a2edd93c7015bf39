//! View navigation: registry of screens, back-stack and preserved views.

pub mod error;
pub mod navigator;
pub mod registry;
pub mod view;

pub use error::NavigationError;
pub use navigator::Navigator;
pub use registry::ViewRegistry;
pub use view::{Controller, Entry, Transition, ViewDefinition, ViewId, ViewKey, ViewSnapshot};
