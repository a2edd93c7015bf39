pub mod app;
pub mod cli;
pub mod config;
pub mod export;
pub mod model;
pub mod nav;
pub mod query;
pub mod store;
pub mod tui;

pub use app::AngelTracker;
pub use config::Config;
