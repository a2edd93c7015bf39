/// Test modules for angel-tracker
///
/// Tests are organized into logical groupings:
/// - navigation: back-stack and preserved view behaviour
/// - query: debouncing, single-flight and cancellation of lookups
/// - flows: end-to-end screen flows driven through the application root
mod flows;
mod navigation;
mod query;
