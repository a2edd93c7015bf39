/// End-to-end screen flows
///
/// Drives the application root with key events against an in-memory store
/// and waits for lookups on a paused clock.

pub mod hold;
pub mod lifecycle;
pub mod request;
pub mod search;
pub mod status_update;

use std::sync::Arc;

use angel_tracker::app::AngelTracker;
use angel_tracker::config::Config;
use angel_tracker::model::{Angel, Attribute};
use angel_tracker::store::{MemoryStore, StoreOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn angels() -> Vec<Angel> {
    vec![
        Angel::new("12A")
            .with(Attribute::Sex, "F")
            .with(Attribute::Age, "7")
            .with(Attribute::Wish, "Doll house"),
        Angel::new("12B")
            .with(Attribute::Sex, "M")
            .with(Attribute::Age, "9")
            .with(Attribute::Wish, "Red bike"),
        Angel::new("3A")
            .with(Attribute::Wish, "Bike helmet")
            .with(Attribute::Status, "HOLD"),
        Angel::new("4A")
            .with(Attribute::Wish, "Puzzle")
            .with(Attribute::Status, "PULL"),
    ]
}

pub fn tracker() -> (AngelTracker, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_angels(StoreOptions::default(), angels()));
    let tracker = AngelTracker::with_store(&Config::default(), store.clone()).unwrap();
    (tracker, store)
}

pub fn press(tracker: &mut AngelTracker, code: KeyCode) {
    tracker.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

pub fn type_text(tracker: &mut AngelTracker, text: &str) {
    for c in text.chars() {
        press(tracker, KeyCode::Char(c));
    }
}
