use std::sync::Arc;
use std::time::Duration;

use angel_tracker::app::AngelTracker;
use angel_tracker::config::Config;
use angel_tracker::model::{Angel, Attribute};
use angel_tracker::nav::NavigationError;
use angel_tracker::query::QueryOptions;
use angel_tracker::store::{MemoryStore, RecordStore, StoreOptions};
use angel_tracker::tui::{Command, ScreenId, ScreenMsg};
use crossterm::event::KeyCode;
use tempfile::TempDir;

use super::{angels, press, tracker, type_text};

#[tokio::test(start_paused = true)]
async fn test_results_for_hidden_screens_are_dropped() {
    let (mut tracker, _) = tracker();

    tracker
        .executor()
        .submit(
            "search/keyword",
            QueryOptions::default(),
            |_| async { Ok(vec![Angel::new("99A")]) },
            ScreenMsg::angels(ScreenId::Search),
        )
        .unwrap();

    assert!(tracker.next_delivery().await);
    assert_eq!(tracker.current_screen(), ScreenId::MainMenu);
    assert!(tracker.notice().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_leaving_cancels_pending_family_lookup() {
    let (mut tracker, _) = tracker();

    press(&mut tracker, KeyCode::Char('1'));
    type_text(&mut tracker, "12");
    assert_eq!(tracker.executor().live_requests(), 1);

    press(&mut tracker, KeyCode::Esc);
    assert_eq!(tracker.current_screen(), ScreenId::MainMenu);
    assert_eq!(tracker.executor().live_requests(), 0);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(tracker.poll_deliveries(), 0);
}

#[tokio::test]
async fn test_failed_navigation_sets_notice() {
    let (mut tracker, _) = tracker();

    tracker.apply(Command::Back);
    assert_eq!(tracker.current_screen(), ScreenId::MainMenu);
    assert_eq!(
        tracker.notice(),
        Some(NavigationError::EmptyStack.to_string().as_str())
    );

    press(&mut tracker, KeyCode::Down);
    assert!(tracker.notice().is_none());
}

#[tokio::test]
async fn test_batch_stops_at_first_failed_transition() {
    let (mut tracker, _) = tracker();
    tracker.apply(Command::batch(vec![
        Command::Navigate(ScreenId::Search),
        Command::Back,
        Command::Back,
        Command::Navigate(ScreenId::Request),
    ]));

    assert_eq!(tracker.current_screen(), ScreenId::MainMenu);
    assert_eq!(
        tracker.notice(),
        Some(NavigationError::EmptyStack.to_string().as_str())
    );
}

#[tokio::test]
async fn test_quit_from_main_menu() {
    let (mut tracker, _) = tracker();
    assert!(!tracker.should_quit());
    press(&mut tracker, KeyCode::Char('q'));
    assert!(tracker.should_quit());
}

#[tokio::test]
async fn test_startup_and_shutdown_persist_store() {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("data").join("angels.json");
    let mut config = Config::default();
    config.store.data_file = Some(data_file.clone());

    let mut tracker = AngelTracker::startup(&config).await.unwrap();
    for angel in angels() {
        tracker.store().insert(angel).await.unwrap();
    }
    tracker
        .store()
        .update("12A", Attribute::Status, "AWAITING")
        .await
        .unwrap();
    tracker.shutdown().await.unwrap();
    assert!(data_file.exists());

    let reopened = MemoryStore::open(StoreOptions::default().with_data_file(&data_file))
        .await
        .unwrap();
    assert_eq!(reopened.len().await, 4);
    let angel = reopened.get("12A").await.unwrap();
    assert_eq!(angel.get(Attribute::Status), Some("AWAITING"));

    let submitted = tracker.executor().submit(
        "late",
        QueryOptions::default(),
        |_| async { Ok(Vec::new()) },
        ScreenMsg::angels(ScreenId::Search),
    );
    assert!(submitted.is_err());
}

#[tokio::test]
async fn test_store_errors_reach_the_screen() {
    let store = Arc::new(MemoryStore::with_angels(StoreOptions::default(), angels()));
    let mut tracker = AngelTracker::with_store(&Config::default(), store.clone()).unwrap();
    store.close().await.unwrap();

    press(&mut tracker, KeyCode::Char('1'));
    type_text(&mut tracker, "12");
    assert!(tracker.next_delivery().await);

    let selection = tracker
        .navigator_mut()
        .controller(angel_tracker::tui::screens::ANGEL_SELECTION)
        .unwrap();
    assert!(selection.error().is_some());
    assert!(selection.angels().is_empty());

}
