use angel_tracker::model::{Attribute, Status};
use angel_tracker::store::RecordStore;
use angel_tracker::tui::screens::{REQUEST, RequestField};
use angel_tracker::tui::ScreenId;
use crossterm::event::KeyCode;

use super::{press, tracker, type_text};

#[tokio::test(start_paused = true)]
async fn test_lend_a_trimmed_batch() {
    let (mut tracker, store) = tracker();

    press(&mut tracker, KeyCode::Char('3'));
    assert_eq!(tracker.current_screen(), ScreenId::Request);

    type_text(&mut tracker, "5");
    press(&mut tracker, KeyCode::Enter);
    assert!(tracker.next_delivery().await);

    // Only the two NOT_STARTED angels exist.
    let ids: Vec<String> = tracker
        .navigator_mut()
        .controller(REQUEST)
        .unwrap()
        .angels()
        .iter()
        .map(|a| a.id().to_string())
        .collect();
    assert_eq!(ids, vec!["12A", "12B"]);

    // Lending needs a requestee.
    press(&mut tracker, KeyCode::Tab);
    press(&mut tracker, KeyCode::Enter);
    let request = tracker.navigator_mut().controller(REQUEST).unwrap();
    assert!(!request.is_busy());
    assert!(request.message().unwrap().contains("who"));
    type_text(&mut tracker, "St. Mark's");

    // Details keep the batch for the way back.
    press(&mut tracker, KeyCode::Tab);
    press(&mut tracker, KeyCode::Enter);
    assert_eq!(tracker.current_screen(), ScreenId::AngelInfo);
    press(&mut tracker, KeyCode::Esc);
    assert_eq!(tracker.current_screen(), ScreenId::Request);
    let request = tracker.navigator_mut().controller(REQUEST).unwrap();
    assert_eq!(request.angels().len(), 2);
    assert_eq!(request.focus(), RequestField::Results);

    press(&mut tracker, KeyCode::Delete);
    press(&mut tracker, KeyCode::Tab);
    press(&mut tracker, KeyCode::Tab);
    press(&mut tracker, KeyCode::Enter);
    assert!(tracker.navigator_mut().controller(REQUEST).unwrap().is_busy());

    assert!(tracker.next_delivery().await);
    assert_eq!(tracker.current_screen(), ScreenId::MainMenu);

    let lent = store.get("12B").await.unwrap();
    assert_eq!(lent.status(), Some(Status::Out));
    assert_eq!(lent.get(Attribute::Location), Some("St. Mark's"));
    assert_eq!(store.get("12A").await.unwrap().status(), Some(Status::NotStarted));
}

#[tokio::test(start_paused = true)]
async fn test_zero_count_lists_nothing() {
    let (mut tracker, _store) = tracker();

    press(&mut tracker, KeyCode::Char('3'));
    type_text(&mut tracker, "0");
    press(&mut tracker, KeyCode::Enter);

    let request = tracker.navigator_mut().controller(REQUEST).unwrap();
    assert!(!request.is_busy());
    assert!(request.angels().is_empty());
    assert!(request.message().is_some());
}
