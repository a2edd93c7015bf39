use angel_tracker::model::Status;
use angel_tracker::store::RecordStore;
use angel_tracker::tui::ScreenId;
use angel_tracker::tui::screens::{ANGEL_SELECTION, STATUS_SELECT};
use crossterm::event::KeyCode;

use super::{press, tracker, type_text};

#[tokio::test(start_paused = true)]
async fn test_select_update_and_return_refreshes_family() {
    let (mut tracker, store) = tracker();

    press(&mut tracker, KeyCode::Char('1'));
    assert_eq!(tracker.current_screen(), ScreenId::AngelSelection);

    type_text(&mut tracker, "12");
    assert!(tracker.next_delivery().await);
    let ids: Vec<String> = tracker
        .navigator_mut()
        .controller(ANGEL_SELECTION)
        .unwrap()
        .angels()
        .iter()
        .map(|a| a.id().to_string())
        .collect();
    assert_eq!(ids, vec!["12A", "12B"]);

    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Enter);
    assert_eq!(tracker.current_screen(), ScreenId::StatusSelect);
    assert!(tracker.navigator().is_preserved(ScreenId::AngelSelection));
    let screen = tracker.navigator_mut().controller(STATUS_SELECT).unwrap();
    assert_eq!(screen.angel().unwrap().id(), "12B");

    // NOT_STARTED is selected; three steps down is COMPLETE.
    for _ in 0..3 {
        press(&mut tracker, KeyCode::Down);
    }
    press(&mut tracker, KeyCode::Enter);
    assert!(tracker.navigator_mut().controller(STATUS_SELECT).unwrap().is_saving());

    press(&mut tracker, KeyCode::Enter);
    let screen = tracker.navigator_mut().controller(STATUS_SELECT).unwrap();
    assert!(screen.message().unwrap().contains("already in progress"));

    // The update lands and the screen returns to the resumed family list.
    assert!(tracker.next_delivery().await);
    assert_eq!(tracker.current_screen(), ScreenId::AngelSelection);
    assert_eq!(
        tracker.navigator_mut().controller(ANGEL_SELECTION).unwrap().family(),
        "12"
    );
    assert_eq!(store.get("12B").await.unwrap().status(), Some(Status::Complete));

    assert!(tracker.next_delivery().await);
    let selection = tracker.navigator_mut().controller(ANGEL_SELECTION).unwrap();
    let refreshed = selection.angels().iter().find(|a| a.id() == "12B").unwrap();
    assert_eq!(refreshed.status(), Some(Status::Complete));
}

#[tokio::test(start_paused = true)]
async fn test_hold_cannot_jump_to_complete() {
    let (mut tracker, store) = tracker();

    press(&mut tracker, KeyCode::Char('1'));
    type_text(&mut tracker, "3");
    assert!(tracker.next_delivery().await);
    press(&mut tracker, KeyCode::Enter);
    assert_eq!(tracker.current_screen(), ScreenId::StatusSelect);

    // HOLD is selected; one step down is COMPLETE.
    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Enter);

    let screen = tracker.navigator_mut().controller(STATUS_SELECT).unwrap();
    assert!(!screen.is_saving());
    assert!(screen.message().unwrap().to_lowercase().contains("hold"));
    assert_eq!(tracker.current_screen(), ScreenId::StatusSelect);
    assert_eq!(store.get("3A").await.unwrap().status(), Some(Status::Hold));
}

#[tokio::test(start_paused = true)]
async fn test_pulled_angel_needs_confirmation() {
    let (mut tracker, store) = tracker();

    press(&mut tracker, KeyCode::Char('1'));
    type_text(&mut tracker, "4");
    assert!(tracker.next_delivery().await);
    press(&mut tracker, KeyCode::Enter);

    // PULL is selected; one step down is OUT.
    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Enter);
    let screen = tracker.navigator_mut().controller(STATUS_SELECT).unwrap();
    assert!(screen.is_confirming());
    assert!(!screen.is_saving());

    // Anything but y backs out of the confirmation.
    press(&mut tracker, KeyCode::Char('n'));
    assert!(!tracker.navigator_mut().controller(STATUS_SELECT).unwrap().is_confirming());

    press(&mut tracker, KeyCode::Enter);
    press(&mut tracker, KeyCode::Char('y'));
    assert!(tracker.navigator_mut().controller(STATUS_SELECT).unwrap().is_saving());

    assert!(tracker.next_delivery().await);
    assert_eq!(tracker.current_screen(), ScreenId::AngelSelection);
    assert_eq!(store.get("4A").await.unwrap().status(), Some(Status::Out));
}

#[tokio::test(start_paused = true)]
async fn test_leaving_status_select_cancels_the_update() {
    let (mut tracker, store) = tracker();

    press(&mut tracker, KeyCode::Char('1'));
    type_text(&mut tracker, "12");
    assert!(tracker.next_delivery().await);
    press(&mut tracker, KeyCode::Enter);
    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Enter);
    press(&mut tracker, KeyCode::Esc);

    assert_eq!(tracker.current_screen(), ScreenId::AngelSelection);
    assert!(!tracker.executor().is_in_flight("status-select/12A"));

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    tracker.poll_deliveries();
    assert_eq!(tracker.current_screen(), ScreenId::AngelSelection);
    assert_eq!(store.get("12A").await.unwrap().status(), Some(Status::NotStarted));
}
