use angel_tracker::model::{Attribute, Status};
use angel_tracker::store::RecordStore;
use angel_tracker::store::actions::ON_SITE;
use angel_tracker::tui::ScreenId;
use angel_tracker::tui::screens::{ANGEL_SELECTION, HOLD, STATUS_SELECT};
use crossterm::event::KeyCode;

use super::{press, tracker, type_text};

#[tokio::test(start_paused = true)]
async fn test_hold_records_missing_items_and_returns_to_family() {
    let (mut tracker, store) = tracker();

    press(&mut tracker, KeyCode::Char('1'));
    type_text(&mut tracker, "12");
    assert!(tracker.next_delivery().await);
    press(&mut tracker, KeyCode::Enter);

    // NOT_STARTED is selected; two steps down is HOLD.
    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Enter);
    assert_eq!(tracker.current_screen(), ScreenId::Hold);
    assert!(tracker.navigator().is_preserved(ScreenId::StatusSelect));
    let hold = tracker.navigator_mut().controller(HOLD).unwrap();
    assert_eq!(hold.angel().unwrap().id(), "12A");
    assert!(hold.labels().contains(&"DOLL HOUSE"));

    // Backing out resumes the status screen on the same angel.
    press(&mut tracker, KeyCode::Esc);
    assert_eq!(tracker.current_screen(), ScreenId::StatusSelect);
    let screen = tracker.navigator_mut().controller(STATUS_SELECT).unwrap();
    assert_eq!(screen.angel().unwrap().id(), "12A");

    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Enter);
    assert_eq!(tracker.current_screen(), ScreenId::Hold);

    // SHIRTS is first, the wish comes after the five fixed items.
    press(&mut tracker, KeyCode::Char(' '));
    for _ in 0..5 {
        press(&mut tracker, KeyCode::Down);
    }
    press(&mut tracker, KeyCode::Char(' '));
    let hold = tracker.navigator_mut().controller(HOLD).unwrap();
    assert_eq!(hold.missing(), vec!["SHIRTS", "DOLL HOUSE"]);

    press(&mut tracker, KeyCode::Enter);
    assert!(tracker.navigator_mut().controller(HOLD).unwrap().is_saving());

    assert!(tracker.next_delivery().await);
    assert_eq!(tracker.current_screen(), ScreenId::AngelSelection);
    assert!(!tracker.navigator().is_preserved(ScreenId::StatusSelect));

    let angel = store.get("12A").await.unwrap();
    assert_eq!(angel.status(), Some(Status::Hold));
    assert_eq!(angel.get(Attribute::Missing), Some("SHIRTS;DOLL HOUSE"));
    assert_eq!(angel.get(Attribute::Location), Some(ON_SITE));

    assert!(tracker.next_delivery().await);
    let selection = tracker.navigator_mut().controller(ANGEL_SELECTION).unwrap();
    let refreshed = selection.angels().iter().find(|a| a.id() == "12A").unwrap();
    assert_eq!(refreshed.status(), Some(Status::Hold));
}

#[tokio::test(start_paused = true)]
async fn test_clearing_every_item_completes_a_held_angel() {
    let (mut tracker, store) = tracker();

    press(&mut tracker, KeyCode::Char('1'));
    type_text(&mut tracker, "3");
    assert!(tracker.next_delivery().await);
    press(&mut tracker, KeyCode::Enter);

    // HOLD is already selected for 3A.
    press(&mut tracker, KeyCode::Enter);
    assert_eq!(tracker.current_screen(), ScreenId::Hold);

    press(&mut tracker, KeyCode::Enter);
    let hold = tracker.navigator_mut().controller(HOLD).unwrap();
    assert!(hold.is_confirming());
    assert!(hold.message().unwrap().contains("COMPLETE"));

    press(&mut tracker, KeyCode::Char('n'));
    assert!(!tracker.navigator_mut().controller(HOLD).unwrap().is_confirming());
    assert_eq!(store.get("3A").await.unwrap().status(), Some(Status::Hold));

    press(&mut tracker, KeyCode::Enter);
    press(&mut tracker, KeyCode::Char('y'));
    assert!(tracker.navigator_mut().controller(HOLD).unwrap().is_saving());

    assert!(tracker.next_delivery().await);
    assert_eq!(tracker.current_screen(), ScreenId::AngelSelection);
    let angel = store.get("3A").await.unwrap();
    assert_eq!(angel.status(), Some(Status::Complete));
    assert!(angel.missing().is_empty());
}
