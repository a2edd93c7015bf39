use angel_tracker::model::Attribute;
use angel_tracker::tui::ScreenId;
use angel_tracker::tui::screens::{ANGEL_INFO, SEARCH};
use crossterm::event::KeyCode;

use super::{press, tracker, type_text};

fn result_ids(tracker: &mut angel_tracker::AngelTracker) -> Vec<String> {
    tracker
        .navigator_mut()
        .controller(SEARCH)
        .unwrap()
        .results()
        .iter()
        .map(|a| a.id().to_string())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_detail_and_back_resumes_search() {
    let (mut tracker, _) = tracker();

    press(&mut tracker, KeyCode::Char('2'));
    assert_eq!(tracker.current_screen(), ScreenId::Search);

    type_text(&mut tracker, "bike");
    assert!(tracker.next_delivery().await);
    assert_eq!(result_ids(&mut tracker), vec!["3A", "12B"]);

    press(&mut tracker, KeyCode::Down);
    press(&mut tracker, KeyCode::Enter);
    assert_eq!(tracker.current_screen(), ScreenId::AngelInfo);
    assert!(tracker.navigator().is_preserved(ScreenId::Search));
    let info = tracker.navigator_mut().controller(ANGEL_INFO).unwrap();
    assert_eq!(info.angel().unwrap().id(), "12B");

    press(&mut tracker, KeyCode::Esc);
    assert_eq!(tracker.current_screen(), ScreenId::Search);
    assert!(!tracker.navigator().is_preserved(ScreenId::Search));

    let search = tracker.navigator_mut().controller(SEARCH).unwrap();
    assert_eq!(search.needle(), "bike");
    assert_eq!(search.attribute(), Attribute::Wish);
    assert_eq!(search.selected().unwrap().id(), "12B");
    assert_eq!(result_ids(&mut tracker), vec!["3A", "12B"]);
}

#[tokio::test(start_paused = true)]
async fn test_only_the_last_keystroke_is_searched() {
    let (mut tracker, _) = tracker();
    press(&mut tracker, KeyCode::Char('2'));

    type_text(&mut tracker, "puzz");
    assert!(tracker.next_delivery().await);
    assert_eq!(result_ids(&mut tracker), vec!["4A"]);

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    assert_eq!(tracker.poll_deliveries(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_attribute_cycles_and_reentry_starts_fresh() {
    let (mut tracker, _) = tracker();
    press(&mut tracker, KeyCode::Char('2'));

    press(&mut tracker, KeyCode::Tab);
    assert_eq!(
        tracker.navigator_mut().controller(SEARCH).unwrap().attribute(),
        Attribute::Book
    );
    press(&mut tracker, KeyCode::BackTab);
    press(&mut tracker, KeyCode::BackTab);
    assert_eq!(
        tracker.navigator_mut().controller(SEARCH).unwrap().attribute(),
        Attribute::PantSize
    );

    type_text(&mut tracker, "9");
    press(&mut tracker, KeyCode::Esc);
    assert_eq!(tracker.current_screen(), ScreenId::MainMenu);

    press(&mut tracker, KeyCode::Char('2'));
    let search = tracker.navigator_mut().controller(SEARCH).unwrap();
    assert_eq!(search.needle(), "");
    assert_eq!(search.attribute(), Attribute::Wish);
    assert!(!search.is_loading());
}
