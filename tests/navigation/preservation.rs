use angel_tracker::nav::Entry;

use super::{Event, LIST, ListState, Page, events, navigator};

fn typed_list() -> ListState {
    ListState {
        query: "12".to_string(),
        rows: vec!["12A".to_string(), "12B".to_string(), "12C".to_string()],
        cursor: Some(2),
    }
}

#[test]
fn test_preserved_view_resumes_exact_state() {
    let (mut nav, journal) = navigator();
    nav.navigate(Page::List).unwrap();
    nav.controller(LIST).unwrap().state = typed_list();

    nav.navigate_preserving(Page::Detail).unwrap();
    assert!(nav.is_preserved(Page::List));

    let transition = nav.back().unwrap();
    assert_eq!(transition.entry, Entry::Resumed);
    assert_eq!(nav.controller(LIST).unwrap().state, typed_list());
    assert!(!nav.is_preserved(Page::List));
    assert!(events(&journal).contains(&Event::Resumed(Page::List, typed_list())));
}

#[test]
fn test_snapshot_is_consumed_by_one_resume() {
    let (mut nav, _) = navigator();
    nav.navigate(Page::List).unwrap();
    nav.controller(LIST).unwrap().state = typed_list();

    nav.navigate_preserving(Page::Detail).unwrap();
    nav.back().unwrap();
    nav.navigate(Page::Detail).unwrap();

    // Leaving via a plain navigate does not preserve again.
    let transition = nav.back().unwrap();
    assert_eq!(transition.entry, Entry::Fresh);
    assert_eq!(nav.controller(LIST).unwrap().state, ListState::default());
}

#[test]
fn test_fresh_navigation_supersedes_snapshot() {
    let (mut nav, _) = navigator();
    nav.navigate(Page::List).unwrap();
    nav.controller(LIST).unwrap().state = typed_list();
    nav.navigate_preserving(Page::Detail).unwrap();

    nav.navigate(Page::List).unwrap();
    assert!(!nav.is_preserved(Page::List));
    assert_eq!(nav.controller(LIST).unwrap().state, ListState::default());
}

#[test]
fn test_list_detail_round_trip() {
    let (mut nav, journal) = navigator();

    nav.navigate(Page::List).unwrap();
    nav.controller(LIST).unwrap().state = typed_list();
    events(&journal);

    nav.navigate_preserving(Page::Detail).unwrap();
    nav.back().unwrap();

    assert_eq!(
        events(&journal),
        vec![
            Event::Left(Page::List),
            Event::EnteredFresh(Page::Detail),
            Event::Left(Page::Detail),
            Event::Resumed(Page::List, typed_list()),
        ]
    );
    assert_eq!(nav.back_stack(), &[Page::Menu]);

    nav.back().unwrap();
    assert_eq!(nav.current(), Page::Menu);
    assert_eq!(nav.preserved_count(), 0);
}
