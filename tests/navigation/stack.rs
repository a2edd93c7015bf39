use angel_tracker::nav::{Entry, NavigationError};

use super::{Event, Page, navigator};

#[test]
fn test_n_navigations_unwind_with_n_backs() {
    let (mut nav, _) = navigator();
    let path = [
        Page::List,
        Page::Detail,
        Page::Settings,
        Page::List,
        Page::Detail,
    ];

    let mut visited = vec![Page::Menu];
    for target in path {
        nav.navigate(target).unwrap();
        visited.push(target);
        assert_eq!(nav.depth(), visited.len() - 1);
    }

    while visited.len() > 1 {
        visited.pop();
        let transition = nav.back().unwrap();
        assert_eq!(transition.to, *visited.last().unwrap());
        assert_eq!(nav.current(), transition.to);
    }

    assert_eq!(nav.current(), Page::Menu);
    assert!(!nav.can_go_back());
    assert_eq!(nav.back().unwrap_err(), NavigationError::EmptyStack);
    assert_eq!(nav.current(), Page::Menu);
}

#[test]
fn test_leave_happens_before_enter() {
    let (mut nav, journal) = navigator();

    nav.navigate(Page::List).unwrap();
    nav.back().unwrap();

    assert_eq!(
        super::events(&journal),
        vec![
            Event::Left(Page::Menu),
            Event::EnteredFresh(Page::List),
            Event::Left(Page::List),
            Event::EnteredFresh(Page::Menu),
        ]
    );
}

#[test]
fn test_back_without_preservation_builds_fresh() {
    let (mut nav, _) = navigator();

    nav.navigate(Page::List).unwrap();
    nav.navigate(Page::Detail).unwrap();
    let transition = nav.back().unwrap();

    assert_eq!(transition.entry, Entry::Fresh);
    assert_eq!(nav.preserved_count(), 0);
}

#[test]
fn test_unknown_view_is_rejected_without_side_effects() {
    use angel_tracker::nav::{Controller, Navigator, ViewRegistry, ViewSnapshot};
    use std::any::Any;

    struct Blank;
    impl Controller for Blank {
        fn on_enter(&mut self, _snapshot: Option<ViewSnapshot>) {}
        fn on_leave(&mut self) -> ViewSnapshot {
            ViewSnapshot::empty()
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    let mut registry: ViewRegistry<Page> = ViewRegistry::new();
    registry
        .register(Page::Menu, "menu.layout", Box::new(Blank))
        .unwrap();
    let mut nav = Navigator::start(registry, Page::Menu).unwrap();

    assert!(matches!(
        nav.navigate(Page::Settings),
        Err(NavigationError::UnknownView(_))
    ));
    assert_eq!(nav.current(), Page::Menu);
    assert_eq!(nav.depth(), 0);
}
