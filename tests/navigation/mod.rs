/// Navigator tests
///
/// Screens are stand-in controllers that record every enter/leave so the
/// tests can check what the navigator handed them.

pub mod preservation;
pub mod stack;

use std::any::Any;
use std::sync::{Arc, Mutex};

use angel_tracker::nav::{Controller, Navigator, ViewKey, ViewRegistry, ViewSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Menu,
    List,
    Detail,
    Settings,
}

pub const LIST: ViewKey<Page, Recorder> = ViewKey::new(Page::List);

/// Visible state of a list view: what was typed, what was loaded, and where
/// the cursor sat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub query: String,
    pub rows: Vec<String>,
    pub cursor: Option<usize>,
}

/// What a controller observed, shared with the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    EnteredFresh(Page),
    Resumed(Page, ListState),
    Left(Page),
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

pub struct Recorder {
    page: Page,
    pub state: ListState,
    journal: Journal,
}

impl Recorder {
    pub fn new(page: Page, journal: Journal) -> Self {
        Self {
            page,
            state: ListState::default(),
            journal,
        }
    }
}

impl Controller for Recorder {
    fn on_enter(&mut self, snapshot: Option<ViewSnapshot>) {
        let event = match snapshot.map(|s| s.downcast::<ListState>()) {
            Some(Ok(state)) => {
                self.state = state.clone();
                Event::Resumed(self.page, state)
            }
            _ => {
                self.state = ListState::default();
                Event::EnteredFresh(self.page)
            }
        };
        self.journal.lock().unwrap().push(event);
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        self.journal.lock().unwrap().push(Event::Left(self.page));
        ViewSnapshot::new(self.state.clone())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A navigator over every page, started on the menu, plus its journal.
pub fn navigator() -> (Navigator<Page>, Journal) {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let mut registry: ViewRegistry<Page> = ViewRegistry::new();

    registry
        .register(
            Page::Menu,
            "menu.layout",
            Box::new(Recorder::new(Page::Menu, journal.clone())),
        )
        .unwrap();
    registry
        .register_typed(
            LIST,
            "list.layout",
            Recorder::new(Page::List, journal.clone()),
            |c| c as Box<dyn Controller>,
        )
        .unwrap();
    registry
        .register(
            Page::Detail,
            "detail.layout",
            Box::new(Recorder::new(Page::Detail, journal.clone())),
        )
        .unwrap();
    registry
        .register(
            Page::Settings,
            "settings.layout",
            Box::new(Recorder::new(Page::Settings, journal.clone())),
        )
        .unwrap();

    let navigator = Navigator::start(registry, Page::Menu).unwrap();
    journal.lock().unwrap().clear();
    (navigator, journal)
}

pub fn events(journal: &Journal) -> Vec<Event> {
    std::mem::take(&mut *journal.lock().unwrap())
}
