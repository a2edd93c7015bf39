use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::nav::{Controller, ViewSnapshot};
use crate::tui::command::{Command, ScreenId};
use crate::tui::screen::Screen;
use crate::tui::theme::Theme;
use crate::tui::widgets::Selection;

struct MenuEntry {
    label: &'static str,
    description: &'static str,
    target: Option<ScreenId>,
}

const ENTRIES: [MenuEntry; 4] = [
    MenuEntry {
        label: "Update status",
        description: "Pick an angel by family number and change its status",
        target: Some(ScreenId::AngelSelection),
    },
    MenuEntry {
        label: "Search",
        description: "Find angels by any attribute",
        target: Some(ScreenId::Search),
    },
    MenuEntry {
        label: "Request",
        description: "Lend a batch of unstarted angels to a requestee",
        target: Some(ScreenId::Request),
    },
    MenuEntry {
        label: "Quit",
        description: "Close the tracker",
        target: None,
    },
];

pub struct MainMenu {
    selection: Selection,
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            selection: Selection::with_selection(),
        }
    }

    fn activate(&self) -> Command {
        match self.selection.selected().and_then(|idx| ENTRIES.get(idx)) {
            Some(MenuEntry {
                target: Some(target),
                ..
            }) => Command::Navigate(*target),
            Some(MenuEntry { target: None, .. }) => Command::Quit,
            None => Command::None,
        }
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for MainMenu {
    fn on_enter(&mut self, _snapshot: Option<ViewSnapshot>) {
        self.selection = Selection::with_selection();
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        ViewSnapshot::empty()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Screen for MainMenu {
    fn handle_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Enter => self.activate(),
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('1') => Command::Navigate(ScreenId::AngelSelection),
            KeyCode::Char('2') => Command::Navigate(ScreenId::Search),
            KeyCode::Char('3') => Command::Navigate(ScreenId::Request),
            code => {
                self.selection.handle_key(code, ENTRIES.len());
                Command::None
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = ENTRIES
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  {}. {}", idx + 1, entry.label), theme.title_style()),
                    Span::styled(format!("  {}", entry.description), theme.muted_style()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(theme.selected_style());
        let mut state = ListState::default().with_selected(self.selection.selected());
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn key_bindings(&self) -> Vec<(&'static str, &'static str)> {
        vec![("↑/↓", "Move"), ("Enter", "Open"), ("1-3", "Jump"), ("q", "Quit")]
    }
}
