use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use log::debug;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::model::{Angel, Attribute};
use crate::nav::{Controller, ViewSnapshot};
use crate::query::{QueryError, QueryHandle, QueryOptions};
use crate::store::Filter;
use crate::tui::command::{Command, Delivery, ScreenId, ScreenMsg};
use crate::tui::screen::{Screen, Services};
use crate::tui::theme::Theme;
use crate::tui::widgets::{Selection, TextInput};

pub(crate) const FAMILY_QUERY: &str = "angel-selection/family";

#[derive(Debug, Clone)]
struct SelectionState {
    family: TextInput,
    angels: Vec<Angel>,
    selection: Selection,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            family: TextInput::new()
                .accepting(|c| c.is_ascii_digit())
                .with_max_len(6),
            angels: Vec::new(),
            selection: Selection::new(),
        }
    }
}

/// Pick one member of a family by typing the family number.
///
/// Every keystroke re-submits the family lookup under one key, so only the
/// lookup for the settled input ever runs.
pub struct AngelSelection {
    services: Services,
    state: SelectionState,
    pending: Option<QueryHandle>,
    error: Option<String>,
}

impl AngelSelection {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            state: SelectionState::default(),
            pending: None,
            error: None,
        }
    }

    pub fn family(&self) -> &str {
        self.state.family.value()
    }

    pub fn angels(&self) -> &[Angel] {
        &self.state.angels
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.as_ref().is_some_and(QueryHandle::is_live)
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    fn search(&mut self) {
        if self.state.family.is_empty() {
            self.cancel_pending();
            self.state.angels.clear();
            self.state.selection.clamp(0);
            return;
        }

        let store = self.services.store.clone();
        let filter = Filter::family(self.state.family.value());
        let submitted = self.services.executor.submit(
            FAMILY_QUERY,
            QueryOptions::debounced(self.services.search_debounce),
            move |_| async move { Ok::<_, anyhow::Error>(store.query(&filter).await?) },
            ScreenMsg::angels(ScreenId::AngelSelection),
        );

        match submitted {
            Ok(handle) => self.pending = Some(handle),
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

impl Controller for AngelSelection {
    fn on_enter(&mut self, snapshot: Option<ViewSnapshot>) {
        self.error = None;
        match snapshot.map(|s| s.downcast::<SelectionState>()) {
            Some(Ok(state)) => {
                self.state = state;
                // Statuses may have changed while we were away.
                self.search();
            }
            _ => self.state = SelectionState::default(),
        }
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        self.cancel_pending();
        ViewSnapshot::new(self.state.clone())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Screen for AngelSelection {
    fn handle_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Esc => Command::Back,
            KeyCode::Enter => {
                match self
                    .state
                    .selection
                    .selected()
                    .and_then(|idx| self.state.angels.get(idx))
                {
                    Some(angel) => Command::open_angel(ScreenId::StatusSelect, angel.clone(), true),
                    None => Command::None,
                }
            }
            code @ (KeyCode::Char(_) | KeyCode::Backspace) => {
                if self.state.family.handle_key(code) {
                    self.search();
                }
                Command::None
            }
            code => {
                self.state.selection.handle_key(code, self.state.angels.len());
                Command::None
            }
        }
    }

    fn handle_delivery(&mut self, delivery: Delivery) -> Command {
        let Delivery::Angels(result) = delivery else {
            return Command::None;
        };
        self.pending = None;

        match result {
            Ok(angels) => {
                debug!("Family '{}' has {} angels", self.family(), angels.len());
                self.state.angels = angels;
                self.state.selection.clamp(self.state.angels.len());
                self.error = None;
            }
            Err(QueryError::Cancelled) => {}
            Err(err) => self.error = Some(err.to_string()),
        }
        Command::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [input_area, list_area, error_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let input = Paragraph::new(Line::from(vec![
            Span::styled(self.state.family.value().to_string(), Style::default().fg(theme.text)),
            Span::styled("▏", Style::default().fg(theme.lavender)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Family number"));
        frame.render_widget(input, input_area);

        let items: Vec<ListItem> = self
            .state
            .angels
            .iter()
            .map(|angel| {
                let status = angel.status();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<8}", angel.id()), theme.title_style()),
                    Span::raw(format!(
                        "{:<8}{:<6}",
                        angel.get(Attribute::Sex).unwrap_or("-"),
                        angel.get(Attribute::Age).unwrap_or("-")
                    )),
                    Span::styled(
                        status.map(|s| s.to_string()).unwrap_or_else(|| "?".to_string()),
                        Style::default().fg(theme.status_color(status)),
                    ),
                ]))
            })
            .collect();

        let title = if self.state.family.is_empty() {
            "Angels".to_string()
        } else {
            format!("Angels in family {}", self.state.family.value())
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(theme.selected_style());
        let mut state = ListState::default().with_selected(self.state.selection.selected());
        frame.render_stateful_widget(list, list_area, &mut state);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(theme.error_style()),
                error_area,
            );
        }
    }

    fn status(&self) -> Option<String> {
        self.is_loading().then(|| "Searching...".to_string())
    }

    fn key_bindings(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("0-9", "Family number"),
            ("↑/↓", "Move"),
            ("Enter", "Change status"),
            ("Esc", "Back"),
        ]
    }
}
