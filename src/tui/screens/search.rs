use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
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

pub(crate) const KEYWORD_QUERY: &str = "search/keyword";

#[derive(Debug, Clone)]
struct SearchState {
    attribute: Attribute,
    needle: TextInput,
    exact: bool,
    results: Vec<Angel>,
    selection: Selection,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            attribute: Attribute::Wish,
            needle: TextInput::new().with_max_len(64),
            exact: false,
            results: Vec::new(),
            selection: Selection::new(),
        }
    }
}

/// Keyword search over one attribute. Opening a result keeps this screen's
/// query and results so that coming back resumes them.
pub struct Search {
    services: Services,
    state: SearchState,
    pending: Option<QueryHandle>,
    error: Option<String>,
}

impl Search {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            state: SearchState::default(),
            pending: None,
            error: None,
        }
    }

    pub fn attribute(&self) -> Attribute {
        self.state.attribute
    }

    pub fn needle(&self) -> &str {
        self.state.needle.value()
    }

    pub fn results(&self) -> &[Angel] {
        &self.state.results
    }

    pub fn selected(&self) -> Option<&Angel> {
        self.state
            .selection
            .selected()
            .and_then(|idx| self.state.results.get(idx))
    }

    pub fn is_loading(&self) -> bool {
        self.pending.as_ref().is_some_and(QueryHandle::is_live)
    }

    fn cycle_attribute(&mut self, forward: bool) {
        let len = Attribute::ALL.len();
        let idx = Attribute::ALL
            .iter()
            .position(|a| *a == self.state.attribute)
            .unwrap_or(0);
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.state.attribute = Attribute::ALL[next];
    }

    fn search(&mut self) {
        if self.state.needle.is_empty() {
            if let Some(handle) = self.pending.take() {
                handle.cancel();
            }
            self.state.results.clear();
            self.state.selection.clamp(0);
            return;
        }

        let store = self.services.store.clone();
        let filter = Filter::keyword(
            self.state.attribute,
            self.state.needle.value(),
            self.state.exact,
        );
        let submitted = self.services.executor.submit(
            KEYWORD_QUERY,
            QueryOptions::debounced(self.services.search_debounce),
            move |_| async move { Ok::<_, anyhow::Error>(store.query(&filter).await?) },
            ScreenMsg::angels(ScreenId::Search),
        );

        match submitted {
            Ok(handle) => self.pending = Some(handle),
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

impl Controller for Search {
    fn on_enter(&mut self, snapshot: Option<ViewSnapshot>) {
        self.error = None;
        self.state = match snapshot.map(|s| s.downcast::<SearchState>()) {
            Some(Ok(state)) => state,
            _ => SearchState::default(),
        };
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
        ViewSnapshot::new(self.state.clone())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Screen for Search {
    fn handle_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Esc => Command::Back,
            KeyCode::Enter => match self.selected() {
                Some(angel) => Command::open_angel(ScreenId::AngelInfo, angel.clone(), true),
                None => Command::None,
            },
            KeyCode::Tab | KeyCode::BackTab => {
                self.cycle_attribute(key.code == KeyCode::Tab);
                self.search();
                Command::None
            }
            KeyCode::F(2) => {
                self.state.exact = !self.state.exact;
                self.search();
                Command::None
            }
            code @ (KeyCode::Char(_) | KeyCode::Backspace) => {
                if self.state.needle.handle_key(code) {
                    self.search();
                }
                Command::None
            }
            code => {
                self.state
                    .selection
                    .handle_key(code, self.state.results.len());
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
            Ok(results) => {
                self.state.results = results;
                self.state.selection.clamp(self.state.results.len());
                self.error = None;
            }
            Err(QueryError::Cancelled) => {}
            Err(err) => self.error = Some(err.to_string()),
        }
        Command::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [query_area, results_area, error_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let query = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", self.state.attribute), theme.title_style()),
            Span::styled(
                if self.state.exact { "= " } else { "~ " },
                Style::default().fg(theme.peach),
            ),
            Span::styled(self.state.needle.value().to_string(), Style::default().fg(theme.text)),
            Span::styled("▏", Style::default().fg(theme.lavender)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Search"));
        frame.render_widget(query, query_area);

        let attribute = self.state.attribute;
        let items: Vec<ListItem> = self
            .state
            .results
            .iter()
            .map(|angel| {
                let status = angel.status();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<8}", angel.id()), theme.title_style()),
                    Span::styled(
                        format!("{:<12}", status.map(|s| s.to_string()).unwrap_or_default()),
                        Style::default().fg(theme.status_color(status)),
                    ),
                    Span::raw(angel.get(attribute).unwrap_or("").to_string()),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} results", self.state.results.len())),
            )
            .highlight_style(theme.selected_style());
        let mut state = ListState::default().with_selected(self.state.selection.selected());
        frame.render_stateful_widget(list, results_area, &mut state);

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
            ("Tab", "Attribute"),
            ("F2", "Exact match"),
            ("↑/↓", "Move"),
            ("Enter", "Details"),
            ("Esc", "Back"),
        ]
    }
}
