use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info, warn};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::model::{Angel, Attribute};
use crate::nav::{Controller, ViewSnapshot};
use crate::query::{QueryError, QueryHandle, QueryOptions};
use crate::store::actions;
use crate::tui::command::{Command, Delivery, ScreenId, ScreenMsg};
use crate::tui::screen::{Screen, Services};
use crate::tui::theme::Theme;
use crate::tui::widgets::{Selection, TextInput};

pub(crate) const LIST_QUERY: &str = "request/list";
pub(crate) const LEND_QUERY: &str = "request/lend";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestField {
    Count,
    Requestee,
    Results,
}

impl RequestField {
    fn next(self) -> Self {
        match self {
            RequestField::Count => RequestField::Requestee,
            RequestField::Requestee => RequestField::Results,
            RequestField::Results => RequestField::Count,
        }
    }
}

#[derive(Debug, Clone)]
struct RequestState {
    count: TextInput,
    requestee: TextInput,
    focus: RequestField,
    angels: Vec<Angel>,
    selection: Selection,
}

impl Default for RequestState {
    fn default() -> Self {
        Self {
            count: TextInput::new()
                .accepting(|c| c.is_ascii_digit())
                .with_max_len(3),
            requestee: TextInput::new().with_max_len(48),
            focus: RequestField::Count,
            angels: Vec::new(),
            selection: Selection::new(),
        }
    }
}

/// Lend a batch of angels nobody has started on to an outside requestee.
///
/// The count lists that many NOT_STARTED angels; rows can be dropped from
/// the batch before it is lent. Opening a row keeps the batch for `Back`.
pub struct Request {
    services: Services,
    state: RequestState,
    listing: Option<QueryHandle>,
    lending: Option<QueryHandle>,
    message: Option<String>,
}

impl Request {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            state: RequestState::default(),
            listing: None,
            lending: None,
            message: None,
        }
    }

    pub fn angels(&self) -> &[Angel] {
        &self.state.angels
    }

    pub fn focus(&self) -> RequestField {
        self.state.focus
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        [&self.listing, &self.lending]
            .into_iter()
            .flatten()
            .any(QueryHandle::is_live)
    }

    fn cancel_pending(&mut self) {
        for handle in [self.listing.take(), self.lending.take()]
            .into_iter()
            .flatten()
        {
            handle.cancel();
        }
    }

    fn list(&mut self) {
        let count = match self.state.count.value().parse::<usize>() {
            Ok(count) if count > 0 => count,
            _ => {
                self.message = Some("Enter how many angels are requested".to_string());
                return;
            }
        };

        let store = self.services.store.clone();
        let submitted = self.services.executor.submit(
            LIST_QUERY,
            QueryOptions::default(),
            move |_| async move {
                Ok::<_, anyhow::Error>(actions::available(store.as_ref(), count).await?)
            },
            ScreenMsg::angels(ScreenId::Request),
        );

        match submitted {
            Ok(handle) => {
                self.listing = Some(handle);
                self.message = None;
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn lend(&mut self) {
        if self.state.angels.is_empty() {
            self.message = Some("List the angels to lend first".to_string());
            return;
        }
        let requestee = self.state.requestee.value().trim().to_string();
        if requestee.is_empty() {
            self.state.focus = RequestField::Requestee;
            self.message = Some("Enter who is taking the angels".to_string());
            return;
        }

        let ids: Vec<String> = self
            .state
            .angels
            .iter()
            .map(|angel| angel.id().to_string())
            .collect();
        let store = self.services.store.clone();
        let submitted = self.services.executor.submit(
            LEND_QUERY,
            QueryOptions::single_flight(),
            move |_| async move {
                Ok::<_, anyhow::Error>(actions::lend(store.as_ref(), &ids, &requestee).await?)
            },
            ScreenMsg::lent(ScreenId::Request),
        );

        match submitted {
            Ok(handle) => {
                self.lending = Some(handle);
                self.message = Some("Lending...".to_string());
            }
            Err(QueryError::AlreadyInFlight(_)) => {
                self.message = Some("These angels are already being lent".to_string());
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn remove_selected(&mut self) {
        if let Some(idx) = self.state.selection.selected() {
            if idx < self.state.angels.len() {
                let removed = self.state.angels.remove(idx);
                debug!("Dropped {} from the batch", removed.id());
            }
        }
        self.state.selection.clamp(self.state.angels.len());
    }
}

impl Controller for Request {
    fn on_enter(&mut self, snapshot: Option<ViewSnapshot>) {
        self.message = None;
        self.state = match snapshot.map(|s| s.downcast::<RequestState>()) {
            Some(Ok(state)) => state,
            _ => RequestState::default(),
        };
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        self.cancel_pending();
        ViewSnapshot::new(self.state.clone())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Screen for Request {
    fn handle_key(&mut self, key: KeyEvent) -> Command {
        match (key.code, self.state.focus) {
            (KeyCode::Esc, _) => Command::Back,
            (KeyCode::Tab, focus) => {
                self.state.focus = focus.next();
                Command::None
            }
            (KeyCode::Enter, RequestField::Count) => {
                self.list();
                Command::None
            }
            (KeyCode::Enter, RequestField::Requestee) => {
                self.lend();
                Command::None
            }
            (KeyCode::Enter, RequestField::Results) => {
                match self
                    .state
                    .selection
                    .selected()
                    .and_then(|idx| self.state.angels.get(idx))
                {
                    Some(angel) => Command::open_angel(ScreenId::AngelInfo, angel.clone(), true),
                    None => Command::None,
                }
            }
            (KeyCode::Delete, RequestField::Results) => {
                self.remove_selected();
                Command::None
            }
            (code, RequestField::Count) => {
                self.state.count.handle_key(code);
                Command::None
            }
            (code, RequestField::Requestee) => {
                self.state.requestee.handle_key(code);
                Command::None
            }
            (code, RequestField::Results) => {
                self.state.selection.handle_key(code, self.state.angels.len());
                Command::None
            }
        }
    }

    fn handle_delivery(&mut self, delivery: Delivery) -> Command {
        match delivery {
            Delivery::Angels(result) => {
                self.listing = None;
                match result {
                    Ok(angels) => {
                        self.message = angels
                            .is_empty()
                            .then(|| "No angels are waiting to be started".to_string());
                        self.state.angels = angels;
                        self.state.selection.clamp(self.state.angels.len());
                    }
                    Err(QueryError::Cancelled) => {}
                    Err(err) => self.message = Some(err.to_string()),
                }
                Command::None
            }
            Delivery::Lent(result) => {
                self.lending = None;
                match result {
                    Ok(lent) => {
                        info!("Lent {} angels", lent.len());
                        Command::Back
                    }
                    Err(QueryError::Cancelled) => Command::None,
                    Err(err) => {
                        warn!("Lending failed: {}", err);
                        self.message = Some(err.to_string());
                        Command::None
                    }
                }
            }
            Delivery::Updated(_) => Command::None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [count_area, requestee_area, list_area, message_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let focus = self.state.focus;
        let field = |input: &TextInput, title: &'static str, focused: bool| {
            let border = if focused {
                Style::default().fg(theme.lavender)
            } else {
                theme.muted_style()
            };
            let mut spans = vec![Span::styled(
                input.value().to_string(),
                Style::default().fg(theme.text),
            )];
            if focused {
                spans.push(Span::styled("▏", Style::default().fg(theme.lavender)));
            }
            Paragraph::new(Line::from(spans)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title),
            )
        };
        frame.render_widget(
            field(
                &self.state.count,
                "Number of angels",
                focus == RequestField::Count,
            ),
            count_area,
        );
        frame.render_widget(
            field(
                &self.state.requestee,
                "Requestee",
                focus == RequestField::Requestee,
            ),
            requestee_area,
        );

        let items: Vec<ListItem> = self
            .state
            .angels
            .iter()
            .map(|angel| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<8}", angel.id()), theme.title_style()),
                    Span::raw(format!(
                        "{:<8}{:<6}",
                        angel.get(Attribute::Sex).unwrap_or("-"),
                        angel.get(Attribute::Age).unwrap_or("-")
                    )),
                    Span::styled(
                        angel.get(Attribute::Wish).unwrap_or("").to_string(),
                        theme.muted_style(),
                    ),
                ]))
            })
            .collect();
        let border = if focus == RequestField::Results {
            Style::default().fg(theme.lavender)
        } else {
            theme.muted_style()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!("Batch ({})", self.state.angels.len())),
            )
            .highlight_style(theme.selected_style());
        let mut state = ListState::default().with_selected(self.state.selection.selected());
        frame.render_stateful_widget(list, list_area, &mut state);

        if let Some(message) = &self.message {
            let style = if self.is_busy() {
                theme.info_style()
            } else {
                theme.warning_style()
            };
            frame.render_widget(Paragraph::new(message.as_str()).style(style), message_area);
        }
    }

    fn status(&self) -> Option<String> {
        if self.lending.as_ref().is_some_and(QueryHandle::is_live) {
            Some("Lending...".to_string())
        } else if self.listing.as_ref().is_some_and(QueryHandle::is_live) {
            Some("Listing...".to_string())
        } else {
            None
        }
    }

    fn key_bindings(&self) -> Vec<(&'static str, &'static str)> {
        match self.state.focus {
            RequestField::Count => vec![("0-9", "Count"), ("Enter", "List"), ("Tab", "Next field")],
            RequestField::Requestee => vec![("Enter", "Lend"), ("Tab", "Next field")],
            RequestField::Results => vec![
                ("↑/↓", "Move"),
                ("Enter", "Details"),
                ("Del", "Drop from batch"),
                ("Tab", "Next field"),
            ],
        }
    }
}
