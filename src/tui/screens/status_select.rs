use std::any::Any;

use anyhow::bail;
use crossterm::event::{KeyCode, KeyEvent};
use log::{info, warn};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::model::{Angel, Attribute, Status};
use crate::nav::{Controller, ViewSnapshot};
use crate::query::{QueryError, QueryHandle, QueryOptions};
use crate::tui::command::{Command, Delivery, ScreenId, ScreenMsg};
use crate::tui::screen::{Screen, Services};
use crate::tui::theme::Theme;
use crate::tui::widgets::Selection;

/// Change the status of the angel handed over by the previous screen.
///
/// The write is single-flight per angel: a second Enter while the first
/// update is pending is refused instead of queued.
pub struct StatusSelect {
    services: Services,
    angel: Option<Angel>,
    selection: Selection,
    confirming: Option<Status>,
    pending: Option<QueryHandle>,
    message: Option<String>,
}

impl StatusSelect {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            angel: None,
            selection: Selection::with_selection(),
            confirming: None,
            pending: None,
            message: None,
        }
    }

    /// Hand-off from the screen that opened this one.
    pub fn set_angel(&mut self, angel: Angel) {
        let current = angel.status().unwrap_or(Status::NotStarted);
        let idx = Status::ALL.iter().position(|status| *status == current);
        self.selection.select(idx);
        self.angel = Some(angel);
    }

    pub fn angel(&self) -> Option<&Angel> {
        self.angel.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.pending.as_ref().is_some_and(QueryHandle::is_live)
    }

    fn chosen(&self) -> Option<Status> {
        self.selection
            .selected()
            .and_then(|idx| Status::ALL.get(idx).copied())
    }

    fn request(&mut self, next: Status) -> Command {
        let Some(angel) = &self.angel else {
            return Command::None;
        };
        let current = angel.status().unwrap_or(Status::NotStarted);

        if let Err(err) = current.check_transition(next) {
            self.message = Some(err.to_string());
            return Command::None;
        }
        if current.requires_confirmation() && self.confirming != Some(next) {
            self.confirming = Some(next);
            self.message = Some(format!(
                "{} is marked {}. Press y to confirm the change to {}, n to cancel",
                angel.id(),
                current,
                next
            ));
            return Command::None;
        }
        self.confirming = None;

        // Holding needs the missing items, picked on their own screen.
        if next == Status::Hold {
            self.message = None;
            return Command::open_angel(ScreenId::Hold, angel.clone(), true);
        }
        self.save(next);
        Command::None
    }

    fn save(&mut self, next: Status) {
        let Some(angel) = &self.angel else {
            return;
        };
        let id = angel.id().to_string();
        let store = self.services.store.clone();

        let submitted = self.services.executor.submit(
            format!("status-select/{id}"),
            QueryOptions::single_flight(),
            move |_| async move {
                if !store.exists(&id).await? {
                    bail!("angel {} no longer exists", id);
                }
                store.update(&id, Attribute::Status, next.as_str()).await?;
                Ok::<_, anyhow::Error>(store.get(&id).await?)
            },
            ScreenMsg::updated(ScreenId::StatusSelect),
        );

        match submitted {
            Ok(handle) => {
                self.pending = Some(handle);
                self.message = Some(format!("Saving {next}..."));
            }
            Err(QueryError::AlreadyInFlight(_)) => {
                self.message = Some("An update for this angel is already in progress".to_string());
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }
}

impl Controller for StatusSelect {
    fn on_enter(&mut self, snapshot: Option<ViewSnapshot>) {
        self.angel = None;
        self.selection = Selection::with_selection();
        self.confirming = None;
        self.pending = None;
        self.message = None;

        // Coming back from the hold screen without holding.
        if let Some(Ok(angel)) = snapshot.map(|s| s.downcast::<Angel>()) {
            self.set_angel(angel);
        }
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
        match self.angel.take() {
            Some(angel) => ViewSnapshot::new(angel),
            None => ViewSnapshot::empty(),
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Screen for StatusSelect {
    fn handle_key(&mut self, key: KeyEvent) -> Command {
        if let Some(next) = self.confirming {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => return self.request(next),
                _ => {
                    self.confirming = None;
                    self.message = None;
                }
            }
            return Command::None;
        }

        match key.code {
            KeyCode::Esc => Command::Back,
            KeyCode::Char('i') => match &self.angel {
                Some(angel) => Command::open_angel(ScreenId::AngelInfo, angel.clone(), true),
                None => Command::None,
            },
            KeyCode::Enter => match self.chosen() {
                Some(next) => self.request(next),
                None => Command::None,
            },
            code => {
                self.selection.handle_key(code, Status::ALL.len());
                Command::None
            }
        }
    }

    fn handle_delivery(&mut self, delivery: Delivery) -> Command {
        let Delivery::Updated(result) = delivery else {
            return Command::None;
        };
        self.pending = None;

        match result {
            Ok(angel) => {
                info!(
                    "Angel {} is now {}",
                    angel.id(),
                    angel.status().map(|s| s.to_string()).unwrap_or_default()
                );
                self.angel = Some(angel);
                Command::Back
            }
            Err(QueryError::Cancelled) => Command::None,
            Err(err) => {
                warn!("Status update failed: {}", err);
                self.message = Some(err.to_string());
                Command::None
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [info_area, list_area, message_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let info = match &self.angel {
            Some(angel) => {
                let status = angel.status();
                Line::from(vec![
                    Span::styled(format!("Angel {}  ", angel.id()), theme.title_style()),
                    Span::raw("current status: "),
                    Span::styled(
                        status.map(|s| s.to_string()).unwrap_or_else(|| "?".to_string()),
                        Style::default().fg(theme.status_color(status)),
                    ),
                ])
            }
            None => Line::from(Span::styled("No angel selected", theme.warning_style())),
        };
        frame.render_widget(
            Paragraph::new(info).block(Block::default().borders(Borders::ALL)),
            info_area,
        );

        let items: Vec<ListItem> = Status::ALL
            .iter()
            .map(|status| {
                ListItem::new(Span::styled(
                    format!("  {status}"),
                    Style::default().fg(theme.status_color(Some(*status))),
                ))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("New status"))
            .highlight_style(theme.selected_style());
        let mut state = ListState::default().with_selected(self.selection.selected());
        frame.render_stateful_widget(list, list_area, &mut state);

        if let Some(message) = &self.message {
            let style = if self.confirming.is_some() {
                theme.warning_style()
            } else if self.is_saving() {
                theme.info_style()
            } else {
                theme.error_style()
            };
            frame.render_widget(Paragraph::new(message.as_str()).style(style), message_area);
        }
    }

    fn status(&self) -> Option<String> {
        self.is_saving().then(|| "Saving...".to_string())
    }

    fn key_bindings(&self) -> Vec<(&'static str, &'static str)> {
        if self.confirming.is_some() {
            return vec![("y", "Confirm"), ("any", "Cancel")];
        }
        vec![
            ("↑/↓", "Move"),
            ("Enter", "Apply"),
            ("i", "Details"),
            ("Esc", "Back"),
        ]
    }
}
