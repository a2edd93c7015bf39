use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use log::{info, warn};
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
use crate::tui::widgets::Selection;

const CLOTHES: [&str; 3] = ["SHIRTS", "PANTS", "UNDERWEAR"];
const SHOES: [&str; 2] = ["SHOES", "SOCKS"];

#[derive(Debug, Clone, PartialEq, Eq)]
struct HoldItem {
    section: &'static str,
    label: String,
    checked: bool,
}

/// Everything that can hold an angel up: the fixed clothing and shoe items,
/// then each book, wish and special item it asked for. Items already
/// recorded as missing start checked.
fn hold_items(angel: &Angel) -> Vec<HoldItem> {
    let missing = angel.missing();
    let fixed = CLOTHES
        .iter()
        .map(|item| ("CLOTHES", item.to_string()))
        .chain(SHOES.iter().map(|item| ("SHOES", item.to_string())));
    let requested = [Attribute::Book, Attribute::Wish, Attribute::Special]
        .into_iter()
        .flat_map(|attribute| {
            angel
                .items(attribute)
                .into_iter()
                .map(move |item| (attribute.as_str(), item.to_uppercase()))
        });

    let mut items: Vec<HoldItem> = fixed
        .chain(requested)
        .map(|(section, label)| HoldItem {
            section,
            checked: missing.contains(&label),
            label,
        })
        .collect();

    // Recorded items that no longer match anything stay listed.
    for label in missing {
        if !items.iter().any(|item| item.label == label) {
            items.push(HoldItem {
                section: "OTHER",
                label,
                checked: true,
            });
        }
    }
    items
}

/// Pick what is missing for an angel and put it on hold.
///
/// Submitting with nothing checked offers to mark the angel complete
/// instead, which is how a hold is cleared.
pub struct Hold {
    services: Services,
    angel: Option<Angel>,
    items: Vec<HoldItem>,
    selection: Selection,
    confirming: bool,
    pending: Option<QueryHandle>,
    message: Option<String>,
}

impl Hold {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            angel: None,
            items: Vec::new(),
            selection: Selection::new(),
            confirming: false,
            pending: None,
            message: None,
        }
    }

    /// Hand-off from the status screen.
    pub fn set_angel(&mut self, angel: Angel) {
        self.items = hold_items(&angel);
        self.selection = Selection::new();
        self.selection.clamp(self.items.len());
        self.angel = Some(angel);
    }

    pub fn angel(&self) -> Option<&Angel> {
        self.angel.as_ref()
    }

    /// Labels of every item, in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.label.as_str()).collect()
    }

    /// Checked items, without duplicates.
    pub fn missing(&self) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for item in self.items.iter().filter(|item| item.checked) {
            if !missing.contains(&item.label) {
                missing.push(item.label.clone());
            }
        }
        missing
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn is_saving(&self) -> bool {
        self.pending.as_ref().is_some_and(QueryHandle::is_live)
    }

    fn toggle(&mut self) {
        if let Some(item) = self
            .selection
            .selected()
            .and_then(|idx| self.items.get_mut(idx))
        {
            item.checked = !item.checked;
        }
    }

    fn submit(&mut self) {
        let Some(angel) = &self.angel else {
            return;
        };
        let missing = self.missing();
        if missing.is_empty() && !self.confirming {
            self.confirming = true;
            self.message = Some(format!(
                "Nothing is missing for {}. Press y to mark it COMPLETE, any other key to cancel",
                angel.id()
            ));
            return;
        }
        self.confirming = false;

        let id = angel.id().to_string();
        let store = self.services.store.clone();
        let submitted = self.services.executor.submit(
            format!("hold/{id}"),
            QueryOptions::single_flight(),
            move |_| async move {
                Ok::<_, anyhow::Error>(actions::put_on_hold(store.as_ref(), &id, &missing).await?)
            },
            ScreenMsg::updated(ScreenId::Hold),
        );

        match submitted {
            Ok(handle) => {
                self.pending = Some(handle);
                self.message = Some("Saving...".to_string());
            }
            Err(QueryError::AlreadyInFlight(_)) => {
                self.message = Some("This angel is already being saved".to_string());
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }
}

impl Controller for Hold {
    fn on_enter(&mut self, _snapshot: Option<ViewSnapshot>) {
        self.angel = None;
        self.items.clear();
        self.selection = Selection::new();
        self.confirming = false;
        self.pending = None;
        self.message = None;
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
        ViewSnapshot::empty()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Screen for Hold {
    fn handle_key(&mut self, key: KeyEvent) -> Command {
        if self.confirming {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.submit(),
                _ => {
                    self.confirming = false;
                    self.message = None;
                }
            }
            return Command::None;
        }

        match key.code {
            KeyCode::Esc => Command::Back,
            KeyCode::Char(' ') => {
                self.toggle();
                Command::None
            }
            KeyCode::Enter => {
                self.submit();
                Command::None
            }
            code => {
                self.selection.handle_key(code, self.items.len());
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
                info!("Angel {} saved with {} missing", angel.id(), angel.missing().len());
                self.angel = Some(angel);
                // Past the status screen, back to the family list.
                Command::batch(vec![Command::Back, Command::Back])
            }
            Err(QueryError::Cancelled) => Command::None,
            Err(err) => {
                warn!("Hold failed: {}", err);
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
            Some(angel) => Line::from(vec![
                Span::styled(format!("Angel {}  ", angel.id()), theme.title_style()),
                Span::styled(
                    format!("{} item(s) missing", self.missing().len()),
                    theme.muted_style(),
                ),
            ]),
            None => Line::from(Span::styled("No angel selected", theme.warning_style())),
        };
        frame.render_widget(
            Paragraph::new(info).block(Block::default().borders(Borders::ALL)),
            info_area,
        );

        let mut previous = "";
        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let section = if item.section == previous {
                    ""
                } else {
                    item.section
                };
                previous = item.section;
                let mark = if item.checked { "[x]" } else { "[ ]" };
                let style = if item.checked {
                    theme.warning_style()
                } else {
                    Style::default().fg(theme.text)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{section:<9}"), theme.muted_style()),
                    Span::styled(format!("{mark} {}", item.label), style),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Missing items"))
            .highlight_style(theme.selected_style());
        let mut state = ListState::default().with_selected(self.selection.selected());
        frame.render_stateful_widget(list, list_area, &mut state);

        if let Some(message) = &self.message {
            let style = if self.confirming {
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
        if self.confirming {
            return vec![("y", "Mark complete"), ("any", "Cancel")];
        }
        vec![
            ("↑/↓", "Move"),
            ("Space", "Toggle"),
            ("Enter", "Put on hold"),
            ("Esc", "Back"),
        ]
    }
}
