use std::any::Any;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::model::{Angel, Attribute};
use crate::nav::{Controller, ViewSnapshot};
use crate::tui::command::Command;
use crate::tui::screen::Screen;
use crate::tui::theme::Theme;

/// Read-only view of every attribute of one angel.
#[derive(Default)]
pub struct AngelInfo {
    angel: Option<Angel>,
}

impl AngelInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, angel: Angel) {
        self.angel = Some(angel);
    }

    pub fn angel(&self) -> Option<&Angel> {
        self.angel.as_ref()
    }
}

impl Controller for AngelInfo {
    fn on_enter(&mut self, _snapshot: Option<ViewSnapshot>) {
        self.angel = None;
    }

    fn on_leave(&mut self) -> ViewSnapshot {
        ViewSnapshot::empty()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Screen for AngelInfo {
    fn handle_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => Command::Back,
            _ => Command::None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(angel) = &self.angel else {
            frame.render_widget(
                Paragraph::new("No angel selected")
                    .style(theme.warning_style())
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        };

        let rows = Attribute::ALL.iter().map(|attribute| {
            let value = angel.get(*attribute).unwrap_or("");
            let value_style = if *attribute == Attribute::Status {
                Style::default().fg(theme.status_color(angel.status()))
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(vec![
                Cell::from(attribute.as_str()).style(theme.muted_style()),
                Cell::from(value.to_string()).style(value_style),
            ])
        });

        let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(0)]).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Angel {}", angel.id())),
        );
        frame.render_widget(table, area);
    }

    fn key_bindings(&self) -> Vec<(&'static str, &'static str)> {
        vec![("Esc", "Back")]
    }
}
