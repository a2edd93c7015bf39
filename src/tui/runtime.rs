use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::AngelTracker;
use crate::tui::command::ScreenId;
use crate::tui::theme::Theme;

/// Drives the active screen of an [`AngelTracker`] inside a terminal frame:
/// global keys, header, footer and the help overlay.
pub struct ScreenRuntime<'a> {
    tracker: &'a mut AngelTracker,
    theme: Theme,
    help_menu_open: bool,
}

impl<'a> ScreenRuntime<'a> {
    pub fn new(tracker: &'a mut AngelTracker) -> Self {
        Self {
            tracker,
            theme: Theme::default(),
            help_menu_open: false,
        }
    }

    pub fn tracker(&self) -> &AngelTracker {
        self.tracker
    }

    pub fn is_help_open(&self) -> bool {
        self.help_menu_open
    }

    /// Returns false once the application should exit.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Result<bool> {
        // Global keys: F1 toggles help menu
        if key_event.code == KeyCode::F(1) {
            self.help_menu_open = !self.help_menu_open;
            return Ok(true);
        }

        // When help menu is open, it swallows every key
        if self.help_menu_open {
            if key_event.code == KeyCode::Esc {
                self.help_menu_open = false;
            }
            return Ok(true);
        }

        self.tracker.handle_key(key_event);
        Ok(!self.tracker.should_quit())
    }

    /// Deliver finished lookups to their screens.
    pub fn poll_async(&mut self) -> Result<bool> {
        self.tracker.poll_deliveries();
        Ok(!self.tracker.should_quit())
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let full_area = frame.area();
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(full_area);

        self.render_header(frame, header_area);
        match self.tracker.active_screen() {
            Ok(screen) => screen.render(frame, body_area, &self.theme),
            Err(err) => frame.render_widget(
                Paragraph::new(err.to_string()).style(self.theme.error_style()),
                body_area,
            ),
        }
        self.render_footer(frame, footer_area);

        if self.help_menu_open {
            self.render_help_menu(frame, full_area);
        }
    }

    fn screen_bindings(&mut self) -> Vec<(&'static str, &'static str)> {
        self.tracker
            .active_screen()
            .map(|screen| screen.key_bindings())
            .unwrap_or_default()
    }

    fn title_of(&self, id: ScreenId) -> String {
        self.tracker
            .navigator()
            .registry()
            .resolve(id)
            .map(|definition| definition.resource().to_string())
            .unwrap_or_else(|_| format!("{id:?}"))
    }

    fn render_header(&mut self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let navigator = self.tracker.navigator();

        let mut spans = Vec::new();
        for id in navigator.back_stack() {
            spans.push(Span::styled(self.title_of(*id), theme.muted_style()));
            spans.push(Span::styled(" › ", theme.muted_style()));
        }
        spans.push(Span::styled(
            self.title_of(navigator.current()),
            theme.title_style(),
        ));

        let status = self
            .tracker
            .active_screen()
            .ok()
            .and_then(|screen| screen.status());
        if let Some(status) = status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(status, theme.info_style()));
        }

        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(13)]).areas(area);
        let block = Block::default().borders(Borders::ALL);
        frame.render_widget(block, area);
        let inner = |rect: Rect| Rect {
            x: rect.x + 1,
            y: rect.y + 1,
            width: rect.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(Line::from(spans)), inner(left));
        frame.render_widget(
            Paragraph::new(Span::styled("F1 Help", theme.muted_style())),
            inner(right),
        );
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme.clone();
        let line = match self.tracker.notice() {
            Some(notice) => Line::from(Span::styled(notice.to_string(), theme.error_style())),
            None => {
                let bindings = self.screen_bindings();
                Line::from(binding_spans(&bindings, &theme))
            }
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_menu(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme.clone();
        let screen_bindings = self.screen_bindings();
        let global_bindings = [
            ("F1", "Toggle help menu"),
            ("Esc", "Close help menu"),
            ("Ctrl+Q", "Quit"),
        ];

        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default()
                    .fg(theme.peach)
                    .add_modifier(Modifier::BOLD),
            ))
        };
        let mut lines = vec![heading("▼ Global")];
        lines.extend(global_bindings.iter().map(|b| binding_line(*b, &theme)));
        lines.push(Line::default());
        lines.push(heading("▼ This screen"));
        lines.extend(screen_bindings.iter().map(|b| binding_line(*b, &theme)));

        let height = (lines.len() as u16 + 2).min(area.height);
        let [popup] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Length(44)])
            .flex(Flex::Center)
            .areas(popup);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled("Keyboard Shortcuts", theme.title_style()))
                    .style(Style::default().bg(theme.base)),
            ),
            popup,
        );
    }
}

fn binding_line((key, action): (&'static str, &'static str), theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<8}"), Style::default().fg(theme.blue)),
        Span::styled(action, Style::default().fg(theme.text)),
    ])
}

fn binding_spans(bindings: &[(&'static str, &'static str)], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (key, action) in bindings {
        spans.push(Span::styled(format!(" {key} "), Style::default().fg(theme.blue)));
        spans.push(Span::styled(format!("{action} "), theme.muted_style()));
    }
    spans
}
