//! Catppuccin Mocha palette for the terminal front end.

use ratatui::style::{Color, Modifier, Style};

use crate::model::Status;

#[derive(Debug, Clone)]
pub struct Theme {
    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub teal: Color,
    pub sky: Color,
    pub blue: Color,
    pub lavender: Color,
    pub text: Color,
    pub subtext0: Color,
    pub overlay1: Color,
    pub surface0: Color,
    pub base: Color,
}

impl Theme {
    pub fn mocha() -> Self {
        Self {
            mauve: Color::Rgb(0xcb, 0xa6, 0xf7),
            red: Color::Rgb(0xf3, 0x8b, 0xa8),
            peach: Color::Rgb(0xfa, 0xb3, 0x87),
            yellow: Color::Rgb(0xf9, 0xe2, 0xaf),
            green: Color::Rgb(0xa6, 0xe3, 0xa1),
            teal: Color::Rgb(0x94, 0xe2, 0xd5),
            sky: Color::Rgb(0x89, 0xdc, 0xeb),
            blue: Color::Rgb(0x89, 0xb4, 0xfa),
            lavender: Color::Rgb(0xb4, 0xbe, 0xfe),
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            subtext0: Color::Rgb(0xa6, 0xad, 0xc8),
            overlay1: Color::Rgb(0x7f, 0x84, 0x9c),
            surface0: Color::Rgb(0x31, 0x32, 0x44),
            base: Color::Rgb(0x1e, 0x1e, 0x2e),
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.yellow)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.green)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.teal)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.blue).add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default().fg(self.lavender).bg(self.surface0)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.overlay1)
    }

    pub fn status_color(&self, status: Option<Status>) -> Color {
        match status {
            Some(Status::Complete) => self.green,
            Some(Status::Hold) => self.yellow,
            Some(Status::Pull) => self.red,
            Some(Status::Awaiting) => self.sky,
            Some(Status::Out) => self.mauve,
            Some(Status::NotStarted) => self.subtext0,
            None => self.overlay1,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}
