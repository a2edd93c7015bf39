use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::command::{Command, Delivery, ScreenMsg};
use super::theme::Theme;
use crate::nav::Controller;
use crate::query::QueryExecutor;
use crate::store::RecordStore;

/// Collaborators every screen controller is built with.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn RecordStore>,
    pub executor: QueryExecutor<ScreenMsg>,
    pub search_debounce: Duration,
}

/// A navigable screen: a [`Controller`] that can also draw itself and
/// react to input.
pub trait Screen: Controller {
    fn handle_key(&mut self, key: KeyEvent) -> Command;

    /// A lookup submitted by this screen finished.
    fn handle_delivery(&mut self, _delivery: Delivery) -> Command {
        Command::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Status text for the header, e.g. a loading indicator.
    fn status(&self) -> Option<String> {
        None
    }

    fn key_bindings(&self) -> Vec<(&'static str, &'static str)>;
}
