//! Input state shared by the screens.

use crossterm::event::KeyCode;

/// Cursor over a list of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    selected: Option<usize>,
    wrap_around: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            selected: None,
            wrap_around: true,
        }
    }

    /// Create a Selection with the first row selected
    pub fn with_selection() -> Self {
        Self {
            selected: Some(0),
            wrap_around: true,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    /// Keep the cursor on a valid row after the list changed length.
    pub fn clamp(&mut self, item_count: usize) {
        self.selected = match (self.selected, item_count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(sel), count) => Some(sel.min(count - 1)),
        };
    }

    /// Handle navigation key, returns true if handled
    pub fn handle_key(&mut self, key: KeyCode, item_count: usize) -> bool {
        if item_count == 0 {
            return false;
        }

        let last = item_count - 1;
        self.selected = match (key, self.selected) {
            (KeyCode::Up, None) | (KeyCode::Down, None) | (KeyCode::Home, _) => Some(0),
            (KeyCode::Up, Some(0)) if self.wrap_around => Some(last),
            (KeyCode::Up, Some(sel)) => Some(sel.saturating_sub(1)),
            (KeyCode::Down, Some(sel)) if sel >= last => {
                Some(if self.wrap_around { 0 } else { last })
            }
            (KeyCode::Down, Some(sel)) => Some(sel + 1),
            (KeyCode::PageUp, sel) => Some(sel.unwrap_or(0).saturating_sub(10)),
            (KeyCode::PageDown, sel) => Some((sel.unwrap_or(0) + 10).min(last)),
            (KeyCode::End, _) => Some(last),
            _ => return false,
        };
        true
    }
}

/// Single-line text buffer.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    max_len: Option<usize>,
    accept: Option<fn(char) -> bool>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept characters for which `accept` holds.
    pub fn accepting(mut self, accept: fn(char) -> bool) -> Self {
        self.accept = Some(accept);
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Apply an editing key. Returns true if the value changed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                if self.accept.is_some_and(|accept| !accept(c)) {
                    return false;
                }
                if self
                    .max_len
                    .is_some_and(|max| self.value.chars().count() >= max)
                {
                    return false;
                }
                self.value.push(c);
                true
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }
}
