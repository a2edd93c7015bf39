use crate::model::Angel;
use crate::query::QueryResult;

/// Unique identifier for each screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    MainMenu,
    AngelSelection,
    StatusSelect,
    Search,
    AngelInfo,
    Hold,
    Request,
}

/// Commands represent transitions that screens want to perform.
/// They are returned from key and delivery handlers and applied by the
/// application root, which owns the navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Do nothing
    None,

    /// Apply several commands in order
    Batch(Vec<Command>),

    /// Open a screen fresh, discarding the current screen's state
    Navigate(ScreenId),

    /// Open a screen, keeping the current screen's state for `Back`
    NavigatePreserving(ScreenId),

    /// Return to the previous screen
    Back,

    /// Open a screen and hand it an angel to work on
    OpenAngel {
        target: ScreenId,
        angel: Angel,
        preserve: bool,
    },

    /// Quit the application
    Quit,
}

impl Command {
    /// Helper to apply several commands in order
    pub fn batch(commands: Vec<Command>) -> Self {
        Command::Batch(commands)
    }

    /// Helper to open a screen and hand it `angel`
    pub fn open_angel(target: ScreenId, angel: Angel, preserve: bool) -> Self {
        Command::OpenAngel {
            target,
            angel,
            preserve,
        }
    }
}

impl Default for Command {
    fn default() -> Self {
        Command::None
    }
}

/// Result of a lookup, addressed to the screen that submitted it.
#[derive(Debug)]
pub struct ScreenMsg {
    pub screen: ScreenId,
    pub delivery: Delivery,
}

#[derive(Debug)]
pub enum Delivery {
    /// Rows for a list screen.
    Angels(QueryResult<Vec<Angel>>),

    /// An angel after a write completed.
    Updated(QueryResult<Angel>),

    /// Angels handed over to a requestee.
    Lent(QueryResult<Vec<Angel>>),
}

impl ScreenMsg {
    pub fn angels(screen: ScreenId) -> impl FnOnce(QueryResult<Vec<Angel>>) -> ScreenMsg {
        move |result| ScreenMsg {
            screen,
            delivery: Delivery::Angels(result),
        }
    }

    pub fn updated(screen: ScreenId) -> impl FnOnce(QueryResult<Angel>) -> ScreenMsg {
        move |result| ScreenMsg {
            screen,
            delivery: Delivery::Updated(result),
        }
    }

    pub fn lent(screen: ScreenId) -> impl FnOnce(QueryResult<Vec<Angel>>) -> ScreenMsg {
        move |result| ScreenMsg {
            screen,
            delivery: Delivery::Lent(result),
        }
    }
}
