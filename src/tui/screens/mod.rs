pub mod angel_info;
pub mod angel_selection;
pub mod hold;
pub mod main_menu;
pub mod request;
pub mod search;
pub mod status_select;

pub use angel_info::AngelInfo;
pub use angel_selection::AngelSelection;
pub use hold::Hold;
pub use main_menu::MainMenu;
pub use request::{Request, RequestField};
pub use search::Search;
pub use status_select::StatusSelect;

use crate::nav::{NavigationError, ViewKey, ViewRegistry};
use crate::tui::command::ScreenId;
use crate::tui::screen::{Screen, Services};

pub const MAIN_MENU: ViewKey<ScreenId, MainMenu> = ViewKey::new(ScreenId::MainMenu);
pub const ANGEL_SELECTION: ViewKey<ScreenId, AngelSelection> =
    ViewKey::new(ScreenId::AngelSelection);
pub const STATUS_SELECT: ViewKey<ScreenId, StatusSelect> = ViewKey::new(ScreenId::StatusSelect);
pub const SEARCH: ViewKey<ScreenId, Search> = ViewKey::new(ScreenId::Search);
pub const ANGEL_INFO: ViewKey<ScreenId, AngelInfo> = ViewKey::new(ScreenId::AngelInfo);
pub const HOLD: ViewKey<ScreenId, Hold> = ViewKey::new(ScreenId::Hold);
pub const REQUEST: ViewKey<ScreenId, Request> = ViewKey::new(ScreenId::Request);

pub type ScreenRegistry = ViewRegistry<ScreenId, dyn Screen>;

/// Register every screen. The resource of each view is its header title.
pub fn register_screens(services: &Services) -> Result<ScreenRegistry, NavigationError> {
    let mut registry = ScreenRegistry::new();
    registry.register_typed(MAIN_MENU, "Angel Tracker", MainMenu::new(), |c| {
        c as Box<dyn Screen>
    })?;
    registry.register_typed(
        ANGEL_SELECTION,
        "Select Angel",
        AngelSelection::new(services.clone()),
        |c| c as Box<dyn Screen>,
    )?;
    registry.register_typed(
        STATUS_SELECT,
        "Update Status",
        StatusSelect::new(services.clone()),
        |c| c as Box<dyn Screen>,
    )?;
    registry.register_typed(SEARCH, "Search", Search::new(services.clone()), |c| {
        c as Box<dyn Screen>
    })?;
    registry.register_typed(ANGEL_INFO, "Angel Details", AngelInfo::new(), |c| {
        c as Box<dyn Screen>
    })?;
    registry.register_typed(HOLD, "Put On Hold", Hold::new(services.clone()), |c| {
        c as Box<dyn Screen>
    })?;
    registry.register_typed(REQUEST, "Request", Request::new(services.clone()), |c| {
        c as Box<dyn Screen>
    })?;
    Ok(registry)
}
