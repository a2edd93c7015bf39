pub mod command;
pub mod runtime;
pub mod screen;
pub mod screens;
pub mod theme;
pub mod widgets;

pub use command::{Command, Delivery, ScreenId, ScreenMsg};
pub use runtime::ScreenRuntime;
pub use screen::{Screen, Services};
pub use theme::Theme;
