//! Navigation menus.
//!
//! A [`Menu`] is an append-only list of links and separators built for one
//! page render:
//! - Targets default to the label stripped to ASCII letters and digits
//! - The link for the current page gets the active style class
//! - Entries render through the menu's template branch (see
//!   [`ThemeEngine::render_menu`](crate::theme::ThemeEngine::render_menu))

mod builder;
mod context;

pub use builder::{
    DEFAULT_CURRENT_CLASS, DEFAULT_INACTIVE_CLASS, Menu, MenuEntry, MenuItem, MenuSeparator,
    PAGE_MARKER, default_target,
};
pub use context::{PageContext, SiteContext};
