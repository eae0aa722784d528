//! Theme engine and template rendering.
//!
//! Provides Tera-based template rendering with template suggestion resolution
//! for menus.

mod engine;

pub use engine::ThemeEngine;
