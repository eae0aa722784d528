//! Vetrina view layer
//!
//! Binds ORM model fields to form widgets and builds navigation menus.
//! The `vetrina` binary exposes both for inspecting schemas and templates.

pub mod binder;
pub mod config;
pub mod error;
pub mod form;
pub mod menu;
pub mod model;
pub mod theme;

pub use config::Config;
pub use error::{ViewError, ViewResult};
