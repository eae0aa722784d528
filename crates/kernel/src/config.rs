//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::binder::DEFAULT_EMPTY_TEXT;
use crate::menu::{DEFAULT_CURRENT_CLASS, DEFAULT_INACTIVE_CLASS};

/// View-layer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL prepended to menu destinations (default: empty, i.e. root-relative).
    pub base_url: String,

    /// Suffix appended to page URLs, e.g. ".html" (default: empty).
    pub url_postfix: String,

    /// Directory with Tera templates. Built-in templates are used when unset.
    pub template_dir: Option<PathBuf>,

    /// Style class for the menu item matching the current page.
    pub menu_current_class: String,

    /// Style class for every other menu item.
    pub menu_inactive_class: String,

    /// Label of the empty option injected into optional list widgets.
    pub form_empty_text: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("SITE_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_default();

        let url_postfix = env::var("URL_POSTFIX").unwrap_or_default();

        let template_dir = env::var("TEMPLATE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let menu_current_class =
            env::var("MENU_CURRENT_CLASS").unwrap_or_else(|_| DEFAULT_CURRENT_CLASS.to_string());

        let menu_inactive_class = env::var("MENU_INACTIVE_CLASS")
            .unwrap_or_else(|_| DEFAULT_INACTIVE_CLASS.to_string());

        let form_empty_text =
            env::var("FORM_EMPTY_TEXT").unwrap_or_else(|_| DEFAULT_EMPTY_TEXT.to_string());

        Ok(Self {
            base_url,
            url_postfix,
            template_dir,
            menu_current_class,
            menu_inactive_class,
            form_empty_text,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            url_postfix: String::new(),
            template_dir: None,
            menu_current_class: DEFAULT_CURRENT_CLASS.to_string(),
            menu_inactive_class: DEFAULT_INACTIVE_CLASS.to_string(),
            form_empty_text: DEFAULT_EMPTY_TEXT.to_string(),
        }
    }
}
