//! Page context consulted while building menus.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::Config;

use super::PAGE_MARKER;

/// What a menu needs to know about the page being rendered.
pub trait PageContext {
    /// Identifier of the page being rendered.
    fn current_page(&self) -> &str;

    /// Suffix the site appends to page identifiers in URLs.
    fn url_postfix(&self) -> &str {
        ""
    }

    /// URL of the page identified by `target`.
    fn destination_url(&self, target: &str) -> String;

    /// Application variables exposed to menu templates.
    fn app_info(&self) -> BTreeMap<String, Value> {
        BTreeMap::new()
    }
}

/// [`PageContext`] for a site served under a base URL.
#[derive(Debug, Clone, Default)]
pub struct SiteContext {
    page: String,
    base_url: String,
    url_postfix: String,
    app_info: BTreeMap<String, Value>,
}

impl SiteContext {
    /// Context for `page` at the site root.
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Self::default()
        }
    }

    /// Context for `page` using the configured base URL and suffix.
    pub fn from_config(config: &Config, page: impl Into<String>) -> Self {
        Self::new(page)
            .with_base_url(config.base_url.as_str())
            .with_url_postfix(config.url_postfix.as_str())
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the URL suffix.
    pub fn with_url_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.url_postfix = postfix.into();
        self
    }

    /// Expose a variable to menu templates.
    pub fn with_app_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.app_info.insert(key.into(), value.into());
        self
    }
}

impl PageContext for SiteContext {
    fn current_page(&self) -> &str {
        &self.page
    }

    fn url_postfix(&self) -> &str {
        &self.url_postfix
    }

    fn destination_url(&self, target: &str) -> String {
        let target = target.strip_prefix(PAGE_MARKER).unwrap_or(target);
        let path = target
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        if path.is_empty() {
            format!("{}/", self.base_url)
        } else {
            format!("{}/{}{}", self.base_url, path, self.url_postfix)
        }
    }

    fn app_info(&self) -> BTreeMap<String, Value> {
        self.app_info.clone()
    }
}
