//! Menu builder - an ordered list of navigation items and separators.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::config::Config;

use super::context::PageContext;

/// Style class of the item for the current page.
pub const DEFAULT_CURRENT_CLASS: &str = "ui-state-active";

/// Style class of every other item.
pub const DEFAULT_INACTIVE_CLASS: &str = "ui-state-default";

/// Leading character that marks a page identifier, kept in derived targets.
pub const PAGE_MARKER: char = ';';

/// One navigation link.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Internal identifier, `{menu}_{target}`.
    pub id: String,
    properties: BTreeMap<String, Value>,
}

impl MenuItem {
    fn new(id: String) -> Self {
        Self {
            id,
            properties: BTreeMap::new(),
        }
    }

    /// Set a template property.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set several template properties.
    pub fn set_properties<I, K, V>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in properties {
            self.set_property(key, value);
        }
        self
    }

    /// All template properties.
    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    fn text(&self, key: &str) -> &str {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Displayed label.
    pub fn label(&self) -> &str {
        self.text("label")
    }

    /// Target page identifier.
    pub fn page(&self) -> &str {
        self.text("page")
    }

    /// Resolved destination URL.
    pub fn href(&self) -> &str {
        self.text("href")
    }

    /// Style class.
    pub fn class(&self) -> &str {
        self.text("class")
    }
}

/// A non-interactive divider between items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSeparator {
    /// Internal identifier, `{menu}_separator{position}`.
    pub id: String,
    /// Template overriding the menu's separator template.
    pub template: Option<String>,
}

/// An entry of a menu, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator(MenuSeparator),
}

/// Navigation menu for one page render.
pub struct Menu<'a> {
    name: String,
    context: &'a dyn PageContext,
    entries: Vec<MenuEntry>,
    template: String,
    current_class: String,
    inactive_class: String,
}

impl<'a> Menu<'a> {
    /// Create an empty menu.
    pub fn new(name: impl Into<String>, context: &'a dyn PageContext) -> Self {
        Self {
            name: name.into(),
            context,
            entries: Vec::new(),
            template: "menu".to_string(),
            current_class: DEFAULT_CURRENT_CLASS.to_string(),
            inactive_class: DEFAULT_INACTIVE_CLASS.to_string(),
        }
    }

    /// Use the style classes from configuration.
    pub fn with_config(self, config: &Config) -> Self {
        self.with_classes(&config.menu_current_class, &config.menu_inactive_class)
    }

    /// Set the active and inactive style classes.
    pub fn with_classes(mut self, current: impl Into<String>, inactive: impl Into<String>) -> Self {
        self.current_class = current.into();
        self.inactive_class = inactive.into();
        self
    }

    /// Set the template branch (default "menu").
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Append a link.
    ///
    /// Without an explicit `target`, the target is derived from the label
    /// (see [`default_target`]).
    pub fn add_item(&mut self, label: &str, target: Option<&str>) -> &mut Self {
        let target = match target {
            Some(target) if !target.is_empty() => target.to_string(),
            _ => default_target(label),
        };
        let class = if self.is_current(&target) {
            &self.current_class
        } else {
            &self.inactive_class
        };

        let mut item = MenuItem::new(format!("{}_{}", self.name, target));
        item.set_properties([
            ("page", target.clone()),
            ("href", self.context.destination_url(&target)),
            ("label", label.to_string()),
            ("class", class.clone()),
        ]);

        debug!(menu = %self.name, target = %target, class = %class, "menu item added");
        self.entries.push(MenuEntry::Item(item));
        self
    }

    /// Append a separator, optionally rendered with its own template.
    pub fn add_separator(&mut self, template: Option<&str>) -> &mut Self {
        let separator = MenuSeparator {
            id: format!("{}_separator{}", self.name, self.entries.len()),
            template: template.map(str::to_string),
        };
        self.entries.push(MenuEntry::Separator(separator));
        self
    }

    /// Whether `target` identifies the page being rendered.
    pub fn is_current(&self, target: &str) -> bool {
        let page = self.context.current_page();
        let postfix = self.context.url_postfix();

        target == page
            || target.strip_prefix(PAGE_MARKER) == Some(page)
            || format!("{target}{postfix}") == page
    }

    /// The most recently added item.
    pub fn last_item_mut(&mut self) -> Option<&mut MenuItem> {
        self.entries.iter_mut().rev().find_map(|entry| match entry {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Separator(_) => None,
        })
    }

    /// Menu name, used as prefix of entry ids.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template branch.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Page context the menu was built for.
    pub fn context(&self) -> &dyn PageContext {
        self.context
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Links only, in display order.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Separator(_) => None,
        })
    }

    /// Number of entries, separators included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the menu has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Menu<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("name", &self.name)
            .field("page", &self.context.current_page())
            .field("template", &self.template)
            .field("entries", &self.entries)
            .finish()
    }
}

/// Target derived from a label: ASCII letters and digits only, keeping a
/// leading [`PAGE_MARKER`].
///
/// `"About us"` gives `"Aboutus"`, `";Admin"` gives `";Admin"`.
pub fn default_target(label: &str) -> String {
    let target: String = label.chars().filter(char::is_ascii_alphanumeric).collect();
    if label.starts_with(PAGE_MARKER) {
        format!("{PAGE_MARKER}{target}")
    } else {
        target
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::SiteContext;

    #[test]
    fn default_targets() {
        assert_eq!(default_target("Home"), "Home");
        assert_eq!(default_target(";Home"), ";Home");
        assert_eq!(default_target("About us!"), "Aboutus");
        assert_eq!(default_target("Ünïcode 2"), "ncode2");
        assert_eq!(default_target(""), "");
    }

    #[test]
    fn current_page_matching() {
        let ctx = SiteContext::new("home.html").with_url_postfix(".html");
        let menu = Menu::new("nav", &ctx);

        assert!(menu.is_current("home.html"));
        assert!(menu.is_current("home"));
        assert!(!menu.is_current("hom"));
        assert!(!menu.is_current("about"));

        let ctx = SiteContext::new("admin");
        let menu = Menu::new("nav", &ctx);
        assert!(menu.is_current(";admin"));
        assert!(!menu.is_current(";;admin"));
    }

    #[test]
    fn items_and_separators_in_order() {
        let ctx = SiteContext::new("Home");
        let mut menu = Menu::new("nav", &ctx);
        menu.add_item("Home", None)
            .add_separator(None)
            .add_item("Docs", Some("docs/index"))
            .add_separator(Some("menu/thick-separator"));

        assert_eq!(menu.len(), 4);
        let ids: Vec<_> = menu
            .entries()
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(item) => item.id.clone(),
                MenuEntry::Separator(sep) => sep.id.clone(),
            })
            .collect();
        assert_eq!(
            ids,
            vec!["nav_Home", "nav_separator1", "nav_docs/index", "nav_separator3"]
        );

        let docs = menu.items().nth(1).unwrap();
        assert_eq!(docs.page(), "docs/index");
        assert_eq!(docs.href(), "/docs/index");
        assert_eq!(docs.class(), DEFAULT_INACTIVE_CLASS);
    }

    #[test]
    fn last_item_properties() {
        let ctx = SiteContext::new("x");
        let mut menu = Menu::new("nav", &ctx);
        menu.add_item("Inbox", None).add_separator(None);
        menu.last_item_mut().unwrap().set_property("badge", 3);

        let inbox = menu.items().next().unwrap();
        assert_eq!(inbox.properties()["badge"], Value::from(3));
        assert_eq!(inbox.label(), "Inbox");
    }
}
