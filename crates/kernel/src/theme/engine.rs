//! Theme engine with Tera templates and suggestion resolution.

use std::path::Path;

use dashmap::DashMap;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::{ViewError, ViewResult};
use crate::menu::{Menu, MenuEntry, MenuItem, MenuSeparator};

/// Templates available even without a template directory.
const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (
        "menu/menu.html",
        r#"<ul class="menu" id="{{ menu_name }}">{{ items | safe }}</ul>"#,
    ),
    (
        "menu/item.html",
        r#"<li id="{{ id }}" class="{{ class }}"><a href="{{ href | safe }}">{{ label }}</a></li>"#,
    ),
    (
        "menu/separator.html",
        r#"<li id="{{ id }}" class="menu-separator" role="separator"></li>"#,
    ),
];

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping suggestion lists to resolved template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a new theme engine loading templates from the given directory.
    ///
    /// Built-in templates fill in for any the directory does not provide.
    pub fn new(template_dir: &Path) -> ViewResult<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .ok_or_else(|| tera::Error::msg("invalid template directory path"))?;

        let mut tera = Tera::new(pattern_str)?;
        let loaded = tera.get_template_names().count();
        add_missing_defaults(&mut tera)?;

        debug!(loaded, dir = %template_dir.display(), "loaded templates");

        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine with only the built-in templates.
    pub fn with_defaults() -> ViewResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(DEFAULT_TEMPLATES.iter().copied())?;
        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine with no templates (for testing).
    pub fn empty() -> Self {
        Self {
            tera: Tera::default(),
            suggestion_cache: DashMap::new(),
        }
    }

    /// Get the underlying Tera instance for custom operations.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Get a mutable reference to Tera (for adding templates at runtime).
    pub fn tera_mut(&mut self) -> &mut Tera {
        &mut self.tera
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    /// Results are cached.
    ///
    /// Example suggestions: `["menu--admin/item", "menu/item"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let cache_key = suggestions.join("|");
        if let Some(cached) = self.suggestion_cache.get(&cache_key) {
            return Some(cached.clone());
        }

        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                self.suggestion_cache
                    .insert(cache_key, template_name.clone());
                return Some(template_name);
            }

            // Also try without .html extension (in case suggestion already has it)
            if self.tera.get_template(suggestion).is_ok() {
                let name = (*suggestion).to_string();
                self.suggestion_cache.insert(cache_key, name.clone());
                return Some(name);
            }
        }

        // Don't cache negative results to allow hot-reload
        None
    }

    /// Template suggestions for one part of a menu, most specific first.
    ///
    /// - `{branch}--{menu}/{part}`
    /// - `{branch}/{part}`
    pub fn menu_suggestions(menu: &Menu<'_>, part: &str) -> Vec<String> {
        vec![
            format!("{}--{}/{}", menu.template(), menu.name(), part),
            format!("{}/{}", menu.template(), part),
        ]
    }

    fn resolve_menu_template(
        &self,
        menu: &Menu<'_>,
        override_name: Option<&str>,
        part: &str,
    ) -> String {
        let mut suggestions: Vec<String> = override_name.map(str::to_string).into_iter().collect();
        suggestions.extend(Self::menu_suggestions(menu, part));
        let suggestion_refs: Vec<&str> = suggestions.iter().map(|s| s.as_str()).collect();

        self.resolve_template(&suggestion_refs)
            .unwrap_or_else(|| format!("{}/{}.html", menu.template(), part))
    }

    /// Render a menu: each entry through the menu's item or separator
    /// template, then the wrapper template around them.
    pub fn render_menu(&self, menu: &Menu<'_>) -> ViewResult<String> {
        let mut items_html = String::new();
        for entry in menu.entries() {
            let html = match entry {
                MenuEntry::Item(item) => self.render_menu_item(menu, item)?,
                MenuEntry::Separator(separator) => self.render_menu_separator(menu, separator)?,
            };
            items_html.push_str(&html);
        }

        let mut context = Context::new();
        for (key, value) in menu.context().app_info() {
            context.insert(key, &value);
        }
        context.insert("menu_name", menu.name());
        context.insert("page", menu.context().current_page());
        context.insert("items", &items_html);

        let template = self.resolve_menu_template(menu, None, "menu");
        Ok(self.tera.render(&template, &context)?)
    }

    fn render_menu_item(&self, menu: &Menu<'_>, item: &MenuItem) -> ViewResult<String> {
        let mut context = Context::new();
        context.insert("id", &item.id);
        for (key, value) in item.properties() {
            context.insert(key.as_str(), value);
        }

        let template = self.resolve_menu_template(menu, None, "item");
        self.tera
            .render(&template, &context)
            .map_err(ViewError::from)
    }

    fn render_menu_separator(
        &self,
        menu: &Menu<'_>,
        separator: &MenuSeparator,
    ) -> ViewResult<String> {
        let mut context = Context::new();
        context.insert("id", &separator.id);

        let template =
            self.resolve_menu_template(menu, separator.template.as_deref(), "separator");
        self.tera
            .render(&template, &context)
            .map_err(ViewError::from)
    }

    /// Clear the suggestion cache (useful for development hot-reload).
    pub fn clear_cache(&self) {
        self.suggestion_cache.clear();
    }

    /// Reload templates from disk.
    pub fn reload(&mut self) -> ViewResult<()> {
        self.tera.full_reload()?;
        add_missing_defaults(&mut self.tera)?;
        self.clear_cache();
        Ok(())
    }
}

fn add_missing_defaults(tera: &mut Tera) -> tera::Result<()> {
    for (name, source) in DEFAULT_TEMPLATES {
        if tera.get_template(name).is_err() {
            tera.add_raw_template(name, source)?;
        }
    }
    Ok(())
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .field("cache_size", &self.suggestion_cache.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::SiteContext;

    #[test]
    fn test_menu_suggestions() {
        let ctx = SiteContext::new("home");
        let menu = Menu::new("admin", &ctx);
        assert_eq!(
            ThemeEngine::menu_suggestions(&menu, "item"),
            vec!["menu--admin/item", "menu/item"]
        );
    }

    #[test]
    fn test_resolve_prefers_specific_template() {
        let mut engine = ThemeEngine::with_defaults().unwrap();
        engine
            .tera_mut()
            .add_raw_template("menu--admin/item.html", "<li>{{ label }}</li>")
            .unwrap();

        assert_eq!(
            engine.resolve_template(&["menu--admin/item", "menu/item"]),
            Some("menu--admin/item.html".to_string())
        );
        assert_eq!(
            engine.resolve_template(&["menu--main/item", "menu/item"]),
            Some("menu/item.html".to_string())
        );
        assert!(engine.resolve_template(&["nonexistent"]).is_none());
    }

    #[test]
    fn test_render_with_defaults() {
        let engine = ThemeEngine::with_defaults().unwrap();
        let ctx = SiteContext::new("Home");
        let mut menu = Menu::new("nav", &ctx);
        menu.add_item("Home", None)
            .add_separator(None)
            .add_item("A & B", None);

        let html = engine.render_menu(&menu).unwrap();
        assert!(html.starts_with(r#"<ul class="menu" id="nav">"#));
        assert!(html.contains(
            r#"<li id="nav_Home" class="ui-state-active"><a href="/Home">Home</a></li>"#
        ));
        assert!(html.contains(r#"<a href="/AB">"#));
        assert!(html.contains(r#"id="nav_separator1""#));
        assert!(html.contains("A &amp; B"));
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let engine = ThemeEngine::empty();
        let ctx = SiteContext::new("Home");
        let mut menu = Menu::new("nav", &ctx);
        menu.add_item("Home", None);

        let err = engine.render_menu(&menu).unwrap_err();
        assert!(matches!(err, ViewError::Template(_)));
    }
}
