//! Model field metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata describing one model field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field name within the model.
    pub name: String,

    /// Type tag (e.g. "string", "money", "reference_id").
    #[serde(rename = "type", default = "default_type")]
    pub field_type: String,

    /// Whether the field may be edited through a form.
    #[serde(default = "default_true")]
    pub editable: bool,

    /// Hidden fields are never exposed to forms.
    #[serde(default)]
    pub hidden: bool,

    /// Whether a value is required.
    #[serde(default)]
    pub mandatory: bool,

    /// Custom message reported when a mandatory value is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_message: Option<String>,

    /// Allowed values.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<String>>,

    /// Value used when a record does not set this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Presentation hints.
    #[serde(default)]
    pub ui: FieldUi,
}

fn default_type() -> String {
    "string".to_string()
}

fn default_true() -> bool {
    true
}

impl FieldMeta {
    /// Create an editable, visible, optional field.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            editable: true,
            hidden: false,
            mandatory: false,
            mandatory_message: None,
            enumeration: None,
            default: None,
            ui: FieldUi::default(),
        }
    }

    /// Mark as not editable.
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Mark as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Mark as mandatory.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Mark as mandatory with a custom message.
    pub fn mandatory_with(mut self, message: impl Into<String>) -> Self {
        self.mandatory = true;
        self.mandatory_message = Some(message.into());
        self
    }

    /// Restrict to a set of allowed values.
    pub fn enumeration<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enumeration = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the UI caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.ui.caption = Some(caption.into());
        self
    }

    /// Set the UI hint.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.ui.hint = Some(hint.into());
        self
    }

    /// Set the UI placeholder.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.ui.placeholder = Some(placeholder.into());
        self
    }

    /// Force a widget for every context.
    pub fn display(mut self, widget: impl Into<String>) -> Self {
        self.ui.display = Some(Display::Widget(widget.into()));
        self
    }

    /// Force a widget for one rendering context (e.g. "form", "grid").
    pub fn display_in(mut self, context: impl Into<String>, widget: impl Into<String>) -> Self {
        let mut contexts = match self.ui.display.take() {
            Some(Display::Contexts(map)) => map,
            _ => BTreeMap::new(),
        };
        contexts.insert(context.into(), widget.into());
        self.ui.display = Some(Display::Contexts(contexts));
        self
    }

    /// Set explicit `(value, label)` pairs for an enumerated field.
    pub fn value_list(mut self, list: Vec<(String, String)>) -> Self {
        self.ui.value_list = Some(list);
        self
    }

    /// Whether this field may appear on a form at all.
    pub fn is_bindable(&self) -> bool {
        self.editable && !self.hidden
    }
}

/// Presentation hints attached to a model field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldUi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Widget override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,

    /// Labels for enumerated values, as `(value, label)` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_list: Option<Vec<(String, String)>>,
}

/// A widget override, either global or keyed by rendering context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Display {
    Widget(String),
    Contexts(BTreeMap<String, String>),
}

impl Display {
    /// The widget name that applies to forms, if any.
    pub fn for_form(&self) -> Option<&str> {
        let name = match self {
            Display::Widget(name) => name.as_str(),
            Display::Contexts(contexts) => contexts.get("form")?.as_str(),
        };
        (!name.is_empty()).then_some(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn display_for_form() {
        assert_eq!(
            Display::Widget("DropDown".to_string()).for_form(),
            Some("DropDown")
        );
        assert_eq!(Display::Widget(String::new()).for_form(), None);

        let grid_only = FieldMeta::new("x", "string").display_in("grid", "Money");
        assert_eq!(grid_only.ui.display.unwrap().for_form(), None);

        let both = FieldMeta::new("x", "string")
            .display_in("grid", "Money")
            .display_in("form", "Text");
        assert_eq!(both.ui.display.unwrap().for_form(), Some("Text"));
    }

    #[test]
    fn field_from_yaml() {
        let yaml = r#"
name: status
type: list
enum: [open, closed]
ui:
  caption: Ticket status
  display:
    form: Radio
"#;
        let field: FieldMeta = serde_yml::from_str(yaml).unwrap();
        assert_eq!(field.field_type, "list");
        assert!(field.editable);
        assert!(!field.mandatory);
        assert_eq!(
            field.enumeration,
            Some(vec!["open".to_string(), "closed".to_string()])
        );
        assert_eq!(field.ui.caption.as_deref(), Some("Ticket status"));
        assert_eq!(field.ui.display.unwrap().for_form(), Some("Radio"));
    }

    #[test]
    fn bindable_flags() {
        assert!(FieldMeta::new("a", "string").is_bindable());
        assert!(!FieldMeta::new("a", "string").read_only().is_bindable());
        assert!(!FieldMeta::new("a", "string").hidden().is_bindable());
    }
}
