//! Form and form element types.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete form definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique form identifier (e.g., "ticket_edit_form").
    pub form_id: String,

    /// Unique build ID for this form instance.
    pub form_build_id: String,

    /// Form action URL.
    pub action: String,

    /// HTTP method ("post" or "get").
    pub method: String,

    /// Form elements keyed by name.
    pub elements: BTreeMap<String, FormElement>,

    /// Optional form title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Optional form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Form {
    /// Create a new form with the given ID.
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            form_build_id: uuid::Uuid::new_v4().to_string(),
            action: String::new(),
            method: "post".to_string(),
            elements: BTreeMap::new(),
            title: None,
            description: None,
        }
    }

    /// Set the form action URL.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the form method.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the form title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the form description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an element to the form.
    pub fn element(mut self, name: impl Into<String>, element: FormElement) -> Self {
        self.add_element(name, element);
        self
    }

    /// Add an element after the existing ones and return it for further setup.
    ///
    /// Elements without an explicit weight are placed after every element
    /// already on the form.
    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        mut element: FormElement,
    ) -> &mut FormElement {
        if element.weight == 0 {
            element.weight = self.next_weight();
        }
        match self.elements.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                entry.insert(element);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(element),
        }
    }

    fn next_weight(&self) -> i32 {
        self.elements
            .values()
            .map(|el| el.weight)
            .max()
            .map_or(0, |w| w + 1)
    }

    /// Whether an element with this name exists.
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// Get a reference to an element.
    pub fn get_element(&self, name: &str) -> Option<&FormElement> {
        self.elements.get(name)
    }

    /// Get a mutable reference to an element.
    pub fn get_element_mut(&mut self, name: &str) -> Option<&mut FormElement> {
        self.elements.get_mut(name)
    }

    /// First free element name derived from `desired`: `desired`, then
    /// `desired_2`, `desired_3`, ...
    pub fn unique_name(&self, desired: &str) -> String {
        let mut candidate = desired.to_string();
        let mut postfix = 1;
        while self.elements.contains_key(&candidate) {
            postfix += 1;
            candidate = format!("{desired}_{postfix}");
        }
        candidate
    }

    /// Current value of an element.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.elements.get(name).and_then(|el| el.value.as_ref())
    }

    /// Set the value of an existing element. Returns false if there is none.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.elements.get_mut(name) {
            Some(el) => {
                el.value = Some(value);
                true
            }
            None => false,
        }
    }

    /// All element values (null when unset).
    pub fn values(&self) -> BTreeMap<String, Value> {
        self.elements
            .iter()
            .map(|(name, el)| (name.clone(), el.value.clone().unwrap_or(Value::Null)))
            .collect()
    }

    /// Get elements sorted by weight.
    pub fn sorted_elements(&self) -> Vec<(&String, &FormElement)> {
        let mut elements: Vec<_> = self.elements.iter().collect();
        elements.sort_by_key(|(_, el)| el.weight);
        elements
    }
}

/// A form element definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    /// Widget kind.
    pub widget: Widget,

    /// Element title/label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Help text shown next to the element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Current value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Whether a non-empty value is required.
    #[serde(default)]
    pub required: bool,

    /// Message reported when a required value is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,

    /// Sort weight (lower = appears first).
    #[serde(default)]
    pub weight: i32,

    /// Additional HTML attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Selectable `(value, label)` pairs for list widgets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<(String, String)>,

    /// Label of the "no value" option of a list widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_text: Option<String>,

    /// Model the options were taken from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_model: Option<String>,

    /// Whether this element is disabled.
    #[serde(default)]
    pub disabled: bool,
}

impl FormElement {
    /// Create a single-line text element.
    pub fn line() -> Self {
        Self::new(Widget::Line)
    }

    /// Create a multi-line text element.
    pub fn text() -> Self {
        Self::new(Widget::Text)
    }

    /// Create a drop-down element.
    pub fn dropdown(options: Vec<(String, String)>) -> Self {
        Self::new(Widget::DropDown).options(options)
    }

    /// Create a checkbox element.
    pub fn checkbox() -> Self {
        Self::new(Widget::Checkbox)
    }

    /// Create a radio button group.
    pub fn radio(options: Vec<(String, String)>) -> Self {
        Self::new(Widget::Radio).options(options)
    }

    /// Create a password element.
    pub fn password() -> Self {
        Self::new(Widget::Password)
    }

    /// Create an element with the given widget.
    pub fn new(widget: Widget) -> Self {
        Self {
            widget,
            title: None,
            description: None,
            value: None,
            required: false,
            required_message: None,
            weight: 0,
            attributes: BTreeMap::new(),
            options: Vec::new(),
            empty_text: None,
            source_model: None,
            disabled: false,
        }
    }

    /// Set the element title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the element description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the current value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Set placeholder text.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.set_attr("placeholder", placeholder);
        self
    }

    /// Set the selectable options.
    pub fn options(mut self, options: Vec<(String, String)>) -> Self {
        self.options = options;
        self
    }

    /// Mark as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Require a non-empty value, optionally with a custom message.
    pub fn validate_not_null(&mut self, message: Option<String>) -> &mut Self {
        self.required = true;
        self.required_message = message;
        self
    }

    /// Set an HTML attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the help text.
    pub fn set_hint(&mut self, hint: impl Into<String>) -> &mut Self {
        self.description = Some(hint.into());
        self
    }

    /// Replace the selectable options.
    pub fn set_value_list(&mut self, options: Vec<(String, String)>) -> &mut Self {
        self.options = options;
        self
    }

    /// Set the label of the "no value" option.
    pub fn set_empty_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.empty_text = Some(text.into());
        self
    }

    /// Options as rendered, with the "no value" option first when set.
    pub fn rendered_options(&self) -> Vec<(String, String)> {
        let mut options = Vec::with_capacity(self.options.len() + 1);
        if let Some(ref empty) = self.empty_text {
            options.push((String::new(), empty.clone()));
        }
        options.extend(self.options.iter().cloned());
        options
    }
}

/// Widget kinds a form element can use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    /// Single-line text input.
    Line,
    /// Multi-line text input.
    Text,
    Number,
    Money,
    DatePicker,
    DateTimePicker,
    Time,
    Checkbox,
    /// Drop-down select.
    DropDown,
    /// Radio button group.
    Radio,
    Password,
    /// Display-only value.
    Readonly,
    Image,
    /// File upload.
    Upload,
    /// JSON editor for lists.
    JsonArray,
    /// JSON editor for objects.
    Json,
    /// Application-provided widget, by name.
    Custom(String),
}

impl Widget {
    /// Get the widget name as a string.
    pub fn type_name(&self) -> &str {
        match self {
            Widget::Line => "line",
            Widget::Text => "text",
            Widget::Number => "number",
            Widget::Money => "money",
            Widget::DatePicker => "date_picker",
            Widget::DateTimePicker => "date_time_picker",
            Widget::Time => "time",
            Widget::Checkbox => "checkbox",
            Widget::DropDown => "drop_down",
            Widget::Radio => "radio",
            Widget::Password => "password",
            Widget::Readonly => "readonly",
            Widget::Image => "image",
            Widget::Upload => "upload",
            Widget::JsonArray => "json_array",
            Widget::Json => "json",
            Widget::Custom(name) => name,
        }
    }

    /// Parse a widget name. Case, `_` and `-` are ignored; unknown names
    /// become [`Widget::Custom`].
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "line" => Widget::Line,
            "text" => Widget::Text,
            "number" => Widget::Number,
            "money" => Widget::Money,
            "datepicker" => Widget::DatePicker,
            "datetimepicker" => Widget::DateTimePicker,
            "time" => Widget::Time,
            "checkbox" => Widget::Checkbox,
            "dropdown" => Widget::DropDown,
            "radio" => Widget::Radio,
            "password" => Widget::Password,
            "readonly" => Widget::Readonly,
            "image" => Widget::Image,
            "upload" => Widget::Upload,
            "jsonarray" => Widget::JsonArray,
            "json" => Widget::Json,
            _ => Widget::Custom(name.to_string()),
        }
    }

    /// List widgets offer a fixed set of options plus a "no value" option.
    pub fn is_value_list(&self) -> bool {
        matches!(self, Widget::DropDown | Widget::Radio)
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_builder() {
        let form = Form::new("test_form")
            .title("Test Form")
            .action("/submit")
            .element("name", FormElement::line().title("Name").required())
            .element("notes", FormElement::text());

        assert_eq!(form.form_id, "test_form");
        assert_eq!(form.action, "/submit");
        assert_eq!(form.elements.len(), 2);
        assert!(form.elements.get("name").unwrap().required);
    }

    #[test]
    fn test_add_element_keeps_insertion_order() {
        let mut form = Form::new("test");
        form.add_element("zeta", FormElement::line());
        form.add_element("alpha", FormElement::line());
        form.add_element("mid", FormElement::line().weight(50));
        form.add_element("omega", FormElement::line());

        let order: Vec<_> = form
            .sorted_elements()
            .into_iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid", "omega"]);
    }

    #[test]
    fn test_unique_name() {
        let mut form = Form::new("test");
        assert_eq!(form.unique_name("name"), "name");

        form.add_element("name", FormElement::line());
        assert_eq!(form.unique_name("name"), "name_2");

        form.add_element("name_2", FormElement::line());
        assert_eq!(form.unique_name("name"), "name_3");
    }

    #[test]
    fn test_get_and_set() {
        let mut form = Form::new("test").element("age", FormElement::new(Widget::Number));
        assert_eq!(form.get("age"), None);

        assert!(form.set("age", json!(42)));
        assert_eq!(form.get("age"), Some(&json!(42)));
        assert!(!form.set("missing", json!(1)));
        assert_eq!(form.values()["age"], json!(42));
    }

    #[test]
    fn test_rendered_options_with_empty_text() {
        let mut element = FormElement::dropdown(vec![("a".to_string(), "A".to_string())]);
        assert_eq!(element.rendered_options().len(), 1);

        element.set_empty_text("- no value -");
        let options = element.rendered_options();
        assert_eq!(options[0], (String::new(), "- no value -".to_string()));
        assert_eq!(options[1], ("a".to_string(), "A".to_string()));
    }

    #[test]
    fn test_widget_names() {
        assert_eq!(Widget::from_name("DropDown"), Widget::DropDown);
        assert_eq!(Widget::from_name("drop_down"), Widget::DropDown);
        assert_eq!(Widget::from_name("DateTimePicker"), Widget::DateTimePicker);
        assert_eq!(Widget::from_name("JSONArray"), Widget::JsonArray);
        assert_eq!(
            Widget::from_name("ColorPicker"),
            Widget::Custom("ColorPicker".to_string())
        );
        assert_eq!(
            Widget::Custom("ColorPicker".to_string()).type_name(),
            "ColorPicker"
        );
        assert_eq!(Widget::from_name(Widget::Money.type_name()), Widget::Money);
    }

    #[test]
    fn test_form_serialization() {
        let form = Form::new("test").element("name", FormElement::line().title("Name"));

        let json = serde_json::to_string(&form).unwrap();
        assert!(json.contains("test"));
        assert!(json.contains("line"));

        let parsed: Form = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.form_id, "test");
        assert_eq!(parsed.elements["name"].widget, Widget::Line);
    }
}
