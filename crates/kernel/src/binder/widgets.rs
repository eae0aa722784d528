//! Model field type to form widget mapping.

use crate::form::Widget;

/// Default widget for each model field type tag.
pub const TYPE_WIDGETS: &[(&str, Widget)] = &[
    ("string", Widget::Line),
    ("text", Widget::Text),
    ("int", Widget::Number),
    ("integer", Widget::Number),
    ("numeric", Widget::Number),
    ("money", Widget::Money),
    ("real", Widget::Number),
    ("float", Widget::Number),
    ("date", Widget::DatePicker),
    ("datetime", Widget::DateTimePicker),
    ("daytime", Widget::Time),
    ("time", Widget::Time),
    ("boolean", Widget::Checkbox),
    ("reference", Widget::Readonly),
    ("reference_id", Widget::DropDown),
    ("password", Widget::Password),
    ("list", Widget::DropDown),
    ("radio", Widget::Radio),
    ("readonly", Widget::Readonly),
    ("image", Widget::Image),
    ("file", Widget::Upload),
    ("array", Widget::JsonArray),
    // legacy alias of "object"
    ("struct", Widget::Json),
    ("object", Widget::Json),
];

/// Look up the default widget for a type tag.
pub fn widget_for_type(field_type: &str) -> Option<&'static Widget> {
    TYPE_WIDGETS
        .iter()
        .find(|(tag, _)| *tag == field_type)
        .map(|(_, widget)| widget)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        for (i, (tag, _)) in TYPE_WIDGETS.iter().enumerate() {
            assert!(
                TYPE_WIDGETS[i + 1..].iter().all(|(other, _)| other != tag),
                "duplicate type tag {tag}"
            );
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(widget_for_type("money"), Some(&Widget::Money));
        assert_eq!(widget_for_type("reference_id"), Some(&Widget::DropDown));
        assert_eq!(widget_for_type("struct"), Some(&Widget::Json));
        assert_eq!(widget_for_type("geometry"), None);
    }
}
