#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Form API tests.

use std::collections::HashMap;

use serde_json::json;
use vetrina_kernel::form::{Form, FormElement, Widget};

#[test]
fn test_form_creation() {
    let form = Form::new("contact_form")
        .title("Contact")
        .action("/contact")
        .element("name", FormElement::line().title("Name").required())
        .element("message", FormElement::text().title("Message"))
        .element("topic", FormElement::dropdown(vec![("a".into(), "Sales".into())]));

    assert_eq!(form.form_id, "contact_form");
    assert_eq!(form.title.as_deref(), Some("Contact"));
    assert_eq!(form.action, "/contact");
    assert_eq!(form.elements.len(), 3);
    assert!(!form.form_build_id.is_empty());
}

#[test]
fn test_widget_names() {
    assert_eq!(Widget::from_name("DropDown"), Widget::DropDown);
    assert_eq!(Widget::from_name("drop_down"), Widget::DropDown);
    assert_eq!(Widget::from_name("date-picker"), Widget::DatePicker);
    assert_eq!(
        Widget::from_name("ColorWheel"),
        Widget::Custom("ColorWheel".to_string())
    );
    assert!(Widget::Radio.is_value_list());
    assert!(!Widget::Checkbox.is_value_list());
}

#[test]
fn test_submission_and_validation() {
    let mut form = Form::new("signup")
        .element("email", FormElement::line().title("Email").required())
        .element("agree", FormElement::checkbox());

    let values = HashMap::from([
        ("agree".to_string(), json!(true)),
        ("stray".to_string(), json!("ignored")),
    ]);
    form.apply_submission(&values);

    assert!(!form.has_element("stray"));
    assert_eq!(form.get("agree"), Some(&json!(true)));

    let errors = form.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Email is a mandatory field");

    form.set("email", json!("a@example.com"));
    assert!(form.validate().is_empty());
}

#[test]
fn test_form_serializes_to_json() {
    let mut form = Form::new("f");
    form.add_element("status", FormElement::dropdown(vec![("open".into(), "open".into())]))
        .set_empty_text("- no value -")
        .set_attr("placeholder", "Pick one");

    let value = serde_json::to_value(&form).unwrap();
    let status = &value["elements"]["status"];
    assert_eq!(status["widget"], json!("drop_down"));
    assert_eq!(status["empty_text"], json!("- no value -"));
    assert_eq!(status["attributes"]["placeholder"], json!("Pick one"));
}
