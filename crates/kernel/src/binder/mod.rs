//! Binding between ORM model fields and form elements.
//!
//! [`FieldBinder`] imports model fields into a [`Form`](crate::form::Form):
//! it picks a widget for each field, copies metadata (caption, hint,
//! placeholder, allowed values, mandatory flag) onto the element and records
//! an association so values can flow both ways:
//!
//! - [`FieldBinder::load_record`] / [`FieldBinder::sync_form_from_model`]:
//!   model to form.
//! - [`FieldBinder::submit`] / [`FieldBinder::sync_model_from_form`]:
//!   form to model, then each touched model is saved once.

mod controller;
mod widgets;

pub use controller::{Association, DEFAULT_EMPTY_TEXT, FieldBinder, FieldSelection, ModelId};
pub use widgets::{TYPE_WIDGETS, widget_for_type};
