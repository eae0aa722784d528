//! Form data types and required-value validation.
//!
//! A [`Form`] is a plain, serializable description of widgets and their
//! values. It is filled either by hand or by the field binder, and rendered by
//! whatever pipeline the application uses.

mod types;
mod validation;

pub use types::{Form, FormElement, Widget};
pub use validation::{FormResult, ValidationError};
