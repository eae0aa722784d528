//! Submission handling and required-value validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::types::Form;

/// Result of form processing.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResult {
    /// Form processed successfully.
    Success,

    /// Re-display form with errors.
    ValidationFailed(Vec<ValidationError>),
}

impl FormResult {
    /// Whether the submission was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, FormResult::Success)
    }
}

/// Validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field name (None for form-level errors).
    pub field: Option<String>,

    /// Error message.
    pub message: String,
}

impl ValidationError {
    /// Create a field-level error.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            message: message.into(),
        }
    }

    /// Create a form-level error.
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Null and empty strings count as missing.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

impl Form {
    /// Copy posted values onto matching elements. Unknown names are ignored.
    pub fn apply_submission(&mut self, values: &HashMap<String, Value>) {
        for (name, value) in values {
            if !self.set(name, value.clone()) {
                debug!(form_id = %self.form_id, field = %name, "ignoring unknown submitted field");
            }
        }
    }

    /// Check required elements, in display order.
    pub fn validate(&self) -> Vec<ValidationError> {
        self.sorted_elements()
            .into_iter()
            .filter(|(_, el)| el.required && !el.disabled && is_missing(el.value.as_ref()))
            .map(|(name, el)| {
                let message = el.required_message.clone().unwrap_or_else(|| {
                    let label = el.title.as_deref().unwrap_or(name);
                    format!("{label} is a mandatory field")
                });
                ValidationError::field(name.clone(), message)
            })
            .collect()
    }
}
