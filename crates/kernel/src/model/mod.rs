//! Data-access contracts the form binder depends on.
//!
//! A form can be attached to any [`Model`], but binding fields requires the
//! [`OrmModel`] capability: field metadata, value access, relation lookup,
//! record loading and persistence. [`MemoryModel`] is an in-memory
//! implementation driven by a [`ModelSchema`].

mod field;
mod memory;

pub use field::{Display, FieldMeta, FieldUi};
pub use memory::{MemoryModel, ModelSchema};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anything a form can be attached to.
pub trait Model {
    /// Instance name, unique among the models bound to one form.
    fn name(&self) -> &str;

    /// The ORM capability of this model, if it has one.
    fn as_orm(&self) -> Option<&dyn OrmModel> {
        None
    }

    /// Mutable access to the ORM capability.
    fn as_orm_mut(&mut self) -> Option<&mut dyn OrmModel> {
        None
    }
}

/// A persisted record type with described fields.
pub trait OrmModel: Model {
    /// All field names, in declaration order.
    fn field_names(&self) -> Vec<String>;

    /// Metadata for a field, or `None` if the model has no such element.
    fn field(&self, name: &str) -> Option<&FieldMeta>;

    /// Explicit allow-list of fields to expose, when one is set.
    fn only_fields(&self) -> Option<&[String]> {
        None
    }

    /// The related model when `name` is a relation field.
    fn reference(&self, _name: &str) -> Option<Reference> {
        None
    }

    /// Current value of a field (`Value::Null` when unset).
    fn get(&self, name: &str) -> Value;

    /// Set a field value on the current record.
    fn set(&mut self, name: &str, value: Value);

    /// Load a record by id, replacing the current field values.
    fn load(&mut self, id: &str) -> anyhow::Result<()>;

    /// Persist the current record.
    fn save(&mut self) -> anyhow::Result<()>;
}

/// A related model used as the selection source of a relation field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Name of the related model.
    pub model: String,

    /// Selectable records as `(id, title)` pairs.
    #[serde(default)]
    pub choices: Vec<(String, String)>,
}

impl Reference {
    /// Create a reference to a model with the given choices.
    pub fn new(model: impl Into<String>, choices: Vec<(String, String)>) -> Self {
        Self {
            model: model.into(),
            choices,
        }
    }
}
