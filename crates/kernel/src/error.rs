//! View-layer error types.

use thiserror::Error;

use crate::binder::ModelId;

/// Errors raised while binding forms to models or rendering menus.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The model attached to a form does not expose the ORM capability.
    #[error("form binding requires an ORM model, but `{model}` is not one")]
    NotOrmModel { model: String },

    #[error("model {0} is not owned by this binder")]
    UnknownModel(ModelId),

    /// Saving a model after form submission failed.
    #[error("failed to save model `{model}`")]
    Persistence {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to load record `{id}` into model `{model}`")]
    RecordLoad {
        model: String,
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("template error")]
    Template(#[from] tera::Error),
}

impl ViewError {
    /// Whether this error comes from misconfiguration rather than runtime data.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ViewError::NotOrmModel { .. } | ViewError::UnknownModel(_))
    }
}

/// Result type alias using ViewError.
pub type ViewResult<T> = Result<T, ViewError>;
