//! Vetrina test utilities.
//!
//! Fixtures for integration testing: sample models, a model wrapper that
//! records saves, and a fixed page context for menus.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{Result, anyhow};
use serde_json::Value;

use vetrina_kernel::menu::PageContext;
use vetrina_kernel::model::{FieldMeta, MemoryModel, Model, OrmModel, Reference};

/// A ticket model covering the common field kinds.
///
/// Fields in order: `title` (mandatory string), `status` (optional list
/// enumeration), `body` (text with a caption), `created` (read-only),
/// `secret` (hidden), `owner_id` (relation to `user`).
/// Record `t1` is stored.
pub fn ticket_model() -> MemoryModel {
    MemoryModel::new("ticket")
        .with_field(FieldMeta::new("title", "string").mandatory())
        .with_field(FieldMeta::new("status", "list").enumeration(["open", "closed"]))
        .with_field(FieldMeta::new("body", "text").caption("Description"))
        .with_field(FieldMeta::new("created", "datetime").read_only())
        .with_field(FieldMeta::new("secret", "string").hidden())
        .with_field(FieldMeta::new("owner_id", "reference_id"))
        .with_reference(
            "owner_id",
            Reference::new(
                "user",
                vec![
                    ("u1".to_string(), "Alice".to_string()),
                    ("u2".to_string(), "Bob".to_string()),
                ],
            ),
        )
        .record(
            "t1",
            record([
                ("title", Value::from("Broken login")),
                ("status", Value::from("open")),
                ("owner_id", Value::from("u2")),
            ]),
        )
}

/// A customer model with a single optional field, for multi-model forms.
pub fn customer_model() -> MemoryModel {
    MemoryModel::new("customer")
        .with_field(FieldMeta::new("email", "string").placeholder("name@example.com"))
}

/// Build a record from field/value pairs.
pub fn record<const N: usize>(values: [(&str, Value); N]) -> BTreeMap<String, Value> {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// A model without the ORM capability.
#[derive(Debug, Clone, Default)]
pub struct PlainModel;

impl Model for PlainModel {
    fn name(&self) -> &str {
        "plain"
    }
}

/// Counters shared between a [`RecordingModel`] and the test holding it.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    saves: Rc<Cell<usize>>,
    loads: Rc<Cell<usize>>,
}

impl Recorder {
    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    /// Number of successful loads.
    pub fn loads(&self) -> usize {
        self.loads.get()
    }
}

/// Wraps a [`MemoryModel`], counting saves and loads, optionally failing saves.
///
/// The binder owns its models, so tests observe persistence through the
/// [`Recorder`] returned by [`RecordingModel::recorder`].
#[derive(Debug, Clone)]
pub struct RecordingModel {
    inner: MemoryModel,
    recorder: Recorder,
    fail_saves: bool,
}

impl RecordingModel {
    /// Wrap a model.
    pub fn new(inner: MemoryModel) -> Self {
        Self {
            inner,
            recorder: Recorder::default(),
            fail_saves: false,
        }
    }

    /// Make every save fail.
    pub fn failing(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Handle to the shared counters.
    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }
}

impl Model for RecordingModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn as_orm(&self) -> Option<&dyn OrmModel> {
        Some(self)
    }

    fn as_orm_mut(&mut self) -> Option<&mut dyn OrmModel> {
        Some(self)
    }
}

impl OrmModel for RecordingModel {
    fn field_names(&self) -> Vec<String> {
        self.inner.field_names()
    }

    fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.inner.field(name)
    }

    fn only_fields(&self) -> Option<&[String]> {
        self.inner.only_fields()
    }

    fn reference(&self, name: &str) -> Option<Reference> {
        self.inner.reference(name)
    }

    fn get(&self, name: &str) -> Value {
        self.inner.get(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.inner.set(name, value);
    }

    fn load(&mut self, id: &str) -> Result<()> {
        self.inner.load(id)?;
        self.recorder.loads.set(self.recorder.loads.get() + 1);
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        if self.fail_saves {
            return Err(anyhow!("database unavailable"));
        }
        self.inner.save()?;
        self.recorder.saves.set(self.recorder.saves.get() + 1);
        Ok(())
    }
}

/// A [`PageContext`] with fixed values and root-relative URLs.
#[derive(Debug, Clone, Default)]
pub struct FixedPage {
    pub page: String,
    pub postfix: String,
}

impl FixedPage {
    /// Context for `page` without a URL suffix.
    pub fn new(page: &str) -> Self {
        Self {
            page: page.to_string(),
            postfix: String::new(),
        }
    }

    /// Set the URL suffix.
    pub fn with_postfix(mut self, postfix: &str) -> Self {
        self.postfix = postfix.to_string();
        self
    }
}

impl PageContext for FixedPage {
    fn current_page(&self) -> &str {
        &self.page
    }

    fn url_postfix(&self) -> &str {
        &self.postfix
    }

    fn destination_url(&self, target: &str) -> String {
        format!("/{}{}", target.trim_start_matches(';'), self.postfix)
    }
}
