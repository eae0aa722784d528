//! In-memory ORM model.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{FieldMeta, Model, OrmModel, Reference};

/// Declarative description of a model, loadable from YAML or JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Model name.
    pub name: String,

    /// Field definitions in declaration order.
    pub fields: Vec<FieldMeta>,

    /// Restrict forms to these fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_fields: Option<Vec<String>>,

    /// Relation fields keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<String, Reference>,

    /// Stored records keyed by id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub records: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ModelSchema {
    /// Parse a schema from YAML.
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yml::from_str(source).context("failed to parse model schema YAML")
    }

    /// Parse a schema from JSON.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("failed to parse model schema JSON")
    }
}

/// An [`OrmModel`] that keeps its records in memory.
#[derive(Debug, Clone)]
pub struct MemoryModel {
    schema: ModelSchema,
    values: BTreeMap<String, Value>,
    loaded_id: Option<String>,
    save_count: usize,
}

impl MemoryModel {
    /// Create an empty model with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_schema(ModelSchema {
            name: name.into(),
            fields: Vec::new(),
            only_fields: None,
            references: BTreeMap::new(),
            records: BTreeMap::new(),
        })
    }

    /// Create a model from a schema.
    pub fn from_schema(schema: ModelSchema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
            loaded_id: None,
            save_count: 0,
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldMeta) -> Self {
        self.schema.fields.push(field);
        self
    }

    /// Declare `field` as a relation to another model.
    pub fn with_reference(mut self, field: impl Into<String>, reference: Reference) -> Self {
        self.schema.references.insert(field.into(), reference);
        self
    }

    /// Restrict forms to the given fields.
    pub fn only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.only_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Store a record.
    pub fn record(mut self, id: impl Into<String>, values: BTreeMap<String, Value>) -> Self {
        self.schema.records.insert(id.into(), values);
        self
    }

    /// Id of the record currently loaded, if any.
    pub fn loaded_id(&self) -> Option<&str> {
        self.loaded_id.as_deref()
    }

    /// A stored record.
    pub fn stored(&self, id: &str) -> Option<&BTreeMap<String, Value>> {
        self.schema.records.get(id)
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// The schema this model was built from.
    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }
}

impl Model for MemoryModel {
    fn name(&self) -> &str {
        &self.schema.name
    }

    fn as_orm(&self) -> Option<&dyn OrmModel> {
        Some(self)
    }

    fn as_orm_mut(&mut self) -> Option<&mut dyn OrmModel> {
        Some(self)
    }
}

impl OrmModel for MemoryModel {
    fn field_names(&self) -> Vec<String> {
        self.schema.fields.iter().map(|f| f.name.clone()).collect()
    }

    fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.schema.fields.iter().find(|f| f.name == name)
    }

    fn only_fields(&self) -> Option<&[String]> {
        self.schema.only_fields.as_deref()
    }

    fn reference(&self, name: &str) -> Option<Reference> {
        self.schema.references.get(name).cloned()
    }

    fn get(&self, name: &str) -> Value {
        self.values
            .get(name)
            .cloned()
            .or_else(|| self.field(name).and_then(|f| f.default.clone()))
            .unwrap_or(Value::Null)
    }

    fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn load(&mut self, id: &str) -> Result<()> {
        let record = self
            .schema
            .records
            .get(id)
            .ok_or_else(|| anyhow!("record {id} not found"))?;
        self.values = record.clone();
        self.loaded_id = Some(id.to_string());
        debug!(model = %self.schema.name, id, "record loaded");
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        let id = self
            .loaded_id
            .get_or_insert_with(|| Uuid::now_v7().to_string())
            .clone();

        let mut record = BTreeMap::new();
        for field in &self.schema.fields {
            record.insert(field.name.clone(), self.get(&field.name));
        }
        self.schema.records.insert(id.clone(), record);
        self.save_count += 1;

        debug!(model = %self.schema.name, id = %id, "record saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket() -> MemoryModel {
        MemoryModel::new("ticket")
            .with_field(FieldMeta::new("title", "string"))
            .with_field(FieldMeta::new("priority", "integer").default_value(3))
            .record(
                "t1",
                BTreeMap::from([("title".to_string(), json!("Broken login"))]),
            )
    }

    #[test]
    fn get_falls_back_to_default() {
        let model = ticket();
        assert_eq!(model.get("priority"), json!(3));
        assert_eq!(model.get("title"), Value::Null);
        assert_eq!(model.get("missing"), Value::Null);
    }

    #[test]
    fn load_and_save_round_trip() {
        let mut model = ticket();
        model.load("t1").unwrap();
        assert_eq!(model.loaded_id(), Some("t1"));
        assert_eq!(model.get("title"), json!("Broken login"));

        model.set("priority", json!(1));
        model.save().unwrap();

        let stored = model.stored("t1").unwrap();
        assert_eq!(stored["priority"], json!(1));
        assert_eq!(stored["title"], json!("Broken login"));
        assert_eq!(model.save_count(), 1);
    }

    #[test]
    fn load_missing_record_fails() {
        let mut model = ticket();
        let err = model.load("nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
        assert_eq!(model.loaded_id(), None);
    }

    #[test]
    fn save_new_record_assigns_id() {
        let mut model = ticket();
        model.set("title", json!("New"));
        model.save().unwrap();

        let id = model.loaded_id().unwrap().to_string();
        assert_eq!(model.stored(&id).unwrap()["title"], json!("New"));
    }

    #[test]
    fn schema_from_yaml() {
        let yaml = r#"
name: ticket
only_fields: [title]
fields:
  - name: title
    mandatory: true
  - name: owner_id
    type: reference_id
references:
  owner_id:
    model: user
    choices:
      - ["u1", "Alice"]
"#;
        let model = MemoryModel::from_schema(ModelSchema::from_yaml(yaml).unwrap());
        assert_eq!(model.name(), "ticket");
        assert_eq!(model.field_names(), vec!["title", "owner_id"]);
        assert_eq!(model.field("title").unwrap().field_type, "string");
        assert_eq!(model.only_fields(), Some(&["title".to_string()][..]));
        assert_eq!(model.reference("owner_id").unwrap().model, "user");
        assert!(model.as_orm().is_some());
    }
}
