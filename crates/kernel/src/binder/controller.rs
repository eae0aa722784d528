//! The form/model field binder.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::{ViewError, ViewResult};
use crate::form::{Form, FormElement, FormResult, Widget};
use crate::model::{Display, FieldMeta, Model, OrmModel};

use super::widgets::widget_for_type;

/// Label of the option injected into optional list widgets.
pub const DEFAULT_EMPTY_TEXT: &str = "- no value -";

/// Handle to a model owned by a [`FieldBinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(usize);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Link between a form element and the model field it edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub model: ModelId,
    pub field: String,
}

/// Which model fields to import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldSelection {
    /// The model's allow-list if it has one, otherwise every editable,
    /// visible field.
    #[default]
    All,

    /// Exactly these fields (ineligible ones are skipped). An empty list
    /// selects the same fields as [`All`](Self::All).
    Only(Vec<String>),

    /// Associate the model with the form without importing anything.
    Nothing,
}

impl FieldSelection {
    /// Select the given fields.
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSelection::Only(fields.into_iter().map(Into::into).collect())
    }
}

/// Imports model fields into a form and keeps both sides in sync.
pub struct FieldBinder {
    models: Vec<Box<dyn Model>>,
    current: ModelId,
    /// Form element name -> model field, in binding order.
    associations: Vec<(String, Association)>,
    /// Per-binder additions to [`TYPE_WIDGETS`](super::TYPE_WIDGETS).
    type_widgets: BTreeMap<String, Widget>,
    empty_text: String,
    /// Set once the submit and record-load handlers are active.
    wired: bool,
}

impl FieldBinder {
    /// Attach a binder to the form's model.
    ///
    /// Fails with [`ViewError::NotOrmModel`] when the model cannot describe
    /// its fields.
    pub fn new(model: Box<dyn Model>) -> ViewResult<Self> {
        let mut binder = Self {
            models: Vec::new(),
            current: ModelId(0),
            associations: Vec::new(),
            type_widgets: BTreeMap::new(),
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
            wired: false,
        };
        binder.add_model(model)?;
        Ok(binder)
    }

    /// Map a field type tag to a widget, overriding the default table.
    pub fn with_type_widget(mut self, field_type: impl Into<String>, widget: Widget) -> Self {
        self.type_widgets.insert(field_type.into(), widget);
        self
    }

    /// Change the label of the "no value" option.
    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    fn add_model(&mut self, model: Box<dyn Model>) -> ViewResult<ModelId> {
        if model.as_orm().is_none() {
            return Err(ViewError::NotOrmModel {
                model: model.name().to_string(),
            });
        }
        let id = ModelId(self.models.len());
        self.models.push(model);
        self.current = id;
        Ok(id)
    }

    fn orm(&self, id: ModelId) -> ViewResult<&dyn OrmModel> {
        self.models
            .get(id.0)
            .and_then(|m| m.as_orm())
            .ok_or(ViewError::UnknownModel(id))
    }

    fn orm_in(models: &mut [Box<dyn Model>], id: ModelId) -> ViewResult<&mut dyn OrmModel> {
        models
            .get_mut(id.0)
            .and_then(|m| m.as_orm_mut())
            .ok_or(ViewError::UnknownModel(id))
    }

    /// Import fields of the current model. Returns the created element names.
    pub fn bind_fields(
        &mut self,
        form: &mut Form,
        selection: FieldSelection,
    ) -> ViewResult<Vec<String>> {
        self.import(form, self.current, selection)
    }

    /// Import fields of another model, which becomes the current model.
    pub fn bind_model_fields(
        &mut self,
        form: &mut Form,
        model: Box<dyn Model>,
        selection: FieldSelection,
    ) -> ViewResult<ModelId> {
        let id = self.add_model(model)?;
        self.import(form, id, selection)?;
        Ok(id)
    }

    fn import(
        &mut self,
        form: &mut Form,
        id: ModelId,
        selection: FieldSelection,
    ) -> ViewResult<Vec<String>> {
        let fields = match selection {
            FieldSelection::Nothing => {
                debug!(model = %id, form_id = %form.form_id, "model associated without fields");
                return Ok(Vec::new());
            }
            FieldSelection::Only(fields) if !fields.is_empty() => fields,
            FieldSelection::All | FieldSelection::Only(_) => {
                let orm = self.orm(id)?;
                match orm.only_fields() {
                    Some(only) if !only.is_empty() => only.to_vec(),
                    _ => orm
                        .field_names()
                        .into_iter()
                        .filter(|name| orm.field(name).is_some_and(FieldMeta::is_bindable))
                        .collect(),
                }
            }
        };

        let mut created = Vec::with_capacity(fields.len());
        for field in &fields {
            if let Some(name) = self.import_field(form, id, field, None)? {
                created.push(name);
            }
        }

        if !self.wired {
            self.wired = true;
            debug!(form_id = %form.form_id, model = %id, "submit and record-load handlers wired");
        }

        Ok(created)
    }

    /// Import one field of the current model.
    ///
    /// Returns the new element, or `None` when the field is unknown, not
    /// editable or hidden. The element is named after the field unless
    /// `form_field` is given; clashes get a numeric suffix.
    pub fn bind_field<'f>(
        &mut self,
        form: &'f mut Form,
        field: &str,
        form_field: Option<&str>,
    ) -> ViewResult<Option<&'f mut FormElement>> {
        match self.import_field(form, self.current, field, form_field)? {
            Some(name) => Ok(form.get_element_mut(&name)),
            None => Ok(None),
        }
    }

    fn import_field(
        &mut self,
        form: &mut Form,
        id: ModelId,
        field: &str,
        form_field: Option<&str>,
    ) -> ViewResult<Option<String>> {
        let (meta, reference, value) = {
            let orm = self.orm(id)?;
            let Some(meta) = orm.field(field) else {
                debug!(model = %orm.name(), field, "skipping unknown field");
                return Ok(None);
            };
            if !meta.is_bindable() {
                debug!(model = %orm.name(), field, "skipping read-only or hidden field");
                return Ok(None);
            }
            (meta.clone(), orm.reference(field), orm.get(field))
        };

        let name = match form_field {
            Some(name) => name.to_string(),
            None => form.unique_name(&meta.name),
        };
        self.associate(
            name.clone(),
            Association {
                model: id,
                field: meta.name.clone(),
            },
        );

        let widget = self.widget_for(&meta, reference.is_some());
        let title = meta
            .ui
            .caption
            .clone()
            .unwrap_or_else(|| humanize(&meta.name));
        let mut element = FormElement::new(widget.clone()).title(title).value(value);

        if let Some(reference) = reference {
            element.source_model = Some(reference.model);
            element.set_value_list(reference.choices);
        }

        if let Some(ref allowed) = meta.enumeration {
            let mut list = meta.ui.value_list.clone().unwrap_or_else(|| {
                allowed
                    .iter()
                    .map(|value| (value.clone(), value.clone()))
                    .collect()
            });
            // checkbox lists its labels unchecked-first
            if widget == Widget::Checkbox {
                list.reverse();
            }
            element.set_value_list(list);
        }

        if meta.mandatory {
            element.validate_not_null(meta.mandatory_message.clone());
        }

        if let Some(placeholder) = meta.ui.placeholder.as_deref().filter(|p| !p.is_empty()) {
            element.set_attr("placeholder", placeholder);
        }

        if let Some(ref hint) = meta.ui.hint {
            element.set_hint(hint.clone());
        }

        if widget.is_value_list() && !meta.mandatory {
            element.set_empty_text(self.empty_text.clone());
        }

        form.add_element(name.clone(), element);
        debug!(
            form_id = %form.form_id,
            element = %name,
            field = %meta.name,
            widget = widget.type_name(),
            "field bound"
        );

        Ok(Some(name))
    }

    /// Record an association, replacing one with the same element name in place.
    fn associate(&mut self, name: String, association: Association) {
        match self.associations.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = association,
            None => self.associations.push((name, association)),
        }
    }

    /// Widget a field of the current model would be bound with.
    pub fn resolve_widget(&self, field: &FieldMeta) -> Widget {
        let is_relation = self
            .orm(self.current)
            .ok()
            .and_then(|orm| orm.reference(&field.name))
            .is_some();
        self.widget_for(field, is_relation)
    }

    /// First match wins: explicit UI override, relation, enumeration on a
    /// non-boolean field, type table, single-line text.
    fn widget_for(&self, field: &FieldMeta, is_relation: bool) -> Widget {
        if let Some(name) = field.ui.display.as_ref().and_then(Display::for_form) {
            return Widget::from_name(name);
        }

        if is_relation {
            return Widget::DropDown;
        }

        if field.enumeration.is_some() && field.field_type != "boolean" {
            return Widget::DropDown;
        }

        self.type_widgets
            .get(&field.field_type)
            .or_else(|| widget_for_type(&field.field_type))
            .cloned()
            .unwrap_or(Widget::Line)
    }

    /// Copy every associated model value into its form element.
    pub fn sync_form_from_model(&self, form: &mut Form) -> ViewResult<()> {
        for (name, association) in &self.associations {
            let value = self.orm(association.model)?.get(&association.field);
            if !form.set(name, value) {
                debug!(form_id = %form.form_id, element = %name, "bound element no longer on form");
            }
        }
        Ok(())
    }

    /// Copy every associated form value into its model field.
    ///
    /// Returns the models touched, each once, in first-touch order.
    pub fn sync_model_from_form(&mut self, form: &Form) -> ViewResult<Vec<ModelId>> {
        let mut touched = Vec::new();
        for (name, association) in &self.associations {
            let value = form.get(name).cloned().unwrap_or(Value::Null);
            Self::orm_in(&mut self.models, association.model)?.set(&association.field, value);
            if !touched.contains(&association.model) {
                touched.push(association.model);
            }
        }
        Ok(touched)
    }

    /// Handle a submitted form: validate, copy values into the models and
    /// save each touched model once.
    ///
    /// Does nothing until fields have been imported with
    /// [`bind_fields`](Self::bind_fields) or
    /// [`bind_model_fields`](Self::bind_model_fields).
    pub fn submit(&mut self, form: &Form) -> ViewResult<FormResult> {
        if !self.wired {
            debug!(form_id = %form.form_id, "submit ignored, no handlers wired");
            return Ok(FormResult::Success);
        }

        let errors = form.validate();
        if !errors.is_empty() {
            debug!(form_id = %form.form_id, errors = errors.len(), "form validation failed");
            return Ok(FormResult::ValidationFailed(errors));
        }

        for id in self.sync_model_from_form(form)? {
            let model = Self::orm_in(&mut self.models, id)?;
            model.save().map_err(|source| ViewError::Persistence {
                model: model.name().to_string(),
                source,
            })?;
            debug!(form_id = %form.form_id, model = %model.name(), "model saved");
        }

        Ok(FormResult::Success)
    }

    /// Apply posted values to the form, then [`submit`](Self::submit) it.
    pub fn process(
        &mut self,
        form: &mut Form,
        values: &HashMap<String, Value>,
    ) -> ViewResult<FormResult> {
        form.apply_submission(values);
        self.submit(form)
    }

    /// Load a record into the current model and, once handlers are wired,
    /// refresh the form from the model.
    pub fn load_record(&mut self, form: &mut Form, id: &str) -> ViewResult<()> {
        self.load_model_record(form, self.current, id)
    }

    /// Load a record into any owned model, see [`load_record`](Self::load_record).
    pub fn load_model_record(
        &mut self,
        form: &mut Form,
        model: ModelId,
        id: &str,
    ) -> ViewResult<()> {
        let orm = Self::orm_in(&mut self.models, model)?;
        orm.load(id).map_err(|source| ViewError::RecordLoad {
            model: orm.name().to_string(),
            id: id.to_string(),
            source,
        })?;

        if self.wired {
            self.sync_form_from_model(form)?;
        }
        Ok(())
    }

    /// The model bound by the latest import.
    pub fn current_model(&self) -> ModelId {
        self.current
    }

    /// A model owned by this binder.
    pub fn model(&self, id: ModelId) -> Option<&dyn Model> {
        self.models.get(id.0).map(|m| m.as_ref())
    }

    /// Mutable access to a model owned by this binder.
    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut dyn Model> {
        let model = self.models.get_mut(id.0)?;
        Some(model.as_mut())
    }

    /// All associations as `(element name, association)`, in binding order.
    pub fn associations(&self) -> &[(String, Association)] {
        &self.associations
    }

    /// The association of a form element.
    pub fn association(&self, element: &str) -> Option<&Association> {
        self.associations
            .iter()
            .find(|(name, _)| name == element)
            .map(|(_, association)| association)
    }

    /// Whether the submit and record-load handlers are active.
    pub fn is_wired(&self) -> bool {
        self.wired
    }
}

impl fmt::Debug for FieldBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let models: Vec<_> = self.models.iter().map(|m| m.name()).collect();
        f.debug_struct("FieldBinder")
            .field("models", &models)
            .field("current", &self.current)
            .field("associations", &self.associations)
            .field("wired", &self.wired)
            .finish()
    }
}

/// "due_date" -> "Due Date"
fn humanize(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
