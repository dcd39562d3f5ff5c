//! Live form state: values, dependent resets, submit payload.

use std::collections::HashMap;

use serde_json::{Map, Value};
use telebiz_models::{FieldOption, FieldType, FieldValue, FormField};
use tracing::debug;

use super::graph::DependencyGraph;
use super::normalize::{field_value_to_json, normalize_value, to_field_value};
use crate::error::Result;

/// A built form plus the edges between its fields.
#[derive(Debug, Clone)]
pub struct FormState {
    fields: Vec<FormField>,
    index: HashMap<String, usize>,
    graph: DependencyGraph,
}

impl FormState {
    /// Wraps `fields`, resolving dependencies. Fails on cycles.
    pub fn new(fields: Vec<FormField>) -> Result<Self> {
        let graph = DependencyGraph::resolve(&fields)?;
        Ok(Self::from_parts(fields, graph))
    }

    pub(crate) fn from_parts(fields: Vec<FormField>, graph: DependencyGraph) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self {
            fields,
            index,
            graph,
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn into_fields(self) -> Vec<FormField> {
        self.fields
    }

    /// Options currently offered for `name`, with keyed options resolved
    /// against the parent's value.
    pub fn visible_options(&self, name: &str) -> &[FieldOption] {
        let Some(field) = self.field(name) else {
            return &[];
        };
        let Some(options) = &field.options else {
            return &[];
        };
        options.resolve(self.parent_value(name))
    }

    fn parent_value(&self, name: &str) -> Option<&str> {
        self.graph
            .parent_of(name)
            .and_then(|parent| self.field(parent))
            .and_then(|parent| parent.value.as_text())
    }

    /// Sets a field's value and resets every dependent field below it.
    ///
    /// Returns `false` if no field has that name.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        let Some(&i) = self.index.get(name) else {
            return false;
        };
        self.fields[i].value = value.into();
        for child in self.graph.descendants_of(name) {
            self.reset_to_first_option(&child);
        }
        true
    }

    /// Like [`FormState::set_value`], normalizing a raw widget value first.
    pub fn set_raw(&mut self, name: &str, raw: &Value) -> bool {
        let Some(field_type) = self.field(name).map(|f| f.field_type) else {
            return false;
        };
        self.set_value(name, to_field_value(field_type, raw))
    }

    /// Brings dependent fields in line with their parents' current values.
    ///
    /// A dependent value that is not among its visible options is reset to
    /// the first visible option. Parents settle before their children,
    /// whatever the field order.
    pub fn settle(&mut self) {
        let dependents: Vec<String> = self
            .fields
            .iter()
            .filter(|f| self.graph.parent_of(&f.name).is_none())
            .flat_map(|root| self.graph.descendants_of(&root.name))
            .collect();

        for name in dependents {
            let valid = match self.field(&name).map(|f| &f.value) {
                Some(FieldValue::Text(current)) => self
                    .visible_options(&name)
                    .iter()
                    .any(|o| &o.value == current),
                Some(FieldValue::List(items)) => items
                    .iter()
                    .all(|item| self.visible_options(&name).iter().any(|o| &o.value == item)),
                None => true,
            };
            if !valid {
                self.reset_to_first_option(&name);
            }
        }
    }

    fn reset_to_first_option(&mut self, name: &str) {
        let Some(&i) = self.index.get(name) else {
            return;
        };
        let field_type = self.fields[i].field_type;
        let first = self.visible_options(name).first().map(|o| o.value.clone());
        let value = match (field_type, first) {
            (FieldType::Select, Some(first)) => FieldValue::Text(first),
            _ => FieldValue::empty_for(field_type),
        };
        debug!("Reset dependent field '{}' to {:?}", name, value);
        self.fields[i].value = value;
    }

    /// Flat submit payload: every field's normalized value, omitting
    /// fields without one.
    pub fn values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter_map(|f| {
                normalize_value(f.field_type, &field_value_to_json(&f.value))
                    .map(|v| (f.name.clone(), v))
            })
            .collect()
    }
}
