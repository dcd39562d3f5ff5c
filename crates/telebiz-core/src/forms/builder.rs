//! Entity form construction.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use telebiz_models::{
    EntityType, FieldOptions, FieldType, FieldValue, FormField, Provider, ProviderProperty,
};
use tracing::debug;

use super::catalog::{FormCatalog, SchemaSource};
use super::graph::DependencyGraph;
use super::mapping::{default_value, resolve_field_type};
use super::normalize::to_field_value;
use super::order::order_fields;
use super::state::FormState;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

/// Which subset of fields to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Every applicable field.
    #[default]
    Full,
    /// Only the entity type's allow-listed quick-create fields.
    Minimal,
}

/// Per-call build options.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Restricts schema-derived forms to properties of this schema.
    pub schema_id: Option<String>,
}

impl BuildOptions {
    pub fn with_schema_id(mut self, schema_id: impl Into<String>) -> Self {
        self.schema_id = Some(schema_id.into());
        self
    }
}

/// Builds ordered, dependency-resolved field lists from provider metadata.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use telebiz_core::forms::{BuildMode, BuildOptions, FormBuilder, FormCatalog};
/// use telebiz_models::{EntityType, Provider};
///
/// let builder = FormBuilder::new(Arc::new(FormCatalog::builtin()));
/// let fields = builder
///     .build_fields(EntityType::Contact, Provider::Notion, &[], BuildMode::Full, &BuildOptions::default())
///     .unwrap();
/// let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, ["name", "phone", "email"]);
/// ```
#[derive(Clone)]
pub struct FormBuilder {
    catalog: Arc<FormCatalog>,
    clock: Arc<dyn Clock>,
}

impl FormBuilder {
    pub fn new(catalog: Arc<FormCatalog>) -> Self {
        Self {
            catalog,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for date defaults.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &FormCatalog {
        &self.catalog
    }

    /// Builds the field list for `entity_type` on `provider`.
    ///
    /// Properties the canonical order names but the provider lacks are
    /// skipped, as are choice fields left without options. The only error
    /// is a dependency cycle in the metadata.
    pub fn build_fields(
        &self,
        entity_type: EntityType,
        provider: Provider,
        properties: &[ProviderProperty],
        mode: BuildMode,
        options: &BuildOptions,
    ) -> Result<Vec<FormField>> {
        Ok(self
            .build_state(entity_type, provider, properties, mode, options)?
            .into_fields())
    }

    /// Like [`FormBuilder::build_fields`], returning a live [`FormState`].
    pub fn build_state(
        &self,
        entity_type: EntityType,
        provider: Provider,
        properties: &[ProviderProperty],
        mode: BuildMode,
        options: &BuildOptions,
    ) -> Result<FormState> {
        let now = self.clock.now().naive_local();

        let (fields, reorder) = match self.catalog.source_for(provider, entity_type) {
            SchemaSource::SchemaDerived => {
                (schema_fields(properties, options.schema_id.as_deref()), false)
            }
            SchemaSource::Dynamic(names) => (dynamic_fields(names, properties, now), true),
            SchemaSource::StaticTemplate(template) => (template_fields(template, properties), true),
        };

        let fields = dedupe(retain_displayable(fields));
        let graph = DependencyGraph::resolve(&fields)?;
        let fields = if reorder {
            order_fields(fields, &graph)
        } else {
            fields
        };

        let mut state = FormState::from_parts(fields, graph);
        state.settle();

        if mode == BuildMode::Minimal {
            if let Some(allowed) = self.catalog.minimal_fields(entity_type) {
                let mut fields = state.into_fields();
                fields.retain(|f| allowed.contains(&f.name));
                state = FormState::new(fields)?;
            }
        }

        debug!(
            "Built {} field(s) for {} {} ({:?})",
            state.fields().len(),
            provider,
            entity_type,
            mode
        );
        Ok(state)
    }
}

/// 1:1 conversion of schema properties, values taken from the properties.
fn schema_fields(properties: &[ProviderProperty], schema_id: Option<&str>) -> Vec<FormField> {
    properties
        .iter()
        .filter(|p| schema_id.is_none() || p.schema_id.as_deref() == schema_id)
        .map(|p| {
            let field_type = resolve_field_type(p);
            let value = p
                .value
                .as_ref()
                .map(|raw| to_field_value(field_type, raw))
                .unwrap_or_else(|| FieldValue::empty_for(field_type));
            FormField {
                name: p.name.clone(),
                field_type,
                value,
                options: p.options.clone().map(FieldOptions::from),
                depends_on: p.depends_on.clone(),
                label: None,
                provider_label: p.label.clone(),
                is_future_only: false,
            }
        })
        .collect()
}

/// Canonical names resolved against the provider's properties.
fn dynamic_fields(
    names: &[String],
    properties: &[ProviderProperty],
    now: NaiveDateTime,
) -> Vec<FormField> {
    names
        .iter()
        .filter_map(|name| {
            let Some(property) = properties.iter().find(|p| &p.name == name) else {
                debug!("Provider has no '{}' property, skipping", name);
                return None;
            };
            Some(field_from_property(property, now))
        })
        .collect()
}

fn field_from_property(property: &ProviderProperty, now: NaiveDateTime) -> FormField {
    let field_type = resolve_field_type(property);
    let options = property
        .non_empty_options()
        .cloned()
        .map(FieldOptions::from);
    let value = default_value(field_type, options.as_ref(), now);
    FormField {
        name: property.name.clone(),
        field_type,
        value,
        options,
        depends_on: property.depends_on.clone(),
        label: None,
        provider_label: property.label.clone(),
        is_future_only: false,
    }
}

/// Static template enriched with provider labels and, for choice fields,
/// provider options.
fn template_fields(template: &[FormField], properties: &[ProviderProperty]) -> Vec<FormField> {
    template
        .iter()
        .map(|tpl| {
            let mut field = tpl.clone();
            if let Some(property) = properties.iter().find(|p| p.name == field.name) {
                if let Some(label) = &property.label {
                    field.provider_label = Some(label.clone());
                }
                if field.field_type.is_choice() {
                    if let Some(options) = property.non_empty_options() {
                        field.options = Some(options.clone().into());
                    }
                }
            }
            if field.field_type == FieldType::Select && field.value.is_empty() {
                if let Some(first) = field
                    .options
                    .as_ref()
                    .and_then(FieldOptions::as_flat)
                    .and_then(|list| list.first())
                {
                    field.value = FieldValue::Text(first.value.clone());
                }
            }
            field
        })
        .collect()
}

/// Keeps the first field of each name.
fn dedupe(fields: Vec<FormField>) -> Vec<FormField> {
    let mut seen = HashSet::new();
    fields
        .into_iter()
        .filter(|f| {
            let fresh = seen.insert(f.name.clone());
            if !fresh {
                debug!("Dropping duplicate field '{}'", f.name);
            }
            fresh
        })
        .collect()
}

/// Drops choice fields that have nothing to choose from.
fn retain_displayable(mut fields: Vec<FormField>) -> Vec<FormField> {
    fields.retain(|f| {
        let keep = f.has_resolvable_options();
        if !keep {
            debug!("Dropping '{}': {} without options", f.name, f.field_type);
        }
        keep
    });
    fields
}
