//! Form catalog: the immutable tables the form builder reads.
//!
//! - which entity type is schema-derived (1:1 from database properties),
//! - canonical field order for providers with first-class property support,
//! - static templates for everything else,
//! - minimal-field allow-lists for quick-create flows.
//!
//! The shipped tables come from [`FormCatalog::builtin`]. A JSON file with
//! the same shape can replace them at startup.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use telebiz_models::{EntityType, FieldType, FormField, Provider};
use tracing::{debug, info};

use crate::error::{FormError, Result};

/// Catalog format version this build understands.
pub const CATALOG_VERSION: u32 = 1;

/// Canonical ordered field names for one provider and entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicForm {
    pub provider: Provider,
    pub entity_type: EntityType,
    pub fields: Vec<String>,
}

/// Where a form's fields come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaSource<'a> {
    /// Every matching property becomes a field, as-is.
    SchemaDerived,
    /// Canonical names looked up in the provider's properties.
    Dynamic(&'a [String]),
    /// Hand-authored template enriched with provider labels and options.
    StaticTemplate(&'a [FormField]),
}

/// Versioned form configuration tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCatalog {
    pub version: u32,
    /// Entity type whose fields are derived from schema properties.
    pub schema_entity: EntityType,
    #[serde(default)]
    pub dynamic: Vec<DynamicForm>,
    #[serde(default)]
    pub templates: BTreeMap<EntityType, Vec<FormField>>,
    #[serde(default)]
    pub minimal: BTreeMap<EntityType, Vec<String>>,
}

impl FormCatalog {
    /// The tables shipped with Telebiz.
    pub fn builtin() -> Self {
        let crm = [Provider::Hubspot, Provider::Pipedrive];
        let mut dynamic = Vec::new();
        for provider in crm {
            dynamic.push(dynamic_form(
                provider,
                EntityType::Contact,
                &["name", "email", "phone", "company", "jobTitle", "lifecycleStage"],
            ));
            dynamic.push(dynamic_form(
                provider,
                EntityType::Company,
                &["name", "domain", "industry", "phone", "description"],
            ));
            dynamic.push(dynamic_form(
                provider,
                EntityType::Deal,
                &["title", "amount", "pipeline", "stage", "closeDate", "description"],
            ));
            dynamic.push(dynamic_form(
                provider,
                EntityType::Task,
                &["subject", "status", "priority", "dueDate", "description"],
            ));
        }
        dynamic.push(dynamic_form(
            Provider::Hubspot,
            EntityType::Meeting,
            &["title", "startTime", "endTime", "outcome", "description"],
        ));

        let mut templates = BTreeMap::new();
        templates.insert(
            EntityType::Contact,
            vec![
                FormField::new("name", FieldType::Text).with_label("Contact.Name"),
                FormField::new("phone", FieldType::Text).with_label("Contact.Phone"),
                FormField::new("email", FieldType::Text).with_label("Contact.Email"),
            ],
        );
        templates.insert(
            EntityType::Company,
            vec![
                FormField::new("name", FieldType::Text).with_label("Company.Name"),
                FormField::new("domain", FieldType::Text).with_label("Company.Domain"),
            ],
        );
        templates.insert(
            EntityType::Deal,
            vec![
                FormField::new("title", FieldType::Text).with_label("Deal.Title"),
                FormField::new("amount", FieldType::Number)
                    .with_label("Deal.Amount")
                    .with_value("0"),
                FormField::new("pipeline", FieldType::Select).with_label("Deal.Pipeline"),
                FormField::new("stage", FieldType::Select)
                    .with_label("Deal.Stage")
                    .depending_on("pipeline"),
                FormField::new("closeDate", FieldType::Date)
                    .with_label("Deal.CloseDate")
                    .future_only(),
            ],
        );
        templates.insert(
            EntityType::Task,
            vec![
                FormField::new("subject", FieldType::Text).with_label("Task.Subject"),
                FormField::new("priority", FieldType::Select).with_label("Task.Priority"),
                FormField::new("dueDate", FieldType::Date)
                    .with_label("Task.DueDate")
                    .future_only(),
                FormField::new("description", FieldType::Textarea).with_label("Task.Description"),
            ],
        );
        templates.insert(
            EntityType::Meeting,
            vec![
                FormField::new("title", FieldType::Text).with_label("Meeting.Title"),
                FormField::new("startTime", FieldType::Date)
                    .with_label("Meeting.StartTime")
                    .future_only(),
                FormField::new("description", FieldType::Textarea)
                    .with_label("Meeting.Description"),
            ],
        );
        templates.insert(
            EntityType::Note,
            vec![FormField::new("body", FieldType::Textarea).with_label("Note.Body")],
        );
        templates.insert(
            EntityType::Organization,
            vec![
                FormField::new("name", FieldType::Text).with_label("Organization.Name"),
                FormField::new("address", FieldType::Text).with_label("Organization.Address"),
            ],
        );
        templates.insert(
            EntityType::Page,
            vec![FormField::new("title", FieldType::Text).with_label("Page.Title")],
        );

        let mut minimal = BTreeMap::new();
        minimal.insert(EntityType::Contact, names(&["name", "email", "phone"]));
        minimal.insert(EntityType::Company, names(&["name", "domain"]));
        minimal.insert(EntityType::Deal, names(&["title", "pipeline", "stage"]));
        minimal.insert(EntityType::Task, names(&["subject", "dueDate"]));

        Self {
            version: CATALOG_VERSION,
            schema_entity: EntityType::Page,
            dynamic,
            templates,
            minimal,
        }
    }

    /// Reads and validates a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&data)?;
        catalog.validate()?;
        info!(
            "Loaded form catalog v{} from {}",
            catalog.version,
            path.display()
        );
        Ok(catalog)
    }

    /// Like [`FormCatalog::load`], but falls back to the builtin tables
    /// when the file does not exist.
    pub fn load_or_builtin(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No catalog at {}, using builtin tables", path.display());
            Ok(Self::builtin())
        }
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.version == 0 || self.version > CATALOG_VERSION {
            return Err(FormError::Catalog(format!(
                "unsupported catalog version {}",
                self.version
            )));
        }

        let mut seen_pairs = HashSet::new();
        for form in &self.dynamic {
            if !seen_pairs.insert((form.provider, form.entity_type)) {
                return Err(FormError::Catalog(format!(
                    "duplicate dynamic form for {} {}",
                    form.provider, form.entity_type
                )));
            }
            check_unique(
                form.fields.iter().map(String::as_str),
                &format!("{} {}", form.provider, form.entity_type),
            )?;
        }

        for (entity_type, fields) in &self.templates {
            check_unique(
                fields.iter().map(|f| f.name.as_str()),
                &format!("template {}", entity_type),
            )?;
        }

        Ok(())
    }

    /// Picks the single construction strategy for a provider and entity type.
    pub fn source_for(&self, provider: Provider, entity_type: EntityType) -> SchemaSource<'_> {
        if entity_type == self.schema_entity {
            return SchemaSource::SchemaDerived;
        }
        if let Some(form) = self
            .dynamic
            .iter()
            .find(|f| f.provider == provider && f.entity_type == entity_type)
        {
            return SchemaSource::Dynamic(&form.fields);
        }
        SchemaSource::StaticTemplate(self.template(entity_type))
    }

    /// Static template for `entity_type` (empty if none is defined).
    pub fn template(&self, entity_type: EntityType) -> &[FormField] {
        self.templates
            .get(&entity_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Minimal-field allow-list, if one is defined.
    pub fn minimal_fields(&self, entity_type: EntityType) -> Option<&[String]> {
        self.minimal.get(&entity_type).map(Vec::as_slice)
    }

    /// Whether the provider has first-class property support for the type.
    pub fn supports_dynamic(&self, provider: Provider, entity_type: EntityType) -> bool {
        matches!(
            self.source_for(provider, entity_type),
            SchemaSource::Dynamic(_)
        )
    }
}

impl Default for FormCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn dynamic_form(provider: Provider, entity_type: EntityType, fields: &[&str]) -> DynamicForm {
    DynamicForm {
        provider,
        entity_type,
        fields: names(fields),
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>, context: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(FormError::Catalog(format!(
                "duplicate field '{}' in {}",
                name, context
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_is_valid() {
        FormCatalog::builtin().validate().unwrap();
    }

    #[test]
    fn test_source_selection() {
        let catalog = FormCatalog::builtin();
        assert_eq!(
            catalog.source_for(Provider::Notion, EntityType::Page),
            SchemaSource::SchemaDerived
        );
        assert!(matches!(
            catalog.source_for(Provider::Hubspot, EntityType::Deal),
            SchemaSource::Dynamic(fields) if fields[0] == "title"
        ));
        assert!(matches!(
            catalog.source_for(Provider::Pipedrive, EntityType::Meeting),
            SchemaSource::StaticTemplate(fields) if fields.len() == 3
        ));
        assert!(matches!(
            catalog.source_for(Provider::Notion, EntityType::Contact),
            SchemaSource::StaticTemplate(_)
        ));
    }

    #[test]
    fn test_supports_dynamic() {
        let catalog = FormCatalog::builtin();
        assert!(catalog.supports_dynamic(Provider::Hubspot, EntityType::Meeting));
        assert!(!catalog.supports_dynamic(Provider::Pipedrive, EntityType::Note));
    }

    #[test]
    fn test_minimal_fields() {
        let catalog = FormCatalog::builtin();
        assert_eq!(
            catalog.minimal_fields(EntityType::Deal).unwrap(),
            ["title", "pipeline", "stage"]
        );
        assert!(catalog.minimal_fields(EntityType::Note).is_none());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.json");
        let catalog = FormCatalog::builtin();
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(serde_json::to_string_pretty(&catalog).unwrap().as_bytes())
            .unwrap();

        let loaded = FormCatalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_load_or_builtin_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FormCatalog::load_or_builtin(&dir.path().join("absent.json")).unwrap();
        assert_eq!(catalog, FormCatalog::builtin());
    }

    #[test]
    fn test_rejects_future_version() {
        let mut catalog = FormCatalog::builtin();
        catalog.version = CATALOG_VERSION + 1;
        assert!(matches!(catalog.validate(), Err(FormError::Catalog(_))));
    }

    #[test]
    fn test_rejects_duplicate_template_field() {
        let mut catalog = FormCatalog::builtin();
        catalog.templates.insert(
            EntityType::Note,
            vec![
                FormField::new("body", FieldType::Textarea),
                FormField::new("body", FieldType::Text),
            ],
        );
        let err = catalog.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid form catalog: duplicate field 'body' in template note"
        );
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FormCatalog::load(&path),
            Err(FormError::Serialization(_))
        ));
    }
}
