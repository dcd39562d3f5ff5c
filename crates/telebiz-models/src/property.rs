//! Provider property metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::field::{FieldOption, FieldOptions};

/// Semantic type a provider declares for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[serde(alias = "title", alias = "rich_text", alias = "string")]
    Text,
    Email,
    #[serde(alias = "phone_number")]
    Phone,
    Url,
    #[serde(alias = "checkbox", alias = "bool")]
    Boolean,
    #[serde(alias = "people", alias = "owner")]
    User,
    Textarea,
    Number,
    Currency,
    Date,
    #[serde(alias = "date_time")]
    Datetime,
    Select,
    Status,
    Stage,
    #[serde(alias = "enumeration")]
    Enum,
    #[serde(alias = "multi_select", alias = "multiple_options")]
    Multiselect,
    Set,
    /// Anything the provider declares that is not listed above.
    #[serde(other)]
    Unknown,
}

/// Options as the provider ships them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyOptions {
    Flat(Vec<FieldOption>),
    ByParent(BTreeMap<String, Vec<FieldOption>>),
}

impl PropertyOptions {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(list) => list.is_empty(),
            Self::ByParent(map) => map.is_empty(),
        }
    }
}

impl From<PropertyOptions> for FieldOptions {
    fn from(opts: PropertyOptions) -> Self {
        match opts {
            PropertyOptions::Flat(list) => FieldOptions::Flat(list),
            PropertyOptions::ByParent(map) => FieldOptions::ByParent(map),
        }
    }
}

/// A standardized, provider-declared property definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProperty {
    /// Standardized name the form builder looks fields up by.
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub options: Option<PropertyOptions>,
    /// Explicit multiselect declaration, independent of `type`.
    #[serde(default)]
    pub is_multi_select: bool,
    #[serde(default)]
    pub depends_on: Option<String>,
    /// Owning schema (database) id for page-like providers.
    #[serde(default)]
    pub schema_id: Option<String>,
    /// Current value, present for schema-derived properties.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl ProviderProperty {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            label: None,
            property_type,
            options: None,
            is_multi_select: false,
            depends_on: None,
            schema_id: None,
            value: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_options(mut self, options: PropertyOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn multi_select(mut self) -> Self {
        self.is_multi_select = true;
        self
    }

    pub fn depending_on(mut self, parent: impl Into<String>) -> Self {
        self.depends_on = Some(parent.into());
        self
    }

    pub fn in_schema(mut self, schema_id: impl Into<String>) -> Self {
        self.schema_id = Some(schema_id.into());
        self
    }

    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Options only when there is at least one.
    pub fn non_empty_options(&self) -> Option<&PropertyOptions> {
        self.options.as_ref().filter(|o| !o.is_empty())
    }
}
