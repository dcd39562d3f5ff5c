//! Form field descriptors.
//!
//! A [`FormField`] is what the form renderer consumes: a stable name, one of
//! six field types, the current value, and optionally an option set that may
//! depend on another field's value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::entity::UnknownVariant;

/// Editable representation of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Date,
    Select,
    Multiselect,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        Self::Text,
        Self::Textarea,
        Self::Number,
        Self::Date,
        Self::Select,
        Self::Multiselect,
    ];

    /// Sort priority used when ordering independent fields (lower first).
    pub fn priority(&self) -> u8 {
        match self {
            Self::Select => 0,
            Self::Multiselect => 1,
            Self::Text => 2,
            Self::Number => 3,
            Self::Date => 4,
            Self::Textarea => 5,
        }
    }

    /// True for `select` and `multiselect`.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or(UnknownVariant {
                kind: "field type",
                value: s.to_string(),
            })
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Option set of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOptions {
    /// Fixed ordered list.
    Flat(Vec<FieldOption>),
    /// Options keyed by the parent field's current value.
    ByParent(BTreeMap<String, Vec<FieldOption>>),
}

impl FieldOptions {
    /// True when no option can ever be offered.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(list) => list.is_empty(),
            Self::ByParent(map) => map.values().all(Vec::is_empty),
        }
    }

    /// The flat list, if this is a flat option set.
    pub fn as_flat(&self) -> Option<&[FieldOption]> {
        match self {
            Self::Flat(list) => Some(list),
            Self::ByParent(_) => None,
        }
    }

    /// Effective options given the parent's current value.
    ///
    /// Flat sets ignore the parent; keyed sets return nothing for an unknown
    /// or absent parent value.
    pub fn resolve(&self, parent_value: Option<&str>) -> &[FieldOption] {
        match self {
            Self::Flat(list) => list,
            Self::ByParent(map) => parent_value
                .and_then(|v| map.get(v))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }
}

/// Current value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Scalar or numeric string.
    Text(String),
    /// Ordered sequence, used by multiselect.
    List(Vec<String>),
}

impl FieldValue {
    /// The empty value appropriate for a field type.
    pub fn empty_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Multiselect => Self::List(Vec::new()),
            _ => Self::Text(String::new()),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// A normalized, renderable form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Fetch/submit key, unique within one built form.
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
    /// Name of the parent field whose value selects this field's options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
    /// Localization key caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Caption supplied by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_label: Option<String>,
    /// Rendering hint: only future dates may be picked.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_future_only: bool,
}

impl FormField {
    /// Creates a field with the empty value for its type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            value: FieldValue::empty_for(field_type),
            options: None,
            depends_on: None,
            label: None,
            provider_label: None,
            is_future_only: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>) -> Self {
        self.label = Some(key.into());
        self
    }

    pub fn with_provider_label(mut self, label: impl Into<String>) -> Self {
        self.provider_label = Some(label.into());
        self
    }

    pub fn depending_on(mut self, parent: impl Into<String>) -> Self {
        self.depends_on = Some(parent.into());
        self
    }

    pub fn future_only(mut self) -> Self {
        self.is_future_only = true;
        self
    }

    /// Caption to display: provider label first, then the localization key,
    /// then the field name.
    pub fn caption(&self) -> &str {
        self.provider_label
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(&self.name)
    }

    /// Whether this field can be shown.
    ///
    /// Non-choice fields always can. Choice fields need a non-empty flat
    /// list, or a non-empty keyed set together with a parent to key it by.
    pub fn has_resolvable_options(&self) -> bool {
        if !self.field_type.is_choice() {
            return true;
        }
        match &self.options {
            Some(opts @ FieldOptions::Flat(_)) => !opts.is_empty(),
            Some(opts @ FieldOptions::ByParent(_)) => {
                self.depends_on.is_some() && !opts.is_empty()
            }
            None => false,
        }
    }
}
