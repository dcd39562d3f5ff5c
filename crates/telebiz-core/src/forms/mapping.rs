//! Property type to field type mapping.
//!
//! Two separate steps: [`map_property_type`] is the fixed semantic table,
//! [`apply_option_override`] then lets the property's own shape win.

use chrono::NaiveDateTime;
use telebiz_models::{FieldOptions, FieldType, FieldValue, PropertyType, ProviderProperty};

/// Layout of date defaults, as a `datetime-local` input expects.
pub const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Fixed semantic-type table.
pub fn map_property_type(property_type: PropertyType) -> FieldType {
    match property_type {
        PropertyType::Text
        | PropertyType::Email
        | PropertyType::Phone
        | PropertyType::Url
        | PropertyType::Boolean
        | PropertyType::User
        | PropertyType::Unknown => FieldType::Text,
        PropertyType::Textarea => FieldType::Textarea,
        PropertyType::Number | PropertyType::Currency => FieldType::Number,
        PropertyType::Date | PropertyType::Datetime => FieldType::Date,
        PropertyType::Select | PropertyType::Status | PropertyType::Stage | PropertyType::Enum => {
            FieldType::Select
        }
        PropertyType::Multiselect | PropertyType::Set => FieldType::Multiselect,
    }
}

/// Whether the property declares itself multiselect, by flag or by type.
pub fn declares_multiselect(property: &ProviderProperty) -> bool {
    property.is_multi_select
        || matches!(
            property.property_type,
            PropertyType::Multiselect | PropertyType::Set
        )
}

/// Shape override applied after the table lookup.
///
/// An explicit multiselect declaration forces `multiselect`; otherwise any
/// non-empty option set forces `select`.
pub fn apply_option_override(mapped: FieldType, property: &ProviderProperty) -> FieldType {
    if declares_multiselect(property) {
        FieldType::Multiselect
    } else if property.non_empty_options().is_some() {
        FieldType::Select
    } else {
        mapped
    }
}

/// Table lookup followed by the override.
pub fn resolve_field_type(property: &ProviderProperty) -> FieldType {
    apply_option_override(map_property_type(property.property_type), property)
}

/// Initial value for a freshly built field.
pub fn default_value(
    field_type: FieldType,
    options: Option<&FieldOptions>,
    now: NaiveDateTime,
) -> FieldValue {
    match field_type {
        FieldType::Date => FieldValue::Text(now.format(LOCAL_ISO_FORMAT).to_string()),
        FieldType::Number => FieldValue::text("0"),
        FieldType::Multiselect => FieldValue::List(Vec::new()),
        FieldType::Select => options
            .and_then(FieldOptions::as_flat)
            .and_then(|list| list.first())
            .map(|first| FieldValue::Text(first.value.clone()))
            .unwrap_or_default(),
        FieldType::Text | FieldType::Textarea => FieldValue::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use telebiz_models::{FieldOption, PropertyOptions};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(15, 4, 59)
            .unwrap()
    }

    fn flat(values: &[&str]) -> PropertyOptions {
        PropertyOptions::Flat(values.iter().map(|v| FieldOption::new(*v, *v)).collect())
    }

    #[test]
    fn test_type_table() {
        use PropertyType as P;
        let cases = [
            (P::Text, FieldType::Text),
            (P::Email, FieldType::Text),
            (P::Phone, FieldType::Text),
            (P::Url, FieldType::Text),
            (P::Boolean, FieldType::Text),
            (P::User, FieldType::Text),
            (P::Textarea, FieldType::Textarea),
            (P::Number, FieldType::Number),
            (P::Currency, FieldType::Number),
            (P::Date, FieldType::Date),
            (P::Datetime, FieldType::Date),
            (P::Select, FieldType::Select),
            (P::Status, FieldType::Select),
            (P::Stage, FieldType::Select),
            (P::Enum, FieldType::Select),
            (P::Multiselect, FieldType::Multiselect),
            (P::Set, FieldType::Multiselect),
        ];
        for (property_type, expected) in cases {
            assert_eq!(map_property_type(property_type), expected, "{:?}", property_type);
        }
    }

    #[test]
    fn test_options_force_select() {
        let prop = ProviderProperty::new("industry", PropertyType::Text).with_options(flat(&["it"]));
        assert_eq!(resolve_field_type(&prop), FieldType::Select);
    }

    #[test]
    fn test_empty_options_do_not_override() {
        let prop = ProviderProperty::new("industry", PropertyType::Text).with_options(flat(&[]));
        assert_eq!(resolve_field_type(&prop), FieldType::Text);
    }

    #[test]
    fn test_explicit_multiselect_wins_over_options() {
        let prop = ProviderProperty::new("tags", PropertyType::Enum)
            .with_options(flat(&["a", "b"]))
            .multi_select();
        assert_eq!(resolve_field_type(&prop), FieldType::Multiselect);

        let prop = ProviderProperty::new("labels", PropertyType::Set).with_options(flat(&["x"]));
        assert_eq!(resolve_field_type(&prop), FieldType::Multiselect);
    }

    #[test]
    fn test_multiselect_flag_without_options() {
        let prop = ProviderProperty::new("owners", PropertyType::User).multi_select();
        assert_eq!(resolve_field_type(&prop), FieldType::Multiselect);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            default_value(FieldType::Date, None, now()),
            FieldValue::text("2024-03-10T15:04")
        );
        assert_eq!(default_value(FieldType::Number, None, now()), FieldValue::text("0"));
        assert_eq!(default_value(FieldType::Text, None, now()), FieldValue::text(""));
        assert_eq!(default_value(FieldType::Textarea, None, now()), FieldValue::text(""));
        assert_eq!(
            default_value(FieldType::Multiselect, None, now()),
            FieldValue::List(vec![])
        );
    }

    #[test]
    fn test_select_default_is_first_option() {
        let opts: FieldOptions = flat(&["open", "closed"]).into();
        assert_eq!(
            default_value(FieldType::Select, Some(&opts), now()),
            FieldValue::text("open")
        );
        assert_eq!(
            default_value(FieldType::Multiselect, Some(&opts), now()),
            FieldValue::List(vec![])
        );
    }

    #[test]
    fn test_keyed_select_default_is_empty() {
        let opts = FieldOptions::ByParent(Default::default());
        assert_eq!(
            default_value(FieldType::Select, Some(&opts), now()),
            FieldValue::text("")
        );
    }
}
