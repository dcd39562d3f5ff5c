//! Core data models for Telebiz.
//!
//! This crate provides the plain data types shared by the Telebiz crates:
//! ids, entity types and providers, provider property metadata, form field
//! descriptors, reminders, and entity-creation requests.

pub mod entity;
pub mod field;
pub mod ids;
pub mod property;
pub mod reminder;
pub mod request;

// Re-export main types
pub use entity::{EntityType, Provider, UnknownVariant};
pub use field::{FieldOption, FieldOptions, FieldType, FieldValue, FormField};
pub use ids::{ChatId, EntityId, IntegrationId, MessageId, OrganizationId, ReminderId};
pub use property::{PropertyOptions, PropertyType, ProviderProperty};
pub use reminder::{to_iso, NewReminder, Reminder, ReminderUpdate};
pub use request::{CreateEntityRequest, CreatedEntity, LinkTarget};
