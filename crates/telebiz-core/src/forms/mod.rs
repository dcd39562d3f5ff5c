//! Entity form schema building.
//!
//! Maps heterogeneous provider property metadata into an ordered,
//! dependency-aware list of [`FormField`](telebiz_models::FormField)s.
//!
//! # Pipeline
//!
//! 1. **Source** - exactly one of schema-derived, dynamic or static
//!    template, chosen from the [`FormCatalog`].
//! 2. **Clean** - duplicate names and option-less choice fields dropped.
//! 3. **Order** - titles, then type priority, dependents after parents.
//! 4. **Settle** - dependent values brought in line with parents.
//! 5. **Filter** - minimal allow-list in quick-create mode.

mod builder;
mod catalog;
mod graph;
mod mapping;
mod normalize;
mod order;
mod state;


pub use builder::{BuildMode, BuildOptions, FormBuilder};
pub use catalog::{DynamicForm, FormCatalog, SchemaSource, CATALOG_VERSION};
pub use graph::DependencyGraph;
pub use mapping::{
    apply_option_override, declares_multiselect, default_value, map_property_type,
    resolve_field_type, LOCAL_ISO_FORMAT,
};
pub use normalize::{field_value_to_json, normalize_value, to_field_value};
pub use order::{is_title_like, order_fields};
pub use state::FormState;
