//! Telebiz Core - shared business logic for the Telebiz agent and CLI.
//!
//! - **temporal**: Resolve natural-language reminder times to timestamps
//! - **forms**: Build ordered, dependency-aware entity forms from provider metadata
//! - **guard**: At-most-one-in-flight tracking for mutating actions
//! - **clock**: Injectable source of "now"
//! - **config**: Shared configuration paths and environment loading

pub mod clock;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod temporal;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{config_dir, ensure_config_dir, env_file, forms_catalog_file, load_env, logs_dir, state_dir};
pub use error::{FormError, GuardError, TemporalError};
pub use guard::{InFlightGuard, InFlightTicket};
pub use temporal::{resolve_remind_at, resolve_with_clock};

// Re-export form building
pub use forms::{
    normalize_value, BuildMode, BuildOptions, DependencyGraph, FormBuilder, FormCatalog, FormState,
};
