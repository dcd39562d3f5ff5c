//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use telebiz_models::{EntityType, FieldType, Provider};

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Telebiz - reminder times and CRM entity forms from the command line
#[derive(Parser, Debug)]
#[command(name = "telebiz")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a reminder time expression to an ISO timestamp
    Resolve {
        /// Expression such as "in 2 hours" or "tomorrow 3pm"
        #[arg(required = true, num_args = 1..)]
        expr: Vec<String>,

        /// Reference time (RFC 3339) instead of the current time
        #[arg(long)]
        now: Option<String>,
    },

    /// Build the form fields for an entity type on a provider
    Fields {
        /// Entity type (contact, company, deal, task, ...)
        #[arg(short, long)]
        entity: EntityType,

        /// Provider (hubspot, pipedrive, notion)
        #[arg(short, long)]
        provider: Provider,

        /// JSON file with the provider's property metadata
        #[arg(long)]
        properties: Option<PathBuf>,

        /// Only the quick-create fields
        #[arg(short, long)]
        minimal: bool,

        /// Restrict schema-derived forms to one schema (database)
        #[arg(long)]
        schema_id: Option<String>,

        /// Form catalog file (default: config/forms.json, else builtin)
        #[arg(long, env = "TELEBIZ_FORMS_CATALOG")]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Normalize a raw widget value for submission
    Normalize {
        /// Field type the value belongs to
        #[arg(short = 't', long = "type")]
        field_type: FieldType,

        /// Raw value as JSON (bare text is taken as a string)
        value: String,
    },

    /// Schedule a reminder through the Telebiz API
    Remind {
        /// When to remind, e.g. "tomorrow 9am"
        #[arg(required = true, num_args = 1..)]
        expr: Vec<String>,

        /// Chat the reminder belongs to
        #[arg(long)]
        chat: i64,

        /// Message the reminder refers to
        #[arg(long)]
        message: Option<i64>,

        /// Reminder text
        #[arg(long)]
        note: Option<String>,
    },
}

/// Output format for the fields command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_resolve() {
        let cli = Cli::parse_from(["telebiz", "resolve", "tomorrow", "3pm"]);
        match cli.command {
            Commands::Resolve { expr, now } => {
                assert_eq!(expr.join(" "), "tomorrow 3pm");
                assert!(now.is_none());
            }
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_cli_parse_fields() {
        let cli = Cli::parse_from([
            "telebiz", "fields", "--entity", "deal", "--provider", "HubSpot", "--minimal",
            "--format", "json",
        ]);
        match cli.command {
            Commands::Fields {
                entity,
                provider,
                minimal,
                format,
                ..
            } => {
                assert_eq!(entity, EntityType::Deal);
                assert_eq!(provider, Provider::Hubspot);
                assert!(minimal);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Fields command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_entity() {
        let result = Cli::try_parse_from(["telebiz", "fields", "-e", "lead", "-p", "notion"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_normalize() {
        let cli = Cli::parse_from(["telebiz", "normalize", "--type", "multiselect", "a,b"]);
        match cli.command {
            Commands::Normalize { field_type, value } => {
                assert_eq!(field_type, FieldType::Multiselect);
                assert_eq!(value, "a,b");
            }
            _ => panic!("Expected Normalize command"),
        }
    }

    #[test]
    fn test_cli_parse_remind() {
        let cli = Cli::parse_from(["telebiz", "-vv", "remind", "in", "2", "hours", "--chat", "42"]);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        match cli.command {
            Commands::Remind {
                expr,
                chat,
                message,
                ..
            } => {
                assert_eq!(expr.join(" "), "in 2 hours");
                assert_eq!(chat, 42);
                assert!(message.is_none());
            }
            _ => panic!("Expected Remind command"),
        }
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
