//! Command handlers for CLI subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use telebiz_agent::{ReminderTools, ToolCall};
use telebiz_client::HttpClient;
use telebiz_core::forms::{normalize_value, BuildMode, BuildOptions, FormBuilder, FormCatalog};
use telebiz_core::{config, resolve_remind_at, resolve_with_clock, SystemClock};
use telebiz_models::{to_iso, EntityType, FieldType, FormField, Provider, ProviderProperty};
use tracing::{debug, info};

use crate::cli::{Commands, OutputFormat};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Resolve { expr, now } => cmd_resolve(&expr.join(" "), now.as_deref()),
        Commands::Fields {
            entity,
            provider,
            properties,
            minimal,
            schema_id,
            catalog,
            format,
        } => cmd_fields(&FieldsArgs {
            entity,
            provider,
            properties,
            minimal,
            schema_id,
            catalog,
            format,
        }),
        Commands::Normalize { field_type, value } => cmd_normalize(field_type, &value),
        Commands::Remind {
            expr,
            chat,
            message,
            note,
        } => cmd_remind(&expr.join(" "), chat, message, note),
    }
}

fn cmd_resolve(expr: &str, now: Option<&str>) -> Result<()> {
    println!("{}", resolve(expr, now)?);
    Ok(())
}

/// Resolves `expr` against `now` (RFC 3339) or the wall clock.
pub fn resolve(expr: &str, now: Option<&str>) -> Result<String> {
    let at: DateTime<Utc> = match now {
        Some(now) => {
            let now = DateTime::parse_from_rfc3339(now)
                .map_err(|e| format!("invalid --now '{}': {}", now, e))?;
            resolve_remind_at(expr, &now)?.with_timezone(&Utc)
        }
        None => resolve_with_clock(expr, &SystemClock)?,
    };
    Ok(to_iso(at))
}

struct FieldsArgs {
    entity: EntityType,
    provider: Provider,
    properties: Option<PathBuf>,
    minimal: bool,
    schema_id: Option<String>,
    catalog: Option<PathBuf>,
    format: OutputFormat,
}

fn cmd_fields(args: &FieldsArgs) -> Result<()> {
    let catalog_path = args
        .catalog
        .clone()
        .unwrap_or_else(config::forms_catalog_file);
    let catalog = FormCatalog::load_or_builtin(&catalog_path)?;

    let properties = match &args.properties {
        Some(path) => load_properties(path)?,
        None => Vec::new(),
    };
    debug!("Loaded {} provider properties", properties.len());

    let mode = if args.minimal {
        BuildMode::Minimal
    } else {
        BuildMode::Full
    };
    let mut options = BuildOptions::default();
    if let Some(schema_id) = &args.schema_id {
        options = options.with_schema_id(schema_id);
    }

    let fields = FormBuilder::new(Arc::new(catalog)).build_fields(
        args.entity,
        args.provider,
        &properties,
        mode,
        &options,
    )?;

    match args.format {
        OutputFormat::Table => print!("{}", render_table(&fields)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fields)?),
    }
    Ok(())
}

/// Reads provider property metadata: a JSON array of properties.
pub fn load_properties(path: &Path) -> Result<Vec<ProviderProperty>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&data)?)
}

/// Fixed-width table of fields, one per line.
pub fn render_table(fields: &[FormField]) -> String {
    if fields.is_empty() {
        return "No fields.\n".to_string();
    }

    let mut out = format!(
        "{:<20}  {:<12}  {:<20}  {:<12}  LABEL\n",
        "NAME", "TYPE", "VALUE", "DEPENDS ON"
    );
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for field in fields {
        let value = match serde_json::to_value(&field.value) {
            Ok(Value::String(s)) => s,
            Ok(other) => other.to_string(),
            Err(_) => String::new(),
        };
        out.push_str(&format!(
            "{:<20}  {:<12}  {:<20}  {:<12}  {}\n",
            truncate(&field.name, 20),
            field.field_type.as_str(),
            truncate(&value, 20),
            field.depends_on.as_deref().unwrap_or("-"),
            field.caption()
        ));
    }
    out.push_str(&format!("\n{} field(s)\n", fields.len()));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn cmd_normalize(field_type: FieldType, raw: &str) -> Result<()> {
    let normalized = normalize(field_type, raw);
    println!("{}", serde_json::to_string(&normalized)?);
    Ok(())
}

/// Normalizes a raw argument; input that is not JSON is a plain string.
pub fn normalize(field_type: FieldType, raw: &str) -> Value {
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    normalize_value(field_type, &value).unwrap_or(Value::Null)
}

fn cmd_remind(expr: &str, chat: i64, message: Option<i64>, note: Option<String>) -> Result<()> {
    let client = HttpClient::from_env()?;
    let tools = ReminderTools::new(Arc::new(client));
    let call = ToolCall::new(
        "create_reminder",
        json!({
            "remind_at": expr,
            "chat_id": chat,
            "message_id": message,
            "note": note,
        }),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(tools.execute(&call))?;
    if result.is_error {
        return Err(result.content.into());
    }
    info!("Reminder scheduled for chat {}", chat);
    println!("{}", result.content);
    Ok(())
}
