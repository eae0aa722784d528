//! Vetrina command-line tool.
//!
//! Builds forms from model schema files and renders menus, so schemas and
//! templates can be checked outside an application.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vetrina_kernel::Config;
use vetrina_kernel::binder::{FieldBinder, FieldSelection};
use vetrina_kernel::form::{Form, FormResult};
use vetrina_kernel::menu::{Menu, SiteContext};
use vetrina_kernel::model::{MemoryModel, ModelSchema};
use vetrina_kernel::theme::ThemeEngine;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bind a model schema to a new form and print the form as JSON.
    Form {
        /// Model schema file (YAML, or JSON with a .json extension).
        schema: PathBuf,

        /// Fields to bind, comma-separated (default: every editable, visible field).
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Record to load into the form.
        #[arg(long)]
        record: Option<String>,

        /// Submit the form with `name=value` (value parsed as JSON when possible).
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, Value)>,
    },

    /// Render a menu as HTML.
    Menu {
        /// Identifier of the current page.
        #[arg(long)]
        page: String,

        /// Menu name.
        #[arg(long, default_value = "menu")]
        name: String,

        /// Entries: `Label`, `Label=target`, or `-` for a separator.
        entries: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Command::Form {
            schema,
            fields,
            record,
            set,
        } => run_form(&config, &schema, fields, record, set),
        Command::Menu {
            page,
            name,
            entries,
        } => run_menu(&config, page, name, &entries),
    }
}

fn run_form(
    config: &Config,
    schema_path: &Path,
    fields: Vec<String>,
    record: Option<String>,
    set: Vec<(String, Value)>,
) -> Result<()> {
    let source = std::fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read {}", schema_path.display()))?;
    let schema = match schema_path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ModelSchema::from_json(&source)?,
        _ => ModelSchema::from_yaml(&source)?,
    };

    let mut form = Form::new(format!("{}_form", schema.name));
    let mut binder = FieldBinder::new(Box::new(MemoryModel::from_schema(schema)))?
        .with_empty_text(config.form_empty_text.clone());

    let selection = if fields.is_empty() {
        FieldSelection::All
    } else {
        FieldSelection::Only(fields)
    };
    let bound = binder.bind_fields(&mut form, selection)?;
    info!(form_id = %form.form_id, fields = bound.len(), "form built");

    if let Some(id) = record {
        binder
            .load_record(&mut form, &id)
            .with_context(|| format!("failed to load record {id}"))?;
    }

    if !set.is_empty() {
        let values: HashMap<String, Value> = set.into_iter().collect();
        match binder.process(&mut form, &values)? {
            FormResult::Success => info!(form_id = %form.form_id, "form submitted"),
            FormResult::ValidationFailed(errors) => {
                for error in &errors {
                    warn!(field = ?error.field, "{}", error.message);
                }
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&form)?);
    Ok(())
}

fn run_menu(config: &Config, page: String, name: String, entries: &[String]) -> Result<()> {
    let context = SiteContext::from_config(config, page)
        .with_app_info("app_name", env!("CARGO_PKG_NAME"))
        .with_app_info("app_version", env!("CARGO_PKG_VERSION"));
    let mut menu = Menu::new(name, &context).with_config(config);

    for entry in entries {
        if entry == "-" {
            menu.add_separator(None);
            continue;
        }
        match entry.split_once('=') {
            Some((label, target)) => menu.add_item(label, Some(target)),
            None => menu.add_item(entry, None),
        };
    }

    let engine = match config.template_dir {
        Some(ref dir) => ThemeEngine::new(dir)?,
        None => ThemeEngine::with_defaults()?,
    };
    println!("{}", engine.render_menu(&menu)?);
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn assignment_values() {
        assert_eq!(
            parse_assignment("title=Printer on fire").unwrap(),
            ("title".to_string(), Value::from("Printer on fire"))
        );
        assert_eq!(
            parse_assignment("count=3").unwrap(),
            ("count".to_string(), Value::from(3))
        );
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), Value::from("a=b"))
        );
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn cli_parses_menu_entries() {
        let cli = Cli::try_parse_from([
            "vetrina", "menu", "--page", "Home", "Home", "-", "Docs=docs",
        ])
        .unwrap();
        match cli.command {
            Command::Menu {
                page,
                name,
                entries,
            } => {
                assert_eq!(page, "Home");
                assert_eq!(name, "menu");
                assert_eq!(entries, vec!["Home", "-", "Docs=docs"]);
            }
            Command::Form { .. } => panic!("expected menu command"),
        }
    }
}
