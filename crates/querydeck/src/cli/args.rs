//! CLI argument structs for all commands.

use clap::Parser;
use std::path::PathBuf;

use super::validators::{validate_field_name, validate_prefix, validate_query_id};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Saved-query ID prefix (e.g., "q" for "q-a1b2c3")
    ///
    /// Must be 1-20 alphanumeric characters.
    #[arg(short, long, value_parser = validate_prefix)]
    pub prefix: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Maximum number of saved queries to display
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for the `save` command
#[derive(Parser, Debug, Clone)]
pub struct SaveArgs {
    /// Constraint to save (opaque to querydeck)
    #[arg(short, long)]
    pub constraint: String,

    /// Search key field (defaults to the configured default)
    #[arg(short, long, value_parser = validate_field_name)]
    pub key: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Saved query ID to delete
    #[arg(value_parser = validate_query_id)]
    pub query_id: String,
}

/// Arguments for the `apply` command
#[derive(Parser, Debug, Clone)]
pub struct ApplyArgs {
    /// Saved query ID to select
    #[arg(value_parser = validate_query_id)]
    pub query_id: String,
}

/// Schema source shared by `fields` and `session`
#[derive(Parser, Debug, Clone)]
pub struct SchemaArgs {
    /// JSON schema file (one class schema or a `results` list)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Class to query
    #[arg(short = 'C', long = "class")]
    pub class_name: String,
}

/// Arguments for the `fields` command
#[derive(Parser, Debug, Clone)]
pub struct FieldsArgs {
    /// Schema source
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Search key to show as checked
    #[arg(short, long, value_parser = validate_field_name)]
    pub key: Option<String>,
}

/// Arguments for the `session` command
#[derive(Parser, Debug, Clone)]
pub struct SessionArgs {
    /// Schema source
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Initial draft query
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Initial search key (defaults to the configured default)
    #[arg(short, long, value_parser = validate_field_name)]
    pub key: Option<String>,
}
