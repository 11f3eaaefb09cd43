//! Command-line arguments for `crm-import`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use crm_cli::edits::{FieldAssignment, FieldCreation, MappingEdits};
use crm_model::TargetEntity;

#[derive(Parser)]
#[command(
    name = "crm-import",
    version,
    about = "Import contacts and accounts from CSV into the CRM",
    long_about = "Map CSV columns to CRM contact and account fields, validate every row,\n\
                  and upsert the file in batches.\n\n\
                  Headers are auto-mapped; adjust with --set, --skip and --create-field,\n\
                  or re-use a saved mapping with --profile."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: the platform config dir's crm-import/config.toml).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// CRM API base URL (overrides [api] base_url).
    #[arg(long = "api-url", env = "CRM_IMPORT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for the CRM API.
    #[arg(
        long = "api-token",
        env = "CRM_IMPORT_API_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub api_token: Option<String>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values (contact PII) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the fields columns can be mapped to.
    Fields(FieldsArgs),

    /// Show how a file's columns map, optionally saving the result as a profile.
    Map(MapArgs),

    /// Map and validate a file without importing it.
    Validate(ValidateArgs),

    /// Map, validate and import a file.
    Import(ImportArgs),

    /// Write a CSV template with every importable column.
    Template(TemplateArgs),
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Only list fields of this entity.
    #[arg(long = "entity", value_enum)]
    pub entity: Option<EntityArg>,

    /// Base fields only; do not contact the CRM.
    #[arg(long = "offline")]
    pub offline: bool,
}

/// Input file and mapping adjustments shared by map, validate and import.
#[derive(Args)]
pub struct MappingArgs {
    #[arg(value_name = "CSV_FILE")]
    pub file: PathBuf,

    /// Map a column to a field, e.g. --set "Company=account.name".
    #[arg(long = "set", value_name = "COLUMN=ENTITY.FIELD")]
    pub set: Vec<FieldAssignment>,

    /// Leave a column out of the import.
    #[arg(long = "skip", value_name = "COLUMN")]
    pub skip: Vec<String>,

    /// Create a custom field and map a column to it,
    /// e.g. --create-field "Score=contact:lead_score:Lead Score:number".
    #[arg(long = "create-field", value_name = "COLUMN=ENTITY:KEY:LABEL[:TYPE]")]
    pub create_field: Vec<FieldCreation>,

    /// Start from a saved mapping profile.
    #[arg(long = "profile", value_name = "NAME")]
    pub profile: Option<String>,

    /// Save the final mapping as a profile.
    #[arg(long = "save-profile", value_name = "NAME")]
    pub save_profile: Option<String>,
}

impl MappingArgs {
    pub fn edits(&self) -> MappingEdits {
        MappingEdits {
            assignments: self.set.clone(),
            skips: self.skip.clone(),
            creations: self.create_field.clone(),
        }
    }
}

#[derive(Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Map against base fields only; do not contact the CRM.
    #[arg(long = "offline")]
    pub offline: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Write validation errors to this CSV file.
    #[arg(long = "error-report", value_name = "PATH")]
    pub error_report: Option<PathBuf>,

    /// Validate against base fields only; do not contact the CRM.
    #[arg(long = "offline")]
    pub offline: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Rows per bulk request (overrides [import] batch_size).
    #[arg(long = "batch-size", value_name = "ROWS")]
    pub batch_size: Option<usize>,

    /// Use the large-file batch size preset.
    #[arg(long = "bulk", conflicts_with = "batch_size")]
    pub bulk: bool,

    /// Skip custom field registration after the import.
    #[arg(long = "no-register")]
    pub no_register: bool,

    /// Write validation or import errors to this CSV file.
    #[arg(long = "error-report", value_name = "PATH")]
    pub error_report: Option<PathBuf>,
}

#[derive(Args)]
pub struct TemplateArgs {
    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Standard columns only; do not fetch custom fields.
    #[arg(long = "offline")]
    pub offline: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EntityArg {
    Contact,
    Account,
}

impl From<EntityArg> for TargetEntity {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Contact => TargetEntity::Contact,
            EntityArg::Account => TargetEntity::Account,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
