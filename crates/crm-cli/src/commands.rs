use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, trace, warn};

use crm_cli::config::Settings;
use crm_cli::logging::redact_value;
use crm_import::{BatchSize, CancelToken, HttpBackend, ImportSession, StageKind};
use crm_ingest::{
    build_template, read_csv_table, write_error_report, write_import_error_report, write_template,
};
use crm_map::{Catalogs, MappingProfile, MappingProfileRepository};
use crm_model::{CrmBackend, CustomFieldDefinition, ImportSummary};
use crm_validate::ValidationReport;

use crate::cli::{FieldsArgs, ImportArgs, MapArgs, MappingArgs, TemplateArgs, ValidateArgs};
use crate::progress::BarProgress;
use crate::summary::{print_fields, print_import_summary, print_mapping, print_validation};

/// Settings plus the API overrides given on the command line.
pub struct Environment {
    pub settings: Settings,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
}

impl Environment {
    fn backend(&self) -> Result<HttpBackend> {
        let Some(base_url) = self
            .api_url
            .clone()
            .or_else(|| self.settings.api.base_url.clone())
        else {
            bail!(
                "No CRM API URL configured: pass --api-url, set CRM_IMPORT_API_URL, \
                 or set [api] base_url in the config file (or use --offline)"
            );
        };
        let backend = HttpBackend::new(base_url, self.settings.timeout())
            .context("Failed to build HTTP client")?;
        Ok(match &self.api_token {
            Some(token) => backend.with_token(token),
            None => backend,
        })
    }

    fn optional_backend(&self, offline: bool) -> Result<Option<HttpBackend>> {
        if offline {
            Ok(None)
        } else {
            self.backend().map(Some)
        }
    }

    fn profiles(&self) -> Result<MappingProfileRepository> {
        MappingProfileRepository::new(self.settings.profile_dir())
    }
}

pub fn run_fields(env: &Environment, args: &FieldsArgs) -> Result<()> {
    let backend = env.optional_backend(args.offline)?;
    let custom_fields = fetch_custom_fields(backend.as_ref())?;
    let catalogs = Catalogs::with_custom_fields(&custom_fields);
    print_fields(&catalogs, &custom_fields, args.entity.map(Into::into));
    Ok(())
}

pub fn run_map(env: &Environment, args: &MapArgs) -> Result<()> {
    let backend = env.optional_backend(args.offline)?;
    let session = open_session(env, &args.mapping, backend.as_ref())?;
    if let Some(editor) = session.editor() {
        print_mapping(editor);
    }
    Ok(())
}

/// Returns true when every row passed.
pub fn run_validate(env: &Environment, args: &ValidateArgs) -> Result<bool> {
    let backend = env.optional_backend(args.offline)?;
    let mut session = open_session(env, &args.mapping, backend.as_ref())?;
    let stage = confirm(&mut session)?;
    match session.validation_report() {
        Some(report) => {
            print_validation(report);
            if let Some(path) = &args.error_report {
                save_validation_report(path, report)?;
            }
        }
        None => println!(
            "All {} rows passed validation.",
            session.preview_rows().map_or(0, <[_]>::len)
        ),
    }
    Ok(stage == StageKind::Preview)
}

pub fn run_import(env: &Environment, args: &ImportArgs) -> Result<ImportSummary> {
    let backend = env.backend()?;
    let mut options = env.settings.import_options()?;
    if let Some(rows) = args.batch_size {
        options.batch_size = BatchSize::new(rows).context("--batch-size must be at least 1")?;
    }
    if args.bulk {
        options.batch_size = BatchSize::BULK;
    }
    if args.no_register {
        options.register_custom_fields = false;
    }

    let mut session = open_session(env, &args.mapping, Some(&backend))?;
    if confirm(&mut session)? == StageKind::ErrorReview {
        let Some(report) = session.validation_report() else {
            bail!("Validation failed");
        };
        print_validation(report);
        if let Some(path) = &args.error_report {
            save_validation_report(path, report)?;
        }
        bail!(
            "{} validation error(s); fix the file or the mapping before importing",
            report.error_count()
        );
    }

    let total_rows = session.preview_rows().map_or(0, <[_]>::len);
    let span = info_span!("import_file", file = %args.mapping.file.display(), rows = total_rows);
    let _guard = span.enter();
    info!(batch_size = %options.batch_size, "starting import");

    let mut progress = BarProgress::new(total_rows);
    let summary = session
        .run_import(&backend, options, &mut progress, &CancelToken::new())?
        .clone();
    progress.finish();

    print_import_summary(&summary);
    if let Some(path) = &args.error_report
        && !summary.errors.is_empty()
    {
        let file = create_file(path)?;
        write_import_error_report(file, &summary.errors)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Row errors written to {}", path.display());
    }
    Ok(summary)
}

pub fn run_template(env: &Environment, args: &TemplateArgs) -> Result<()> {
    let backend = env.optional_backend(args.offline)?;
    let custom_fields = fetch_custom_fields(backend.as_ref())?;
    let template = build_template(&custom_fields);
    match &args.output {
        Some(path) => {
            write_template(create_file(path)?, &template)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Template with {} columns written to {}",
                template.headers.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            write_template(&mut stdout, &template).context("Failed to write template")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn fetch_custom_fields(backend: Option<&HttpBackend>) -> Result<Vec<CustomFieldDefinition>> {
    let Some(backend) = backend else {
        return Ok(Vec::new());
    };
    let fields = backend
        .list_custom_fields(None)
        .with_context(|| format!("Failed to fetch custom fields from {}", backend.base_url()))?;
    info!(count = fields.len(), "custom fields loaded");
    Ok(fields)
}

/// Loads the file, auto-maps it, then applies profile and edits.
fn open_session(
    env: &Environment,
    args: &MappingArgs,
    backend: Option<&HttpBackend>,
) -> Result<ImportSession> {
    let table = read_csv_table(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let custom_fields = fetch_custom_fields(backend)?;

    let mut session = ImportSession::new();
    let editor = session.load(table, custom_fields)?;

    if let Some(name) = &args.profile {
        let profile = env
            .profiles()?
            .load(name)?
            .with_context(|| format!("No mapping profile named '{name}'"))?;
        let applied = editor.apply_profile(&profile);
        info!(profile = %name, applied = applied.applied.len(), "profile applied");
        for column in &applied.missing_columns {
            warn!(profile = %name, column = %column, "profile column not in file");
        }
        for (column, field) in &applied.unknown_fields {
            warn!(profile = %name, column = %column, field = %field, "profile field no longer exists");
        }
    }

    args.edits().apply(editor, backend)?;

    if let Some(name) = &args.save_profile {
        let profile = MappingProfile::new(name.clone(), editor.mappings().to_vec());
        let path = env.profiles()?.save(&profile)?;
        println!("Mapping profile '{name}' saved to {}", path.display());
    }
    Ok(session)
}

/// Confirms the mapping and runs validation.
fn confirm(session: &mut ImportSession) -> Result<StageKind> {
    let stage = session
        .confirm_mapping()
        .context("The mapping cannot be imported")?;
    if let Some(report) = session.validation_report() {
        for error in &report.errors {
            trace!(
                row = error.row,
                field = %error.field,
                value = redact_value(&error.value),
                error = %error.error,
                "validation error"
            );
        }
    }
    Ok(stage)
}

fn save_validation_report(path: &Path, report: &ValidationReport) -> Result<()> {
    write_error_report(create_file(path)?, &report.errors)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Validation errors written to {}", path.display());
    Ok(())
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
