//! Import session: the stages one file goes through, from upload to the
//! final report.
//!
//! ```text
//! Upload -> Mapping -> ErrorReview
//!                   -> Preview -> Importing -> Complete
//! ```
//!
//! Stages only move forward. Any stage may reset to `Upload`, which drops
//! everything the session holds. Data a stage needs lives inside its variant,
//! so e.g. `Importing` without a confirmed mapping cannot be expressed.

use std::fmt;

use tracing::{info, warn};

use crm_ingest::CsvTable;
use crm_map::{Catalogs, MappingEditor};
use crm_model::{CrmBackend, CustomFieldDefinition, FieldMapping, ImportSummary};
use crm_validate::{RowValidator, ValidationReport, check_required_mappings};

use crate::cancel::CancelToken;
use crate::config::ImportOptions;
use crate::error::SessionError;
use crate::importer::BatchImporter;
use crate::progress::ImportProgress;

/// Stage discriminant, used for the transition table and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Upload,
    Mapping,
    ErrorReview,
    Preview,
    Importing,
    Complete,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Mapping => "mapping",
            Self::ErrorReview => "error review",
            Self::Preview => "preview",
            Self::Importing => "importing",
            Self::Complete => "complete",
        }
    }

    /// Legal moves between stages.
    pub fn can_transition_to(self, next: StageKind) -> bool {
        use StageKind::{Complete, ErrorReview, Importing, Mapping, Preview, Upload};
        matches!(
            (self, next),
            (_, Upload)
                | (Upload, Mapping)
                | (Mapping, ErrorReview | Preview)
                | (Preview, Importing)
                | (Importing, Complete)
        )
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub enum Stage {
    #[default]
    Upload,
    Mapping {
        table: CsvTable,
        editor: MappingEditor,
        custom_fields: Vec<CustomFieldDefinition>,
    },
    ErrorReview {
        mappings: Vec<FieldMapping>,
        report: ValidationReport,
    },
    Preview {
        mappings: Vec<FieldMapping>,
        /// Rows projected into mapping order.
        rows: Vec<Vec<String>>,
    },
    Importing {
        total_rows: usize,
    },
    Complete {
        summary: ImportSummary,
    },
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Upload => StageKind::Upload,
            Self::Mapping { .. } => StageKind::Mapping,
            Self::ErrorReview { .. } => StageKind::ErrorReview,
            Self::Preview { .. } => StageKind::Preview,
            Self::Importing { .. } => StageKind::Importing,
            Self::Complete { .. } => StageKind::Complete,
        }
    }
}

/// One file's trip through the import pipeline.
#[derive(Debug, Default)]
pub struct ImportSession {
    stage: Stage,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn kind(&self) -> StageKind {
        self.stage.kind()
    }

    /// Loads a file and auto-maps its headers against the live catalogs.
    pub fn load(
        &mut self,
        table: CsvTable,
        custom_fields: Vec<CustomFieldDefinition>,
    ) -> Result<&mut MappingEditor, SessionError> {
        let actual = self.kind();
        if actual != StageKind::Upload {
            return Err(SessionError::InvalidStage {
                expected: StageKind::Upload,
                actual,
            });
        }
        let editor = MappingEditor::new(&table.headers, Catalogs::with_custom_fields(&custom_fields));
        info!(
            columns = table.headers.len(),
            rows = table.row_count(),
            "file loaded"
        );
        self.transition(
            StageKind::Upload,
            Stage::Mapping {
                table,
                editor,
                custom_fields,
            },
        );
        self.editor_mut()
    }

    pub fn editor(&self) -> Option<&MappingEditor> {
        match &self.stage {
            Stage::Mapping { editor, .. } => Some(editor),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Result<&mut MappingEditor, SessionError> {
        let actual = self.kind();
        match &mut self.stage {
            Stage::Mapping { editor, .. } => Ok(editor),
            _ => Err(SessionError::InvalidStage {
                expected: StageKind::Mapping,
                actual,
            }),
        }
    }

    /// Confirms the mapping, then gates and validates.
    ///
    /// A configuration error sends the session back to `Upload` and is
    /// returned. Otherwise every row is validated and the session moves to
    /// `ErrorReview` (any error) or `Preview` (clean).
    pub fn confirm_mapping(&mut self) -> Result<StageKind, SessionError> {
        let (table, editor, mut custom_fields) = match std::mem::take(&mut self.stage) {
            Stage::Mapping {
                table,
                editor,
                custom_fields,
            } => (table, editor, custom_fields),
            other => return Err(self.restore(other, StageKind::Mapping)),
        };
        custom_fields.extend_from_slice(editor.created_fields());
        let mappings = editor.confirm();

        if let Err(error) = check_required_mappings(&mappings) {
            warn!(error = %error, "mapping rejected, back to upload");
            self.transition(StageKind::Mapping, Stage::Upload);
            return Err(error.into());
        }

        let rows = table.project_rows(&mappings);
        let report = RowValidator::new(&mappings, &custom_fields).validate_rows(&rows);
        let next = if report.is_clean() {
            Stage::Preview { mappings, rows }
        } else {
            Stage::ErrorReview { mappings, report }
        };
        self.transition(StageKind::Mapping, next);
        Ok(self.kind())
    }

    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match &self.stage {
            Stage::ErrorReview { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The confirmed mapping, once validation has run.
    pub fn confirmed_mappings(&self) -> Option<&[FieldMapping]> {
        match &self.stage {
            Stage::ErrorReview { mappings, .. } | Stage::Preview { mappings, .. } => Some(mappings),
            _ => None,
        }
    }

    /// Rows waiting for import, in mapping order.
    pub fn preview_rows(&self) -> Option<&[Vec<String>]> {
        match &self.stage {
            Stage::Preview { rows, .. } => Some(rows),
            _ => None,
        }
    }

    /// Runs the import to completion. The session always ends `Complete`.
    pub fn run_import<B: CrmBackend>(
        &mut self,
        backend: &B,
        options: ImportOptions,
        progress: &mut impl ImportProgress,
        cancel: &CancelToken,
    ) -> Result<&ImportSummary, SessionError> {
        let (mappings, rows) = match std::mem::take(&mut self.stage) {
            Stage::Preview { mappings, rows } => (mappings, rows),
            other => return Err(self.restore(other, StageKind::Preview)),
        };
        self.transition(
            StageKind::Preview,
            Stage::Importing {
                total_rows: rows.len(),
            },
        );

        let summary = BatchImporter::new(backend, options).run(&mappings, &rows, progress, cancel);
        self.transition(StageKind::Importing, Stage::Complete { summary });
        match &self.stage {
            Stage::Complete { summary } => Ok(summary),
            other => Err(SessionError::InvalidStage {
                expected: StageKind::Complete,
                actual: other.kind(),
            }),
        }
    }

    pub fn summary(&self) -> Option<&ImportSummary> {
        match &self.stage {
            Stage::Complete { summary } => Some(summary),
            _ => None,
        }
    }

    /// Discards all state and returns to `Upload`.
    pub fn reset(&mut self) {
        let from = self.kind();
        self.transition(from, Stage::Upload);
    }

    /// Puts back a stage taken out for a call made in the wrong stage.
    fn restore(&mut self, stage: Stage, expected: StageKind) -> SessionError {
        let actual = stage.kind();
        self.stage = stage;
        SessionError::InvalidStage { expected, actual }
    }

    fn transition(&mut self, from: StageKind, next: Stage) {
        let to = next.kind();
        debug_assert!(from.can_transition_to(to), "illegal transition {from} -> {to}");
        info!(from = %from, to = %to, "import stage changed");
        self.stage = next;
    }
}
