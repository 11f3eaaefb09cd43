//! Sequential batch importer.

use std::time::Instant;

use tracing::{debug, error, info, info_span, warn};

use crm_model::{
    CrmBackend, FieldMapping, ImportBatchResult, ImportRecord, ImportRowError, ImportSummary,
    report_row,
};

use crate::cancel::CancelToken;
use crate::config::ImportOptions;
use crate::payload::{build_mapped_record, is_unified, to_import_record};
use crate::progress::{ImportProgress, ProgressUpdate};
use crate::registrar::{CustomFieldKeys, register_custom_fields};

/// Error recorded for rows that have no email value.
pub const MISSING_EMAIL_ERROR: &str = "Missing email: row was not sent";

/// Runs an import against a backend, one batch at a time.
///
/// Every row ends in exactly one of created, updated or failed. A failed
/// bulk call fails only its own batch; the import continues with the next.
#[derive(Debug)]
pub struct BatchImporter<'a, B> {
    backend: &'a B,
    options: ImportOptions,
}

/// Rows of one batch that survived pre-send checks.
struct PreparedBatch {
    /// 0-based data indices of submitted rows, in submission order.
    rows: Vec<usize>,
    records: Vec<ImportRecord>,
}

impl<'a, B: CrmBackend> BatchImporter<'a, B> {
    pub fn new(backend: &'a B, options: ImportOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Imports `rows` (values in mapping order) and returns the aggregate.
    ///
    /// Never fails. When `cancel` fires, remaining batches are skipped, a
    /// result arriving after cancellation is discarded and the summary is
    /// marked cancelled.
    pub fn run(
        &self,
        mappings: &[FieldMapping],
        rows: &[Vec<String>],
        progress: &mut impl ImportProgress,
        cancel: &CancelToken,
    ) -> ImportSummary {
        let batch_size = self.options.batch_size.get();
        let total = rows.len();
        let batches = total.div_ceil(batch_size);
        let span = info_span!("import", rows = total, batch_size, batches);
        let _guard = span.enter();
        let start = Instant::now();

        let unified = is_unified(mappings);
        let mut summary = ImportSummary::new(total);
        let mut custom_keys = CustomFieldKeys::default();

        for (batch_index, chunk) in rows.chunks(batch_size).enumerate() {
            if cancel.is_cancelled() {
                warn!(batch = batch_index + 1, "import cancelled before batch");
                summary.cancelled = true;
                break;
            }
            let offset = batch_index * batch_size;
            let prepared = self.prepare_batch(
                mappings,
                chunk,
                offset,
                unified,
                &mut summary,
                &mut custom_keys,
            );

            if prepared.records.is_empty() {
                debug!(batch = batch_index + 1, "no sendable rows, skipping call");
            } else {
                let outcome = self.backend.bulk_upsert(&prepared.records);
                if cancel.is_cancelled() {
                    warn!(batch = batch_index + 1, "import cancelled, discarding batch result");
                    summary.cancelled = true;
                    break;
                }
                match outcome {
                    Ok(result) => merge_batch_result(&mut summary, &prepared.rows, result),
                    Err(err) => {
                        error!(
                            batch = batch_index + 1,
                            rows = prepared.rows.len(),
                            error = %err,
                            "batch request failed"
                        );
                        summary.failed += prepared.rows.len();
                        summary.failed_batches += 1;
                        let message = format!("Batch request failed: {}", err.user_message());
                        summary
                            .errors
                            .extend(prepared.rows.iter().map(|&index| ImportRowError {
                                row: report_row(index),
                                error: message.clone(),
                            }));
                    }
                }
            }

            summary.batches += 1;
            progress.on_batch(ProgressUpdate {
                batch: batch_index + 1,
                batches,
                processed: summary.processed(),
                total,
            });
        }

        if self.options.register_custom_fields && !summary.cancelled && !custom_keys.is_empty() {
            summary.registration = register_custom_fields(self.backend, &custom_keys);
        }

        info!(
            created = summary.created,
            updated = summary.updated,
            failed = summary.failed,
            failed_batches = summary.failed_batches,
            cancelled = summary.cancelled,
            duration_ms = start.elapsed().as_millis(),
            "import finished"
        );
        summary
    }

    fn prepare_batch(
        &self,
        mappings: &[FieldMapping],
        chunk: &[Vec<String>],
        offset: usize,
        unified: bool,
        summary: &mut ImportSummary,
        custom_keys: &mut CustomFieldKeys,
    ) -> PreparedBatch {
        let mut prepared = PreparedBatch {
            rows: Vec::with_capacity(chunk.len()),
            records: Vec::with_capacity(chunk.len()),
        };
        for (local, values) in chunk.iter().enumerate() {
            let index = offset + local;
            let mapped = build_mapped_record(mappings, values);
            custom_keys.extend_from(&mapped);
            let record = to_import_record(&mapped, unified);
            if record.email().is_none() {
                summary.failed += 1;
                summary.skipped_rows += 1;
                summary.errors.push(ImportRowError {
                    row: report_row(index),
                    error: MISSING_EMAIL_ERROR.to_string(),
                });
                continue;
            }
            prepared.rows.push(index);
            prepared.records.push(record);
        }
        prepared
    }
}

/// Folds one batch response into the running totals.
///
/// Server counts are reconciled so the batch accounts for exactly its
/// submitted rows: created and updated are capped, the rest is failed.
/// Error indices are batch-local positions in the submitted list. When no
/// row of the chunk was excluded before sending this equals `s + i + 2`.
fn merge_batch_result(summary: &mut ImportSummary, submitted: &[usize], result: ImportBatchResult) {
    let sent = submitted.len();
    if result.created + result.updated + result.failed != sent {
        warn!(
            sent,
            created = result.created,
            updated = result.updated,
            failed = result.failed,
            "batch counts do not match submitted rows"
        );
    }
    let created = result.created.min(sent);
    let updated = result.updated.min(sent - created);
    summary.created += created;
    summary.updated += updated;
    summary.failed += sent - created - updated;

    for row_error in result.errors {
        let row = match submitted.get(row_error.index) {
            Some(&index) => report_row(index),
            None => {
                warn!(index = row_error.index, sent, "batch error index out of range");
                continue;
            }
        };
        debug!(row, error = %row_error.error, "row failed");
        summary.errors.push(ImportRowError {
            row,
            error: row_error.error,
        });
    }
}
