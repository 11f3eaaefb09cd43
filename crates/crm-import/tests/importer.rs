mod common;

use std::collections::BTreeMap;

use common::{FakeCrm, contact_rows, row};
use crm_import::{
    BatchImporter, BatchSize, CancelToken, ImportOptions, MISSING_EMAIL_ERROR, NoProgress,
    ProgressUpdate,
};
use crm_model::{BatchRowError, FieldMapping, ImportSummary, TargetEntity};
use proptest::prelude::*;

fn unified_mappings() -> Vec<FieldMapping> {
    vec![
        FieldMapping::mapped("Contact Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Company Name", TargetEntity::Account, "name"),
    ]
}

fn options(batch_size: usize) -> ImportOptions {
    ImportOptions::default().with_batch_size(BatchSize::new(batch_size).expect("non-zero"))
}

fn run(backend: &FakeCrm, batch_size: usize, rows: &[Vec<String>]) -> ImportSummary {
    BatchImporter::new(backend, options(batch_size)).run(
        &unified_mappings(),
        rows,
        &mut NoProgress,
        &CancelToken::new(),
    )
}

#[test]
fn failed_batch_does_not_stop_the_import() {
    let backend = FakeCrm::failing(&[2]);
    let rows = contact_rows(120);
    let mut updates: Vec<ProgressUpdate> = Vec::new();

    let summary = BatchImporter::new(&backend, options(50)).run(
        &unified_mappings(),
        &rows,
        &mut |update: ProgressUpdate| updates.push(update),
        &CancelToken::new(),
    );

    assert_eq!(backend.call_sizes(), vec![50, 50, 20]);
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.failed_batches, 1);
    assert_eq!(summary.failed, 50);
    assert_eq!(summary.created, 70);
    assert!(summary.is_conserved());

    let failed_rows: Vec<usize> = summary.errors.iter().map(|e| e.row).collect();
    assert_eq!(failed_rows, (52..=101).collect::<Vec<_>>());

    let processed: Vec<usize> = updates.iter().map(|u| u.processed).collect();
    assert_eq!(processed, vec![50, 100, 120]);
    assert_eq!(updates.last().map(ProgressUpdate::percent), Some(100));
}

#[test]
fn rows_without_email_are_excluded_and_failed() {
    let backend = FakeCrm::new();
    let rows = vec![
        row(&["a@acme.com", "Acme"]),
        row(&["", "Acme"]),
        row(&["b@acme.com", "Acme"]),
        row(&["   ", ""]),
        row(&["c@acme.com", "Beta"]),
    ];

    let summary = run(&backend, 50, &rows);

    let sent = backend.calls.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].len(), 3);
    assert!(sent[0].iter().all(|r| r.email().is_some()));
    assert_eq!(
        sent[0][0].account.as_ref().and_then(|a| a.get("name")),
        Some("Acme")
    );

    assert_eq!(summary.created, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.skipped_rows, 2);
    assert!(summary.is_conserved());
    let errors: Vec<(usize, &str)> = summary
        .errors
        .iter()
        .map(|e| (e.row, e.error.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![(3, MISSING_EMAIL_ERROR), (5, MISSING_EMAIL_ERROR)]
    );
}

#[test]
fn batch_error_index_translates_to_report_row() {
    let mut backend = FakeCrm::new();
    backend.row_errors.insert(
        2,
        vec![BatchRowError {
            index: 1,
            error: "Duplicate contact in batch".to_string(),
        }],
    );
    let summary = run(&backend, 3, &contact_rows(7));

    // Batch 2 starts at offset 3, so local index 1 is row 3 + 1 + 2.
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].row, 6);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.created, 6);
}

#[test]
fn error_index_skips_rows_excluded_before_sending() {
    let mut backend = FakeCrm::new();
    backend.row_errors.insert(
        2,
        vec![BatchRowError {
            index: 1,
            error: "Invalid phone".to_string(),
        }],
    );
    let mut rows = contact_rows(6);
    rows[3][0].clear();

    let summary = run(&backend, 3, &rows);

    // Batch 2 submitted data rows 4 and 5; local index 1 is data row 5.
    let rows_with_errors: Vec<usize> = summary.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows_with_errors, vec![5, 7]);
    assert!(summary.is_conserved());
}

#[test]
fn batch_with_no_sendable_rows_makes_no_call() {
    let backend = FakeCrm::new();
    let rows = vec![row(&["", "Acme"]), row(&["", "Beta"]), row(&["z@acme.com", "Acme"])];
    let summary = run(&backend, 2, &rows);

    assert_eq!(backend.call_sizes(), vec![1]);
    assert_eq!(summary.batches, 2);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.created, 1);
}

#[test]
fn repeated_emails_are_updates() {
    let backend = FakeCrm::new();
    let rows = vec![
        row(&["a@acme.com", "Acme"]),
        row(&["b@acme.com", "Acme"]),
        row(&["A@acme.com", "Acme"]),
    ];
    let summary = run(&backend, 2, &rows);
    assert_eq!((summary.created, summary.updated), (2, 1));
}

#[test]
fn empty_file_completes_without_calls() {
    let backend = FakeCrm::new();
    let summary = run(&backend, 50, &[]);
    assert_eq!(summary.batches, 0);
    assert!(summary.is_conserved());
    assert!(backend.calls.borrow().is_empty());
}

#[test]
fn cancellation_discards_in_flight_result() {
    let token = CancelToken::new();
    let backend = FakeCrm {
        cancel_during: Some((1, token.clone())),
        ..FakeCrm::new()
    };
    let summary = BatchImporter::new(&backend, options(2)).run(
        &unified_mappings(),
        &contact_rows(5),
        &mut NoProgress,
        &token,
    );

    assert!(summary.cancelled);
    assert_eq!(backend.call_sizes(), vec![2]);
    assert_eq!(summary.processed(), 0);
    assert!(backend.registrations.borrow().is_empty());
}

#[test]
fn custom_fields_are_registered_after_import() {
    let backend = FakeCrm::new();
    let mappings = vec![
        FieldMapping::mapped("Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Company", TargetEntity::Account, "name"),
        FieldMapping::mapped("Score", TargetEntity::Contact, "custom_score"),
        FieldMapping::mapped("Tier", TargetEntity::Account, "custom_tier"),
        FieldMapping::mapped("Source", TargetEntity::Contact, "custom_source"),
    ];
    let rows = vec![
        row(&["a@acme.com", "Acme", "10", "gold", ""]),
        row(&["b@acme.com", "Acme", "", "silver", ""]),
    ];
    let summary = BatchImporter::new(&backend, options(50)).run(
        &mappings,
        &rows,
        &mut NoProgress,
        &CancelToken::new(),
    );

    let registrations = backend.registrations.borrow();
    assert_eq!(registrations.len(), 2);
    assert_eq!(registrations[0].entity_type, TargetEntity::Contact);
    assert_eq!(registrations[0].field_keys, vec!["score"]);
    assert_eq!(registrations[1].entity_type, TargetEntity::Account);
    assert_eq!(registrations[1].field_keys, vec!["tier"]);
    assert_eq!(
        summary.registration.registered,
        BTreeMap::from([(TargetEntity::Contact, 1), (TargetEntity::Account, 1)])
    );

    let sent = backend.calls.borrow();
    assert_eq!(sent[0][0].contact.custom_fields["score"], "10");
}

#[test]
fn registration_failure_leaves_counts_alone() {
    let backend = FakeCrm {
        fail_registration: true,
        ..FakeCrm::new()
    };
    let mappings = vec![
        FieldMapping::mapped("Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Score", TargetEntity::Contact, "custom_score"),
    ];
    let summary = BatchImporter::new(&backend, options(50)).run(
        &mappings,
        &[row(&["a@acme.com", "3"])],
        &mut NoProgress,
        &CancelToken::new(),
    );

    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.registration.failed, vec![TargetEntity::Contact]);
}

#[test]
fn registration_can_be_disabled() {
    let backend = FakeCrm::new();
    let mappings = vec![
        FieldMapping::mapped("Email", TargetEntity::Contact, "email"),
        FieldMapping::mapped("Score", TargetEntity::Contact, "custom_score"),
    ];
    let options = ImportOptions {
        register_custom_fields: false,
        ..ImportOptions::default()
    };
    let summary = BatchImporter::new(&backend, options).run(
        &mappings,
        &[row(&["a@acme.com", "3"])],
        &mut NoProgress,
        &CancelToken::new(),
    );
    assert!(summary.registration.is_empty());
    assert!(backend.registrations.borrow().is_empty());
}

fn arb_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
    proptest::collection::vec(any::<bool>(), 0..150).prop_map(|blanks| {
        blanks
            .iter()
            .enumerate()
            .map(|(i, &blank)| {
                let email = if blank {
                    String::new()
                } else {
                    format!("p{i}@acme.com")
                };
                vec![email, "Acme".to_string()]
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn every_row_ends_in_exactly_one_bucket(
        rows in arb_rows(),
        batch_size in 1usize..60,
        failing in proptest::collection::hash_set(1usize..10, 0..4),
    ) {
        let backend = FakeCrm {
            failing_calls: failing,
            ..FakeCrm::new()
        };
        let mut last_processed = 0;
        let mut monotonic = true;
        let summary = BatchImporter::new(&backend, options(batch_size)).run(
            &unified_mappings(),
            &rows,
            &mut |update: ProgressUpdate| {
                monotonic &= update.processed >= last_processed;
                last_processed = update.processed;
            },
            &CancelToken::new(),
        );

        prop_assert!(summary.is_conserved());
        prop_assert!(monotonic);
        prop_assert_eq!(last_processed, rows.len());
        prop_assert_eq!(summary.batches, rows.len().div_ceil(batch_size));
        prop_assert_eq!(summary.errors.len(), summary.failed);
        let mut error_rows: Vec<usize> = summary.errors.iter().map(|e| e.row).collect();
        error_rows.sort_unstable();
        error_rows.dedup();
        prop_assert_eq!(error_rows.len(), summary.failed);
    }
}
