#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use crm_import::CancelToken;
use crm_model::{
    AutoRegisterRequest, BackendError, BatchRowError, CrmBackend, CustomFieldDefinition,
    FieldType, ImportBatchResult, ImportRecord, NewCustomField, TargetEntity,
};

/// In-memory CRM. Contacts are keyed by email: first sight creates, later
/// sights update.
#[derive(Default)]
pub struct FakeCrm {
    pub calls: RefCell<Vec<Vec<ImportRecord>>>,
    /// 1-based call numbers whose bulk request fails outright.
    pub failing_calls: HashSet<usize>,
    /// Per-row errors returned by a given 1-based call.
    pub row_errors: BTreeMap<usize, Vec<BatchRowError>>,
    /// Cancels this token while the given 1-based call is in flight.
    pub cancel_during: Option<(usize, CancelToken)>,
    pub fail_registration: bool,
    pub definitions: RefCell<Vec<CustomFieldDefinition>>,
    pub registrations: RefCell<Vec<AutoRegisterRequest>>,
    /// Emails seen so far; a repeat counts as an update.
    pub emails: RefCell<HashSet<String>>,
}

impl FakeCrm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(calls: &[usize]) -> Self {
        Self {
            failing_calls: calls.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn call_sizes(&self) -> Vec<usize> {
        self.calls.borrow().iter().map(Vec::len).collect()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.borrow().len()
    }
}

impl CrmBackend for FakeCrm {
    fn bulk_upsert(&self, records: &[ImportRecord]) -> crm_model::Result<ImportBatchResult> {
        let call = {
            let mut calls = self.calls.borrow_mut();
            calls.push(records.to_vec());
            calls.len()
        };
        if let Some((at, token)) = &self.cancel_during
            && *at == call
        {
            token.cancel();
        }
        if self.failing_calls.contains(&call) {
            return Err(BackendError::Network("connection reset by peer".to_string()));
        }

        let errors = self.row_errors.get(&call).cloned().unwrap_or_default();
        let failed_rows: HashSet<usize> = errors.iter().map(|e| e.index).collect();
        let mut result = ImportBatchResult {
            failed: errors.len(),
            errors,
            ..ImportBatchResult::default()
        };
        let mut emails = self.emails.borrow_mut();
        for (index, record) in records.iter().enumerate() {
            if failed_rows.contains(&index) {
                continue;
            }
            let email = record.email().unwrap_or_default().to_lowercase();
            if emails.insert(email) {
                result.created += 1;
            } else {
                result.updated += 1;
            }
        }
        result.success = result.created + result.updated;
        Ok(result)
    }

    fn list_custom_fields(
        &self,
        entity: Option<TargetEntity>,
    ) -> crm_model::Result<Vec<CustomFieldDefinition>> {
        Ok(self
            .definitions
            .borrow()
            .iter()
            .filter(|d| d.active && entity.is_none_or(|e| e == d.entity_type))
            .cloned()
            .collect())
    }

    fn create_custom_field(
        &self,
        field: &NewCustomField,
    ) -> crm_model::Result<CustomFieldDefinition> {
        let mut definitions = self.definitions.borrow_mut();
        if definitions
            .iter()
            .any(|d| d.entity_type == field.entity_type && d.field_key == field.field_key)
        {
            return Err(BackendError::Duplicate {
                message: format!("Field key '{}' already exists", field.field_key),
            });
        }
        let definition = CustomFieldDefinition {
            entity_type: field.entity_type,
            field_key: field.field_key.clone(),
            display_label: field.display_label.clone(),
            field_type: field.field_type,
            active: field.active,
            is_required: false,
        };
        definitions.push(definition.clone());
        Ok(definition)
    }

    fn auto_register_custom_fields(&self, request: &AutoRegisterRequest) -> crm_model::Result<()> {
        self.registrations.borrow_mut().push(request.clone());
        if self.fail_registration {
            return Err(BackendError::Rejected {
                status: 500,
                message: "registration unavailable".to_string(),
            });
        }
        let mut definitions = self.definitions.borrow_mut();
        for key in &request.field_keys {
            if !definitions
                .iter()
                .any(|d| d.entity_type == request.entity_type && &d.field_key == key)
            {
                definitions.push(CustomFieldDefinition {
                    entity_type: request.entity_type,
                    field_key: key.clone(),
                    display_label: key.clone(),
                    field_type: FieldType::Text,
                    active: true,
                    is_required: false,
                });
            }
        }
        Ok(())
    }
}

pub fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// `count` rows of `[email, company]` with unique emails.
pub fn contact_rows(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| vec![format!("person{i}@acme.com"), format!("Company {}", i % 7)])
        .collect()
}
