//! Post-import custom field registration.
//!
//! After an import, every custom key that carried a value is reported to the
//! backend so definitions exist for it. The call is idempotent server-side and
//! its failure never changes the import outcome.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crm_map::ACCOUNT_PREFIX;
use crm_model::{AutoRegisterRequest, CrmBackend, RegistrationReport, TargetEntity, custom_field_key};

use crate::payload::MappedRecord;

/// Distinct custom field keys per entity, without the `custom_` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFieldKeys {
    pub contact: BTreeSet<String>,
    pub account: BTreeSet<String>,
}

impl CustomFieldKeys {
    pub fn get(&self, entity: TargetEntity) -> &BTreeSet<String> {
        match entity {
            TargetEntity::Contact => &self.contact,
            TargetEntity::Account => &self.account,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contact.is_empty() && self.account.is_empty()
    }

    /// Adds the custom keys of one record that have a non-blank value.
    pub fn extend_from(&mut self, record: &MappedRecord) {
        for (key, value) in record {
            if value.trim().is_empty() {
                continue;
            }
            let (set, field) = match key.strip_prefix(ACCOUNT_PREFIX) {
                Some(field) => (&mut self.account, field),
                None => (&mut self.contact, key.as_str()),
            };
            if let Some(custom) = custom_field_key(field) {
                set.insert(custom.to_string());
            }
        }
    }
}

/// Collects custom keys across mapped records.
pub fn collect_custom_field_keys<'a>(
    records: impl IntoIterator<Item = &'a MappedRecord>,
) -> CustomFieldKeys {
    let mut keys = CustomFieldKeys::default();
    for record in records {
        keys.extend_from(record);
    }
    keys
}

/// Issues one registration call per entity with keys. Failures are logged
/// and recorded in the report, never returned.
pub fn register_custom_fields<B: CrmBackend>(
    backend: &B,
    keys: &CustomFieldKeys,
) -> RegistrationReport {
    let mut report = RegistrationReport::default();
    for entity in TargetEntity::ALL {
        let entity_keys = keys.get(entity);
        if entity_keys.is_empty() {
            continue;
        }
        let request = AutoRegisterRequest::new(entity, entity_keys);
        match backend.auto_register_custom_fields(&request) {
            Ok(()) => {
                debug!(entity = %entity, keys = ?request.field_keys, "custom fields registered");
                report.registered.insert(entity, entity_keys.len());
            }
            Err(error) => {
                warn!(entity = %entity, error = %error, "custom field registration failed");
                report.failed.push(entity);
            }
        }
    }
    if !report.is_empty() {
        info!(
            registered = report.registered.values().sum::<usize>(),
            failed = report.failed.len(),
            "custom field registration finished"
        );
    }
    report
}
