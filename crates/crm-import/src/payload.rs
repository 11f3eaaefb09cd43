//! Applying a mapping to a row.
//!
//! A row is first flattened into a [`MappedRecord`] keyed by each mapping's
//! record key (`email`, `account_name`, `custom_score`, `account_custom_tier`),
//! then split into the contact/account payload pair the backend accepts.

use std::collections::BTreeMap;

use crm_map::ACCOUNT_PREFIX;
use crm_model::{
    CUSTOM_FIELD_PREFIX, EntityPayload, FieldMapping, ImportRecord, TargetEntity,
};

/// Flat view of one row under a mapping. Blank values are left out.
pub type MappedRecord = BTreeMap<String, String>;

/// True when at least one column maps to an account field.
pub fn is_unified(mappings: &[FieldMapping]) -> bool {
    mappings
        .iter()
        .any(|m| m.is_mapped() && m.target_entity() == Some(TargetEntity::Account))
}

/// Flattens a row whose values are in mapping order.
///
/// When two columns map to the same field, the first non-blank value wins.
pub fn build_mapped_record(mappings: &[FieldMapping], values: &[String]) -> MappedRecord {
    let mut record = MappedRecord::new();
    for (mapping, value) in mappings.iter().zip(values) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if let Some(key) = mapping.record_key() {
            record.entry(key).or_insert_with(|| value.to_string());
        }
    }
    record
}

/// Splits a mapped record into the bulk-upsert payload pair.
///
/// The account half is only attached in unified imports, and only when the
/// row carries at least one account value.
pub fn to_import_record(record: &MappedRecord, unified: bool) -> ImportRecord {
    let mut contact = EntityPayload::default();
    let mut account = EntityPayload::default();
    for (key, value) in record {
        let (payload, field) = match key.strip_prefix(ACCOUNT_PREFIX) {
            Some(field) => (&mut account, field),
            None => (&mut contact, key.as_str()),
        };
        match field.strip_prefix(CUSTOM_FIELD_PREFIX) {
            Some(custom) if !custom.is_empty() => {
                payload.custom_fields.insert(custom.to_string(), value.clone());
            }
            _ => {
                payload.fields.insert(field.to_string(), value.clone());
            }
        }
    }
    ImportRecord {
        contact,
        account: (unified && !account.is_empty()).then_some(account),
    }
}
