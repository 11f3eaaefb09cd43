//! Bulk import results and aggregate accounting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::TargetEntity;

/// Per-row failure reported inside a batch response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRowError {
    /// Position within the submitted batch.
    pub index: usize,
    pub error: String,
}

/// Response of one bulk-upsert call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportBatchResult {
    /// Rows the server accepted (created plus updated).
    pub success: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<BatchRowError>,
}

/// An import failure attributed to its original report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row: usize,
    pub error: String,
}

/// Outcome of the post-import custom field registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReport {
    /// Number of keys submitted per entity.
    pub registered: BTreeMap<TargetEntity, usize>,
    /// Entities whose registration call failed.
    pub failed: Vec<TargetEntity>,
}

impl RegistrationReport {
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty() && self.failed.is_empty()
    }
}

/// Aggregate result of a whole import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// Number of batches attempted.
    pub batches: usize,
    /// Batches whose bulk call failed as a whole.
    pub failed_batches: usize,
    /// Rows counted failed before sending (no email).
    pub skipped_rows: usize,
    pub errors: Vec<ImportRowError>,
    /// The session was discarded before all batches ran.
    pub cancelled: bool,
    pub registration: RegistrationReport,
}

impl ImportSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Self::default()
        }
    }

    /// Rows that ended in a terminal state so far.
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.failed
    }

    /// Every row ended in exactly one of created, updated or failed.
    pub fn is_conserved(&self) -> bool {
        self.processed() == self.total_rows
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
