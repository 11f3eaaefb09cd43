//! Auto-mapping engine.
//!
//! Proposes a target for every CSV header using three ordered passes:
//! account-prefix detection, a contact catalog scan, and the alias table.
//! The first pass that produces a match wins; headers no pass recognises are
//! left unmapped.
//!
//! Catalog scans accept the *first* entry, in catalog order, whose normalized
//! key equals the header key or where either contains the other. Short or
//! generic keys can therefore shadow better matches further down the list
//! (a `stateAbbr` header lands on `state`); results depend on catalog order.

use std::collections::BTreeMap;

use tracing::debug;

use crm_model::{FieldCatalogEntry, FieldMapping, TargetEntity};

use crate::aliases::lookup_alias;
use crate::catalog::{Catalogs, FieldCatalog};
use crate::utils::{keys_overlap, normalize_header, safe_column_name};

/// Header prefix that routes a column to the account catalog.
pub const ACCOUNT_PREFIX: &str = "account_";

/// Which pass produced a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchSource {
    /// `account_` prefix plus an account catalog match.
    AccountPrefix,
    /// Contact catalog scan on the whole header.
    ContactCatalog,
    /// Curated alias table.
    Alias,
    /// No pass matched.
    Unmapped,
}

impl MatchSource {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::AccountPrefix => "account prefix",
            Self::ContactCatalog => "contact catalog",
            Self::Alias => "alias",
            Self::Unmapped => "unmapped",
        }
    }
}

/// A proposed mapping with the pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSuggestion {
    pub mapping: FieldMapping,
    pub source: MatchSource,
}

/// Result of auto-mapping a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingResult {
    /// One suggestion per header, in header order.
    pub suggestions: Vec<MappingSuggestion>,
}

impl MappingResult {
    /// The proposed mappings, in header order.
    #[must_use]
    pub fn mappings(&self) -> Vec<FieldMapping> {
        self.suggestions.iter().map(|s| s.mapping.clone()).collect()
    }

    #[must_use]
    pub fn into_mappings(self) -> Vec<FieldMapping> {
        self.suggestions.into_iter().map(|s| s.mapping).collect()
    }

    /// Headers left unmapped.
    #[must_use]
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.suggestions
            .iter()
            .filter(|s| s.source == MatchSource::Unmapped)
            .map(|s| s.mapping.csv_column.as_str())
            .collect()
    }

    /// Number of suggestions produced by each pass.
    #[must_use]
    pub fn count_by_source(&self) -> BTreeMap<MatchSource, usize> {
        let mut counts = BTreeMap::new();
        for suggestion in &self.suggestions {
            *counts.entry(suggestion.source).or_insert(0) += 1;
        }
        counts
    }
}

/// Engine proposing a target field for each CSV header.
///
/// # Example
///
/// ```
/// use crm_map::{AutoMapper, Catalogs};
///
/// let catalogs = Catalogs::base();
/// let mapper = AutoMapper::new(&catalogs);
/// let result = mapper.suggest(&["Contact Email".to_string()]);
/// assert_eq!(result.suggestions[0].mapping.target_field(), Some("email"));
/// ```
pub struct AutoMapper<'a> {
    contact: Vec<(String, &'a FieldCatalogEntry)>,
    account: Vec<(String, &'a FieldCatalogEntry)>,
}

impl<'a> AutoMapper<'a> {
    pub fn new(catalogs: &'a Catalogs) -> Self {
        Self {
            contact: catalogs.contact.normalized_entries(),
            account: catalogs.account.normalized_entries(),
        }
    }

    /// Suggests one mapping per header, preserving header order.
    pub fn suggest(&self, headers: &[String]) -> MappingResult {
        let suggestions = headers
            .iter()
            .map(|header| self.suggest_header(header))
            .collect();
        MappingResult { suggestions }
    }

    /// Suggests a mapping for a single header.
    pub fn suggest_header(&self, header: &str) -> MappingSuggestion {
        let column = safe_column_name(header);
        let (mapping, source) = match self.match_header(&column) {
            Some((entity, field, source)) => {
                (FieldMapping::mapped(column.clone(), entity, field), source)
            }
            None => (FieldMapping::unmapped(column.clone()), MatchSource::Unmapped),
        };
        debug!(
            column = %column,
            entity = ?mapping.target_entity(),
            field = ?mapping.target_field(),
            source = source.description(),
            "header mapped"
        );
        MappingSuggestion { mapping, source }
    }

    fn match_header(&self, header: &str) -> Option<(TargetEntity, String, MatchSource)> {
        if let Some(rest) = strip_account_prefix(header) {
            let key = normalize_header(rest);
            if let Some(entry) = first_overlap(&self.account, &key) {
                return Some((
                    TargetEntity::Account,
                    entry.value.clone(),
                    MatchSource::AccountPrefix,
                ));
            }
        }

        let key = normalize_header(header);
        if let Some(entry) = first_overlap(&self.contact, &key) {
            return Some((
                TargetEntity::Contact,
                entry.value.clone(),
                MatchSource::ContactCatalog,
            ));
        }

        lookup_alias(&key).map(|(field, entity)| (entity, field.to_string(), MatchSource::Alias))
    }
}

/// Convenience wrapper building a one-off mapper.
pub fn auto_map(headers: &[String], catalogs: &Catalogs) -> Vec<FieldMapping> {
    AutoMapper::new(catalogs).suggest(headers).into_mappings()
}

/// Finds the first catalog entry overlapping `key`, in catalog order.
///
/// Ambiguous short keys (`state` vs `stateAbbr`) resolve to whichever entry
/// comes first, so catalog order is significant.
pub fn find_catalog_match<'c>(catalog: &'c FieldCatalog, key: &str) -> Option<&'c FieldCatalogEntry> {
    catalog
        .entries()
        .iter()
        .find(|entry| keys_overlap(key, &normalize_header(&entry.value)))
}

fn first_overlap<'a>(
    entries: &[(String, &'a FieldCatalogEntry)],
    key: &str,
) -> Option<&'a FieldCatalogEntry> {
    entries
        .iter()
        .find(|(normalized, _)| keys_overlap(key, normalized))
        .map(|(_, entry)| *entry)
}

fn strip_account_prefix(header: &str) -> Option<&str> {
    let prefix_len = ACCOUNT_PREFIX.len();
    if header.len() >= prefix_len
        && header.is_char_boundary(prefix_len)
        && header[..prefix_len].eq_ignore_ascii_case(ACCOUNT_PREFIX)
    {
        Some(&header[prefix_len..])
    } else {
        None
    }
}
