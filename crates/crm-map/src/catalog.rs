//! Field catalogs: the canonical fields a CSV column may be mapped to.
//!
//! A catalog is a derived view of two owned inputs: the fixed base list for
//! the entity and a snapshot of the active custom field definitions. Build
//! it once per file; never inside a per-row loop.

use crm_model::{CustomFieldDefinition, FieldCatalogEntry, TargetEntity};

use crate::utils::normalize_header;

const CONTACT_BASE_FIELDS: &[(&str, &str)] = &[
    ("firstName", "First Name"),
    ("lastName", "Last Name"),
    ("fullName", "Full Name"),
    ("email", "Email"),
    ("directPhone", "Direct Phone"),
    ("mobilePhone", "Mobile Phone"),
    ("jobTitle", "Job Title"),
    ("department", "Department"),
    ("seniorityLevel", "Seniority Level"),
    ("linkedinUrl", "LinkedIn URL"),
    ("address", "Address"),
    ("city", "City"),
    ("state", "State"),
    ("stateAbbr", "State Abbreviation"),
    ("postalCode", "Postal Code"),
    ("country", "Country"),
    ("contactLocation", "Contact Location"),
    ("timezone", "Timezone"),
    ("emailStatus", "Email Status"),
    ("consentBasis", "Consent Basis"),
    ("consentSource", "Consent Source"),
];

const ACCOUNT_BASE_FIELDS: &[(&str, &str)] = &[
    ("name", "Company Name"),
    ("domain", "Domain"),
    ("industryStandardized", "Industry"),
    ("employeesSizeRange", "Employees Size Range"),
    ("staffCount", "Staff Count"),
    ("annualRevenue", "Annual Revenue"),
    ("revenueRange", "Revenue Range"),
    ("mainPhone", "Main Phone"),
    ("hqStreet1", "HQ Street 1"),
    ("hqCity", "HQ City"),
    ("hqState", "HQ State"),
    ("hqStateAbbr", "HQ State Abbreviation"),
    ("hqPostalCode", "HQ Postal Code"),
    ("hqCountry", "HQ Country"),
    ("companyLocation", "Company Location"),
    ("sicCode", "SIC Code"),
    ("naicsCode", "NAICS Code"),
    ("linkedinUrl", "Company LinkedIn URL"),
    ("yearFounded", "Year Founded"),
    ("description", "Description"),
    ("techStack", "Tech Stack"),
];

/// Base fields of an entity, in catalog order.
pub fn base_fields(entity: TargetEntity) -> Vec<FieldCatalogEntry> {
    let fields = match entity {
        TargetEntity::Contact => CONTACT_BASE_FIELDS,
        TargetEntity::Account => ACCOUNT_BASE_FIELDS,
    };
    fields
        .iter()
        .map(|(value, label)| FieldCatalogEntry::new(*value, *label))
        .collect()
}

/// Ordered set of fields for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    entity: TargetEntity,
    entries: Vec<FieldCatalogEntry>,
}

impl FieldCatalog {
    /// Catalog containing only the base fields.
    pub fn base(entity: TargetEntity) -> Self {
        Self {
            entity,
            entries: base_fields(entity),
        }
    }

    /// Base fields followed by the active custom fields of this entity.
    pub fn with_custom_fields(entity: TargetEntity, custom: &[CustomFieldDefinition]) -> Self {
        let mut catalog = Self::base(entity);
        for definition in custom
            .iter()
            .filter(|d| d.active && d.entity_type == entity)
        {
            catalog.push(FieldCatalogEntry::new(
                definition.catalog_key(),
                definition.display_label.clone(),
            ));
        }
        catalog
    }

    pub fn entity(&self) -> TargetEntity {
        self.entity
    }

    pub fn entries(&self) -> &[FieldCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.get(value).is_some()
    }

    pub fn get(&self, value: &str) -> Option<&FieldCatalogEntry> {
        self.entries.iter().find(|e| e.value == value)
    }

    /// Display label for a key, falling back to the key itself.
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.get(value).map_or(value, |e| e.label.as_str())
    }

    /// Appends an entry unless its key is already present. Returns true if added.
    pub fn push(&mut self, entry: FieldCatalogEntry) -> bool {
        if self.contains(&entry.value) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Entries paired with their normalized keys, in catalog order.
    pub(crate) fn normalized_entries(&self) -> Vec<(String, &FieldCatalogEntry)> {
        self.entries
            .iter()
            .map(|entry| (normalize_header(&entry.value), entry))
            .collect()
    }
}

/// The contact and account catalogs used for one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogs {
    pub contact: FieldCatalog,
    pub account: FieldCatalog,
}

impl Catalogs {
    /// Catalogs with base fields only.
    pub fn base() -> Self {
        Self {
            contact: FieldCatalog::base(TargetEntity::Contact),
            account: FieldCatalog::base(TargetEntity::Account),
        }
    }

    /// Catalogs extended with a snapshot of custom field definitions.
    pub fn with_custom_fields(custom: &[CustomFieldDefinition]) -> Self {
        Self {
            contact: FieldCatalog::with_custom_fields(TargetEntity::Contact, custom),
            account: FieldCatalog::with_custom_fields(TargetEntity::Account, custom),
        }
    }

    pub fn get(&self, entity: TargetEntity) -> &FieldCatalog {
        match entity {
            TargetEntity::Contact => &self.contact,
            TargetEntity::Account => &self.account,
        }
    }

    pub fn get_mut(&mut self, entity: TargetEntity) -> &mut FieldCatalog {
        match entity {
            TargetEntity::Contact => &mut self.contact,
            TargetEntity::Account => &mut self.account,
        }
    }
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::base()
    }
}
