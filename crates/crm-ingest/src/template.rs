//! Downloadable import template.
//!
//! The template carries the standard header row, one custom column per active
//! custom field and a single example row. Standard headers are chosen so the
//! auto-mapper maps each of them back to its intended field; account address
//! columns therefore use the `account_` prefix, since a bare "HQ City" would
//! land on the contact's city.

use std::io::Write;

use csv::WriterBuilder;

use crm_map::ACCOUNT_PREFIX;
use crm_model::{CustomFieldDefinition, TargetEntity};

use crate::error::Result;

/// A standard template column and the field it is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateColumn {
    pub header: &'static str,
    pub entity: TargetEntity,
    pub field: &'static str,
    pub example: &'static str,
}

const fn column(
    header: &'static str,
    entity: TargetEntity,
    field: &'static str,
    example: &'static str,
) -> TemplateColumn {
    TemplateColumn {
        header,
        entity,
        field,
        example,
    }
}

/// Standard columns, contact first.
pub const STANDARD_COLUMNS: &[TemplateColumn] = &[
    column("First Name", TargetEntity::Contact, "firstName", "Jane"),
    column("Last Name", TargetEntity::Contact, "lastName", "Doe"),
    column("Email", TargetEntity::Contact, "email", "jane.doe@example.com"),
    column("Job Title", TargetEntity::Contact, "jobTitle", "VP of Sales"),
    column("Direct Phone", TargetEntity::Contact, "directPhone", "+1 512 555 0100"),
    column("Mobile Phone", TargetEntity::Contact, "mobilePhone", "+1 512 555 0101"),
    column(
        "LinkedIn URL",
        TargetEntity::Contact,
        "linkedinUrl",
        "https://www.linkedin.com/in/janedoe",
    ),
    column("City", TargetEntity::Contact, "city", "Austin"),
    column("State", TargetEntity::Contact, "state", "Texas"),
    column("Postal Code", TargetEntity::Contact, "postalCode", "78701"),
    column("Country", TargetEntity::Contact, "country", "United States"),
    column("Company Name", TargetEntity::Account, "name", "Acme Corp"),
    column("Company Domain", TargetEntity::Account, "domain", "acme.com"),
    column("Industry", TargetEntity::Account, "industryStandardized", "Software"),
    column("Employees Size", TargetEntity::Account, "employeesSizeRange", "51-200"),
    column("Annual Revenue", TargetEntity::Account, "annualRevenue", "25000000"),
    column("Main Phone", TargetEntity::Account, "mainPhone", "+1 512 555 0199"),
    column("SIC Code", TargetEntity::Account, "sicCode", "7372"),
    column("NAICS Code", TargetEntity::Account, "naicsCode", "511210"),
    column("account_hq_city", TargetEntity::Account, "hqCity", "Austin"),
    column("account_hq_state", TargetEntity::Account, "hqState", "Texas"),
    column("account_hq_postal_code", TargetEntity::Account, "hqPostalCode", "78701"),
    column("account_hq_country", TargetEntity::Account, "hqCountry", "United States"),
];

/// Header row plus one example row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTemplate {
    pub headers: Vec<String>,
    pub example: Vec<String>,
}

/// Header used for a custom field column.
pub fn custom_column_header(definition: &CustomFieldDefinition) -> String {
    match definition.entity_type {
        TargetEntity::Contact => definition.catalog_key(),
        TargetEntity::Account => format!("{ACCOUNT_PREFIX}{}", definition.catalog_key()),
    }
}

/// Builds the template from the standard columns and the live custom fields.
///
/// Inactive definitions are left out. Custom columns keep definition order,
/// contact fields before account fields.
pub fn build_template(custom_fields: &[CustomFieldDefinition]) -> CsvTemplate {
    let mut headers: Vec<String> = STANDARD_COLUMNS
        .iter()
        .map(|c| c.header.to_string())
        .collect();
    let mut example: Vec<String> = STANDARD_COLUMNS
        .iter()
        .map(|c| c.example.to_string())
        .collect();

    for entity in TargetEntity::ALL {
        for definition in custom_fields
            .iter()
            .filter(|d| d.active && d.entity_type == entity)
        {
            headers.push(custom_column_header(definition));
            example.push(definition.field_type.example_value().to_string());
        }
    }

    CsvTemplate { headers, example }
}

/// Writes the template as CSV.
pub fn write_template<W: Write>(writer: W, template: &CsvTemplate) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(&template.headers)?;
    writer.write_record(&template.example)?;
    writer.flush()?;
    Ok(())
}
