//! Curated header aliases.
//!
//! Keys are normalized headers (see [`normalize_header`](crate::normalize_header)).
//! The table covers the column names of the standard import template plus
//! common synonyms seen in exported spreadsheets. It is consulted only after
//! both catalog scans fail.

use std::collections::HashMap;
use std::sync::LazyLock;

use crm_model::TargetEntity;

use TargetEntity::{Account, Contact};

const ALIASES: &[(&str, &str, TargetEntity)] = &[
    // Contact identity
    ("firstname", "firstName", Contact),
    ("first", "firstName", Contact),
    ("fname", "firstName", Contact),
    ("givenname", "firstName", Contact),
    ("lastname", "lastName", Contact),
    ("last", "lastName", Contact),
    ("lname", "lastName", Contact),
    ("surname", "lastName", Contact),
    ("familyname", "lastName", Contact),
    ("name", "fullName", Contact),
    ("contactname", "fullName", Contact),
    ("email", "email", Contact),
    ("mail", "email", Contact),
    ("workemail", "email", Contact),
    ("businessemail", "email", Contact),
    // Contact phones
    ("phone", "directPhone", Contact),
    ("telephone", "directPhone", Contact),
    ("tel", "directPhone", Contact),
    ("directdial", "directPhone", Contact),
    ("workphone", "directPhone", Contact),
    ("officephone", "directPhone", Contact),
    ("mobile", "mobilePhone", Contact),
    ("cell", "mobilePhone", Contact),
    ("cellphone", "mobilePhone", Contact),
    // Contact role
    ("title", "jobTitle", Contact),
    ("position", "jobTitle", Contact),
    ("role", "jobTitle", Contact),
    ("dept", "department", Contact),
    ("seniority", "seniorityLevel", Contact),
    ("linkedin", "linkedinUrl", Contact),
    ("linkedinprofile", "linkedinUrl", Contact),
    // Contact location
    ("zip", "postalCode", Contact),
    ("zipcode", "postalCode", Contact),
    ("postcode", "postalCode", Contact),
    ("province", "state", Contact),
    ("region", "state", Contact),
    // Account identity
    ("companyname", "name", Account),
    ("company", "name", Account),
    ("organization", "name", Account),
    ("organisation", "name", Account),
    ("org", "name", Account),
    ("accountname", "name", Account),
    ("employer", "name", Account),
    ("website", "domain", Account),
    ("web", "domain", Account),
    ("url", "domain", Account),
    ("companywebsite", "domain", Account),
    ("companydomain", "domain", Account),
    ("domain", "domain", Account),
    // Account firmographics
    ("industry", "industryStandardized", Account),
    ("sector", "industryStandardized", Account),
    ("vertical", "industryStandardized", Account),
    ("employees", "employeesSizeRange", Account),
    ("employeessize", "employeesSizeRange", Account),
    ("employeesize", "employeesSizeRange", Account),
    ("employeecount", "employeesSizeRange", Account),
    ("headcount", "employeesSizeRange", Account),
    ("companysize", "employeesSizeRange", Account),
    ("revenue", "annualRevenue", Account),
    ("annualrevenue", "annualRevenue", Account),
    ("mainphone", "mainPhone", Account),
    ("companyphone", "mainPhone", Account),
    ("hqphone", "mainPhone", Account),
    ("switchboard", "mainPhone", Account),
    ("siccode", "sicCode", Account),
    ("sic", "sicCode", Account),
    ("naicscode", "naicsCode", Account),
    ("naics", "naicsCode", Account),
    ("founded", "yearFounded", Account),
    ("technologies", "techStack", Account),
];

static ALIAS_MAP: LazyLock<HashMap<&'static str, (&'static str, TargetEntity)>> =
    LazyLock::new(|| {
        ALIASES
            .iter()
            .map(|(alias, field, entity)| (*alias, (*field, *entity)))
            .collect()
    });

/// Looks up an alias for an already-normalized header.
pub fn lookup_alias(normalized: &str) -> Option<(&'static str, TargetEntity)> {
    ALIAS_MAP.get(normalized).copied()
}

/// Number of alias entries.
pub fn alias_count() -> usize {
    ALIAS_MAP.len()
}
