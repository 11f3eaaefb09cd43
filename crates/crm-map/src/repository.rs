//! Mapping profile repository for persisting and reusing edited mappings.
//!
//! A profile is a named, saved mapping set. Re-applying it to a new file
//! with the same headers reproduces the earlier edits without repeating them.
//!
//! # Storage Format
//!
//! Profiles are stored as pretty-printed JSON files named `{profile}.json`,
//! where the name is lower-cased and non-alphanumeric characters become `_`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_model::FieldMapping;

/// A named, reusable mapping set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub saved_at: DateTime<Utc>,
    /// Version of the profile format.
    #[serde(default = "default_version")]
    pub version: String,
    pub mappings: Vec<FieldMapping>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl MappingProfile {
    pub fn new(name: impl Into<String>, mappings: Vec<FieldMapping>) -> Self {
        Self {
            name: name.into(),
            description: None,
            saved_at: Utc::now(),
            version: default_version(),
            mappings,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Metadata about a stored profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub name: String,
    pub file_path: PathBuf,
    pub saved_at: DateTime<Utc>,
    /// Columns with a target field.
    pub mapped_count: usize,
    /// Columns saved as skipped or incomplete.
    pub unmapped_count: usize,
}

/// Directory-backed store of mapping profiles.
#[derive(Debug, Clone)]
pub struct MappingProfileRepository {
    base_dir: PathBuf,
}

impl MappingProfileRepository {
    /// Opens a repository, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create mapping profile directory: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Saves a profile, replacing any profile with the same name.
    pub fn save(&self, profile: &MappingProfile) -> Result<PathBuf> {
        let path = self.profile_path(&profile.name);
        let json = serde_json::to_string_pretty(profile)
            .with_context(|| format!("Failed to serialize profile {}", profile.name))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write profile to {}", path.display()))?;
        Ok(path)
    }

    /// Loads a profile by name. Returns `None` if it does not exist.
    pub fn load(&self, name: &str) -> Result<Option<MappingProfile>> {
        let path = self.profile_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read profile from {}", path.display()))?;
        let profile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse profile from {}", path.display()))?;
        Ok(Some(profile))
    }

    /// Lists stored profiles sorted by name. Unparseable files are ignored.
    pub fn list(&self) -> Result<Vec<ProfileMetadata>> {
        let mut metadata = Vec::new();
        for entry in fs::read_dir(&self.base_dir).with_context(|| {
            format!(
                "Failed to read profile directory: {}",
                self.base_dir.display()
            )
        })? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            if let Ok(profile) = serde_json::from_str::<MappingProfile>(&contents) {
                let mapped_count = profile.mappings.iter().filter(|m| m.is_mapped()).count();
                metadata.push(ProfileMetadata {
                    name: profile.name,
                    file_path: path,
                    saved_at: profile.saved_at,
                    mapped_count,
                    unmapped_count: profile.mappings.len() - mapped_count,
                });
            }
        }
        metadata.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(metadata)
    }

    /// Deletes a profile. Returns false if it did not exist.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.profile_path(name);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete profile: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.profile_path(name).exists()
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_id(name)))
    }
}

/// Normalizes a profile name for use in filenames.
fn normalize_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
