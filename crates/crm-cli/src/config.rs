//! `crm-import` settings file.
//!
//! ```toml
//! [api]
//! base_url = "https://crm.example.com/api"
//! timeout_secs = 30
//!
//! [import]
//! batch_size = 50
//! register_custom_fields = true
//! profile_dir = "/home/me/.local/share/crm-import/profiles"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crm_import::{BatchSize, DEFAULT_TIMEOUT, ImportOptions};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub import: ImportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub batch_size: usize,
    pub register_custom_fields: bool,
    /// Where mapping profiles are stored. Defaults to the platform data dir.
    pub profile_dir: Option<PathBuf>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: BatchSize::default().get(),
            register_custom_fields: true,
            profile_dir: None,
        }
    }
}

impl Settings {
    /// Loads `explicit` if given, else the platform config file.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file not found: {}", path.display());
                }
                Self::load_from(path)
            }
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(settings)
    }

    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.import.profile_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("profiles"))
                .unwrap_or_else(|| PathBuf::from("profiles"))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn import_options(&self) -> Result<ImportOptions> {
        let Some(batch_size) = BatchSize::new(self.import.batch_size) else {
            bail!("import.batch_size must be at least 1");
        };
        Ok(ImportOptions {
            batch_size,
            register_custom_fields: self.import.register_custom_fields,
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "CrmImport", "crm-import")
}
