use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub log_file: Option<String>,

    // Named connection strings, looked up by name (e.g. "emailsendermain")
    pub connection_strings: HashMap<String, String>,

    pub app_settings: AppSettingsConfig,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettingsConfig {
    /// Folder the daily CSV reports are written to.
    pub csv_folder: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// "none", "starttls" or "tls"
    pub security: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Returns the named connection string, or `None` when it is absent or blank.
    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.connection_strings
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Returns the CSV output folder, or `None` when it is absent or blank.
    pub fn csv_folder(&self) -> Option<PathBuf> {
        self.app_settings
            .csv_folder
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
