mod file_config;

pub use file_config::{AppSettingsConfig, FileConfig, SmtpConfig};

use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Name of the connection string pointing at the vendor database.
pub const VENDOR_CONNECTION_NAME: &str = "emailsendermain";

pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_LOG_FILE_NAME: &str = "log.txt";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid SMTP security mode '{0}' (expected none, starttls or tls)")]
    InvalidSmtpSecurity(String),
    #[error("SMTP username and password must be provided together")]
    IncompleteSmtpCredentials,
}

/// Source of the per-run settings.
///
/// Pipelines call `load()` on every invocation, so edits to the config file
/// are picked up on the next daily run without restarting the service.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<FileConfig>;
}

/// TOML config file on disk.
#[derive(Debug, Clone)]
pub struct TomlConfigFile {
    path: PathBuf,
}

impl TomlConfigFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for TomlConfigFile {
    fn load(&self) -> Result<FileConfig> {
        if !self.path.exists() {
            warn!(
                "Config file {:?} not found, all settings are missing",
                self.path
            );
            return Ok(FileConfig::default());
        }
        FileConfig::load(&self.path)
    }
}

/// A fixed, in-memory configuration.
impl ConfigSource for FileConfig {
    fn load(&self) -> Result<FileConfig> {
        Ok(self.clone())
    }
}

/// CLI arguments that can be used for config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Directory of the running binary, used for default file locations.
    pub base_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl CliConfig {
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_CONFIG_FILE_NAME))
    }

    /// Log file location: the TOML `log_file`, then `--log-file`, then
    /// `log.txt` in the base dir. Pass `None` when the config file could not
    /// be read, so startup errors still reach a log file.
    pub fn log_file_for(&self, file_config: Option<&FileConfig>) -> PathBuf {
        file_config
            .and_then(|f| f.log_file.as_deref())
            .map(PathBuf::from)
            .or_else(|| self.log_file.clone())
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_LOG_FILE_NAME))
    }
}

/// Settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub log_file: PathBuf,
    pub smtp: SmtpSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let log_file = cli.log_file_for(Some(&file));

        let smtp = SmtpSettings::resolve(file.smtp)?;

        Ok(Self {
            config_path: cli.config_path(),
            log_file,
            smtp,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Plain connection, no TLS.
    None,
    /// Plain connection upgraded with STARTTLS.
    #[default]
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
}

impl SmtpSecurity {
    fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(SmtpSecurity::None),
            "starttls" => Ok(SmtpSecurity::StartTls),
            "tls" => Ok(SmtpSecurity::Tls),
            _ => Err(ConfigError::InvalidSmtpSecurity(s.to_string())),
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            SmtpSecurity::None => 25,
            SmtpSecurity::StartTls => 587,
            SmtpSecurity::Tls => 465,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub credentials: Option<SmtpCredentials>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: SmtpSecurity::None.default_port(),
            security: SmtpSecurity::None,
            credentials: None,
        }
    }
}

impl SmtpSettings {
    pub fn resolve(file: Option<SmtpConfig>) -> Result<Self, ConfigError> {
        let Some(file) = file else {
            return Ok(Self::default());
        };

        let security = match file.security.as_deref() {
            Some(s) => SmtpSecurity::parse(s)?,
            None => SmtpSecurity::default(),
        };

        let credentials = match (file.username, file.password) {
            (Some(username), Some(password)) => Some(SmtpCredentials { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteSmtpCredentials),
        };

        Ok(Self {
            host: file.host.unwrap_or_else(|| "localhost".to_string()),
            port: file.port.unwrap_or_else(|| security.default_port()),
            security,
            credentials,
        })
    }
}
