//! Isolated test environment lifecycle
//!
//! When dropped, the temp dir and everything in it is removed.

use super::constants::REPORT_FOLDER;
use super::fixtures::{create_vendor_db, write_config_file, VendorRow};
use super::notifier::RecordingNotifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use vendor_expiry_service::background_jobs::JobContext;
use vendor_expiry_service::config::TomlConfigFile;

pub struct TestEnv {
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    pub report_dir: PathBuf,
    pub notifier: Arc<RecordingNotifier>,
    pub shutdown_token: CancellationToken,
    _temp_dir: TempDir, // Keep temp dir alive
}

impl TestEnv {
    /// Vendor database with `rows` and a config file pointing at it and at
    /// the report folder. The report folder itself is not created.
    pub fn with_vendors(rows: &[VendorRow<'_>]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path =
            create_vendor_db(temp_dir.path(), rows).expect("Failed to create vendor db");
        let config_path = temp_dir.path().join("config.toml");
        let report_dir = temp_dir.path().join(REPORT_FOLDER);
        write_config_file(&config_path, Some(&db_path), Some(&report_dir))
            .expect("Failed to write config file");

        Self {
            db_path,
            config_path,
            report_dir,
            notifier: Arc::new(RecordingNotifier::default()),
            shutdown_token: CancellationToken::new(),
            _temp_dir: temp_dir,
        }
    }

    /// Rewrites the config file, leaving out the settings passed as `false`.
    pub fn rewrite_config(&self, with_connection: bool, with_folder: bool) {
        write_config_file(
            &self.config_path,
            with_connection.then_some(self.db_path.as_path()),
            with_folder.then_some(self.report_dir.as_path()),
        )
        .expect("Failed to write config file");
    }

    /// Job context reading the config file from disk on every run.
    pub fn context(&self) -> JobContext {
        JobContext::new(
            self.shutdown_token.child_token(),
            Arc::new(TomlConfigFile::new(&self.config_path)),
            self.notifier.clone(),
        )
    }

    /// CSV files written to the report folder, sorted by name.
    pub fn report_files(&self) -> Vec<PathBuf> {
        list_files(&self.report_dir)
    }
}

fn list_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}
