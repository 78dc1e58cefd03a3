//! Temporary vendor databases for unit tests.

use rusqlite::{params, Connection};
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestVendorDb {
    path: PathBuf,
    _temp_dir: TempDir, // Keep temp dir alive
}

impl TestVendorDb {
    /// Creates an empty `vendor` table in a fresh database file.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vendors.db");
        Connection::open(&path)
            .unwrap()
            .execute(
                "CREATE TABLE vendor (
                    vendor_name TEXT,
                    document_number TEXT,
                    expiry_date TEXT,
                    email TEXT
                )",
                [],
            )
            .unwrap();
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    pub fn with_rows(rows: &[(&str, &str, Option<&str>, &str)]) -> Self {
        let db = Self::new();
        for (name, doc, expiry, email) in rows {
            db.insert(name, doc, *expiry, email);
        }
        db
    }

    pub fn insert(&self, name: &str, doc: &str, expiry: Option<&str>, email: &str) {
        Connection::open(&self.path)
            .unwrap()
            .execute(
                "INSERT INTO vendor (vendor_name, document_number, expiry_date, email)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, doc, expiry, email],
            )
            .unwrap();
    }

    pub fn connection_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
