//! Fixture creation for the vendor database and the config file

use anyhow::Result;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// One `vendor` row: name, document number, expiry date, email.
pub type VendorRow<'a> = (&'a str, &'a str, Option<&'a str>, &'a str);

/// Creates `vendors.db` in `dir` with the given rows.
pub fn create_vendor_db(dir: &Path, rows: &[VendorRow<'_>]) -> Result<PathBuf> {
    let db_path = dir.join("vendors.db");
    let conn = Connection::open(&db_path)?;

    conn.execute(
        "CREATE TABLE vendor (
            vendor_name TEXT,
            document_number TEXT,
            expiry_date TEXT,
            email TEXT
        )",
        [],
    )?;

    for (name, doc, expiry, email) in rows {
        conn.execute(
            "INSERT INTO vendor (vendor_name, document_number, expiry_date, email)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, doc, expiry, email],
        )?;
    }

    Ok(db_path)
}

/// Writes a `config.toml` with the given connection string and report folder.
/// `None` leaves the setting out.
pub fn write_config_file(
    path: &Path,
    connection_string: Option<&Path>,
    csv_folder: Option<&Path>,
) -> Result<()> {
    let mut content = String::from("[connection_strings]\n");
    if let Some(db) = connection_string {
        content.push_str(&format!("emailsendermain = {:?}\n", db.to_string_lossy()));
    }
    content.push_str("\n[app_settings]\n");
    if let Some(folder) = csv_folder {
        content.push_str(&format!("csv_folder = {:?}\n", folder.to_string_lossy()));
    }
    std::fs::write(path, content)?;
    Ok(())
}
