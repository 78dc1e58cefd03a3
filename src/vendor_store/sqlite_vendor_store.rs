use super::models::{ReportRow, VendorRecord, MISSING_EXPIRY_DATE};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::{debug, warn};

/// Day offsets (expiry date minus today) that trigger an alert: due in 15
/// days, expired 15 days ago, expired 60 days ago.
pub const ALERT_DAY_OFFSETS: [i64; 3] = [15, -15, -60];

/// Report rows expire strictly more than this many days from today.
pub const REPORT_MIN_DAYS_AHEAD: i64 = 20;

const ALERT_QUERY: &str = "
    SELECT vendor_name, document_number, date(expiry_date), email
    FROM vendor
    WHERE expiry_date IS NOT NULL
      AND CAST(julianday(date(expiry_date)) - julianday(?1) AS INTEGER) IN (?2, ?3, ?4)";

const REPORT_QUERY: &str = "
    SELECT vendor_name, document_number, date(expiry_date), email
    FROM vendor
    WHERE expiry_date IS NULL
       OR CAST(julianday(date(expiry_date)) - julianday(?1) AS INTEGER) > ?2";

/// Read-only access to the `vendor` table.
///
/// Every query opens its own connection and closes it before returning,
/// there is no connection reuse between calls.
pub struct SqliteVendorStore {
    connection_string: String,
}

impl SqliteVendorStore {
    /// `connection_string` is a database path or a `file:` URI.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    fn open(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.connection_string,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| {
            format!(
                "Failed to open vendor database {:?}",
                self.connection_string
            )
        })
    }

    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.open()?;
        let result = f(&conn);
        if let Err((_conn, e)) = conn.close() {
            warn!("Failed to close vendor database connection: {}", e);
        }
        result
    }

    /// Vendors whose expiry date is exactly one of [`ALERT_DAY_OFFSETS`] days
    /// away from `today`.
    pub fn get_expiry_alert_candidates(&self, today: NaiveDate) -> Result<Vec<VendorRecord>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(ALERT_QUERY)
                .context("Failed to prepare expiry alert query")?;
            let rows = stmt
                .query_map(
                    params![
                        today,
                        ALERT_DAY_OFFSETS[0],
                        ALERT_DAY_OFFSETS[1],
                        ALERT_DAY_OFFSETS[2]
                    ],
                    |row| {
                        Ok(VendorRecord {
                            vendor_name: text_column(row, 0)?,
                            document_number: text_column(row, 1)?,
                            expiry_date: row.get(2)?,
                            email: text_column(row, 3)?,
                        })
                    },
                )
                .context("Failed to query expiry alert candidates")?;
            let records = rows
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("Failed to read expiry alert candidates")?;

            debug!(
                "Found {} expiry alert candidates for {}",
                records.len(),
                today
            );
            Ok(records)
        })
    }

    /// Vendors expiring more than [`REPORT_MIN_DAYS_AHEAD`] days after
    /// `today`, plus vendors with no expiry date at all.
    pub fn get_report_rows(&self, today: NaiveDate) -> Result<Vec<ReportRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(REPORT_QUERY)
                .context("Failed to prepare report query")?;
            let rows = stmt
                .query_map(params![today, REPORT_MIN_DAYS_AHEAD], |row| {
                    Ok(ReportRow {
                        vendor_name: text_column(row, 0)?,
                        document_number: text_column(row, 1)?,
                        expiry_date: row
                            .get::<_, Option<NaiveDate>>(2)?
                            .unwrap_or(MISSING_EXPIRY_DATE),
                        email: text_column(row, 3)?,
                    })
                })
                .context("Failed to query report rows")?;
            let report = rows
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("Failed to read report rows")?;

            debug!("Found {} report rows for {}", report.len(), today);
            Ok(report)
        })
    }
}

/// Reads a column as text whatever its storage class; NULL becomes "".
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}
