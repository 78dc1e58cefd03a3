//! Read-only access to the external vendor database.

mod models;
mod sqlite_vendor_store;
#[cfg(test)]
pub(crate) mod testing;

pub use models::{ReportRow, VendorRecord, MISSING_EXPIRY_DATE};
pub use sqlite_vendor_store::{SqliteVendorStore, ALERT_DAY_OFFSETS, REPORT_MIN_DAYS_AHEAD};
