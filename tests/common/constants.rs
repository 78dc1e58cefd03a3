//! Shared constants for end-to-end tests

use chrono::NaiveDate;

/// The date every test pretends is today.
pub const TODAY: NaiveDate = match NaiveDate::from_ymd_opt(2024, 6, 1) {
    Some(d) => d,
    None => panic!("invalid test date"),
};

/// Expiry dates relative to `TODAY`.
pub const DUE_IN_15_DAYS: &str = "2024-06-16";
pub const EXPIRED_15_DAYS_AGO: &str = "2024-05-17";
pub const EXPIRED_60_DAYS_AGO: &str = "2024-04-02";
pub const DUE_IN_16_DAYS: &str = "2024-06-17";
pub const DUE_IN_20_DAYS: &str = "2024-06-21";
pub const DUE_IN_21_DAYS: &str = "2024-06-22";

/// Name of the report folder inside the test environment.
pub const REPORT_FOLDER: &str = "reports";
