//! The two daily jobs: expiry alerts and the vendor report.

pub mod expiry_alerts;
pub mod vendor_report;

pub use expiry_alerts::ExpiryAlertJob;
pub use vendor_report::VendorReportJob;
