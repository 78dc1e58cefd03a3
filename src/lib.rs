//! Vendor Expiry Service Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod background_jobs;
pub mod config;
pub mod logging;
pub mod notifier;
pub mod vendor_store;

// Re-export commonly used types for convenience
pub use background_jobs::{DailyScheduler, JobContext};
pub use notifier::{Notifier, SmtpNotifier};
pub use vendor_store::SqliteVendorStore;
