//! Common test infrastructure
//!
//! Each test gets an isolated environment: a vendor database, a TOML config
//! file and a report folder inside one temp dir, plus a notifier that records
//! messages instead of sending them.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestEnv, TODAY};
//! use vendor_expiry_service::background_jobs::jobs::ExpiryAlertJob;
//!
//! #[test]
//! fn test_alerts() {
//!     let env = TestEnv::with_vendors(&[("Acme", "D1", Some("2024-06-16"), "a@x.com")]);
//!     ExpiryAlertJob::new().run(&env.context(), TODAY).unwrap();
//!     assert_eq!(env.notifier.sent().len(), 1);
//! }
//! ```

#![allow(dead_code)]

mod constants;
mod env;
mod fixtures;
mod notifier;

// Public API - this is what tests import
pub use constants::*;
pub use env::TestEnv;
