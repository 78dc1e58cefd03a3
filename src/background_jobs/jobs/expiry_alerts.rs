//! Expiry alert background job.
//!
//! Emails vendors whose documents expire in 15 days or expired 15 or 60
//! days ago. One email is sent per distinct expiry date.

use crate::background_jobs::{
    context::JobContext,
    job::{BackgroundJob, JobError},
};
use crate::config::VENDOR_CONNECTION_NAME;
use crate::notifier::distinct_recipients;
use crate::vendor_store::{SqliteVendorStore, VendorRecord};
use chrono::{Local, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, error, info};

pub const ALERT_SUBJECT_PREFIX: &str = "Document Expiry Alert";

/// The alert message for one expiry date.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEmail {
    pub expiry_date: NaiveDate,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertRunSummary {
    /// Rows dropped because name, document or email was blank.
    pub rows_skipped: usize,
    /// Distinct expiry dates found.
    pub groups: usize,
    pub emails_sent: usize,
    pub emails_failed: usize,
}

/// Buckets usable records by exact expiry date.
///
/// Records with a blank vendor name, document number or email are dropped;
/// the returned count is how many. Kept records are trimmed and stay in
/// query order within their date.
pub fn group_by_expiry(
    records: &[VendorRecord],
) -> (BTreeMap<NaiveDate, Vec<VendorRecord>>, usize) {
    let mut groups: BTreeMap<NaiveDate, Vec<VendorRecord>> = BTreeMap::new();
    let mut skipped = 0;

    for record in records {
        match record.trimmed() {
            Some(record) => groups.entry(record.expiry_date).or_default().push(record),
            None => skipped += 1,
        }
    }

    (groups, skipped)
}

/// Composes the alert for all vendors sharing `expiry_date`.
pub fn compose_alert(expiry_date: NaiveDate, vendors: &[VendorRecord]) -> AlertEmail {
    let date = expiry_date.format("%Y-%m-%d");
    let recipients = distinct_recipients(vendors.iter().map(|v| v.email.as_str()));

    let mut body = format!(
        "Dear Vendor(s),\n\nThe following documents are set to expire on {}:\n\n",
        date
    );
    let mut listed = HashSet::new();
    for vendor in vendors {
        if listed.insert((vendor.vendor_name.as_str(), vendor.document_number.as_str())) {
            body.push_str(&format!(
                "- {}: Document {}\n",
                vendor.vendor_name, vendor.document_number
            ));
        }
    }
    body.push_str("\nPlease take the necessary actions.\n\nRegards,\nVendor Management Team");

    AlertEmail {
        expiry_date,
        recipients,
        subject: format!("{} - {}", ALERT_SUBJECT_PREFIX, date),
        body,
    }
}

/// Background job that sends the daily document expiry alerts.
#[derive(Default)]
pub struct ExpiryAlertJob;

impl ExpiryAlertJob {
    pub fn new() -> Self {
        Self
    }

    /// Runs the alert pipeline for `today`.
    ///
    /// Returns `Ok(None)` when the connection string is not configured.
    pub fn run(
        &self,
        ctx: &JobContext,
        today: NaiveDate,
    ) -> Result<Option<AlertRunSummary>, JobError> {
        if ctx.is_cancelled() {
            return Err(JobError::Cancelled);
        }

        let config = ctx.config.load()?;
        let Some(connection_string) = config.connection_string(VENDOR_CONNECTION_NAME) else {
            error!(
                "Error: {} connection string is missing or empty.",
                VENDOR_CONNECTION_NAME
            );
            return Ok(None);
        };

        let records =
            SqliteVendorStore::new(connection_string).get_expiry_alert_candidates(today)?;
        let (groups, rows_skipped) = group_by_expiry(&records);
        if rows_skipped > 0 {
            debug!("Skipped {} alert rows with blank fields", rows_skipped);
        }

        let mut summary = AlertRunSummary {
            rows_skipped,
            groups: groups.len(),
            ..Default::default()
        };

        for (expiry_date, vendors) in &groups {
            let alert = compose_alert(*expiry_date, vendors);
            let to = alert.recipients.join(",");

            match ctx
                .notifier
                .send_email(&alert.recipients, &alert.subject, &alert.body)
            {
                Ok(()) => {
                    summary.emails_sent += 1;
                    info!(
                        "Sent expiry alert for {} to {}",
                        expiry_date.format("%Y-%m-%d"),
                        to
                    );
                }
                Err(e) => {
                    summary.emails_failed += 1;
                    error!(
                        "Failed to send expiry alert for {} to {}: {:#}",
                        expiry_date.format("%Y-%m-%d"),
                        to,
                        e
                    );
                }
            }
        }

        if summary.emails_failed > 0 {
            return Err(JobError::ExecutionFailed(format!(
                "{} of {} expiry alerts could not be sent",
                summary.emails_failed, summary.groups
            )));
        }

        Ok(Some(summary))
    }
}

impl BackgroundJob for ExpiryAlertJob {
    fn id(&self) -> &'static str {
        "expiry_alerts"
    }

    fn name(&self) -> &'static str {
        "Expiry Alerts"
    }

    fn description(&self) -> &'static str {
        "Email vendors whose documents expire in 15 days or expired 15 or 60 days ago"
    }

    fn execute(&self, ctx: &JobContext) -> Result<(), JobError> {
        self.run(ctx, Local::now().date_naive()).map(|_| ())
    }
}
