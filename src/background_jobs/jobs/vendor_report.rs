//! Vendor expiry report background job.
//!
//! Writes every vendor expiring more than 20 days out to a timestamped CSV
//! file and emails it to the vendors listed in it.

use crate::background_jobs::{
    context::JobContext,
    job::{BackgroundJob, JobError},
};
use crate::config::VENDOR_CONNECTION_NAME;
use crate::notifier::distinct_addresses;
use crate::vendor_store::{ReportRow, SqliteVendorStore};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const REPORT_SUBJECT: &str = "Vendor Expiry Report";
pub const REPORT_BODY: &str = "Attached is the report for vendors with expiry > 20 days.";
pub const REPORT_HEADER: [&str; 4] = ["VendorName", "DocumentNumber", "ExpiryDate", "Email"];

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRunSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub recipients: usize,
    pub email_sent: bool,
}

/// `VendorReport_<YYYYMMDDHHMMSS>.csv`
pub fn report_file_name(now: NaiveDateTime) -> String {
    format!("VendorReport_{}.csv", now.format("%Y%m%d%H%M%S"))
}

/// Writes the header and one line per row. Values are written verbatim,
/// without quoting.
pub fn write_report_csv(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_path(path)
        .with_context(|| format!("Failed to create report file {:?}", path))?;

    writer
        .write_record(REPORT_HEADER)
        .context("Failed to write report header")?;
    for row in rows {
        let expiry = row.expiry_date.format("%Y-%m-%d").to_string();
        writer
            .write_record([
                row.vendor_name.as_str(),
                row.document_number.as_str(),
                expiry.as_str(),
                row.email.as_str(),
            ])
            .with_context(|| format!("Failed to write report row to {:?}", path))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush report file {:?}", path))?;
    Ok(())
}

/// Background job that produces and mails the daily vendor report.
#[derive(Default)]
pub struct VendorReportJob;

impl VendorReportJob {
    pub fn new() -> Self {
        Self
    }

    /// Runs the report pipeline at local time `now`.
    ///
    /// Returns `Ok(None)` when the connection string or the output folder is
    /// not configured; nothing is written or sent in that case.
    pub fn run(
        &self,
        ctx: &JobContext,
        now: NaiveDateTime,
    ) -> Result<Option<ReportRunSummary>, JobError> {
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
        let Some(folder) = config.csv_folder() else {
            error!("Error: CSVFolder app setting is missing.");
            return Ok(None);
        };

        let rows = SqliteVendorStore::new(connection_string).get_report_rows(now.date())?;

        std::fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create report folder {:?}", folder))?;
        let path = folder.join(report_file_name(now));
        write_report_csv(&path, &rows)?;
        info!("Wrote {} vendor rows to {:?}", rows.len(), path);

        let recipients = distinct_addresses(rows.iter().map(|r| r.email.as_str()));
        let mut summary = ReportRunSummary {
            path,
            rows: rows.len(),
            recipients: recipients.len(),
            email_sent: false,
        };

        if recipients.is_empty() {
            warn!(
                "No recipients for report {:?}, email not sent",
                summary.path
            );
            return Ok(Some(summary));
        }

        ctx.notifier
            .send_email_with_attachment(&recipients, REPORT_SUBJECT, REPORT_BODY, &summary.path)
            .context("Failed to send vendor report")?;
        summary.email_sent = true;
        info!("CSV report sent.");

        Ok(Some(summary))
    }
}

impl BackgroundJob for VendorReportJob {
    fn id(&self) -> &'static str {
        "vendor_report"
    }

    fn name(&self) -> &'static str {
        "Vendor Expiry Report"
    }

    fn description(&self) -> &'static str {
        "Email a CSV of vendors whose documents expire more than 20 days from now"
    }

    fn execute(&self, ctx: &JobContext) -> Result<(), JobError> {
        self.run(ctx, Local::now().naive_local()).map(|_| ())
    }
}
