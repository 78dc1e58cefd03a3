//! Outbound email.

mod smtp_notifier;
#[cfg(test)]
pub(crate) mod testing;

pub use smtp_notifier::SmtpNotifier;

use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

/// Fixed sender of every message.
pub const SENDER_ADDRESS: &str = "Vendor Management Team <vendor-alerts@example.com>";

/// Sends email to vendors and stakeholders.
///
/// Implementations open a fresh transport for every call and release it
/// before returning. Nothing is retried.
pub trait Notifier: Send + Sync {
    /// Send a plain-text email.
    fn send_email(&self, recipients: &[String], subject: &str, body: &str) -> Result<()>;

    /// Send a plain-text email with a single file attached.
    fn send_email_with_attachment(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<()>;
}

/// Trims addresses, drops blank ones and removes case-insensitive duplicates,
/// keeping the first-seen spelling and order.
pub fn distinct_recipients<'a, I>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    dedupe_by(emails, str::to_lowercase)
}

/// Like [`distinct_recipients`], but addresses differing only in case are
/// kept as separate recipients.
pub fn distinct_addresses<'a, I>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    dedupe_by(emails, str::to_string)
}

fn dedupe_by<'a, I>(emails: I, key: fn(&str) -> String) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut recipients = Vec::new();
    for email in emails {
        let email = email.trim();
        if email.is_empty() {
            continue;
        }
        if seen.insert(key(email)) {
            recipients.push(email.to_string());
        }
    }
    recipients
}
