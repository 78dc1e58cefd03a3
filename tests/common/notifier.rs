//! Notifier that records messages instead of sending them

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Mutex;
use vendor_expiry_service::notifier::Notifier;

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    /// File name and content of the attachment at the time it was sent.
    pub attachment: Option<(String, String)>,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    unreachable: Mutex<bool>,
}

impl RecordingNotifier {
    /// Makes every following send fail.
    pub fn go_offline(&self) {
        *self.unreachable.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, email: SentEmail) -> Result<()> {
        if *self.unreachable.lock().unwrap() {
            bail!("SMTP server unreachable");
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

impl Notifier for RecordingNotifier {
    fn send_email(&self, recipients: &[String], subject: &str, body: &str) -> Result<()> {
        self.record(SentEmail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachment: None,
        })
    }

    fn send_email_with_attachment(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<()> {
        let name = attachment
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = std::fs::read_to_string(attachment)?;
        self.record(SentEmail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachment: Some((name, content)),
        })
    }
}
