//! In-memory notifier for unit tests.

use super::Notifier;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachment: Option<PathBuf>,
}

/// Records every message instead of sending it. Subjects registered with
/// `fail_on` make the send return an error.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentEmail>>,
    failing_subjects: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn fail_on(&self, subject: &str) {
        self.failing_subjects
            .lock()
            .unwrap()
            .push(subject.to_string());
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, email: SentEmail) -> Result<()> {
        if self
            .failing_subjects
            .lock()
            .unwrap()
            .contains(&email.subject)
        {
            bail!("SMTP connection refused");
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
        self.record(SentEmail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
            attachment: Some(attachment.to_path_buf()),
        })
    }
}
