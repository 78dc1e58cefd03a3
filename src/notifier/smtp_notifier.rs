use super::{Notifier, SENDER_ADDRESS};
use crate::config::{SmtpSecurity, SmtpSettings};
use anyhow::{bail, Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MessageBuilder, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::path::Path;
use tracing::debug;

/// [`Notifier`] backed by an SMTP server.
pub struct SmtpNotifier {
    settings: SmtpSettings,
    sender: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Result<Self> {
        let sender = SENDER_ADDRESS
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid sender address: {}", SENDER_ADDRESS))?;
        Ok(Self { settings, sender })
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let host = self.settings.host.as_str();
        let builder = match self.settings.security {
            SmtpSecurity::None => SmtpTransport::builder_dangerous(host),
            SmtpSecurity::StartTls => SmtpTransport::starttls_relay(host)
                .with_context(|| format!("Failed to configure STARTTLS for {}", host))?,
            SmtpSecurity::Tls => SmtpTransport::relay(host)
                .with_context(|| format!("Failed to configure TLS for {}", host))?,
        };

        let mut builder = builder.port(self.settings.port);
        if let Some(creds) = &self.settings.credentials {
            builder = builder.credentials(Credentials::new(
                creds.username.clone(),
                creds.password.clone(),
            ));
        }
        Ok(builder.build())
    }

    fn message_builder(&self, recipients: &[String], subject: &str) -> Result<MessageBuilder> {
        if recipients.is_empty() {
            bail!("Cannot send '{}' without recipients", subject);
        }

        let mut builder = Message::builder()
            .from(self.sender.clone())
            .subject(subject);
        for recipient in recipients {
            let mailbox = recipient
                .parse::<Mailbox>()
                .with_context(|| format!("Invalid recipient address: {}", recipient))?;
            builder = builder.to(mailbox);
        }
        Ok(builder)
    }

    pub(crate) fn build_plain_message(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> Result<Message> {
        self.message_builder(recipients, subject)?
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build email")
    }

    pub(crate) fn build_attachment_message(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<Message> {
        let content = std::fs::read(attachment)
            .with_context(|| format!("Failed to read attachment {:?}", attachment))?;
        let filename = attachment
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Attachment has no file name: {:?}", attachment))?;
        let content_type = ContentType::parse("text/csv").context("Invalid attachment type")?;

        self.message_builder(recipients, subject)?
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(Attachment::new(filename).body(content, content_type)),
            )
            .context("Failed to build email")
    }

    fn deliver(&self, message: &Message) -> Result<()> {
        // New transport per message, closed when it goes out of scope
        let transport = self.transport()?;
        transport.send(message).with_context(|| {
            format!(
                "Failed to send email via {}:{}",
                self.settings.host, self.settings.port
            )
        })?;
        Ok(())
    }
}

impl Notifier for SmtpNotifier {
    fn send_email(&self, recipients: &[String], subject: &str, body: &str) -> Result<()> {
        let message = self.build_plain_message(recipients, subject, body)?;
        self.deliver(&message)?;
        debug!("Sent '{}' to {}", subject, recipients.join(","));
        Ok(())
    }

    fn send_email_with_attachment(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: &Path,
    ) -> Result<()> {
        let message = self.build_attachment_message(recipients, subject, body, attachment)?;
        self.deliver(&message)?;
        debug!(
            "Sent '{}' with {:?} to {}",
            subject,
            attachment,
            recipients.join(",")
        );
        Ok(())
    }
}
