// src/services/notifier.rs

//! New-item notification by mail.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

use crate::models::{Item, MailConfig, NotificationConfig, Verbosity};

const SEPARATOR: &str = "==============================================================";

/// Mail submission failure. Never fatal to a run.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },

    #[error("cannot build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP submission failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Delivers a report of newly listed items.
pub trait Notifier {
    /// Send one message listing `items`. Callers only invoke this with a non-empty slice.
    fn notify(&self, items: &[Item], listing_url: &str) -> Result<(), MailError>;
}

fn report_text(items: &[Item]) -> String {
    let mut text = format!("Number of new bike(s): {}\n", items.len());
    for item in items {
        text.push_str(SEPARATOR);
        text.push('\n');
        text.push_str(&item.summary());
        text.push('\n');
    }
    text.push_str(SEPARATOR);
    text
}

/// Plain-text body: item count, one block per item, then the listing URL.
pub fn compose_body(items: &[Item], listing_url: &str, link_text: &str) -> String {
    format!("{}\n{link_text}: {listing_url}\n", report_text(items))
}

/// HTML alternative of [`compose_body`] with a clickable link.
pub fn compose_html(items: &[Item], listing_url: &str, link_text: &str) -> String {
    format!(
        "<html><body><pre>{}</pre><p><a href=\"{}\">{}</a></p></body></html>",
        escape_html(&report_text(items)),
        escape_html(listing_url),
        escape_html(link_text)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// Sends notifications over an implicit-TLS (SMTPS) session.
pub struct SmtpNotifier {
    mail: MailConfig,
    message: NotificationConfig,
    verbosity: Verbosity,
}

impl SmtpNotifier {
    pub fn new(mail: MailConfig, message: NotificationConfig, verbosity: Verbosity) -> Self {
        Self {
            mail,
            message,
            verbosity,
        }
    }

    /// Build the outgoing message without contacting the server.
    pub fn build_message(&self, items: &[Item], listing_url: &str) -> Result<Message, MailError> {
        let plain = compose_body(items, listing_url, &self.message.link_text);
        if self.verbosity.is_verbose() {
            log::info!("Sending following message:\n{}", plain);
        }
        let html = compose_html(items, listing_url, &self.message.link_text);

        let message = Message::builder()
            .from(mailbox(&self.mail.sender_email)?)
            .to(mailbox(&self.mail.receiver_email)?)
            .subject(&self.message.subject)
            .multipart(MultiPart::alternative_plain_html(plain, html))?;
        Ok(message)
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let transport = SmtpTransport::relay(&self.mail.smtp_server)?
            .port(self.mail.port)
            .credentials(Credentials::new(
                self.mail.sender_email.clone(),
                self.mail.password.clone(),
            ))
            .build();
        Ok(transport)
    }
}

impl Notifier for SmtpNotifier {
    fn notify(&self, items: &[Item], listing_url: &str) -> Result<(), MailError> {
        let message = self.build_message(items, listing_url)?;

        // Unpooled: the session is closed when `transport` drops, on success or error.
        let transport = self.transport()?;
        log::info!(
            "Submitting notification for {} item(s) to {} via {}:{}",
            items.len(),
            self.mail.receiver_email,
            self.mail.smtp_server,
            self.mail.port
        );
        transport.send(&message)?;
        log::info!("Notification sent");
        Ok(())
    }
}

/// Logs the composed message instead of sending it.
pub struct LogNotifier {
    link_text: String,
}

impl LogNotifier {
    pub fn new(message: &NotificationConfig) -> Self {
        Self {
            link_text: message.link_text.clone(),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, items: &[Item], listing_url: &str) -> Result<(), MailError> {
        log::info!(
            "Dry run, not sending:\n{}",
            compose_body(items, listing_url, &self.link_text)
        );
        Ok(())
    }
}
