//! SMTP mail transport.

use async_trait::async_trait;
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MailError;
use crate::models::config::{MessageSettings, SmtpSettings};

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    /// Plain connection, no TLS.
    None,
    /// STARTTLS upgrade after connect.
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
}

impl Security {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "starttls" => Some(Self::StartTls),
            "tls" => Some(Self::Tls),
            _ => None,
        }
    }
}

/// One message ready for the transport.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
    /// Content hash of the attached document; carried on the message for
    /// delivery-receipt correlation.
    pub receipt_id: String,
}

/// Seam for the mail transport.
///
/// The executor only needs "send this, tell me if the server took it", so
/// tests can substitute a recording fake.
#[async_trait]
pub trait Mailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MailError>;
}

/// Production transport over SMTP.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(smtp: &SmtpSettings, message: &MessageSettings) -> Result<Self, MailError> {
        let from = sender_mailbox(message)?;

        let builder = match smtp.security {
            Security::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?,
            Security::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?,
            Security::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host),
        };

        let mut builder = builder.port(smtp.port);
        if !smtp.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                smtp.user.clone(),
                smtp.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build(&self, out: &OutgoingMessage) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(out.subject.clone());

        for to in &out.to {
            let mailbox: Mailbox = to.parse().map_err(|e: lettre::address::AddressError| {
                MailError::Address {
                    address: to.clone(),
                    reason: e.to_string(),
                }
            })?;
            builder = builder.to(mailbox);
        }

        let content_type =
            ContentType::parse("application/pdf").map_err(|e| MailError::Build(e.to_string()))?;
        let attachment = Attachment::new(out.attachment_name.clone())
            .body(Body::new(out.attachment.clone()), content_type);

        let mut message = builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(out.html_body.clone()))
                    .singlepart(attachment),
            )
            .map_err(|e| MailError::Build(e.to_string()))?;

        let sender = self.from.email.to_string();
        let headers = message.headers_mut();
        headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("X-Delivery-Receipt-Id"),
            out.receipt_id.clone(),
        ));
        headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("Return-Receipt-To"),
            sender.clone(),
        ));
        headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("Disposition-Notification-To"),
            sender,
        ));

        Ok(message)
    }
}

fn sender_mailbox(message: &MessageSettings) -> Result<Mailbox, MailError> {
    let address: Address =
        message
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::Address {
                address: message.from.clone(),
                reason: e.to_string(),
            })?;

    let name = message.sender_name.trim();
    let name = (!name.is_empty()).then(|| name.to_string());
    Ok(Mailbox::new(name, address))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), MailError> {
        let email = self.build(message)?;
        let response = self.transport.send(email).await?;
        debug!("transport accepted message: {:?}", response.code());
        Ok(())
    }
}

/// Subject line for a delivery: `"{prefix} - {customer} - NF: {invoice}"`.
pub fn subject_line(prefix: &str, customer_name: &str, invoice_number: &str) -> String {
    format!("{prefix} - {customer_name} - NF: {invoice_number}")
}
