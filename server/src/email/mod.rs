//! Mail delivery
//!
//! The [`Mailer`] trait is the seam between the scheduled report
//! dispatcher and the actual transport, so delivery failures can be
//! simulated in tests and the transport swapped without touching the
//! dispatch loop. [`SmtpMailer`] is the production implementation.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

pub type MailError = Box<dyn std::error::Error + Send + Sync>;

/// A file attached to an outgoing message
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Outgoing mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<MailAttachment>,
    ) -> Result<(), MailError>;
}

/// SMTP transport over lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpConfig, from: &str) -> Result<Self, MailError> {
        let credentials = Credentials::new(smtp.username.clone(), smtp.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| format!("Failed to create SMTP transport: {e}"))?
            .port(smtp.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: from
                .parse()
                .map_err(|e| format!("Invalid MAIL_FROM address: {e}"))?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<MailAttachment>,
    ) -> Result<(), MailError> {
        let builder = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e| format!("Invalid recipient address: {e}"))?)
            .subject(subject);

        let email = match attachment {
            Some(file) => {
                let content_type = ContentType::parse(&file.mime)
                    .map_err(|e| format!("Invalid attachment MIME type: {e}"))?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(body.to_string()),
                        )
                        .singlepart(Attachment::new(file.filename).body(file.bytes, content_type)),
                )
            }
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(body.to_string()),
        }
        .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport.send(email).await?;
        Ok(())
    }
}
