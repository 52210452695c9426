//! Outgoing email.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, AsyncSmtpTransport, AsyncTransport, Message as Email,
    Tokio1Executor,
};
use thiserror::Error;

use crate::config::{AppConfig, MailerConfig};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("outbox lock poisoned")]
    Poisoned,
}

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl Mail {
    /// The email asking a new user to verify their address.
    pub fn email_verification(config: &AppConfig, username: &str, email: &str, code: &str) -> Self {
        let link = format!(
            "{}/user/{}/verify-email/{}",
            config.app_url.all.trim_end_matches('/'),
            urlencoding::encode(username),
            code
        );
        Self {
            to: email.to_string(),
            subject: "Verify your email for ditup.org".to_string(),
            text: format!(
                "Hello {username},\n\n\
                 please verify your email by following this link:\n\n{link}\n\n\
                 The link is valid for 2 hours.\n\nditup.org"
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Delivers mail over SMTP.
pub struct SmtpMailer {
    from: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailerConfig) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .build();
        Self {
            from: config.from.clone(),
            transport,
        }
    }
}

fn parse_mailbox(address: &str) -> Result<lettre::message::Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let email = Email::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.text)?;

        self.transport.send(email).await?;
        tracing::info!(to = %mail.to, "email sent");
        Ok(())
    }
}

/// Keeps mail in memory instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    sent: Arc<Mutex<Vec<Mail>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything "sent" so far.
    pub fn sent(&self) -> Vec<Mail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Mail> {
        self.sent().pop()
    }
}

#[async_trait]
impl Mailer for Outbox {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        tracing::debug!(to = %mail.to, subject = %mail.subject, "email kept in outbox");
        self.sent
            .lock()
            .map_err(|_| MailError::Poisoned)?
            .push(mail);
        Ok(())
    }
}

/// The mailer selected by configuration.
pub fn from_config(config: &MailerConfig) -> Arc<dyn Mailer> {
    if config.enabled {
        Arc::new(SmtpMailer::new(config))
    } else {
        tracing::info!("mailer disabled, emails are kept in memory");
        Arc::new(Outbox::new())
    }
}
