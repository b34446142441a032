//! Outbound mail port for report delivery.

use crate::report::domain::EmailAddress;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// A rendered report email awaiting handoff to the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient address.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Mail delivery contract.
///
/// Implementations own retry and rate limiting; the dispatcher's only
/// obligation on failure is to leave the schedule due so the next cycle
/// retries.
#[async_trait]
pub trait ReportMailer: Send + Sync {
    /// Hands a rendered email to the mail collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError`] when the handoff is not confirmed.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError>;
}

/// Errors returned by mailer implementations.
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    /// The mail collaborator did not confirm the handoff.
    #[error("mail delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl MailerError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
