//! Recording mailer double for dispatch tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::report::ports::{MailerError, OutboundEmail, ReportMailer};

/// Mailer that records every handed-off email instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    outbox: Arc<RwLock<Vec<OutboundEmail>>>,
}

impl RecordingMailer {
    /// Creates a mailer with an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every email handed off so far.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError`] when the outbox lock is poisoned.
    pub fn outbox(&self) -> Result<Vec<OutboundEmail>, MailerError> {
        Ok(self
            .outbox
            .read()
            .map_err(|err| MailerError::delivery(std::io::Error::other(err.to_string())))?
            .clone())
    }
}

#[async_trait]
impl ReportMailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        self.outbox
            .write()
            .map_err(|err| MailerError::delivery(std::io::Error::other(err.to_string())))?
            .push(email.clone());
        Ok(())
    }
}
