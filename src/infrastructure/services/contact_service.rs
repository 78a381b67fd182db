//! Contact service - validates submissions and relays them by mail

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::contact::{ContactForm, ContactSubmission, MailMessage, Mailer};
use crate::domain::DomainError;

/// Sender and recipient of contact notifications
#[derive(Debug, Clone)]
pub struct ContactRouting {
    pub from: String,
    pub to: String,
}

/// Relays valid contact submissions to the site owner
#[derive(Debug, Clone)]
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    routing: ContactRouting,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>, routing: ContactRouting) -> Self {
        if !mailer.is_configured() {
            warn!("Mail provider is not configured; contact submissions will fail");
        }

        Self { mailer, routing }
    }

    pub fn is_configured(&self) -> bool {
        self.mailer.is_configured()
    }

    /// Validate and deliver. Invalid forms never reach the mailer; a valid
    /// form is handed over exactly once.
    pub async fn submit(&self, form: &ContactForm) -> Result<ContactSubmission, DomainError> {
        let submission = ContactSubmission::from_form(form)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let message =
            MailMessage::for_submission(&submission, &self.routing.from, &self.routing.to);

        self.mailer.send(&message).await?;

        info!(subject = %submission.subject(), "Contact message relayed");
        Ok(submission)
    }
}
