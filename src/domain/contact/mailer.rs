//! Mail delivery abstraction

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::MailMessage;
use crate::domain::DomainError;

/// Hands a message to a mail-delivery provider. One call is one delivery
/// attempt; implementations do not retry.
#[async_trait]
pub trait Mailer: Send + Sync + Debug {
    async fn send(&self, message: &MailMessage) -> Result<(), DomainError>;

    /// Whether credentials are present
    fn is_configured(&self) -> bool {
        true
    }
}
