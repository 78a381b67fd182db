//! Mail delivery through an HTTP mail provider

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::contact::{MailMessage, Mailer};
use crate::domain::DomainError;
use crate::infrastructure::http::HttpClientTrait;

/// Posts each message as JSON to the provider's send endpoint with a bearer key
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Arc<dyn HttpClientTrait>,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(
        client: Arc<dyn HttpClientTrait>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::configuration("Mail provider API key is not set"))?;

        let body = json!({
            "from": message.from,
            "to": [message.to],
            "reply_to": message.reply_to,
            "subject": message.subject,
            "html": message.html,
        });
        let auth = format!("Bearer {}", api_key);

        self.client
            .post_json(&self.endpoint, vec![("Authorization", auth.as_str())], &body)
            .await?;

        debug!(to = %message.to, "Contact message handed to mail provider");
        Ok(())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::MockHttpClient;

    const ENDPOINT: &str = "https://mail.test/emails";

    fn message() -> MailMessage {
        MailMessage {
            from: "site@annan.dev".to_string(),
            to: "owner@annan.dev".to_string(),
            reply_to: "jane@example.com".to_string(),
            subject: "Portfolio Contact: Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_posts_with_bearer_key() {
        let client = Arc::new(MockHttpClient::new().with_response(ENDPOINT, json!({"id": "m1"})));
        let mailer = HttpMailer::new(client.clone(), ENDPOINT, Some("key-123".to_string()));

        mailer.send(&message()).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert!(requests[0]
            .headers
            .contains(&("Authorization".to_string(), "Bearer key-123".to_string())));
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["to"][0], "owner@annan.dev");
        assert_eq!(body["reply_to"], "jane@example.com");
        assert_eq!(body["subject"], "Portfolio Contact: Hello");
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let client = Arc::new(MockHttpClient::new());
        let mailer = HttpMailer::new(client.clone(), ENDPOINT, Some("  ".to_string()));

        assert!(!mailer.is_configured());
        let err = mailer.send(&message()).await.unwrap_err();

        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let client = Arc::new(MockHttpClient::new().with_error(ENDPOINT, "HTTP 500"));
        let mailer = HttpMailer::new(client, ENDPOINT, Some("key".to_string()));

        let err = mailer.send(&message()).await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream { .. }));
    }
}
