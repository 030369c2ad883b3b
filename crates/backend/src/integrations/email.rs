use async_trait::async_trait;
use contracts::integrations::email::{SendEmailRequest, SendEmailResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::config::{self, EmailConfig};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email provider is not configured")]
    NotConfigured,

    #[error("Invalid email: {0}")]
    InvalidRequest(String),

    #[error("Email provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),
}

/// Anything that can deliver a transactional email
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, EmailError>;
}

/// JSON body accepted by the provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailPayload<'a> {
    pub from: &'a str,
    pub to: &'a [String],
    pub subject: &'a str,
    pub html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    id: Option<String>,
}

/// Provider reached over HTTP with a bearer key
pub struct HttpEmailTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

impl HttpEmailTransport {
    pub fn from_config(cfg: &EmailConfig) -> Result<Self, EmailError> {
        let non_empty = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from);

        let (Some(api_url), Some(api_key), Some(from_address)) = (
            non_empty(&cfg.api_url),
            non_empty(&cfg.api_key),
            non_empty(&cfg.from_address),
        ) else {
            return Err(EmailError::NotConfigured);
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| EmailError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            api_key,
            from_address,
        })
    }

    pub fn payload<'a>(&'a self, request: &'a SendEmailRequest) -> EmailPayload<'a> {
        EmailPayload {
            from: &self.from_address,
            to: &request.to,
            subject: &request.subject,
            html: &request.html,
            reply_to: request.reply_to.as_deref(),
        }
    }
}

#[async_trait]
impl EmailTransport for HttpEmailTransport {
    async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, EmailError> {
        request.validate().map_err(EmailError::InvalidRequest)?;

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ProviderResponse = response
            .json()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        tracing::info!(
            "Email '{}' sent to {} recipient(s)",
            request.subject,
            request.to.len()
        );
        Ok(SendEmailResponse { id: parsed.id })
    }
}

/// Send through the configured provider
pub async fn send(request: &SendEmailRequest) -> Result<SendEmailResponse, EmailError> {
    let transport = HttpEmailTransport::from_config(&config::get().email)?;
    transport.send(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> EmailConfig {
        EmailConfig {
            api_url: Some("https://mail.example.com/emails".into()),
            api_key: Some("key-123".into()),
            from_address: Some("office@example.com".into()),
        }
    }

    fn request() -> SendEmailRequest {
        SendEmailRequest {
            to: vec!["customer@example.com".into()],
            subject: "Visit report".into(),
            html: "<p>Done</p>".into(),
            reply_to: None,
        }
    }

    #[test]
    fn test_missing_config_is_not_configured() {
        let mut cfg = configured();
        cfg.api_key = Some("   ".into());
        assert!(matches!(
            HttpEmailTransport::from_config(&cfg),
            Err(EmailError::NotConfigured)
        ));
        assert!(matches!(
            HttpEmailTransport::from_config(&EmailConfig::default()),
            Err(EmailError::NotConfigured)
        ));
    }

    #[test]
    fn test_payload_uses_configured_sender() {
        let transport = HttpEmailTransport::from_config(&configured()).unwrap();
        let req = request();
        let json = serde_json::to_value(transport.payload(&req)).unwrap();

        assert_eq!(json["from"], "office@example.com");
        assert_eq!(json["to"][0], "customer@example.com");
        assert_eq!(json["subject"], "Visit report");
        assert!(json.get("reply_to").is_none());
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_sending() {
        let transport = HttpEmailTransport::from_config(&configured()).unwrap();
        let mut req = request();
        req.to = vec!["not-an-address".into()];

        let err = transport.send(&req).await.unwrap_err();
        assert!(matches!(err, EmailError::InvalidRequest(_)));
    }
}
