use serde::{Deserialize, Serialize};

/// Email forwarded to the transactional email provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub reply_to: Option<String>,
}

impl SendEmailRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.to.is_empty() {
            return Err("At least one recipient is required".into());
        }
        if let Some(bad) = self.to.iter().find(|addr| !addr.contains('@')) {
            return Err(format!("Invalid recipient: {}", bad));
        }
        if self.subject.trim().is_empty() {
            return Err("Subject cannot be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailResponse {
    /// Provider message id
    pub id: Option<String>,
}
