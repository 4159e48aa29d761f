//! Resend API client
//!
//! Direct HTTP POST to `https://api.resend.com/emails`. Error responses map
//! to user-facing messages by status class; the caller decides whether a
//! failure is fatal (internal alert) or logged-only (prospect confirmation).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{Attachment, DispatchError, OutboundEmail, SendReceipt};
use crate::DispatchConfig;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Resend request payload.
#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ResendAttachment<'a>>,
    headers: ResendHeaders,
}

#[derive(Debug, Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    content: &'a str,
    content_type: &'a str,
}

/// Outbound tracking headers stamped on every message.
#[derive(Debug, Serialize)]
struct ResendHeaders {
    #[serde(rename = "X-Entity-Ref-ID")]
    entity_ref_id: String,
}

#[derive(Debug, Deserialize)]
struct ResendSuccessResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Transactional mailer backed by the Resend API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    http: reqwest::Client,
    config: DispatchConfig,
}

impl ResendMailer {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Default "from" address for messages built by the template layer.
    pub fn from_address(&self) -> &str {
        &self.config.from_address
    }

    /// Internal leads inbox.
    pub fn leads_inbox(&self) -> &str {
        &self.config.leads_inbox
    }

    /// Send one email. Validates first; a provider rejection surfaces as
    /// [`DispatchError::Api`] with a user-facing message.
    pub async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, DispatchError> {
        email.validate()?;

        let attachments: Vec<ResendAttachment<'_>> = email
            .attachments
            .iter()
            .map(|a: &Attachment| ResendAttachment {
                filename: &a.filename,
                content: &a.content,
                content_type: &a.content_type,
            })
            .collect();

        let payload = ResendPayload {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            text: email.text.as_deref(),
            reply_to: email.reply_to.as_deref(),
            attachments,
            headers: ResendHeaders {
                entity_ref_id: uuid::Uuid::new_v4().to_string(),
            },
        };

        debug!(to = ?email.to, subject = %email.subject, "sending email via Resend");

        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let success: ResendSuccessResponse = response.json().await?;
            debug!(id = %success.id, "email accepted by Resend");
            return Ok(SendReceipt { id: success.id });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Resend rejected email");

        let provider_message = serde_json::from_str::<ResendErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message.or(e.name))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        let message = match status.as_u16() {
            401 => "Email service authentication failed.".to_string(),
            403 => "Email service access denied.".to_string(),
            422 => format!("Invalid email request: {provider_message}"),
            429 => "Email rate limit exceeded. Please try again later.".to_string(),
            500..=599 => "Email service temporarily unavailable.".to_string(),
            _ => provider_message,
        };

        Err(DispatchError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_omits_empty_optionals() {
        let payload = ResendPayload {
            from: "notifications@hartwellfinancial.com",
            to: &["leads@hartwellfinancial.com".to_string()],
            subject: "Test",
            html: "<p>Hello</p>",
            text: None,
            reply_to: None,
            attachments: vec![],
            headers: ResendHeaders {
                entity_ref_id: "ref-1".to_string(),
            },
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("leads@hartwellfinancial.com"));
        assert!(!json.contains("\"text\""));
        assert!(!json.contains("\"reply_to\""));
        assert!(!json.contains("\"attachments\""));
        assert!(json.contains("X-Entity-Ref-ID"));
    }

    #[test]
    fn payload_includes_attachments_when_present() {
        let payload = ResendPayload {
            from: "notifications@hartwellfinancial.com",
            to: &["advisor@hartwellfinancial.com".to_string()],
            subject: "Application PDF",
            html: "<p>Attached</p>",
            text: Some("Attached"),
            reply_to: None,
            attachments: vec![ResendAttachment {
                filename: "application.pdf",
                content: "QUJD",
                content_type: "application/pdf",
            }],
            headers: ResendHeaders {
                entity_ref_id: "ref-2".to_string(),
            },
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"attachments\""));
        assert!(json.contains("application.pdf"));
        assert!(json.contains("\"content_type\":\"application/pdf\""));
    }

    #[test]
    fn error_response_parses() {
        let error: ResendErrorResponse = serde_json::from_str(
            r#"{"statusCode":422,"message":"Invalid email address","name":"validation_error"}"#,
        )
        .unwrap();
        assert_eq!(error.message.as_deref(), Some("Invalid email address"));
        assert_eq!(error.name.as_deref(), Some("validation_error"));
    }

    #[tokio::test]
    async fn invalid_email_fails_before_any_network_call() {
        let mailer = ResendMailer::new(DispatchConfig {
            api_key: "re_test".to_string(),
            from_address: "bad-from".to_string(),
            leads_inbox: "leads@hartwellfinancial.com".to_string(),
        });
        let email = OutboundEmail::new("bad-from", "to@example.com", "S", "<p>x</p>");

        let result = mailer.send(&email).await;
        assert!(matches!(result, Err(DispatchError::InvalidAddress(_))));
    }
}
