//! Outbound email types and validation

use serde::{Deserialize, Serialize};

/// An email ready for the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEmail {
    /// Sender address, `Name <addr>` form accepted
    pub from: String,

    /// Recipient addresses
    pub to: Vec<String>,

    /// Reply-to address (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub html: String,

    /// Plain text alternative (improves deliverability)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Attachments (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl OutboundEmail {
    /// Create a simple HTML email.
    pub fn new(from: &str, to: &str, subject: &str, html: &str) -> Self {
        Self {
            from: from.to_string(),
            to: vec![to.to_string()],
            reply_to: None,
            subject: subject.to_string(),
            html: html.to_string(),
            text: None,
            attachments: vec![],
        }
    }

    /// Add a plain text alternative.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Add recipients beyond the first.
    pub fn with_recipients(mut self, extra: &[String]) -> Self {
        self.to.extend(extra.iter().cloned());
        self
    }

    /// Attach a document.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Validate the message before handing it to the transport.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.from.is_empty() {
            return Err(DispatchError::MissingField("from"));
        }
        if !is_valid_address(&self.from) {
            return Err(DispatchError::InvalidAddress(self.from.clone()));
        }

        if self.to.is_empty() {
            return Err(DispatchError::MissingField("to"));
        }
        for addr in &self.to {
            if !is_valid_address(addr) {
                return Err(DispatchError::InvalidAddress(addr.clone()));
            }
        }

        if self.subject.is_empty() {
            return Err(DispatchError::MissingField("subject"));
        }
        if self.html.is_empty() {
            return Err(DispatchError::MissingField("html"));
        }

        Ok(())
    }
}

/// Email attachment; content is base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
    #[serde(default = "default_mime_type")]
    pub content_type: String,
}

impl Attachment {
    pub fn pdf(filename: &str, base64_content: String) -> Self {
        Self {
            filename: filename.to_string(),
            content: base64_content,
            content_type: "application/pdf".to_string(),
        }
    }
}

fn default_mime_type() -> String {
    "application/octet-stream".to_string()
}

/// Provider acknowledgement for a sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Message id assigned by the provider
    pub id: String,
}

/// Errors from validation or the transport.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("email service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

/// Check an address, accepting the `Name <addr@domain>` display form.
pub fn is_valid_address(address: &str) -> bool {
    let bare = match (address.find('<'), address.rfind('>')) {
        (Some(start), Some(end)) if start < end => &address[start + 1..end],
        _ => address,
    };
    email_address::EmailAddress::is_valid(bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_email_validates() {
        let email = OutboundEmail::new(
            "notifications@hartwellfinancial.com",
            "leads@hartwellfinancial.com",
            "New Contact Inquiry from Jane Doe",
            "<p>Hello</p>",
        );
        assert!(email.validate().is_ok());
    }

    #[test]
    fn display_name_form_accepted() {
        let email = OutboundEmail::new(
            "Hartwell Financial <notifications@hartwellfinancial.com>",
            "Jane Doe <jane@example.com>",
            "Subject",
            "<p>Hi</p>",
        );
        assert!(email.validate().is_ok());
    }

    #[test]
    fn empty_recipients_rejected() {
        let mut email =
            OutboundEmail::new("from@example.com", "to@example.com", "S", "<p>x</p>");
        email.to.clear();
        assert!(matches!(
            email.validate(),
            Err(DispatchError::MissingField("to"))
        ));
    }

    #[test]
    fn invalid_recipient_rejected() {
        let email = OutboundEmail::new("from@example.com", "not-an-email", "S", "<p>x</p>");
        assert!(matches!(
            email.validate(),
            Err(DispatchError::InvalidAddress(_))
        ));
    }

    #[test]
    fn missing_subject_rejected() {
        let email = OutboundEmail::new("from@example.com", "to@example.com", "", "<p>x</p>");
        assert!(matches!(
            email.validate(),
            Err(DispatchError::MissingField("subject"))
        ));
    }

    #[test]
    fn pdf_attachment_sets_mime_type() {
        let attachment = Attachment::pdf("application.pdf", "QUJD".to_string());
        assert_eq!(attachment.content_type, "application/pdf");
        assert_eq!(attachment.filename, "application.pdf");
    }

    #[test]
    fn recipients_builder_appends() {
        let email = OutboundEmail::new("from@example.com", "a@example.com", "S", "<p>x</p>")
            .with_recipients(&["b@example.com".to_string(), "c@example.com".to_string()]);
        assert_eq!(email.to.len(), 3);
    }
}
