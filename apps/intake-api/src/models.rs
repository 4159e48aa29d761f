//! API request/response models
//!
//! The marketing site speaks camelCase JSON; every wire struct renames
//! accordingly. The notification request itself lives in `intake-core`
//! (`NotificationRequest`), since validation is domain logic.

use serde::{Deserialize, Serialize};

/// Body of a successful notification response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSuccess {
    pub success: bool,
    pub data: NotificationData,
    /// Absent when the best-effort store write failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
}

/// Dispatch detail returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub form_type: String,
    /// Provider message id of the internal alert
    pub email_id: String,
    pub confirmation_sent: bool,
}

/// Request body for the PDF resend operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendPdfRequest {
    #[serde(default)]
    pub application_id: Option<String>,
}

/// Per-recipient outcome of a PDF dispatch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientResult {
    /// `"advisor"` or `"leads"`
    pub recipient: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for the PDF resend operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendPdfResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<RecipientResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notification_success_serializes_camel_case() {
        let body = NotificationSuccess {
            success: true,
            data: NotificationData {
                form_type: "contact-inquiry".to_string(),
                email_id: "msg-1".to_string(),
                confirmation_sent: true,
            },
            submission_id: Some("sub-1".to_string()),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["submissionId"], json!("sub-1"));
        assert_eq!(value["data"]["formType"], json!("contact-inquiry"));
        assert_eq!(value["data"]["confirmationSent"], json!(true));
    }

    #[test]
    fn missing_submission_id_is_omitted() {
        let body = NotificationSuccess {
            success: true,
            data: NotificationData {
                form_type: "final-expense".to_string(),
                email_id: "msg-2".to_string(),
                confirmation_sent: false,
            },
            submission_id: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("submissionId"));
    }

    #[test]
    fn resend_request_accepts_missing_id() {
        let req: ResendPdfRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.application_id.is_none());

        let req: ResendPdfRequest =
            serde_json::from_value(json!({"applicationId": "app-1"})).unwrap();
        assert_eq!(req.application_id.as_deref(), Some("app-1"));
    }

    #[test]
    fn recipient_result_omits_error_on_success() {
        let result = RecipientResult {
            recipient: "advisor",
            success: true,
            error: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("error"));
    }
}
