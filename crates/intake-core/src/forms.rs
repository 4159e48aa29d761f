//! Allow-listed form types and submission validation
//!
//! Every lead-capture form on the marketing site posts one of a closed set
//! of form types. Parsing the incoming string into [`FormType`] up front
//! means "unknown form type" is unrepresentable downstream: the dispatcher
//! and store only ever see validated submissions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Longest accepted recipient email, per the public API contract.
pub const MAX_EMAIL_LEN: usize = 255;

/// Cap on CC'd internal recipients per submission.
pub const MAX_ADDITIONAL_RECIPIENTS: usize = 5;

/// The allow-listed lead-capture form types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    ContactInquiry,
    BusinessInsurance,
    AgentApplication,
    FranchiseApplication,
    AdvisorOnboarding,
    LifeInsuranceConsultation,
    MedicareConsultation,
    RetirementConsultation,
    AnnuityConsultation,
    TaxPlanningConsultation,
    EstatePlanningConsultation,
    HealthInsuranceQuote,
    GroupBenefitsQuote,
    MortgageProtection,
    FinalExpense,
    CollegePlanning,
    DebtSolutions,
    NewsletterSignup,
    EventRegistration,
    PartnerInquiry,
}

impl FormType {
    /// All allow-listed values, in wire order.
    pub const ALL: [FormType; 20] = [
        FormType::ContactInquiry,
        FormType::BusinessInsurance,
        FormType::AgentApplication,
        FormType::FranchiseApplication,
        FormType::AdvisorOnboarding,
        FormType::LifeInsuranceConsultation,
        FormType::MedicareConsultation,
        FormType::RetirementConsultation,
        FormType::AnnuityConsultation,
        FormType::TaxPlanningConsultation,
        FormType::EstatePlanningConsultation,
        FormType::HealthInsuranceQuote,
        FormType::GroupBenefitsQuote,
        FormType::MortgageProtection,
        FormType::FinalExpense,
        FormType::CollegePlanning,
        FormType::DebtSolutions,
        FormType::NewsletterSignup,
        FormType::EventRegistration,
        FormType::PartnerInquiry,
    ];

    /// Wire name (kebab-case), as posted by the site.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::ContactInquiry => "contact-inquiry",
            FormType::BusinessInsurance => "business-insurance",
            FormType::AgentApplication => "agent-application",
            FormType::FranchiseApplication => "franchise-application",
            FormType::AdvisorOnboarding => "advisor-onboarding",
            FormType::LifeInsuranceConsultation => "life-insurance-consultation",
            FormType::MedicareConsultation => "medicare-consultation",
            FormType::RetirementConsultation => "retirement-consultation",
            FormType::AnnuityConsultation => "annuity-consultation",
            FormType::TaxPlanningConsultation => "tax-planning-consultation",
            FormType::EstatePlanningConsultation => "estate-planning-consultation",
            FormType::HealthInsuranceQuote => "health-insurance-quote",
            FormType::GroupBenefitsQuote => "group-benefits-quote",
            FormType::MortgageProtection => "mortgage-protection",
            FormType::FinalExpense => "final-expense",
            FormType::CollegePlanning => "college-planning",
            FormType::DebtSolutions => "debt-solutions",
            FormType::NewsletterSignup => "newsletter-signup",
            FormType::EventRegistration => "event-registration",
            FormType::PartnerInquiry => "partner-inquiry",
        }
    }

    /// Subject line for the internal lead alert, interpolating the
    /// submitter's display name.
    pub fn alert_subject(&self, display_name: &str) -> String {
        match self {
            FormType::ContactInquiry => format!("New Contact Inquiry from {display_name}"),
            FormType::BusinessInsurance => {
                format!("New Business Insurance Request from {display_name}")
            }
            FormType::AgentApplication => format!("New Agent Application: {display_name}"),
            FormType::FranchiseApplication => {
                format!("New Franchise Application: {display_name}")
            }
            FormType::AdvisorOnboarding => {
                format!("Advisor Onboarding Submission: {display_name}")
            }
            FormType::LifeInsuranceConsultation => {
                format!("Life Insurance Consultation Request from {display_name}")
            }
            FormType::MedicareConsultation => {
                format!("Medicare Consultation Request from {display_name}")
            }
            FormType::RetirementConsultation => {
                format!("Retirement Planning Consultation Request from {display_name}")
            }
            FormType::AnnuityConsultation => {
                format!("Annuity Consultation Request from {display_name}")
            }
            FormType::TaxPlanningConsultation => {
                format!("Tax Planning Consultation Request from {display_name}")
            }
            FormType::EstatePlanningConsultation => {
                format!("Estate Planning Consultation Request from {display_name}")
            }
            FormType::HealthInsuranceQuote => {
                format!("Health Insurance Quote Request from {display_name}")
            }
            FormType::GroupBenefitsQuote => {
                format!("Group Benefits Quote Request from {display_name}")
            }
            FormType::MortgageProtection => {
                format!("Mortgage Protection Inquiry from {display_name}")
            }
            FormType::FinalExpense => format!("Final Expense Inquiry from {display_name}"),
            FormType::CollegePlanning => {
                format!("College Planning Inquiry from {display_name}")
            }
            FormType::DebtSolutions => format!("Debt Solutions Inquiry from {display_name}"),
            FormType::NewsletterSignup => format!("Newsletter Signup: {display_name}"),
            FormType::EventRegistration => format!("Event Registration: {display_name}"),
            FormType::PartnerInquiry => format!("New Partner Inquiry from {display_name}"),
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = UnknownFormType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownFormType(s.to_string()))
    }
}

/// A form-type string outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form type: {0}")]
pub struct UnknownFormType(pub String);

/// Raw notification request as posted by the site.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub form_type: String,
    #[serde(default)]
    pub form_data: Map<String, Value>,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub additional_recipients: Option<Vec<String>>,
}

/// Per-field validation failures, keyed by the wire field name.
pub type ValidationErrors = BTreeMap<&'static str, Vec<String>>;

/// A structurally valid submission; the only shape the store and
/// dispatcher accept.
#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub form_type: FormType,
    pub form_data: Map<String, Value>,
    pub recipient_email: Option<String>,
    pub additional_recipients: Vec<String>,
}

impl NotificationRequest {
    /// Validate structure and allow-listing, producing either the typed
    /// submission or a per-field error report.
    pub fn validate(self) -> Result<ValidSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let form_type = match self.form_type.parse::<FormType>() {
            Ok(t) => Some(t),
            Err(e) => {
                errors.entry("formType").or_default().push(e.to_string());
                None
            }
        };

        if let Some(email) = self.recipient_email.as_deref() {
            if email.len() > MAX_EMAIL_LEN {
                errors
                    .entry("recipientEmail")
                    .or_default()
                    .push(format!("must be at most {MAX_EMAIL_LEN} characters"));
            }
            if !is_valid_email(email) {
                errors
                    .entry("recipientEmail")
                    .or_default()
                    .push(format!("invalid email address: {email}"));
            }
        }

        let additional = self.additional_recipients.unwrap_or_default();
        if additional.len() > MAX_ADDITIONAL_RECIPIENTS {
            errors
                .entry("additionalRecipients")
                .or_default()
                .push(format!("at most {MAX_ADDITIONAL_RECIPIENTS} recipients allowed"));
        }
        for email in &additional {
            if !is_valid_email(email) {
                errors
                    .entry("additionalRecipients")
                    .or_default()
                    .push(format!("invalid email address: {email}"));
            }
        }

        match form_type {
            Some(form_type) if errors.is_empty() => Ok(ValidSubmission {
                form_type,
                form_data: self.form_data,
                recipient_email: self.recipient_email,
                additional_recipients: additional,
            }),
            _ => Err(errors),
        }
    }
}

/// RFC-level email check.
pub fn is_valid_email(email: &str) -> bool {
    email_address::EmailAddress::is_valid(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(form_type: &str) -> NotificationRequest {
        NotificationRequest {
            form_type: form_type.to_string(),
            form_data: Map::new(),
            recipient_email: None,
            additional_recipients: None,
        }
    }

    #[test]
    fn every_wire_name_round_trips() {
        for t in FormType::ALL {
            assert_eq!(t.as_str().parse::<FormType>().unwrap(), t);
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&FormType::LifeInsuranceConsultation).unwrap();
        assert_eq!(json, "\"life-insurance-consultation\"");
        let back: FormType = serde_json::from_str("\"contact-inquiry\"").unwrap();
        assert_eq!(back, FormType::ContactInquiry);
    }

    #[test]
    fn unknown_form_type_is_rejected() {
        let errors = request("totally-made-up").validate().unwrap_err();
        assert!(errors.contains_key("formType"));
    }

    #[test]
    fn valid_request_produces_typed_submission() {
        let mut req = request("contact-inquiry");
        req.form_data = json!({"name": "Jane Doe"}).as_object().unwrap().clone();
        req.recipient_email = Some("leads@hartwellfinancial.com".to_string());

        let valid = req.validate().unwrap();
        assert_eq!(valid.form_type, FormType::ContactInquiry);
        assert_eq!(
            valid.recipient_email.as_deref(),
            Some("leads@hartwellfinancial.com")
        );
        assert!(valid.additional_recipients.is_empty());
    }

    #[test]
    fn malformed_recipient_email_is_rejected() {
        let mut req = request("contact-inquiry");
        req.recipient_email = Some("not-an-email".to_string());
        let errors = req.validate().unwrap_err();
        assert!(errors.contains_key("recipientEmail"));
    }

    #[test]
    fn overlong_recipient_email_is_rejected() {
        let mut req = request("contact-inquiry");
        req.recipient_email = Some(format!("{}@example.com", "a".repeat(260)));
        let errors = req.validate().unwrap_err();
        assert!(errors["recipientEmail"]
            .iter()
            .any(|m| m.contains("255 characters")));
    }

    #[test]
    fn too_many_additional_recipients_rejected() {
        let mut req = request("contact-inquiry");
        req.additional_recipients = Some(
            (0..6).map(|i| format!("agent{i}@hartwellfinancial.com")).collect(),
        );
        let errors = req.validate().unwrap_err();
        assert!(errors.contains_key("additionalRecipients"));
    }

    #[test]
    fn invalid_additional_recipient_rejected() {
        let mut req = request("contact-inquiry");
        req.additional_recipients =
            Some(vec!["good@hartwellfinancial.com".into(), "bad@@".into()]);
        let errors = req.validate().unwrap_err();
        assert!(errors.contains_key("additionalRecipients"));
    }

    #[test]
    fn errors_accumulate_across_fields() {
        let mut req = request("nope");
        req.recipient_email = Some("broken".to_string());
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn alert_subject_interpolates_name() {
        let subject = FormType::ContactInquiry.alert_subject("Jane Doe");
        assert!(subject.contains("Jane Doe"));

        let subject = FormType::MedicareConsultation.alert_subject("Unknown");
        assert!(subject.contains("Medicare"));
        assert!(subject.contains("Unknown"));
    }

    #[test]
    fn camel_case_wire_fields_deserialize() {
        let req: NotificationRequest = serde_json::from_value(json!({
            "formType": "final-expense",
            "formData": {"firstName": "Sam"},
            "recipientEmail": "leads@hartwellfinancial.com",
            "additionalRecipients": ["ops@hartwellfinancial.com"]
        }))
        .unwrap();
        assert_eq!(req.form_type, "final-expense");
        assert_eq!(req.form_data["firstName"], json!("Sam"));
        assert_eq!(req.additional_recipients.unwrap().len(), 1);
    }
}
