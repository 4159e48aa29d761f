//! Stored life-insurance application model
//!
//! The intake wizard saves nine sequential steps as one JSON document.
//! Every step, and every field within a step, is independently optional:
//! applicants abandon and resume, and older records predate newer fields.
//! Renderers never fail on absence; they degrade to "N/A".

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw form value. Kept as JSON because the wizard posts heterogeneous
/// types (strings, numbers, booleans, arrays) per field.
pub type Field = Option<Value>;

/// An application record as fetched from storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifeInsuranceApplication {
    pub id: String,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_phone: Option<String>,
    pub advisor_id: Option<String>,
    pub advisor_name: Option<String>,
    pub advisor_email: Option<String>,
    pub form_data: ApplicationForm,
}

impl LifeInsuranceApplication {
    /// Display name for subjects and the PDF cover line.
    pub fn display_name(&self) -> &str {
        self.applicant_name.as_deref().unwrap_or("Unknown Applicant")
    }
}

/// The nine wizard steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub insured: InsuredStep,
    pub contact: ContactStep,
    pub ownership: OwnershipStep,
    pub beneficiaries: BeneficiariesStep,
    pub policy: PolicyStep,
    pub existing_coverage: ExistingCoverageStep,
    pub medical: MedicalStep,
    pub payment: PaymentStep,
    pub signature: SignatureStep,
}

/// Step 1: who is being insured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuredStep {
    pub first_name: Field,
    pub last_name: Field,
    pub date_of_birth: Field,
    pub gender: Field,
    pub ssn: Field,
    pub birth_place: Field,
    pub citizenship_status: Field,
    pub drivers_license: Field,
    pub license_state: Field,
}

/// Step 2: contact and employment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactStep {
    pub street_address: Field,
    pub city: Field,
    pub state: Field,
    pub zip_code: Field,
    pub phone: Field,
    pub email: Field,
    pub employer_name: Field,
    pub occupation: Field,
    pub years_employed: Field,
    pub annual_income: Field,
    pub net_worth: Field,
}

/// Step 3: policy ownership when the owner is not the insured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnershipStep {
    pub owner_is_insured: Field,
    pub owner_name: Field,
    pub owner_relationship: Field,
    pub owner_ssn: Field,
    pub owner_address: Field,
}

/// Step 4: beneficiary designations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeneficiariesStep {
    pub primary: Vec<Beneficiary>,
    pub contingent: Vec<Beneficiary>,
}

/// One beneficiary entry, rendered in storage order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Beneficiary {
    pub full_name: Field,
    pub relationship: Field,
    pub share_percentage: Field,
    pub designation: Field,
}

/// Step 5: requested policy and riders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyStep {
    pub plan_name: Field,
    pub coverage_amount: Field,
    pub term_length: Field,
    pub riders: Field,
    pub payment_frequency: Field,
}

/// Step 6: coverage already in force.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExistingCoverageStep {
    pub has_existing_coverage: Field,
    pub policies: Vec<ExistingPolicy>,
}

/// One in-force policy entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExistingPolicy {
    pub company_name: Field,
    pub policy_number: Field,
    pub amount_of_coverage: Field,
    pub is_being_replaced: Field,
}

/// Step 7: medical and lifestyle disclosures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalStep {
    pub height: Field,
    pub weight: Field,
    pub tobacco_use: Field,
    pub tobacco_last_used: Field,
    pub alcohol_use: Field,
    pub hazardous_activities: Field,
    pub medical_conditions: Field,
    pub medications: Field,
    pub primary_physician: Field,
}

/// Step 8: premium payment details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentStep {
    pub payment_method: Field,
    pub payment_frequency: Field,
    pub source_of_funds: Field,
    pub bank_name: Field,
    pub account_holder_name: Field,
    pub routing_number: Field,
    pub account_number: Field,
}

/// Step 9: attestation and signature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureStep {
    pub signature_name: Field,
    pub signed_city: Field,
    pub signed_state: Field,
    pub signed_date: Field,
    pub agreed_to_terms: Field,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_form_data_deserializes_to_defaults() {
        let form: ApplicationForm = serde_json::from_value(json!({})).unwrap();
        assert!(form.insured.first_name.is_none());
        assert!(form.beneficiaries.primary.is_empty());
        assert!(form.existing_coverage.policies.is_empty());
    }

    #[test]
    fn partial_steps_deserialize() {
        let form: ApplicationForm = serde_json::from_value(json!({
            "insured": {"firstName": "Jane", "ssn": "123-45-6789"},
            "policy": {"coverageAmount": 500000},
            "beneficiaries": {
                "primary": [
                    {"fullName": "John Doe", "relationship": "Spouse", "sharePercentage": 100}
                ]
            }
        }))
        .unwrap();

        assert_eq!(form.insured.first_name, Some(json!("Jane")));
        assert_eq!(form.policy.coverage_amount, Some(json!(500000)));
        assert_eq!(form.beneficiaries.primary.len(), 1);
        assert_eq!(
            form.beneficiaries.primary[0].full_name,
            Some(json!("John Doe"))
        );
        // Untouched steps stay at defaults.
        assert!(form.payment.account_number.is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let form: ApplicationForm = serde_json::from_value(json!({
            "insured": {"firstName": "Jane", "legacyField": true},
            "futureStep": {"x": 1}
        }))
        .unwrap();
        assert_eq!(form.insured.first_name, Some(json!("Jane")));
    }

    #[test]
    fn application_record_round_trips() {
        let app = LifeInsuranceApplication {
            id: "app-1".to_string(),
            applicant_name: Some("Jane Doe".to_string()),
            applicant_email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&app).unwrap();
        let back: LifeInsuranceApplication = serde_json::from_str(&json).unwrap();
        assert_eq!(back.display_name(), "Jane Doe");
    }

    #[test]
    fn missing_name_displays_placeholder() {
        let app = LifeInsuranceApplication::default();
        assert_eq!(app.display_name(), "Unknown Applicant");
    }
}
