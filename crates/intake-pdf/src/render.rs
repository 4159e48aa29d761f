//! Application-to-PDF rendering
//!
//! Walks the nine wizard steps into sections and rows. Every accessor
//! degrades to "N/A"; an empty application still renders a complete,
//! well-formed document.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;

use crate::application::LifeInsuranceApplication;
use crate::format::{
    format_code, format_field, masked_account_field, ssn_field, CITIZENSHIP_LABELS,
    PAYMENT_FREQUENCY_LABELS, PAYMENT_METHOD_LABELS, PLAN_LABELS, SOURCE_OF_FUNDS_LABELS,
};
use crate::layout::{PageComposer, PdfError};

const TITLE: &str = "LIFE INSURANCE APPLICATION";

/// Render a stored application to PDF bytes.
pub fn render_application(app: &LifeInsuranceApplication) -> Result<Vec<u8>, PdfError> {
    let subtitle = format!(
        "Hartwell Financial Group  |  Prepared {}",
        Utc::now().format("%B %d, %Y")
    );
    let mut c = PageComposer::new(TITLE, &subtitle);

    // Cover block: who this application belongs to.
    c.field("Applicant", app.display_name());
    c.field(
        "Application ID",
        if app.id.is_empty() { "N/A" } else { app.id.as_str() },
    );
    c.field(
        "Assigned Advisor",
        app.advisor_name.as_deref().unwrap_or("N/A"),
    );
    c.spacer(8.0);

    let form = &app.form_data;

    // Step 1 - Insured
    let insured = &form.insured;
    c.section("1. Insured Information");
    c.field("First Name", &format_field(&insured.first_name));
    c.field("Last Name", &format_field(&insured.last_name));
    c.field("Date of Birth", &format_field(&insured.date_of_birth));
    c.field("Gender", &format_field(&insured.gender));
    c.field("Social Security Number", &ssn_field(&insured.ssn));
    c.field("Place of Birth", &format_field(&insured.birth_place));
    c.field(
        "Citizenship Status",
        &format_code(&insured.citizenship_status, CITIZENSHIP_LABELS),
    );
    c.field("Driver's License", &format_field(&insured.drivers_license));
    c.field("License State", &format_field(&insured.license_state));

    // Step 2 - Contact & Employment
    let contact = &form.contact;
    c.section("2. Contact & Employment");
    c.field("Street Address", &format_field(&contact.street_address));
    c.field("City", &format_field(&contact.city));
    c.field("State", &format_field(&contact.state));
    c.field("ZIP Code", &format_field(&contact.zip_code));
    c.field("Phone", &format_field(&contact.phone));
    c.field("Email", &format_field(&contact.email));
    c.field("Employer", &format_field(&contact.employer_name));
    c.field("Occupation", &format_field(&contact.occupation));
    c.field("Years Employed", &format_field(&contact.years_employed));
    c.field("Annual Income", &format_field(&contact.annual_income));
    c.field("Net Worth", &format_field(&contact.net_worth));

    // Step 3 - Ownership
    let ownership = &form.ownership;
    c.section("3. Policy Ownership");
    c.field(
        "Owner is the Insured",
        &format_field(&ownership.owner_is_insured),
    );
    c.field("Owner Name", &format_field(&ownership.owner_name));
    c.field(
        "Relationship to Insured",
        &format_field(&ownership.owner_relationship),
    );
    c.field("Owner SSN", &ssn_field(&ownership.owner_ssn));
    c.field("Owner Address", &format_field(&ownership.owner_address));

    // Step 4 - Beneficiaries
    let beneficiaries = &form.beneficiaries;
    c.section("4. Beneficiaries");
    if beneficiaries.primary.is_empty() && beneficiaries.contingent.is_empty() {
        c.field("Beneficiaries", "N/A");
    }
    for (i, beneficiary) in beneficiaries.primary.iter().enumerate() {
        c.sub_heading(&format!("Primary Beneficiary {}", i + 1));
        c.sub_field("Full Name", &format_field(&beneficiary.full_name));
        c.sub_field("Relationship", &format_field(&beneficiary.relationship));
        c.sub_field("Share %", &format_field(&beneficiary.share_percentage));
        c.sub_field("Designation", &format_field(&beneficiary.designation));
    }
    for (i, beneficiary) in beneficiaries.contingent.iter().enumerate() {
        c.sub_heading(&format!("Contingent Beneficiary {}", i + 1));
        c.sub_field("Full Name", &format_field(&beneficiary.full_name));
        c.sub_field("Relationship", &format_field(&beneficiary.relationship));
        c.sub_field("Share %", &format_field(&beneficiary.share_percentage));
        c.sub_field("Designation", &format_field(&beneficiary.designation));
    }

    // Step 5 - Policy & Riders
    let policy = &form.policy;
    c.section("5. Policy & Riders");
    c.field("Plan", &format_code(&policy.plan_name, PLAN_LABELS));
    c.field("Coverage Amount", &format_field(&policy.coverage_amount));
    c.field("Term Length", &format_field(&policy.term_length));
    c.field("Riders", &format_field(&policy.riders));
    c.field(
        "Payment Frequency",
        &format_code(&policy.payment_frequency, PAYMENT_FREQUENCY_LABELS),
    );

    // Step 6 - Existing Coverage
    let existing = &form.existing_coverage;
    c.section("6. Existing Coverage");
    c.field(
        "Has Existing Coverage",
        &format_field(&existing.has_existing_coverage),
    );
    for (i, policy) in existing.policies.iter().enumerate() {
        c.sub_heading(&format!("Existing Policy {}", i + 1));
        c.sub_field("Company", &format_field(&policy.company_name));
        c.sub_field("Policy Number", &format_field(&policy.policy_number));
        c.sub_field(
            "Amount of Coverage",
            &format_field(&policy.amount_of_coverage),
        );
        c.sub_field(
            "Being Replaced",
            &format_field(&policy.is_being_replaced),
        );
    }

    // Step 7 - Medical & Lifestyle
    let medical = &form.medical;
    c.section("7. Medical & Lifestyle");
    c.field("Height", &format_field(&medical.height));
    c.field("Weight", &format_field(&medical.weight));
    c.field("Tobacco Use", &format_field(&medical.tobacco_use));
    c.field(
        "Tobacco Last Used",
        &format_field(&medical.tobacco_last_used),
    );
    c.field("Alcohol Use", &format_field(&medical.alcohol_use));
    c.field(
        "Hazardous Activities",
        &format_field(&medical.hazardous_activities),
    );
    c.field(
        "Medical Conditions",
        &format_field(&medical.medical_conditions),
    );
    c.field("Medications", &format_field(&medical.medications));
    c.field(
        "Primary Physician",
        &format_field(&medical.primary_physician),
    );

    // Step 8 - Payment
    let payment = &form.payment;
    c.section("8. Premium Payment");
    c.field(
        "Payment Method",
        &format_code(&payment.payment_method, PAYMENT_METHOD_LABELS),
    );
    c.field(
        "Payment Frequency",
        &format_code(&payment.payment_frequency, PAYMENT_FREQUENCY_LABELS),
    );
    c.field(
        "Source of Funds",
        &format_code(&payment.source_of_funds, SOURCE_OF_FUNDS_LABELS),
    );
    c.field("Bank Name", &format_field(&payment.bank_name));
    c.field(
        "Account Holder",
        &format_field(&payment.account_holder_name),
    );
    c.field(
        "Routing Number",
        &masked_account_field(&payment.routing_number),
    );
    c.field(
        "Account Number",
        &masked_account_field(&payment.account_number),
    );

    // Step 9 - Signature
    let signature = &form.signature;
    c.section("9. Attestation & Signature");
    c.field("Signature", &format_field(&signature.signature_name));
    c.field("Signed City", &format_field(&signature.signed_city));
    c.field("Signed State", &format_field(&signature.signed_state));
    c.field("Date Signed", &format_field(&signature.signed_date));
    c.field(
        "Agreed to Terms",
        &format_field(&signature.agreed_to_terms),
    );

    let mut doc = c.finish()?;
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Render to base64 for an email attachment.
pub fn render_application_base64(
    app: &LifeInsuranceApplication,
) -> Result<String, PdfError> {
    let bytes = render_application(app)?;
    Ok(BASE64.encode(bytes))
}
