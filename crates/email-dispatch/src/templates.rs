//! HTML email rendering
//!
//! Three message families: the internal lead alert (a table of everything
//! the prospect submitted), the prospect confirmation (static per-form-type
//! copy with a generic fallback), and the application-PDF delivery note.
//! All caller-supplied text is HTML-escaped before interpolation.

use serde_json::{Map, Value};

use intake_core::submission::ContactFields;
use intake_core::text::{escape_html, humanize_key, value_to_display};
use intake_core::FormType;

use crate::types::{Attachment, OutboundEmail};

/// Static copy for a prospect confirmation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationTemplate {
    pub subject: &'static str,
    pub body_intro: &'static str,
    pub next_steps: &'static [&'static str],
    pub sign_off: &'static str,
}

/// Fallback copy for confirmation-eligible form types without bespoke
/// templates. Upstream allow-listing means nothing else reaches it.
pub static GENERIC_CONFIRMATION: ConfirmationTemplate = ConfirmationTemplate {
    subject: "We received your request",
    body_intro: "Thank you for reaching out to Hartwell Financial Group. \
                 Your request has been received and routed to our team.",
    next_steps: &[
        "A licensed advisor will review your request.",
        "You will hear from us within one business day.",
        "Have any statements or policy documents handy for your first call.",
    ],
    sign_off: "The Hartwell Financial Team",
};

static CONTACT_INQUIRY: ConfirmationTemplate = ConfirmationTemplate {
    subject: "Thanks for contacting Hartwell Financial",
    body_intro: "Thank you for getting in touch. Your message has been \
                 delivered to our advisory team.",
    next_steps: &[
        "An advisor will review your message today.",
        "Expect a reply within one business day.",
    ],
    sign_off: "The Hartwell Financial Team",
};

static LIFE_INSURANCE: ConfirmationTemplate = ConfirmationTemplate {
    subject: "Your life insurance consultation request",
    body_intro: "Thank you for requesting a life insurance consultation. \
                 We help families protect what matters most, and we're glad \
                 you took this step.",
    next_steps: &[
        "A licensed life insurance advisor will call you to schedule your consultation.",
        "Gather any existing policy statements before the call.",
        "Your consultation is free and carries no obligation.",
    ],
    sign_off: "The Hartwell Life Insurance Team",
};

static MEDICARE: ConfirmationTemplate = ConfirmationTemplate {
    subject: "Your Medicare consultation request",
    body_intro: "Thank you for requesting a Medicare consultation. Plan \
                 selection is time-sensitive, so we prioritize these requests.",
    next_steps: &[
        "A Medicare specialist will contact you to confirm your enrollment window.",
        "Have your red, white, and blue Medicare card available.",
        "We will compare plans available in your county at no cost to you.",
    ],
    sign_off: "The Hartwell Medicare Team",
};

static RETIREMENT: ConfirmationTemplate = ConfirmationTemplate {
    subject: "Your retirement planning consultation request",
    body_intro: "Thank you for requesting a retirement planning consultation. \
                 A clear income plan is the foundation of a confident retirement.",
    next_steps: &[
        "A retirement planner will reach out to schedule your review.",
        "Recent 401(k) or IRA statements will make the conversation concrete.",
        "We will model your projected retirement income together.",
    ],
    sign_off: "The Hartwell Retirement Team",
};

static ANNUITY: ConfirmationTemplate = ConfirmationTemplate {
    subject: "Your annuity consultation request",
    body_intro: "Thank you for your interest in guaranteed retirement income. \
                 An annuity specialist has received your request.",
    next_steps: &[
        "A specialist will call to understand your income goals.",
        "We will walk through how each annuity type fits your timeline.",
    ],
    sign_off: "The Hartwell Annuity Team",
};

static TAX_PLANNING: ConfirmationTemplate = ConfirmationTemplate {
    subject: "Your tax planning consultation request",
    body_intro: "Thank you for requesting a tax planning consultation. \
                 Proactive planning beats April surprises.",
    next_steps: &[
        "A tax planning advisor will contact you to schedule your session.",
        "Last year's return is the most useful document to have ready.",
    ],
    sign_off: "The Hartwell Tax Planning Team",
};

static ESTATE_PLANNING: ConfirmationTemplate = ConfirmationTemplate {
    subject: "Your estate planning consultation request",
    body_intro: "Thank you for requesting an estate planning consultation. \
                 Protecting your legacy starts with a conversation.",
    next_steps: &[
        "An estate planning advisor will reach out to schedule your consultation.",
        "A list of your major assets and beneficiaries will help us prepare.",
    ],
    sign_off: "The Hartwell Estate Planning Team",
};

/// Whether a form type participates in prospect confirmations at all.
/// Internal and partner-facing forms never confirm.
pub fn sends_confirmation(form_type: FormType) -> bool {
    matches!(
        form_type,
        FormType::ContactInquiry
            | FormType::LifeInsuranceConsultation
            | FormType::MedicareConsultation
            | FormType::RetirementConsultation
            | FormType::AnnuityConsultation
            | FormType::TaxPlanningConsultation
            | FormType::EstatePlanningConsultation
            | FormType::MortgageProtection
            | FormType::FinalExpense
            | FormType::CollegePlanning
    )
}

/// Confirmation copy for a form type; types without bespoke copy get the
/// generic template.
pub fn confirmation_template(form_type: FormType) -> &'static ConfirmationTemplate {
    match form_type {
        FormType::ContactInquiry => &CONTACT_INQUIRY,
        FormType::LifeInsuranceConsultation => &LIFE_INSURANCE,
        FormType::MedicareConsultation => &MEDICARE,
        FormType::RetirementConsultation => &RETIREMENT,
        FormType::AnnuityConsultation => &ANNUITY,
        FormType::TaxPlanningConsultation => &TAX_PLANNING,
        FormType::EstatePlanningConsultation => &ESTATE_PLANNING,
        _ => &GENERIC_CONFIRMATION,
    }
}

/// Build the internal lead-alert email: subject per form type, body a table
/// of every non-empty form-data entry.
pub fn lead_alert(
    form_type: FormType,
    contact: &ContactFields,
    form_data: &Map<String, Value>,
    from: &str,
    recipients: Vec<String>,
) -> OutboundEmail {
    let subject = form_type.alert_subject(contact.display_name());

    let mut rows = String::new();
    for (key, value) in form_data {
        let display = value_to_display(value);
        if display.is_empty() {
            continue;
        }
        rows.push_str(&format!(
            r#"    <tr>
      <td style="padding: 8px 12px; border-bottom: 1px solid #e5e7eb; color: #6b7280; font-size: 14px; white-space: nowrap;">{}</td>
      <td style="padding: 8px 12px; border-bottom: 1px solid #e5e7eb; color: #111827; font-size: 14px;">{}</td>
    </tr>
"#,
            escape_html(&humanize_key(key)),
            escape_html(&display),
        ));
    }
    if rows.is_empty() {
        rows.push_str(
            r#"    <tr><td style="padding: 8px 12px; color: #6b7280; font-size: 14px;">No form fields were submitted.</td></tr>
"#,
        );
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="color: #0b2447; font-size: 20px;">New form submission</h1>

  <p style="color: #666; font-size: 14px;">
    Form type: <strong>{form_type}</strong>
  </p>

  <table style="border-collapse: collapse; width: 100%; background: #ffffff;">
{rows}  </table>

  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

  <p style="color: #999; font-size: 12px;">
    Hartwell Financial Group - internal lead notification.
  </p>
</body>
</html>"#,
        form_type = escape_html(form_type.as_str()),
        rows = rows,
    );

    let text = format!(
        "New form submission ({})\n\n{}",
        form_type.as_str(),
        form_data
            .iter()
            .filter_map(|(k, v)| {
                let display = value_to_display(v);
                if display.is_empty() {
                    None
                } else {
                    Some(format!("{}: {}", humanize_key(k), display))
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    );

    let (first, rest) = match recipients.split_first() {
        Some((first, rest)) => (first.clone(), rest.to_vec()),
        None => (String::new(), vec![]),
    };

    OutboundEmail::new(from, &first, &subject, &html)
        .with_text(&text)
        .with_recipients(&rest)
}

/// Build the prospect confirmation email from static per-type copy.
/// `advisor` is the assigned advisor's display name; only the first name is
/// used in the body.
pub fn prospect_confirmation(
    template: &ConfirmationTemplate,
    first_name: &str,
    advisor: Option<&str>,
    prospect_email: &str,
    from: &str,
) -> OutboundEmail {
    let advisor_first = advisor
        .and_then(|a| a.split_whitespace().next())
        .map(escape_html);

    let advisor_line = match &advisor_first {
        Some(name) => format!(
            "Your advisor, {name}, has been notified and will be your point of contact."
        ),
        None => "One of our licensed advisors will be your point of contact.".to_string(),
    };

    let steps_html: String = template
        .next_steps
        .iter()
        .map(|step| {
            format!(
                r#"    <li style="color: #374151; font-size: 14px; margin-bottom: 8px;">{}</li>
"#,
                escape_html(step)
            )
        })
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="color: #0b2447; font-size: 22px;">Hi {first_name},</h1>

  <p style="color: #374151; font-size: 15px; line-height: 1.6;">
    {body_intro}
  </p>

  <p style="color: #374151; font-size: 15px; line-height: 1.6;">
    {advisor_line}
  </p>

  <p style="color: #0b2447; font-size: 15px; font-weight: 600; margin-bottom: 4px;">What happens next</p>
  <ol style="padding-left: 20px; margin-top: 4px;">
{steps_html}  </ol>

  <p style="color: #374151; font-size: 15px; line-height: 1.6;">
    Warm regards,<br>
    {sign_off}
  </p>

  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

  <p style="color: #999; font-size: 12px;">
    Hartwell Financial Group<br>
    You are receiving this email because you submitted a request on our website.
  </p>
</body>
</html>"#,
        first_name = escape_html(first_name),
        body_intro = escape_html(template.body_intro),
        advisor_line = advisor_line,
        steps_html = steps_html,
        sign_off = escape_html(template.sign_off),
    );

    let text = format!(
        "Hi {first_name},\n\n{intro}\n\n{advisor}\n\nWhat happens next:\n{steps}\n\nWarm regards,\n{sign_off}",
        first_name = first_name,
        intro = template.body_intro,
        advisor = match advisor.and_then(|a| a.split_whitespace().next()) {
            Some(name) => format!(
                "Your advisor, {name}, has been notified and will be your point of contact."
            ),
            None => "One of our licensed advisors will be your point of contact.".to_string(),
        },
        steps = template
            .next_steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n"),
        sign_off = template.sign_off,
    );

    OutboundEmail::new(from, prospect_email, template.subject, &html).with_text(&text)
}

/// Build the delivery email carrying a rendered application PDF.
pub fn application_pdf_delivery(
    applicant_name: &str,
    application_id: &str,
    attachment: Attachment,
    to: &str,
    from: &str,
) -> OutboundEmail {
    let subject = format!("Life Insurance Application - {applicant_name}");

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="color: #0b2447; font-size: 20px;">Application document attached</h1>

  <p style="color: #374151; font-size: 15px; line-height: 1.6;">
    The completed life insurance application for
    <strong>{applicant_name}</strong> is attached as a PDF.
  </p>

  <p style="color: #6b7280; font-size: 13px;">
    Application reference: {application_id}
  </p>

  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

  <p style="color: #999; font-size: 12px;">
    Hartwell Financial Group - this document contains confidential applicant
    information. Handle according to firm policy.
  </p>
</body>
</html>"#,
        applicant_name = escape_html(applicant_name),
        application_id = escape_html(application_id),
    );

    let text = format!(
        "The completed life insurance application for {applicant_name} is attached.\n\
         Application reference: {application_id}\n\n\
         This document contains confidential applicant information.",
    );

    OutboundEmail::new(from, to, &subject, &html)
        .with_text(&text)
        .with_attachment(attachment)
}
