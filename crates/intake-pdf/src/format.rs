//! Field formatting, masking, and code translation for the application PDF

use serde_json::Value;

use crate::application::Field;

/// Placeholder for any absent or empty value.
pub const MISSING: &str = "N/A";

/// Plan codes stored by the wizard, mapped to carrier-facing labels.
pub const PLAN_LABELS: &[(&str, &str)] = &[
    ("term-10", "10-Year Term"),
    ("term-20", "20-Year Term"),
    ("term-30", "30-Year Term"),
    ("whole-life", "Whole Life"),
    ("iul", "Indexed Universal Life"),
    ("final-expense", "Final Expense"),
];

pub const PAYMENT_FREQUENCY_LABELS: &[(&str, &str)] = &[
    ("monthly", "Monthly"),
    ("quarterly", "Quarterly"),
    ("semi-annual", "Semi-Annual"),
    ("annual", "Annual"),
];

pub const PAYMENT_METHOD_LABELS: &[(&str, &str)] = &[
    ("eft", "Bank Draft (EFT)"),
    ("direct-bill", "Direct Bill"),
    ("credit-card", "Credit Card"),
    ("payroll-deduction", "Payroll Deduction"),
];

pub const SOURCE_OF_FUNDS_LABELS: &[(&str, &str)] = &[
    ("income", "Earned Income"),
    ("savings", "Savings"),
    ("investments", "Investments"),
    ("inheritance", "Inheritance"),
    ("gift", "Gift"),
];

pub const CITIZENSHIP_LABELS: &[(&str, &str)] = &[
    ("us-citizen", "U.S. Citizen"),
    ("permanent-resident", "Permanent Resident (Green Card)"),
    ("visa-holder", "Visa Holder"),
];

/// Render any raw form value for a label/value row.
///
/// Missing, null, and empty strings become [`MISSING`]; booleans become
/// Yes/No; numbers at or above 1000 render as US-locale currency; arrays
/// comma-join their rendered elements.
pub fn format_field(field: &Field) -> String {
    match field {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                MISSING.to_string()
            } else {
                trimmed.to_string()
            }
        }
        Some(Value::Bool(b)) => if *b { "Yes" } else { "No" }.to_string(),
        Some(Value::Number(n)) => {
            let v = n.as_f64().unwrap_or(0.0);
            if v.abs() >= 1000.0 {
                format_currency(v)
            } else {
                n.to_string()
            }
        }
        Some(Value::Array(items)) => {
            let joined: Vec<String> = items
                .iter()
                .map(|item| format_field(&Some(item.clone())))
                .collect();
            if joined.is_empty() {
                MISSING.to_string()
            } else {
                joined.join(", ")
            }
        }
        Some(other) => other.to_string(),
    }
}

/// Translate an enumerated code through a label table; unrecognized codes
/// pass through unchanged rather than failing.
pub fn format_code(field: &Field, labels: &[(&str, &str)]) -> String {
    match field {
        Some(Value::String(code)) if !code.trim().is_empty() => labels
            .iter()
            .find(|(key, _)| *key == code.trim())
            .map(|(_, label)| (*label).to_string())
            .unwrap_or_else(|| code.trim().to_string()),
        other => format_field(other),
    }
}

/// US-locale currency: `500000` → `"$500,000"`, cents kept only when
/// present.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let value = value.abs();
    let mut whole = value.trunc() as u64;
    let mut cents = ((value - value.trunc()) * 100.0).round() as u64;
    if cents == 100 {
        whole += 1;
        cents = 0;
    }

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if cents == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{cents:02}")
    }
}

/// Fully formatted SSN (`XXX-XX-XXXX`). Inputs that do not contain exactly
/// nine digits pass through as-is.
pub fn format_ssn(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 9 {
        format!("{}-{}-{}", &digits[0..3], &digits[3..5], &digits[5..9])
    } else {
        raw.to_string()
    }
}

/// Masked SSN for summary surfaces: `***-**-{last4}`, or `***-**-****`
/// when fewer than four digits are available.
pub fn mask_ssn(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 4 {
        format!("***-**-{}", &digits[digits.len() - 4..])
    } else {
        "***-**-****".to_string()
    }
}

/// Masked bank/routing number: `****{last4}`, or `****` when fewer than
/// four digits are available.
pub fn mask_account(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 4 {
        format!("****{}", &digits[digits.len() - 4..])
    } else {
        "****".to_string()
    }
}

/// SSN field for the identity section: formatted, not masked. This
/// document goes to the advisor of record.
pub fn ssn_field(field: &Field) -> String {
    match field {
        Some(Value::String(s)) if !s.trim().is_empty() => format_ssn(s.trim()),
        other => format_field(other),
    }
}

/// Account-number field: always masked, regardless of audience.
pub fn masked_account_field(field: &Field) -> String {
    match field {
        Some(Value::String(s)) if !s.trim().is_empty() => mask_account(s.trim()),
        Some(Value::Number(n)) => mask_account(&n.to_string()),
        other => format_field(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_values_render_placeholder() {
        assert_eq!(format_field(&None), "N/A");
        assert_eq!(format_field(&Some(json!(null))), "N/A");
        assert_eq!(format_field(&Some(json!(""))), "N/A");
        assert_eq!(format_field(&Some(json!("   "))), "N/A");
    }

    #[test]
    fn booleans_render_yes_no() {
        assert_eq!(format_field(&Some(json!(true))), "Yes");
        assert_eq!(format_field(&Some(json!(false))), "No");
    }

    #[test]
    fn large_numbers_render_as_currency() {
        assert_eq!(format_field(&Some(json!(500000))), "$500,000");
        assert_eq!(format_field(&Some(json!(1000))), "$1,000");
        assert_eq!(format_field(&Some(json!(1234567))), "$1,234,567");
    }

    #[test]
    fn small_numbers_render_plainly() {
        assert_eq!(format_field(&Some(json!(35))), "35");
        assert_eq!(format_field(&Some(json!(999))), "999");
    }

    #[test]
    fn arrays_comma_join() {
        assert_eq!(
            format_field(&Some(json!(["Waiver of Premium", "Child Rider"]))),
            "Waiver of Premium, Child Rider"
        );
        assert_eq!(format_field(&Some(json!([]))), "N/A");
    }

    #[test]
    fn currency_keeps_cents_only_when_present() {
        assert_eq!(format_currency(500000.0), "$500,000");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-2500.0), "-$2,500");
    }

    #[test]
    fn ssn_formats_and_masks() {
        assert_eq!(format_ssn("123-45-6789"), "123-45-6789");
        assert_eq!(format_ssn("123456789"), "123-45-6789");
        assert_eq!(mask_ssn("123-45-6789"), "***-**-6789");
        assert_eq!(mask_ssn("123"), "***-**-****");
    }

    #[test]
    fn short_ssn_passes_through_formatter() {
        assert_eq!(format_ssn("123"), "123");
    }

    #[test]
    fn account_masking() {
        assert_eq!(mask_account("000123456789"), "****6789");
        assert_eq!(mask_account("12"), "****");
        assert_eq!(
            masked_account_field(&Some(json!("000123456789"))),
            "****6789"
        );
        assert_eq!(masked_account_field(&None), "N/A");
    }

    #[test]
    fn codes_translate_through_label_tables() {
        assert_eq!(
            format_code(&Some(json!("term-20")), PLAN_LABELS),
            "20-Year Term"
        );
        assert_eq!(
            format_code(&Some(json!("eft")), PAYMENT_METHOD_LABELS),
            "Bank Draft (EFT)"
        );
        assert_eq!(
            format_code(&Some(json!("us-citizen")), CITIZENSHIP_LABELS),
            "U.S. Citizen"
        );
    }

    #[test]
    fn unrecognized_codes_pass_through() {
        assert_eq!(
            format_code(&Some(json!("group-term-custom")), PLAN_LABELS),
            "group-term-custom"
        );
        assert_eq!(format_code(&None, PLAN_LABELS), "N/A");
    }

    #[test]
    fn ssn_field_is_formatted_not_masked() {
        assert_eq!(ssn_field(&Some(json!("123456789"))), "123-45-6789");
        assert_eq!(ssn_field(&None), "N/A");
    }
}
