//! HTTP handlers for the intake API
//!
//! `notify_form` is the hot path: rate gate, validate, store (best-effort),
//! internal alert (fatal on failure), then prospect confirmation
//! (logged-only). Rate-limit headers ride on every response it produces.
//!
//! `resend_application_pdf` is the admin path: fetch, resolve the advisor,
//! render once, then two independent sends whose outcomes are reported
//! per-recipient.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use email_dispatch::{templates, Attachment, OutboundEmail};
use intake_core::rate_limit::RateLimitDecision;
use intake_core::submission::first_name;
use intake_core::text::slugify;
use intake_core::{ContactFields, NotificationRequest};
use intake_pdf::{render_application_base64, LifeInsuranceApplication};

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;
use crate::store;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Accept a form submission: store it, alert the leads inbox, and
/// conditionally confirm to the prospect.
pub async fn notify_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let client = client_ip(&headers);
    let decision = {
        let mut limiter = state
            .limiter
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        limiter.check(&client)
    };

    if !decision.allowed {
        let retry_secs = decision.retry_after_ms.unwrap_or(0).div_ceil(1000);
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "success": false,
                "error": "Too many requests. Please try again shortly.",
                "retryAfter": retry_secs,
            })),
        )
            .into_response();
        response
            .headers_mut()
            .insert("Retry-After", retry_secs.to_string().parse().unwrap());
        return with_rate_headers(response, &decision);
    }

    // Body is taken raw so even parse failures carry rate-limit headers.
    let request: NotificationRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            return with_rate_headers(
                invalid_request_response(json!({ "body": [e.to_string()] })),
                &decision,
            );
        }
    };

    let valid = match request.validate() {
        Ok(valid) => valid,
        Err(details) => {
            return with_rate_headers(
                invalid_request_response(json!(details)),
                &decision,
            );
        }
    };

    let contact = ContactFields::from_form_data(&valid.form_data);

    // Store first, before any email. A failed write is logged and the
    // notification flow continues: losing the record must not lose the lead.
    let submission_id = match store::insert_submission(&state.db, &valid, &contact).await {
        Ok(id) => Some(id),
        Err(e) => {
            error!(error = %e, form_type = %valid.form_type, "submission insert failed; continuing with notification");
            None
        }
    };

    // Internal lead alert. This send is the business-critical path.
    let mut recipients = vec![valid
        .recipient_email
        .clone()
        .unwrap_or_else(|| state.mailer.leads_inbox().to_string())];
    recipients.extend(valid.additional_recipients.iter().cloned());

    let alert = templates::lead_alert(
        valid.form_type,
        &contact,
        &valid.form_data,
        state.mailer.from_address(),
        recipients,
    );

    let receipt = match state.mailer.send(&alert).await {
        Ok(receipt) => receipt,
        Err(e) => {
            error!(error = %e, form_type = %valid.form_type, "internal alert failed");
            let response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to send notification email",
                })),
            )
                .into_response();
            return with_rate_headers(response, &decision);
        }
    };

    if let Some(id) = &submission_id {
        if let Err(e) = store::mark_email_sent(&state.db, id).await {
            warn!(error = %e, submission_id = %id, "failed to mark submission emailed");
        }
    }

    // Prospect confirmation: best-effort, only for prospect-facing forms
    // with a reachable email and a usable first name.
    let mut confirmation_sent = false;
    if templates::sends_confirmation(valid.form_type) {
        if let (Some(prospect_email), Some(first)) =
            (contact.email.as_deref(), first_name(&valid.form_data))
        {
            let confirmation = templates::prospect_confirmation(
                templates::confirmation_template(valid.form_type),
                &first,
                contact.advisor.as_deref(),
                prospect_email,
                state.mailer.from_address(),
            );
            match state.mailer.send(&confirmation).await {
                Ok(_) => confirmation_sent = true,
                Err(e) => {
                    warn!(error = %e, "prospect confirmation failed; submission already alerted");
                }
            }
        }
    }

    info!(
        form_type = %valid.form_type,
        submission_id = ?submission_id,
        confirmation_sent,
        "form notification dispatched"
    );

    let response = (
        StatusCode::OK,
        Json(NotificationSuccess {
            success: true,
            data: NotificationData {
                form_type: valid.form_type.to_string(),
                email_id: receipt.id,
                confirmation_sent,
            },
            submission_id,
        }),
    )
        .into_response();
    with_rate_headers(response, &decision)
}

/// Re-send a stored life-insurance application as a PDF to the assigned
/// advisor and the leads inbox.
pub async fn resend_application_pdf(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResendPdfRequest>,
) -> Result<Response, ApiError> {
    let application_id = request
        .application_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingApplicationId)?;

    let application = store::fetch_application(&state.db, application_id)
        .await?
        .ok_or(ApiError::ApplicationNotFound)?;

    let advisor_email = resolve_advisor_email(&state, &application).await;
    if advisor_email.is_none() {
        warn!(
            application_id = %application.id,
            advisor_name = ?application.advisor_name,
            "advisor email unresolved; delivering to leads inbox only"
        );
    }

    let pdf = render_application_base64(&application)?;
    let attachment = Attachment::pdf(
        &format!("life-insurance-application-{}.pdf", application.id),
        pdf,
    );

    let mut results = Vec::new();

    // Advisor send, when an address resolved.
    let mut advisor_sent = false;
    if let Some(email) = &advisor_email {
        let outcome = send_pdf(&state, &application, attachment.clone(), email).await;
        advisor_sent = outcome.is_ok();
        results.push(RecipientResult {
            recipient: "advisor",
            success: advisor_sent,
            error: outcome.err(),
        });
    }

    // Leads-inbox send, always attempted regardless of the advisor outcome.
    let leads_inbox = state.mailer.leads_inbox().to_string();
    let outcome = send_pdf(&state, &application, attachment, &leads_inbox).await;
    let leads_sent = outcome.is_ok();
    results.push(RecipientResult {
        recipient: "leads",
        success: leads_sent,
        error: outcome.err(),
    });

    let success = advisor_sent || leads_sent;
    let message = dispatch_message(
        advisor_sent,
        leads_sent,
        advisor_email.as_deref(),
        application.advisor_name.as_deref(),
    );

    info!(
        application_id = %application.id,
        advisor_sent,
        leads_sent,
        "application PDF dispatch finished"
    );

    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((
        status,
        Json(ResendPdfResponse {
            success,
            message,
            results,
        }),
    )
        .into_response())
}

/// One outbound PDF delivery; errors come back as strings for the
/// per-recipient report and never abort the other send.
async fn send_pdf(
    state: &AppState,
    application: &LifeInsuranceApplication,
    attachment: Attachment,
    to: &str,
) -> Result<(), String> {
    let email: OutboundEmail = templates::application_pdf_delivery(
        application.display_name(),
        &application.id,
        attachment,
        to,
        state.mailer.from_address(),
    );
    match state.mailer.send(&email).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(error = %e, to = %to, "application PDF send failed");
            Err(e.to_string())
        }
    }
}

/// Resolve the advisor's email: the record's own value, then the directory
/// by id, then the directory by a name-derived slug. Every failure
/// degrades; none is fatal.
async fn resolve_advisor_email(
    state: &AppState,
    application: &LifeInsuranceApplication,
) -> Option<String> {
    if let Some(email) = application
        .advisor_email
        .as_deref()
        .filter(|e| !e.trim().is_empty())
    {
        return Some(email.trim().to_string());
    }

    if let Some(advisor_id) = application.advisor_id.as_deref() {
        match store::advisor_email_by_id(&state.db, advisor_id).await {
            Ok(Some(email)) => return Some(email),
            Ok(None) => {
                warn!(advisor_id = %advisor_id, "advisor id not in directory; trying slug fallback");
            }
            Err(e) => {
                warn!(advisor_id = %advisor_id, error = %e, "advisor lookup by id failed; trying slug fallback");
            }
        }
    }

    let slug = application
        .advisor_name
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty())?;

    match store::advisor_email_by_slug(&state.db, &slug).await {
        Ok(Some(email)) => Some(email),
        Ok(None) => None,
        Err(e) => {
            warn!(slug = %slug, error = %e, "advisor lookup by slug failed");
            None
        }
    }
}

/// Response message for the three dispatch outcomes: delivered to the
/// advisor, delivered to the leads inbox only, or failed entirely.
fn dispatch_message(
    advisor_sent: bool,
    leads_sent: bool,
    advisor_email: Option<&str>,
    advisor_name: Option<&str>,
) -> String {
    if advisor_sent {
        let advisor = advisor_name
            .or(advisor_email)
            .unwrap_or("the assigned advisor");
        format!("Application PDF sent to advisor {advisor}")
    } else if leads_sent {
        if advisor_email.is_none() {
            "Advisor email unavailable; application PDF sent to the leads inbox only".to_string()
        } else {
            "Advisor delivery failed; application PDF sent to the leads inbox only".to_string()
        }
    } else {
        "Failed to send application PDF to any recipient".to_string()
    }
}

/// Best-effort client identity from proxy headers.
fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }
    "unknown".to_string()
}

fn invalid_request_response(details: serde_json::Value) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": "Invalid request data",
            "details": details,
        })),
    )
        .into_response()
}

/// Stamp the rate-limit headers every response carries.
fn with_rate_headers(mut response: Response, decision: &RateLimitDecision) -> Response {
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", decision.limit.to_string().parse().unwrap());
    headers.insert(
        "X-RateLimit-Remaining",
        decision.remaining.to_string().parse().unwrap(),
    );
    headers.insert(
        "X-RateLimit-Reset",
        (decision.reset_at_ms / 1000).to_string().parse().unwrap(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.2");
    }

    #[test]
    fn client_ip_defaults_to_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn rate_headers_are_stamped() {
        let decision = RateLimitDecision {
            allowed: true,
            limit: 5,
            remaining: 3,
            reset_at_ms: 1_700_000_060_000,
            retry_after_ms: None,
        };
        let response = with_rate_headers(
            (StatusCode::OK, "ok").into_response(),
            &decision,
        );
        let headers = response.headers();
        assert_eq!(headers["X-RateLimit-Limit"], "5");
        assert_eq!(headers["X-RateLimit-Remaining"], "3");
        assert_eq!(headers["X-RateLimit-Reset"], "1700000060");
    }

    #[test]
    fn dispatch_message_covers_all_outcomes() {
        let sent = dispatch_message(true, true, Some("sam@hartwellfinancial.com"), Some("Sam Lee"));
        assert!(sent.contains("Sam Lee"));

        let admin_only = dispatch_message(false, true, None, Some("Sam Lee"));
        assert!(admin_only.contains("leads inbox only"));
        assert!(admin_only.contains("unavailable"));

        let advisor_failed = dispatch_message(false, true, Some("sam@hartwellfinancial.com"), None);
        assert!(advisor_failed.contains("failed"));

        let nothing = dispatch_message(false, false, None, None);
        assert!(nothing.contains("Failed"));
    }

    #[test]
    fn dispatch_message_falls_back_to_email_then_generic() {
        let by_email = dispatch_message(true, false, Some("sam@hartwellfinancial.com"), None);
        assert!(by_email.contains("sam@hartwellfinancial.com"));

        let generic = dispatch_message(true, false, None, None);
        assert!(generic.contains("the assigned advisor"));
    }
}
