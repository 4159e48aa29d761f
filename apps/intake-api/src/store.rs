//! Submission store and advisor directory access
//!
//! The submission insert runs before any email is attempted; callers treat
//! a failed insert as a logged degradation, never a blocker. The marker
//! update (`email_sent`) is a separate step keyed by the generated id, so
//! there is deliberately no transaction coupling storage to dispatch.

use sqlx::SqlitePool;
use uuid::Uuid;

use intake_core::{ContactFields, ValidSubmission};
use intake_pdf::{ApplicationForm, LifeInsuranceApplication};

/// Insert a validated submission with `status='new'`, `email_sent=0`.
/// Returns the generated submission id.
pub async fn insert_submission(
    db: &SqlitePool,
    submission: &ValidSubmission,
    contact: &ContactFields,
) -> Result<String, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let form_data = serde_json::Value::Object(submission.form_data.clone()).to_string();

    sqlx::query(
        r#"
        INSERT INTO form_submissions
            (id, form_type, form_data, name, email, phone, source, partner, advisor, status, email_sent)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'new', 0)
        "#,
    )
    .bind(&id)
    .bind(submission.form_type.as_str())
    .bind(&form_data)
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.source)
    .bind(&contact.partner)
    .bind(&contact.advisor)
    .execute(db)
    .await?;

    tracing::info!(submission_id = %id, form_type = %submission.form_type, "stored submission");
    Ok(id)
}

/// Flip `email_sent` after the internal alert succeeded.
pub async fn mark_email_sent(db: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE form_submissions SET email_sent = 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    applicant_name: Option<String>,
    applicant_email: Option<String>,
    applicant_phone: Option<String>,
    advisor_id: Option<String>,
    advisor_name: Option<String>,
    advisor_email: Option<String>,
    form_data: String,
}

/// Fetch a stored application by id.
pub async fn fetch_application(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<LifeInsuranceApplication>, sqlx::Error> {
    let row: Option<ApplicationRow> = sqlx::query_as(
        r#"
        SELECT id, applicant_name, applicant_email, applicant_phone,
               advisor_id, advisor_name, advisor_email, form_data
        FROM life_insurance_applications
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|row| {
        // Renderers degrade field-by-field, so an unreadable form_data
        // column degrades the same way: an empty form, not a failure.
        let form_data: ApplicationForm =
            serde_json::from_str(&row.form_data).unwrap_or_else(|e| {
                tracing::warn!(application_id = %row.id, error = %e, "unreadable form_data; rendering empty form");
                ApplicationForm::default()
            });

        LifeInsuranceApplication {
            id: row.id,
            applicant_name: row.applicant_name,
            applicant_email: row.applicant_email,
            applicant_phone: row.applicant_phone,
            advisor_id: row.advisor_id,
            advisor_name: row.advisor_name,
            advisor_email: row.advisor_email,
            form_data,
        }
    }))
}

/// Advisor directory lookup by primary key.
pub async fn advisor_email_by_id(
    db: &SqlitePool,
    advisor_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT email FROM advisors WHERE id = ?")
        .bind(advisor_id)
        .fetch_optional(db)
        .await
}

/// Advisor directory lookup by name-derived slug.
pub async fn advisor_email_by_slug(
    db: &SqlitePool,
    slug: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT email FROM advisors WHERE slug = ?")
        .bind(slug)
        .fetch_optional(db)
        .await
}
