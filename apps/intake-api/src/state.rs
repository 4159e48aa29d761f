//! Application state for the intake API

use std::sync::Mutex;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use email_dispatch::{DispatchConfig, ResendMailer};
use intake_core::RateLimiter;

pub struct AppState {
    pub db: SqlitePool,
    pub mailer: ResendMailer,
    pub limiter: Mutex<RateLimiter>,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        // Service credentials are read once at startup; absence is fatal.
        let dispatch_config =
            DispatchConfig::from_env().context("email dispatch configuration")?;
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set (e.g. sqlite:intake.db?mode=rwc)")?;

        tracing::info!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;

        // Run migrations
        Self::run_migrations(&pool).await?;

        Ok(Self {
            db: pool,
            mailer: ResendMailer::new(dispatch_config),
            limiter: Mutex::new(RateLimiter::default()),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS form_submissions (
                id TEXT PRIMARY KEY,
                form_type TEXT NOT NULL,
                form_data TEXT NOT NULL,
                name TEXT,
                email TEXT,
                phone TEXT,
                source TEXT,
                partner TEXT,
                advisor TEXT,
                status TEXT NOT NULL DEFAULT 'new',
                email_sent INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Indexes for the fields the back office queries by
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_form_submissions_form_type
                ON form_submissions(form_type)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_form_submissions_created_at
                ON form_submissions(created_at)
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS life_insurance_applications (
                id TEXT PRIMARY KEY,
                applicant_name TEXT,
                applicant_email TEXT,
                applicant_phone TEXT,
                advisor_id TEXT,
                advisor_name TEXT,
                advisor_email TEXT,
                form_data TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS advisors (
                id TEXT PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                email TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}
