use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates a PostgreSQL connection pool and makes sure the schema exists.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");

    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Creates the `resumes` table if it is missing. List-valued fields are TEXT
/// columns holding JSON-encoded strings.
async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resumes (
            document_id     UUID PRIMARY KEY,
            resume_id       UUID NOT NULL,
            title           TEXT NOT NULL,
            user_email      TEXT NOT NULL,
            user_name       TEXT,
            first_name      TEXT,
            last_name       TEXT,
            job_title       TEXT,
            address         TEXT,
            phone           TEXT,
            email           TEXT,
            summary         TEXT,
            theme_color     TEXT,
            layout          TEXT,
            enable_hr_lines BOOLEAN,
            experience      TEXT,
            education       TEXT,
            skills          TEXT,
            projects        TEXT,
            certifications  TEXT,
            hobbies         TEXT,
            languages       TEXT,
            created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_resumes_owner ON resumes (lower(user_email), updated_at DESC)",
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
