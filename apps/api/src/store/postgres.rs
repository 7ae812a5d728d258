use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RecordStore, StoreError, StoredRecord};
use crate::models::resume::{CreatedResume, ResumeDocument, ResumeMeta, ResumePatch, ResumeSummary};

/// Record store backed by the `resumes` table.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, meta: ResumeMeta) -> Result<CreatedResume, StoreError> {
        let created = CreatedResume {
            document_id: Uuid::new_v4(),
            resume_id: Uuid::new_v4(),
        };

        sqlx::query(
            r#"
            INSERT INTO resumes (document_id, resume_id, title, user_email, user_name)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(created.document_id)
        .bind(created.resume_id)
        .bind(&meta.title)
        .bind(&meta.user_email)
        .bind(&meta.user_name)
        .execute(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, document_id: Uuid) -> Result<ResumeDocument, StoreError> {
        let row = sqlx::query_as::<_, StoredRecord>("SELECT * FROM resumes WHERE document_id = $1")
            .bind(document_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(StoredRecord::into_document)
            .ok_or(StoreError::NotFound(document_id))
    }

    async fn update_fields(
        &self,
        document_id: Uuid,
        patch: &ResumePatch,
    ) -> Result<(), StoreError> {
        // NULL binds keep the current column value.
        let result = sqlx::query(
            r#"
            UPDATE resumes SET
                title           = COALESCE($2, title),
                first_name      = COALESCE($3, first_name),
                last_name       = COALESCE($4, last_name),
                job_title       = COALESCE($5, job_title),
                address         = COALESCE($6, address),
                phone           = COALESCE($7, phone),
                email           = COALESCE($8, email),
                summary         = COALESCE($9, summary),
                theme_color     = COALESCE($10, theme_color),
                layout          = COALESCE($11, layout),
                enable_hr_lines = COALESCE($12, enable_hr_lines),
                experience      = COALESCE($13, experience),
                education       = COALESCE($14, education),
                skills          = COALESCE($15, skills),
                projects        = COALESCE($16, projects),
                certifications  = COALESCE($17, certifications),
                hobbies         = COALESCE($18, hobbies),
                languages       = COALESCE($19, languages),
                updated_at      = now()
            WHERE document_id = $1
            "#,
        )
        .bind(document_id)
        .bind(&patch.title)
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .bind(&patch.job_title)
        .bind(&patch.address)
        .bind(&patch.phone)
        .bind(&patch.email)
        .bind(&patch.summary)
        .bind(&patch.theme_color)
        .bind(&patch.layout)
        .bind(patch.enable_hr_lines)
        .bind(&patch.experience)
        .bind(&patch.education)
        .bind(&patch.skills)
        .bind(&patch.projects)
        .bind(&patch.certifications)
        .bind(&patch.hobbies)
        .bind(&patch.languages)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(document_id));
        }
        Ok(())
    }

    async fn delete_by_id(&self, document_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(document_id));
        }
        Ok(())
    }

    async fn owner_of(&self, document_id: Uuid) -> Result<String, StoreError> {
        let owner: Option<String> =
            sqlx::query_scalar("SELECT user_email FROM resumes WHERE document_id = $1")
                .bind(document_id)
                .fetch_optional(&self.pool)
                .await?;

        owner.ok_or(StoreError::NotFound(document_id))
    }

    async fn list_by_owner(&self, user_email: &str) -> Result<Vec<ResumeSummary>, StoreError> {
        let rows = sqlx::query_as::<_, StoredRecord>(
            "SELECT * FROM resumes WHERE lower(user_email) = lower($1) ORDER BY updated_at DESC",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(StoredRecord::summary_row).collect())
    }
}
