//! Record store: the CRUD contract for persisted resumes.
//!
//! Rows are flat: scalar columns plus one TEXT column per list field holding
//! the JSON-encoded list. Decoding happens once, in `StoredRecord::into_document`,
//! so nothing past this boundary sees the encoded shape.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

use crate::codec::decode_str;
use crate::models::resume::{
    CreatedResume, LayoutId, PersonalDetails, ResumeDocument, ResumeMeta, ResumePatch,
    ResumeSummary, DEFAULT_THEME_COLOR,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, meta: ResumeMeta) -> Result<CreatedResume, StoreError>;

    async fn get_by_id(&self, document_id: Uuid) -> Result<ResumeDocument, StoreError>;

    /// Writes only the fields present in `patch`.
    async fn update_fields(&self, document_id: Uuid, patch: &ResumePatch) -> Result<(), StoreError>;

    async fn delete_by_id(&self, document_id: Uuid) -> Result<(), StoreError>;

    /// The email of the user who created the record.
    async fn owner_of(&self, document_id: Uuid) -> Result<String, StoreError>;

    /// Newest first.
    async fn list_by_owner(&self, user_email: &str) -> Result<Vec<ResumeSummary>, StoreError>;
}

/// One persisted resume row.
#[derive(Debug, Clone, FromRow)]
pub struct StoredRecord {
    pub document_id: Uuid,
    pub resume_id: Uuid,
    pub title: String,
    pub user_email: String,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub summary: Option<String>,
    pub theme_color: Option<String>,
    pub layout: Option<String>,
    pub enable_hr_lines: Option<bool>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub projects: Option<String>,
    pub certifications: Option<String>,
    pub hobbies: Option<String>,
    pub languages: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn new(document_id: Uuid, resume_id: Uuid, meta: ResumeMeta, now: DateTime<Utc>) -> Self {
        Self {
            document_id,
            resume_id,
            title: meta.title,
            user_email: meta.user_email,
            user_name: meta.user_name,
            first_name: None,
            last_name: None,
            job_title: None,
            address: None,
            phone: None,
            email: None,
            summary: None,
            theme_color: None,
            layout: None,
            enable_hr_lines: None,
            experience: None,
            education: None,
            skills: None,
            projects: None,
            certifications: None,
            hobbies: None,
            languages: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every column the patch carries.
    pub fn apply(&mut self, patch: &ResumePatch, now: DateTime<Utc>) {
        fn set<T: Clone>(column: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *column = Some(value.clone());
            }
        }

        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        set(&mut self.first_name, &patch.first_name);
        set(&mut self.last_name, &patch.last_name);
        set(&mut self.job_title, &patch.job_title);
        set(&mut self.address, &patch.address);
        set(&mut self.phone, &patch.phone);
        set(&mut self.email, &patch.email);
        set(&mut self.summary, &patch.summary);
        set(&mut self.theme_color, &patch.theme_color);
        set(&mut self.layout, &patch.layout);
        set(&mut self.enable_hr_lines, &patch.enable_hr_lines);
        set(&mut self.experience, &patch.experience);
        set(&mut self.education, &patch.education);
        set(&mut self.skills, &patch.skills);
        set(&mut self.projects, &patch.projects);
        set(&mut self.certifications, &patch.certifications);
        set(&mut self.hobbies, &patch.hobbies);
        set(&mut self.languages, &patch.languages);
        self.updated_at = now;
    }

    pub fn summary_row(&self) -> ResumeSummary {
        ResumeSummary {
            document_id: self.document_id,
            title: self.title.clone(),
            updated_at: self.updated_at,
        }
    }

    pub fn into_document(self) -> ResumeDocument {
        ResumeDocument {
            document_id: self.document_id,
            resume_id: self.resume_id.to_string(),
            title: self.title,
            personal: PersonalDetails {
                first_name: self.first_name.unwrap_or_default(),
                last_name: self.last_name.unwrap_or_default(),
                job_title: self.job_title.unwrap_or_default(),
                address: self.address.unwrap_or_default(),
                phone: self.phone.unwrap_or_default(),
                email: self.email.unwrap_or_default(),
            },
            summary: self.summary.unwrap_or_default(),
            theme_color: self
                .theme_color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_THEME_COLOR.to_string()),
            layout: self
                .layout
                .as_deref()
                .map(LayoutId::resolve)
                .unwrap_or_default(),
            enable_hr_lines: self.enable_hr_lines.unwrap_or(false),
            experience: decode_column("experience", &self.experience),
            education: decode_column("education", &self.education),
            skills: decode_column("skills", &self.skills),
            projects: decode_column("projects", &self.projects),
            certifications: decode_column("certifications", &self.certifications),
            hobbies: decode_column("hobbies", &self.hobbies),
            languages: decode_column("languages", &self.languages),
        }
    }
}

fn decode_column<T: serde::de::DeserializeOwned>(field: &str, column: &Option<String>) -> Vec<T> {
    column
        .as_deref()
        .map(|text| decode_str(field, text))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Skill;

    fn record() -> StoredRecord {
        StoredRecord::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            ResumeMeta {
                title: "Platform".into(),
                user_email: "ada@example.com".into(),
                user_name: Some("Ada Lovelace".into()),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut row = record();
        row.summary = Some("Keep me".into());
        let patch = ResumePatch {
            skills: Some(r#"[{"name":"Go"}]"#.into()),
            ..ResumePatch::default()
        };
        row.apply(&patch, Utc::now());
        assert_eq!(row.summary.as_deref(), Some("Keep me"));
        assert_eq!(row.skills.as_deref(), Some(r#"[{"name":"Go"}]"#));
        assert_eq!(row.title, "Platform");
    }

    #[test]
    fn test_into_document_decodes_and_defaults() {
        let mut row = record();
        row.skills = Some(r#"[{"name":"Go"}]"#.into());
        row.hobbies = Some("not json".into());
        row.layout = Some("layout-unknown".into());
        let doc = row.into_document();
        assert_eq!(doc.skills, vec![Skill { name: "Go".into() }]);
        assert!(doc.hobbies.is_empty());
        assert!(doc.experience.is_empty());
        assert_eq!(doc.layout, LayoutId::Default);
        assert_eq!(doc.theme_color, DEFAULT_THEME_COLOR);
        assert!(!doc.enable_hr_lines);
    }
}
