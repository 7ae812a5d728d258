use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, StoreError, StoredRecord};
use crate::models::resume::{CreatedResume, ResumeDocument, ResumeMeta, ResumePatch, ResumeSummary};

/// In-process record store. Used when no database is configured and by tests.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, StoredRecord>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `StoreError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `update_fields` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Inserts a row as-is, bypassing `create`.
    pub async fn insert_raw(&self, record: StoredRecord) {
        self.records.write().await.insert(record.document_id, record);
    }

    /// The stored text of a column, before any decoding.
    pub async fn raw_field(&self, document_id: Uuid, column: &str) -> Option<String> {
        let records = self.records.read().await;
        let row = records.get(&document_id)?;
        match column {
            "title" => Some(row.title.clone()),
            "firstName" => row.first_name.clone(),
            "lastName" => row.last_name.clone(),
            "jobTitle" => row.job_title.clone(),
            "address" => row.address.clone(),
            "phone" => row.phone.clone(),
            "email" => row.email.clone(),
            "summary" => row.summary.clone(),
            "themeColor" => row.theme_color.clone(),
            "layout" => row.layout.clone(),
            "enableHrLines" => row.enable_hr_lines.map(|b| b.to_string()),
            "experience" => row.experience.clone(),
            "education" => row.education.clone(),
            "skills" => row.skills.clone(),
            "projects" => row.projects.clone(),
            "certifications" => row.certifications.clone(),
            "hobbies" => row.hobbies.clone(),
            "languages" => row.languages.clone(),
            _ => None,
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, meta: ResumeMeta) -> Result<CreatedResume, StoreError> {
        self.check_writable()?;
        let created = CreatedResume {
            document_id: Uuid::new_v4(),
            resume_id: Uuid::new_v4(),
        };
        let record = StoredRecord::new(created.document_id, created.resume_id, meta, Utc::now());
        self.records.write().await.insert(created.document_id, record);
        Ok(created)
    }

    async fn get_by_id(&self, document_id: Uuid) -> Result<ResumeDocument, StoreError> {
        self.records
            .read()
            .await
            .get(&document_id)
            .cloned()
            .map(StoredRecord::into_document)
            .ok_or(StoreError::NotFound(document_id))
    }

    async fn update_fields(
        &self,
        document_id: Uuid,
        patch: &ResumePatch,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        let row = records
            .get_mut(&document_id)
            .ok_or(StoreError::NotFound(document_id))?;
        row.apply(patch, Utc::now());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_by_id(&self, document_id: Uuid) -> Result<(), StoreError> {
        self.check_writable()?;
        self.records
            .write()
            .await
            .remove(&document_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(document_id))
    }

    async fn owner_of(&self, document_id: Uuid) -> Result<String, StoreError> {
        self.records
            .read()
            .await
            .get(&document_id)
            .map(|row| row.user_email.clone())
            .ok_or(StoreError::NotFound(document_id))
    }

    async fn list_by_owner(&self, user_email: &str) -> Result<Vec<ResumeSummary>, StoreError> {
        let records = self.records.read().await;
        let mut rows: Vec<ResumeSummary> = records
            .values()
            .filter(|row| row.user_email.eq_ignore_ascii_case(user_email))
            .map(StoredRecord::summary_row)
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }
}
