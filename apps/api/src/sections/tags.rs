use tracing::{error, info};

use super::{SectionContext, SectionError, SectionStatus};
use crate::codec;
use crate::document::SectionPatch;
use crate::models::resume::ResumePatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagList {
    Hobbies,
    Languages,
}

impl TagList {
    pub fn as_str(self) -> &'static str {
        match self {
            TagList::Hobbies => "hobbies",
            TagList::Languages => "languages",
        }
    }
}

/// Hobbies and languages, edited as chips and saved together. Either list
/// may be empty.
pub struct TagListController {
    ctx: SectionContext,
    hobbies: Vec<String>,
    languages: Vec<String>,
    status: SectionStatus,
    mounted: bool,
}

impl TagListController {
    pub fn mount(ctx: SectionContext) -> Self {
        let (hobbies, languages) = ctx
            .document
            .with(|doc| (doc.hobbies.clone(), doc.languages.clone()));
        Self {
            ctx,
            hobbies,
            languages,
            status: SectionStatus::Clean,
            mounted: true,
        }
    }

    pub fn tags(&self, list: TagList) -> &[String] {
        match list {
            TagList::Hobbies => &self.hobbies,
            TagList::Languages => &self.languages,
        }
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    /// Adds a trimmed tag. Blank input is ignored (`Ok(false)`); a
    /// case-insensitive duplicate is rejected.
    pub fn add(&mut self, list: TagList, value: &str) -> Result<bool, SectionError> {
        self.ensure_mounted()?;
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        let tags = self.tags_mut(list);
        if tags.iter().any(|tag| tag.eq_ignore_ascii_case(value)) {
            return Err(SectionError::DuplicateValue {
                value: value.to_string(),
            });
        }
        tags.push(value.to_string());
        self.touch(list);
        Ok(true)
    }

    /// Removes an exact tag. Returns whether it was present.
    pub fn remove(&mut self, list: TagList, value: &str) -> Result<bool, SectionError> {
        self.ensure_mounted()?;
        let tags = self.tags_mut(list);
        let before = tags.len();
        tags.retain(|tag| tag != value);
        let removed = tags.len() != before;
        if removed {
            self.touch(list);
        }
        Ok(removed)
    }

    pub async fn save(&mut self) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        self.ctx.gate.close();
        let patch = ResumePatch {
            hobbies: Some(codec::encode(&self.hobbies)?),
            languages: Some(codec::encode(&self.languages)?),
            ..ResumePatch::default()
        };

        match self.ctx.store.update_fields(self.ctx.document_id, &patch).await {
            Ok(()) => {
                self.status = SectionStatus::Saved;
                self.ctx.gate.open();
                info!(section = "hobbies-languages", document_id = %self.ctx.document_id, "Section saved");
                Ok(())
            }
            Err(e) => {
                self.status = SectionStatus::Dirty;
                error!(section = "hobbies-languages", document_id = %self.ctx.document_id, "Failed to save section: {e}");
                Err(e.into())
            }
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    fn tags_mut(&mut self, list: TagList) -> &mut Vec<String> {
        match list {
            TagList::Hobbies => &mut self.hobbies,
            TagList::Languages => &mut self.languages,
        }
    }

    fn ensure_mounted(&self) -> Result<(), SectionError> {
        if self.mounted {
            Ok(())
        } else {
            Err(SectionError::Unmounted)
        }
    }

    fn touch(&mut self, list: TagList) {
        self.status = SectionStatus::Dirty;
        self.ctx.gate.close();
        let patch = match list {
            TagList::Hobbies => SectionPatch::Hobbies(self.hobbies.clone()),
            TagList::Languages => SectionPatch::Languages(self.languages.clone()),
        };
        self.ctx.document.merge(patch);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document::DocumentHandle;
    use crate::models::resume::{ResumeDocument, ResumeMeta};
    use crate::sections::NavGate;
    use crate::store::{MemoryStore, RecordStore};

    async fn controller() -> (TagListController, SectionContext, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let created = store
            .create(ResumeMeta {
                title: "Backend".into(),
                user_email: "ada@example.com".into(),
                user_name: None,
            })
            .await
            .unwrap();
        let mut doc = ResumeDocument::empty(created.document_id);
        doc.languages = vec!["English".into()];
        let ctx = SectionContext {
            document_id: created.document_id,
            document: DocumentHandle::new(doc),
            store: store.clone(),
            gate: NavGate::new(),
        };
        (TagListController::mount(ctx.clone()), ctx, store)
    }

    #[tokio::test]
    async fn test_add_trims_and_rejects_duplicates() {
        let (mut tags, ctx, _) = controller().await;
        assert!(tags.add(TagList::Hobbies, "  Chess ").unwrap());
        assert!(!tags.add(TagList::Hobbies, "   ").unwrap());
        assert!(matches!(
            tags.add(TagList::Languages, "english"),
            Err(SectionError::DuplicateValue { .. })
        ));
        assert_eq!(tags.tags(TagList::Hobbies), &["Chess".to_string()]);
        assert_eq!(ctx.document.snapshot().hobbies, vec!["Chess".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_by_value() {
        let (mut tags, _, _) = controller().await;
        assert!(tags.remove(TagList::Languages, "English").unwrap());
        assert!(!tags.remove(TagList::Languages, "English").unwrap());
        assert!(tags.tags(TagList::Languages).is_empty());
    }

    #[tokio::test]
    async fn test_save_writes_both_lists_even_when_empty() {
        let (mut tags, ctx, store) = controller().await;
        tags.add(TagList::Languages, "French").unwrap();
        tags.save().await.unwrap();
        assert_eq!(
            store.raw_field(ctx.document_id, "languages").await.as_deref(),
            Some(r#"["English","French"]"#)
        );
        assert_eq!(
            store.raw_field(ctx.document_id, "hobbies").await.as_deref(),
            Some("[]")
        );
        assert!(ctx.gate.is_open());
    }
}
