use tracing::{error, info, warn};

use super::{prompts, SectionContext, SectionError, SectionStatus, Violation};
use crate::document::SectionPatch;
use crate::llm_client::TextGenerator;
use crate::models::resume::ResumePatch;

/// Number of alternative summaries requested per generation round.
pub const SUMMARY_OPTIONS: usize = 3;

/// The scalar summary section, with a pick-one-of-three generation flow.
pub struct SummaryController {
    ctx: SectionContext,
    summary: String,
    options: Vec<String>,
    selected: Option<usize>,
    status: SectionStatus,
    mounted: bool,
}

impl SummaryController {
    pub fn mount(ctx: SectionContext) -> Self {
        let summary = ctx.document.with(|doc| doc.summary.clone());
        Self {
            ctx,
            summary,
            options: Vec::new(),
            selected: None,
            status: SectionStatus::Clean,
            mounted: true,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        self.summary = text.into();
        self.touch();
        Ok(())
    }

    /// Asks for [`SUMMARY_OPTIONS`] summaries built from the job title. Empty
    /// answers are dropped; any failure discards the whole round.
    pub async fn generate_options(
        &mut self,
        generator: &dyn TextGenerator,
    ) -> Result<&[String], SectionError> {
        self.ensure_mounted()?;
        self.options.clear();
        self.selected = None;
        let was_open = self.ctx.gate.is_open();
        self.ctx.gate.close();

        let job_title = self.ctx.document.with(|doc| doc.personal.job_title.clone());
        let prompt = prompts::summary(&job_title);

        let mut options = Vec::with_capacity(SUMMARY_OPTIONS);
        for _ in 0..SUMMARY_OPTIONS {
            match generator.generate(&prompt).await {
                Ok(text) if !text.trim().is_empty() => options.push(text.trim().to_string()),
                Ok(_) => {}
                Err(e) => {
                    warn!(section = "summary", "Summary generation failed: {e}");
                    if was_open {
                        self.ctx.gate.open();
                    }
                    return Err(SectionError::Generation(e));
                }
            }
        }

        if was_open {
            self.ctx.gate.open();
        }
        info!(section = "summary", count = options.len(), "Generated summary options");
        self.options = options;
        Ok(&self.options)
    }

    /// Adopts one generated option as the summary.
    pub fn select_option(&mut self, index: usize) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        let option = self
            .options
            .get(index)
            .cloned()
            .ok_or(SectionError::NoSuchEntry {
                section: "summary",
                index,
            })?;
        self.summary = option;
        self.selected = Some(index);
        self.touch();
        Ok(())
    }

    pub fn validate(&self) -> Vec<Violation> {
        if self.summary.trim().is_empty() {
            return vec![Violation {
                index: None,
                field: "summary",
            }];
        }
        vec![]
    }

    /// Persists the trimmed summary.
    pub async fn save(&mut self) -> Result<(), SectionError> {
        self.ensure_mounted()?;
        self.ctx.gate.close();
        if let Some(violation) = self.validate().into_iter().next() {
            warn!(section = "summary", "Save rejected: {violation}");
            return Err(SectionError::Validation(violation));
        }

        let trimmed = self.summary.trim().to_string();
        let patch = ResumePatch {
            summary: Some(trimmed.clone()),
            ..ResumePatch::default()
        };

        match self.ctx.store.update_fields(self.ctx.document_id, &patch).await {
            Ok(()) => {
                self.summary = trimmed;
                self.ctx.document.merge(SectionPatch::Summary(self.summary.clone()));
                self.options.clear();
                self.selected = None;
                self.status = SectionStatus::Saved;
                self.ctx.gate.open();
                info!(section = "summary", document_id = %self.ctx.document_id, "Section saved");
                Ok(())
            }
            Err(e) => {
                self.status = SectionStatus::Dirty;
                error!(section = "summary", document_id = %self.ctx.document_id, "Failed to save section: {e}");
                Err(e.into())
            }
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    fn ensure_mounted(&self) -> Result<(), SectionError> {
        if self.mounted {
            Ok(())
        } else {
            Err(SectionError::Unmounted)
        }
    }

    fn touch(&mut self) {
        self.status = SectionStatus::Dirty;
        self.ctx.gate.close();
        self.ctx.document.merge(SectionPatch::Summary(self.summary.clone()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document::DocumentHandle;
    use crate::models::resume::ResumeDocument;
    use crate::sections::NavGate;
    use crate::store::{MemoryStore, RecordStore};
    use crate::test_support::{FailingGenerator, ScriptedGenerator};

    async fn controller(job_title: &str) -> (SummaryController, SectionContext, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let created = store
            .create(crate::models::resume::ResumeMeta {
                title: "Backend".into(),
                user_email: "ada@example.com".into(),
                user_name: None,
            })
            .await
            .unwrap();
        let mut doc = ResumeDocument::empty(created.document_id);
        doc.personal.job_title = job_title.into();
        let ctx = SectionContext {
            document_id: created.document_id,
            document: DocumentHandle::new(doc),
            store: store.clone(),
            gate: NavGate::new(),
        };
        (SummaryController::mount(ctx.clone()), ctx, store)
    }

    #[tokio::test]
    async fn test_generate_three_options_from_job_title() {
        let (mut summary, _, _) = controller("Data Engineer").await;
        let generator = ScriptedGenerator::new([" First ", "", "Third"]);
        let options = summary.generate_options(&generator).await.unwrap().to_vec();
        assert_eq!(options, vec!["First".to_string(), "Third".to_string()]);
        assert_eq!(generator.prompts().len(), 3);
        assert!(generator.prompts()[0].contains("\"Data Engineer\""));
    }

    #[tokio::test]
    async fn test_prompt_falls_back_to_software_developer() {
        let (mut summary, _, _) = controller("").await;
        let generator = ScriptedGenerator::new(["A", "B", "C"]);
        summary.generate_options(&generator).await.unwrap();
        assert!(generator.prompts()[0].contains("Software Developer"));
    }

    #[tokio::test]
    async fn test_select_option_marks_dirty() {
        let (mut summary, ctx, _) = controller("Engineer").await;
        let generator = ScriptedGenerator::new(["A", "B", "C"]);
        summary.generate_options(&generator).await.unwrap();
        summary.select_option(1).unwrap();
        assert_eq!(summary.summary(), "B");
        assert_eq!(summary.selected(), Some(1));
        assert_eq!(summary.status(), SectionStatus::Dirty);
        assert_eq!(ctx.document.snapshot().summary, "B");
        assert!(summary.select_option(7).is_err());
    }

    #[tokio::test]
    async fn test_empty_summary_is_not_saved() {
        let (mut summary, _, store) = controller("Engineer").await;
        summary.set_text("   ").unwrap();
        assert!(matches!(summary.save().await, Err(SectionError::Validation(_))));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_save_persists_trimmed_text() {
        let (mut summary, ctx, store) = controller("Engineer").await;
        summary.set_text("  Builds reliable systems.  ").unwrap();
        summary.save().await.unwrap();
        assert_eq!(
            store.raw_field(ctx.document_id, "summary").await.as_deref(),
            Some("Builds reliable systems.")
        );
        assert!(ctx.gate.is_open());
        assert_eq!(ctx.document.snapshot().summary, "Builds reliable systems.");
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_summary() {
        let (mut summary, ctx, _) = controller("Engineer").await;
        summary.set_text("Mine").unwrap();
        summary.save().await.unwrap();
        let result = summary.generate_options(&FailingGenerator).await;
        assert!(matches!(result, Err(SectionError::Generation(_))));
        assert_eq!(summary.summary(), "Mine");
        assert!(summary.options().is_empty());
        assert!(ctx.gate.is_open());
    }
}
