//! One user's edit session over one resume.
//!
//! The session owns the shared document, the wizard and whichever section
//! controller is currently mounted. Moving between sections unmounts the old
//! controller (dropping any pending generation result) and mounts the next
//! one, which hydrates from the document.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::document::{DocumentHandle, SectionPatch};
use crate::layout::{self, VisualTree};
use crate::llm_client::TextGenerator;
use crate::models::resume::{is_color_token, LayoutId, ResumePatch};
use crate::sections::{
    CertificationSchema, EducationSchema, ExperienceSchema, ListSectionController, NavGate,
    PersonalController, ProjectSchema, SectionContext, SectionError, SectionStatus, SkillSchema,
    SummaryController, TagListController,
};
use crate::store::{RecordStore, StoreError};
use crate::wizard::{NavError, Step, Wizard, WizardSection};

/// The controller behind the current wizard step.
pub enum ActiveSection {
    Personal(PersonalController),
    Summary(SummaryController),
    Experience(ListSectionController<ExperienceSchema>),
    Education(ListSectionController<EducationSchema>),
    Skills(ListSectionController<SkillSchema>),
    Projects(ListSectionController<ProjectSchema>),
    Certifications(ListSectionController<CertificationSchema>),
    HobbiesLanguages(TagListController),
}

impl ActiveSection {
    fn mount(section: WizardSection, ctx: SectionContext) -> Self {
        match section {
            WizardSection::Personal => Self::Personal(PersonalController::mount(ctx)),
            WizardSection::Summary => Self::Summary(SummaryController::mount(ctx)),
            WizardSection::Experience => Self::Experience(ListSectionController::mount(ctx)),
            WizardSection::Education => Self::Education(ListSectionController::mount(ctx)),
            WizardSection::Skills => Self::Skills(ListSectionController::mount(ctx)),
            WizardSection::Projects => Self::Projects(ListSectionController::mount(ctx)),
            WizardSection::Certifications => {
                Self::Certifications(ListSectionController::mount(ctx))
            }
            WizardSection::HobbiesLanguages => {
                Self::HobbiesLanguages(TagListController::mount(ctx))
            }
        }
    }

    fn unmount(&mut self) {
        match self {
            Self::Personal(c) => c.unmount(),
            Self::Summary(c) => c.unmount(),
            Self::Experience(c) => c.unmount(),
            Self::Education(c) => c.unmount(),
            Self::Skills(c) => c.unmount(),
            Self::Projects(c) => c.unmount(),
            Self::Certifications(c) => c.unmount(),
            Self::HobbiesLanguages(c) => c.unmount(),
        }
    }

    pub fn status(&self) -> SectionStatus {
        match self {
            Self::Personal(c) => c.status(),
            Self::Summary(c) => c.status(),
            Self::Experience(c) => c.status(),
            Self::Education(c) => c.status(),
            Self::Skills(c) => c.status(),
            Self::Projects(c) => c.status(),
            Self::Certifications(c) => c.status(),
            Self::HobbiesLanguages(c) => c.status(),
        }
    }
}

pub struct EditSession {
    ctx: SectionContext,
    generator: Arc<dyn TextGenerator>,
    wizard: Wizard,
    active: ActiveSection,
}

impl EditSession {
    /// Loads the resume and mounts the first section.
    pub async fn open(
        store: Arc<dyn RecordStore>,
        generator: Arc<dyn TextGenerator>,
        document_id: Uuid,
    ) -> Result<Self, StoreError> {
        let document = store.get_by_id(document_id).await?;
        let gate = NavGate::new();
        let ctx = SectionContext {
            document_id,
            document: DocumentHandle::new(document),
            store,
            gate: gate.clone(),
        };
        let wizard = Wizard::new(document_id, gate);
        let active = ActiveSection::mount(wizard.current(), ctx.clone());
        info!(document_id = %document_id, "Edit session opened");
        Ok(Self {
            ctx,
            generator,
            wizard,
            active,
        })
    }

    pub fn document_id(&self) -> Uuid {
        self.ctx.document_id
    }

    pub fn document(&self) -> &DocumentHandle {
        &self.ctx.document
    }

    pub fn section(&self) -> WizardSection {
        self.wizard.current()
    }

    pub fn can_advance(&self) -> bool {
        self.wizard.can_advance()
    }

    pub fn active(&self) -> &ActiveSection {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveSection {
        &mut self.active
    }

    /// Saves whichever section is mounted.
    pub async fn save(&mut self) -> Result<(), SectionError> {
        match &mut self.active {
            ActiveSection::Personal(c) => c.save().await,
            ActiveSection::Summary(c) => c.save().await,
            ActiveSection::Experience(c) => c.save().await,
            ActiveSection::Education(c) => c.save().await,
            ActiveSection::Skills(c) => c.save().await,
            ActiveSection::Projects(c) => c.save().await,
            ActiveSection::Certifications(c) => c.save().await,
            ActiveSection::HobbiesLanguages(c) => c.save().await,
        }
    }

    /// Runs AI assist on the mounted section. For the summary this produces
    /// the options to pick from; `index` is ignored there.
    pub async fn assist(&mut self, index: usize, field: &str) -> Result<(), SectionError> {
        let generator = Arc::clone(&self.generator);
        let generator = generator.as_ref();
        match &mut self.active {
            ActiveSection::Summary(c) => c.generate_options(generator).await.map(|_| ()),
            ActiveSection::Experience(c) => c.generate_assisted(index, field, generator).await,
            ActiveSection::Education(c) => c.generate_assisted(index, field, generator).await,
            ActiveSection::Projects(c) => c.generate_assisted(index, field, generator).await,
            ActiveSection::Certifications(c) => {
                c.generate_assisted(index, field, generator).await
            }
            _ => Err(SectionError::NotAssisted {
                field: field.to_string(),
            }),
        }
    }

    pub fn next(&mut self) -> Result<Step, NavError> {
        let step = self.wizard.next()?;
        self.active.unmount();
        if let Step::Section(section) = step {
            self.active = ActiveSection::mount(section, self.ctx.clone());
        }
        Ok(step)
    }

    pub fn prev(&mut self) -> Result<WizardSection, NavError> {
        let section = self.wizard.prev()?;
        self.active.unmount();
        self.active = ActiveSection::mount(section, self.ctx.clone());
        Ok(section)
    }

    /// The live preview of the shared document.
    pub fn preview(&self) -> VisualTree {
        self.ctx.document.with(layout::render)
    }

    /// Switches the layout right away and persists it; a failed write
    /// restores the previous layout.
    pub async fn set_layout(&self, layout: LayoutId) -> Result<(), SectionError> {
        let previous = self.ctx.document.with(|doc| doc.layout);
        self.persist_preference(
            SectionPatch::Layout(layout),
            SectionPatch::Layout(previous),
            ResumePatch {
                layout: Some(layout.as_str().to_string()),
                ..ResumePatch::default()
            },
        )
        .await
    }

    pub async fn set_theme_color(&self, color: &str) -> Result<(), SectionError> {
        let color = color.trim();
        if !is_color_token(color) {
            return Err(SectionError::InvalidColor(color.to_string()));
        }
        let previous = self.ctx.document.with(|doc| doc.theme_color.clone());
        self.persist_preference(
            SectionPatch::ThemeColor(color.to_string()),
            SectionPatch::ThemeColor(previous),
            ResumePatch {
                theme_color: Some(color.to_string()),
                ..ResumePatch::default()
            },
        )
        .await
    }

    pub async fn set_hr_lines(&self, enabled: bool) -> Result<(), SectionError> {
        let previous = self.ctx.document.with(|doc| doc.enable_hr_lines);
        self.persist_preference(
            SectionPatch::HrLines(enabled),
            SectionPatch::HrLines(previous),
            ResumePatch {
                enable_hr_lines: Some(enabled),
                ..ResumePatch::default()
            },
        )
        .await
    }

    async fn persist_preference(
        &self,
        apply: SectionPatch,
        rollback: SectionPatch,
        patch: ResumePatch,
    ) -> Result<(), SectionError> {
        if !self.ctx.document.merge(apply) {
            return Ok(());
        }
        match self.ctx.store.update_fields(self.ctx.document_id, &patch).await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(document_id = %self.ctx.document_id, "Failed to save preference, rolling back: {e}");
                self.ctx.document.merge(rollback);
                Err(e.into())
            }
        }
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        self.active.unmount();
    }
}
