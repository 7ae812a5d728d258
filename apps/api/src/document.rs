//! Shared resume document: the single source of truth for one edit session.
//!
//! Section controllers and the preview hold clones of a [`DocumentHandle`].
//! Every write goes through [`DocumentHandle::merge`], which touches exactly
//! one section and reports whether anything changed.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::models::resume::{
    Certification, Education, Experience, LayoutId, PersonalDetails, Project, ResumeDocument, Skill,
};

/// A write into one section of the shared document.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPatch {
    Personal(PersonalDetails),
    Summary(String),
    Experience(Vec<Experience>),
    Education(Vec<Education>),
    Skills(Vec<Skill>),
    Projects(Vec<Project>),
    Certifications(Vec<Certification>),
    Hobbies(Vec<String>),
    Languages(Vec<String>),
    ThemeColor(String),
    Layout(LayoutId),
    HrLines(bool),
}

impl SectionPatch {
    fn name(&self) -> &'static str {
        match self {
            SectionPatch::Personal(_) => "personal",
            SectionPatch::Summary(_) => "summary",
            SectionPatch::Experience(_) => "experience",
            SectionPatch::Education(_) => "education",
            SectionPatch::Skills(_) => "skills",
            SectionPatch::Projects(_) => "projects",
            SectionPatch::Certifications(_) => "certifications",
            SectionPatch::Hobbies(_) => "hobbies",
            SectionPatch::Languages(_) => "languages",
            SectionPatch::ThemeColor(_) => "themeColor",
            SectionPatch::Layout(_) => "layout",
            SectionPatch::HrLines(_) => "enableHrLines",
        }
    }
}

#[derive(Debug)]
struct Shared {
    document: ResumeDocument,
    revision: u64,
}

#[derive(Debug, Clone)]
pub struct DocumentHandle {
    inner: Arc<RwLock<Shared>>,
}

/// Writes `value` into `slot` when it differs. Returns whether it did.
fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl DocumentHandle {
    pub fn new(document: ResumeDocument) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Shared {
                document,
                revision: 0,
            })),
        }
    }

    // A panic while holding the lock cannot leave the document half-written:
    // merge replaces whole fields. Recover the guard instead of propagating.
    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A copy of the current document.
    pub fn snapshot(&self) -> ResumeDocument {
        self.read().document.clone()
    }

    /// Reads the document without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&ResumeDocument) -> R) -> R {
        f(&self.read().document)
    }

    /// Bumped on every merge that changed something.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    /// Merges one section into the document. Equal values are not written.
    pub fn merge(&self, patch: SectionPatch) -> bool {
        let name = patch.name();
        let mut shared = self.write();
        let doc = &mut shared.document;
        let changed = match patch {
            SectionPatch::Personal(value) => replace_if_changed(&mut doc.personal, value),
            SectionPatch::Summary(value) => replace_if_changed(&mut doc.summary, value),
            SectionPatch::Experience(value) => replace_if_changed(&mut doc.experience, value),
            SectionPatch::Education(value) => replace_if_changed(&mut doc.education, value),
            SectionPatch::Skills(value) => replace_if_changed(&mut doc.skills, value),
            SectionPatch::Projects(value) => replace_if_changed(&mut doc.projects, value),
            SectionPatch::Certifications(value) => {
                replace_if_changed(&mut doc.certifications, value)
            }
            SectionPatch::Hobbies(value) => replace_if_changed(&mut doc.hobbies, value),
            SectionPatch::Languages(value) => replace_if_changed(&mut doc.languages, value),
            SectionPatch::ThemeColor(value) => replace_if_changed(&mut doc.theme_color, value),
            SectionPatch::Layout(value) => replace_if_changed(&mut doc.layout, value),
            SectionPatch::HrLines(value) => replace_if_changed(&mut doc.enable_hr_lines, value),
        };
        if changed {
            shared.revision += 1;
            debug!(section = name, revision = shared.revision, "Merged into shared document");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn handle() -> DocumentHandle {
        DocumentHandle::new(ResumeDocument::new(Uuid::new_v4(), "Backend"))
    }

    #[test]
    fn test_merge_writes_and_bumps_revision() {
        let doc = handle();
        let skills = vec![Skill { name: "Go".into() }];
        assert!(doc.merge(SectionPatch::Skills(skills.clone())));
        assert_eq!(doc.revision(), 1);
        assert_eq!(doc.snapshot().skills, skills);
    }

    #[test]
    fn test_merge_equal_value_is_a_no_op() {
        let doc = handle();
        assert!(doc.merge(SectionPatch::Summary("Builder".into())));
        assert!(!doc.merge(SectionPatch::Summary("Builder".into())));
        assert_eq!(doc.revision(), 1);
    }

    #[test]
    fn test_merge_touches_only_its_section() {
        let doc = handle();
        let before = doc.snapshot();
        doc.merge(SectionPatch::Hobbies(vec!["Chess".into()]));
        let after = doc.snapshot();
        assert_eq!(after.experience, before.experience);
        assert_eq!(after.summary, before.summary);
        assert_eq!(after.hobbies, vec!["Chess".to_string()]);
    }

    #[test]
    fn test_clones_share_state() {
        let doc = handle();
        let other = doc.clone();
        other.merge(SectionPatch::Layout(LayoutId::CleanSectioned));
        assert_eq!(doc.with(|d| d.layout), LayoutId::CleanSectioned);
    }
}
