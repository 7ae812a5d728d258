use tracing::{error, info, warn};

use super::{FieldValue, SectionContext, SectionError, SectionStatus, Violation};
use crate::document::SectionPatch;
use crate::models::resume::{PersonalDetails, ResumePatch};

pub const PERSONAL_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "jobTitle",
    "address",
    "phone",
    "email",
];

/// Name, title and contact details. Every field is required.
pub struct PersonalController {
    ctx: SectionContext,
    details: PersonalDetails,
    status: SectionStatus,
    mounted: bool,
}

impl PersonalController {
    pub fn mount(ctx: SectionContext) -> Self {
        let details = ctx.document.with(|doc| doc.personal.clone());
        Self {
            ctx,
            details,
            status: SectionStatus::Clean,
            mounted: true,
        }
    }

    pub fn details(&self) -> &PersonalDetails {
        &self.details
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    pub fn update_field(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), SectionError> {
        if !self.mounted {
            return Err(SectionError::Unmounted);
        }
        let field = PERSONAL_FIELDS
            .iter()
            .copied()
            .find(|name| *name == field)
            .ok_or_else(|| SectionError::UnknownField {
                section: "personal",
                field: field.to_string(),
            })?;
        let value = value.into().into_text(field)?;
        let details = &mut self.details;
        match field {
            "firstName" => details.first_name = value,
            "lastName" => details.last_name = value,
            "jobTitle" => details.job_title = value,
            "address" => details.address = value,
            "phone" => details.phone = value,
            _ => details.email = value,
        }
        self.status = SectionStatus::Dirty;
        self.ctx.gate.close();
        self.ctx.document.merge(SectionPatch::Personal(self.details.clone()));
        Ok(())
    }

    pub fn validate(&self) -> Vec<Violation> {
        missing_personal_fields(&self.details)
            .into_iter()
            .map(|field| Violation { index: None, field })
            .collect()
    }

    pub async fn save(&mut self) -> Result<(), SectionError> {
        if !self.mounted {
            return Err(SectionError::Unmounted);
        }
        self.ctx.gate.close();
        if let Some(violation) = self.validate().into_iter().next() {
            warn!(section = "personal", "Save rejected: {violation}");
            return Err(SectionError::Validation(violation));
        }

        let patch = ResumePatch::personal(&self.details);
        match self.ctx.store.update_fields(self.ctx.document_id, &patch).await {
            Ok(()) => {
                self.status = SectionStatus::Saved;
                self.ctx.gate.open();
                info!(section = "personal", document_id = %self.ctx.document_id, "Section saved");
                Ok(())
            }
            Err(e) => {
                self.status = SectionStatus::Dirty;
                error!(section = "personal", document_id = %self.ctx.document_id, "Failed to save section: {e}");
                Err(e.into())
            }
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

pub fn missing_personal_fields(details: &PersonalDetails) -> Vec<&'static str> {
    [
        ("firstName", &details.first_name),
        ("lastName", &details.last_name),
        ("jobTitle", &details.job_title),
        ("address", &details.address),
        ("phone", &details.phone),
        ("email", &details.email),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect()
}
