//! Validated section writes for callers outside an edit session.
//!
//! Mirrors what a controller's `save` sends: entries are normalized to their
//! storage form, checked against the section's required fields, encoded, and
//! turned into a patch touching only that section's columns.

use serde::Deserialize;
use serde_json::Value;

use super::personal::missing_personal_fields;
use super::{
    CertificationSchema, EducationSchema, ExperienceSchema, ProjectSchema, SectionError,
    SectionSchema, SkillSchema, Violation,
};
use crate::codec;
use crate::models::resume::{PersonalDetails, ResumePatch};

/// Section names accepted by [`section_patch`].
pub const WRITABLE_SECTIONS: &[&str] = &[
    "personal",
    "summary",
    "experience",
    "education",
    "skills",
    "projects",
    "certifications",
    "hobbies-languages",
];

/// Builds the store patch for writing `body` into `section`.
pub fn section_patch(section: &str, body: &Value) -> Result<ResumePatch, SectionError> {
    match section {
        "personal" => personal_patch(body),
        "summary" => summary_patch(body),
        "experience" => list_patch::<ExperienceSchema>(body),
        "education" => list_patch::<EducationSchema>(body),
        "skills" => list_patch::<SkillSchema>(body),
        "projects" => list_patch::<ProjectSchema>(body),
        "certifications" => list_patch::<CertificationSchema>(body),
        "hobbies-languages" => tags_patch(body),
        other => Err(SectionError::UnknownSection(other.to_string())),
    }
}

/// `body[S::KIND]` holds the list, as an array or a JSON-encoded string.
fn list_patch<S: SectionSchema>(body: &Value) -> Result<ResumePatch, SectionError> {
    let raw = body.get(S::KIND).unwrap_or(&Value::Null);
    let entries: Vec<S::Entry> = codec::decode(S::KIND, raw);
    if entries.is_empty() {
        return Err(SectionError::LastEntry { noun: S::NOUN });
    }

    let stored: Vec<S::Entry> = entries.iter().map(S::to_storage).collect();
    for (index, entry) in stored.iter().enumerate() {
        if let Some(field) = S::missing_fields(entry).into_iter().next() {
            return Err(SectionError::Validation(Violation {
                index: Some(index),
                field,
            }));
        }
        if let Some(value) = S::conflicts(&stored, index, entry) {
            return Err(SectionError::DuplicateValue { value });
        }
    }

    Ok(S::store_patch(codec::encode(&stored)?))
}

fn personal_patch(body: &Value) -> Result<ResumePatch, SectionError> {
    let details = PersonalDetails::deserialize(body)?;
    if let Some(field) = missing_personal_fields(&details).into_iter().next() {
        return Err(SectionError::Validation(Violation { index: None, field }));
    }
    Ok(ResumePatch::personal(&details))
}

fn summary_patch(body: &Value) -> Result<ResumePatch, SectionError> {
    let summary = body
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if summary.is_empty() {
        return Err(SectionError::Validation(Violation {
            index: None,
            field: "summary",
        }));
    }
    Ok(ResumePatch {
        summary: Some(summary.to_string()),
        ..ResumePatch::default()
    })
}

fn tags_patch(body: &Value) -> Result<ResumePatch, SectionError> {
    let mut patch = ResumePatch::default();
    for (field, slot) in [("hobbies", &mut patch.hobbies), ("languages", &mut patch.languages)] {
        let raw = body.get(field).unwrap_or(&Value::Null);
        let mut tags: Vec<String> = Vec::new();
        for tag in codec::decode::<String>(field, raw) {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_string());
            }
        }
        *slot = Some(codec::encode(&tags)?);
    }
    Ok(patch)
}
