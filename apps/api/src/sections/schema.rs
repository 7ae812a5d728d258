//! Per-section schemas for the generic list controller.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

use super::{prompts, FieldValue, SectionError};
use crate::dates;
use crate::document::SectionPatch;
use crate::models::resume::{
    Certification, Education, Experience, Project, ResumeDocument, ResumePatch, Skill,
};

/// Field names, defaults, validation, date handling and the optional AI
/// prompt for one list-of-record section.
///
/// The controller edits entries in display form; the shared document and the
/// store hold storage form. `to_display` and `to_storage` convert between them.
pub trait SectionSchema: Send + Sync + 'static {
    type Entry: Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync;

    /// Store column and log field name.
    const KIND: &'static str;
    /// Human name of one entry, used in user-facing messages.
    const NOUN: &'static str;
    const FIELDS: &'static [&'static str];
    /// The field filled by text generation, if any.
    const ASSISTED_FIELD: Option<&'static str> = None;

    fn set_field(
        entry: &mut Self::Entry,
        field: &str,
        value: FieldValue,
    ) -> Result<(), SectionError>;

    /// Required fields left empty, in field order.
    fn missing_fields(entry: &Self::Entry) -> Vec<&'static str>;

    fn to_display(entry: Self::Entry) -> Self::Entry {
        entry
    }

    fn to_storage(entry: &Self::Entry) -> Self::Entry {
        entry.clone()
    }

    /// Prompt for the assisted field. Fails when the entry lacks the context
    /// the prompt needs.
    fn assist_prompt(_entry: &Self::Entry) -> Result<String, SectionError> {
        Err(SectionError::NotAssisted {
            field: Self::ASSISTED_FIELD.unwrap_or_default().to_string(),
        })
    }

    /// A value `candidate` would duplicate if written at `index`.
    fn conflicts(_list: &[Self::Entry], _index: usize, _candidate: &Self::Entry) -> Option<String> {
        None
    }

    fn stored(doc: &ResumeDocument) -> &[Self::Entry];

    fn patch(list: Vec<Self::Entry>) -> SectionPatch;

    fn store_patch(encoded: String) -> ResumePatch;
}

/// Canonical field name for `field`, or `UnknownField`.
fn field_name<S: SectionSchema>(field: &str) -> Result<&'static str, SectionError> {
    S::FIELDS
        .iter()
        .copied()
        .find(|name| *name == field)
        .ok_or_else(|| SectionError::UnknownField {
            section: S::KIND,
            field: field.to_string(),
        })
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Collects `name` for every `(name, value)` pair whose value is blank.
fn blanks<V: AsRef<str>>(pairs: &[(&'static str, V)]) -> Vec<&'static str> {
    pairs
        .iter()
        .filter(|(_, value)| blank(value.as_ref()))
        .map(|(name, _)| *name)
        .collect()
}

fn require(value: &str, field: &'static str) -> Result<(), SectionError> {
    if blank(value) {
        return Err(SectionError::MissingContext { field });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

pub struct ExperienceSchema;

impl SectionSchema for ExperienceSchema {
    type Entry = Experience;

    const KIND: &'static str = "experience";
    const NOUN: &'static str = "work experience";
    const FIELDS: &'static [&'static str] = &[
        "title",
        "companyName",
        "city",
        "state",
        "startDate",
        "endDate",
        "currentlyWorking",
        "workSummary",
    ];
    const ASSISTED_FIELD: Option<&'static str> = Some("workSummary");

    fn set_field(
        entry: &mut Experience,
        field: &str,
        value: FieldValue,
    ) -> Result<(), SectionError> {
        let field = field_name::<Self>(field)?;
        match field {
            "title" => entry.title = value.into_text(field)?,
            "companyName" => entry.company_name = value.into_text(field)?,
            "city" => entry.city = value.into_text(field)?,
            "state" => entry.state = value.into_text(field)?,
            "startDate" => entry.start_date = value.into_text(field)?,
            "endDate" => entry.end_date = value.into_text(field)?,
            "currentlyWorking" => {
                entry.currently_working = value.into_flag(field)?;
                if entry.currently_working {
                    entry.end_date.clear();
                }
            }
            _ => entry.work_summary = value.into_text(field)?,
        }
        Ok(())
    }

    fn missing_fields(entry: &Experience) -> Vec<&'static str> {
        let mut missing = blanks(&[
            ("title", &entry.title),
            ("companyName", &entry.company_name),
            ("startDate", &entry.start_date),
        ]);
        if !entry.currently_working && blank(&entry.end_date) {
            missing.push("endDate");
        }
        missing
    }

    fn to_display(entry: Experience) -> Experience {
        Experience {
            start_date: dates::month_for_display(&entry.start_date),
            end_date: if entry.currently_working {
                String::new()
            } else {
                dates::month_for_display(&entry.end_date)
            },
            ..entry
        }
    }

    fn to_storage(entry: &Experience) -> Experience {
        Experience {
            start_date: dates::month_for_storage(&entry.start_date, false),
            end_date: dates::month_for_storage(&entry.end_date, entry.currently_working),
            ..entry.clone()
        }
    }

    fn assist_prompt(entry: &Experience) -> Result<String, SectionError> {
        require(&entry.title, "title")?;
        require(&entry.company_name, "companyName")?;
        Ok(prompts::experience_summary(&entry.title, &entry.company_name))
    }

    fn stored(doc: &ResumeDocument) -> &[Experience] {
        &doc.experience
    }

    fn patch(list: Vec<Experience>) -> SectionPatch {
        SectionPatch::Experience(list)
    }

    fn store_patch(encoded: String) -> ResumePatch {
        ResumePatch {
            experience: Some(encoded),
            ..ResumePatch::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

pub struct EducationSchema;

impl SectionSchema for EducationSchema {
    type Entry = Education;

    const KIND: &'static str = "education";
    const NOUN: &'static str = "education entry";
    const FIELDS: &'static [&'static str] = &[
        "universityName",
        "degree",
        "major",
        "startDate",
        "endDate",
        "description",
    ];
    const ASSISTED_FIELD: Option<&'static str> = Some("description");

    fn set_field(
        entry: &mut Education,
        field: &str,
        value: FieldValue,
    ) -> Result<(), SectionError> {
        let field = field_name::<Self>(field)?;
        let value = value.into_text(field)?;
        match field {
            "universityName" => entry.university_name = value,
            "degree" => entry.degree = value,
            "major" => entry.major = value,
            "startDate" => entry.start_date = value,
            "endDate" => entry.end_date = value,
            _ => entry.description = value,
        }
        Ok(())
    }

    fn missing_fields(entry: &Education) -> Vec<&'static str> {
        blanks(&[
            ("universityName", &entry.university_name),
            ("degree", &entry.degree),
            ("major", &entry.major),
            ("startDate", &entry.start_date),
            ("endDate", &entry.end_date),
        ])
    }

    fn to_display(entry: Education) -> Education {
        Education {
            start_date: dates::year_for_display(&entry.start_date),
            end_date: dates::year_for_display(&entry.end_date),
            ..entry
        }
    }

    fn to_storage(entry: &Education) -> Education {
        Education {
            start_date: dates::year_for_storage(&entry.start_date),
            end_date: dates::year_for_storage(&entry.end_date),
            ..entry.clone()
        }
    }

    fn assist_prompt(entry: &Education) -> Result<String, SectionError> {
        require(&entry.university_name, "universityName")?;
        require(&entry.degree, "degree")?;
        Ok(prompts::education_description(
            &entry.degree,
            &entry.major,
            &entry.university_name,
        ))
    }

    fn stored(doc: &ResumeDocument) -> &[Education] {
        &doc.education
    }

    fn patch(list: Vec<Education>) -> SectionPatch {
        SectionPatch::Education(list)
    }

    fn store_patch(encoded: String) -> ResumePatch {
        ResumePatch {
            education: Some(encoded),
            ..ResumePatch::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

pub struct SkillSchema;

impl SectionSchema for SkillSchema {
    type Entry = Skill;

    const KIND: &'static str = "skills";
    const NOUN: &'static str = "skill";
    const FIELDS: &'static [&'static str] = &["name"];

    fn set_field(entry: &mut Skill, field: &str, value: FieldValue) -> Result<(), SectionError> {
        let field = field_name::<Self>(field)?;
        entry.name = value.into_text(field)?;
        Ok(())
    }

    fn missing_fields(entry: &Skill) -> Vec<&'static str> {
        blanks(&[("name", &entry.name)])
    }

    fn to_storage(entry: &Skill) -> Skill {
        Skill {
            name: entry.name.trim().to_string(),
        }
    }

    fn conflicts(list: &[Skill], index: usize, candidate: &Skill) -> Option<String> {
        let name = candidate.name.trim();
        if name.is_empty() {
            return None;
        }
        list.iter()
            .enumerate()
            .any(|(i, skill)| i != index && skill.name.trim().eq_ignore_ascii_case(name))
            .then(|| name.to_string())
    }

    fn stored(doc: &ResumeDocument) -> &[Skill] {
        &doc.skills
    }

    fn patch(list: Vec<Skill>) -> SectionPatch {
        SectionPatch::Skills(list)
    }

    fn store_patch(encoded: String) -> ResumePatch {
        ResumePatch {
            skills: Some(encoded),
            ..ResumePatch::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

pub struct ProjectSchema;

impl SectionSchema for ProjectSchema {
    type Entry = Project;

    const KIND: &'static str = "projects";
    const NOUN: &'static str = "project entry";
    const FIELDS: &'static [&'static str] = &["title", "techStack", "description", "link"];
    const ASSISTED_FIELD: Option<&'static str> = Some("description");

    fn set_field(entry: &mut Project, field: &str, value: FieldValue) -> Result<(), SectionError> {
        let field = field_name::<Self>(field)?;
        let value = value.into_text(field)?;
        match field {
            "title" => entry.title = value,
            "techStack" => entry.tech_stack = value,
            "description" => entry.description = value,
            _ => entry.link = value,
        }
        Ok(())
    }

    fn missing_fields(entry: &Project) -> Vec<&'static str> {
        blanks(&[("title", &entry.title), ("description", &entry.description)])
    }

    fn assist_prompt(entry: &Project) -> Result<String, SectionError> {
        require(&entry.title, "title")?;
        Ok(prompts::project_description(&entry.title, &entry.tech_stack))
    }

    fn stored(doc: &ResumeDocument) -> &[Project] {
        &doc.projects
    }

    fn patch(list: Vec<Project>) -> SectionPatch {
        SectionPatch::Projects(list)
    }

    fn store_patch(encoded: String) -> ResumePatch {
        ResumePatch {
            projects: Some(encoded),
            ..ResumePatch::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Certifications
// ────────────────────────────────────────────────────────────────────────────

pub struct CertificationSchema;

impl SectionSchema for CertificationSchema {
    type Entry = Certification;

    const KIND: &'static str = "certifications";
    const NOUN: &'static str = "certification entry";
    const FIELDS: &'static [&'static str] = &["title", "issuer", "year", "description"];
    const ASSISTED_FIELD: Option<&'static str> = Some("description");

    fn set_field(
        entry: &mut Certification,
        field: &str,
        value: FieldValue,
    ) -> Result<(), SectionError> {
        let field = field_name::<Self>(field)?;
        let value = value.into_text(field)?;
        match field {
            "title" => entry.title = value,
            "issuer" => entry.issuer = value,
            "year" => entry.year = value,
            _ => entry.description = value,
        }
        Ok(())
    }

    fn missing_fields(entry: &Certification) -> Vec<&'static str> {
        blanks(&[
            ("title", &entry.title),
            ("issuer", &entry.issuer),
            ("year", &entry.year),
        ])
    }

    fn assist_prompt(entry: &Certification) -> Result<String, SectionError> {
        require(&entry.title, "title")?;
        require(&entry.issuer, "issuer")?;
        Ok(prompts::certification_description(
            &entry.title,
            &entry.issuer,
            &entry.year,
        ))
    }

    fn stored(doc: &ResumeDocument) -> &[Certification] {
        &doc.certifications
    }

    fn patch(list: Vec<Certification>) -> SectionPatch {
        SectionPatch::Certifications(list)
    }

    fn store_patch(encoded: String) -> ResumePatch {
        ResumePatch {
            certifications: Some(encoded),
            ..ResumePatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::PRESENT;

    fn experience() -> Experience {
        Experience {
            title: "Engineer".into(),
            company_name: "Acme".into(),
            start_date: "2020-03-01".into(),
            end_date: "2022-01-01".into(),
            ..Experience::default()
        }
    }

    #[test]
    fn test_experience_requires_end_or_current() {
        let mut entry = experience();
        assert!(ExperienceSchema::missing_fields(&entry).is_empty());
        entry.end_date.clear();
        assert_eq!(ExperienceSchema::missing_fields(&entry), vec!["endDate"]);
        ExperienceSchema::set_field(&mut entry, "currentlyWorking", true.into()).unwrap();
        assert!(ExperienceSchema::missing_fields(&entry).is_empty());
    }

    #[test]
    fn test_experience_currently_working_stores_present() {
        let mut entry = experience();
        entry.currently_working = true;
        entry.end_date = "2030-01-01".into();
        let stored = ExperienceSchema::to_storage(&entry);
        assert_eq!(stored.end_date, PRESENT);
        assert_eq!(stored.start_date, "2020-03");
    }

    #[test]
    fn test_experience_display_clears_end_when_current() {
        let stored = Experience {
            start_date: "2021-06".into(),
            end_date: PRESENT.into(),
            currently_working: true,
            ..Experience::default()
        };
        let display = ExperienceSchema::to_display(stored);
        assert_eq!(display.start_date, "2021-06-01");
        assert_eq!(display.end_date, "");
    }

    #[test]
    fn test_checking_currently_working_clears_end_date() {
        let mut entry = experience();
        ExperienceSchema::set_field(&mut entry, "currentlyWorking", true.into()).unwrap();
        assert_eq!(entry.end_date, "");
    }

    #[test]
    fn test_unknown_field_and_wrong_type_rejected() {
        let mut entry = experience();
        assert!(matches!(
            ExperienceSchema::set_field(&mut entry, "salary", "1".into()),
            Err(SectionError::UnknownField { .. })
        ));
        assert!(matches!(
            ExperienceSchema::set_field(&mut entry, "title", true.into()),
            Err(SectionError::FieldType { field: "title", .. })
        ));
    }

    #[test]
    fn test_experience_prompt_needs_title_and_company() {
        let mut entry = experience();
        entry.company_name = " ".into();
        assert!(matches!(
            ExperienceSchema::assist_prompt(&entry),
            Err(SectionError::MissingContext { field: "companyName" })
        ));
    }

    #[test]
    fn test_education_dates_are_years() {
        let entry = Education {
            start_date: "2013-09-01".into(),
            end_date: "2017".into(),
            ..Education::default()
        };
        let stored = EducationSchema::to_storage(&entry);
        assert_eq!((stored.start_date.as_str(), stored.end_date.as_str()), ("2013", "2017"));
        let display = EducationSchema::to_display(stored);
        assert_eq!(display.start_date, "2013-01-01");
    }

    #[test]
    fn test_education_requires_all_but_description() {
        assert_eq!(
            EducationSchema::missing_fields(&Education::default()),
            vec!["universityName", "degree", "major", "startDate", "endDate"]
        );
    }

    #[test]
    fn test_skill_conflicts_ignore_case_and_own_index() {
        let list = vec![Skill { name: "Go".into() }, Skill { name: "".into() }];
        let candidate = Skill { name: "go ".into() };
        assert_eq!(SkillSchema::conflicts(&list, 1, &candidate), Some("go".into()));
        assert_eq!(SkillSchema::conflicts(&list, 0, &candidate), None);
    }

    #[test]
    fn test_project_and_certification_requirements() {
        assert_eq!(
            ProjectSchema::missing_fields(&Project::default()),
            vec!["title", "description"]
        );
        assert_eq!(
            CertificationSchema::missing_fields(&Certification::default()),
            vec!["title", "issuer", "year"]
        );
    }

    #[test]
    fn test_skills_are_not_assisted() {
        assert!(matches!(
            SkillSchema::assist_prompt(&Skill::default()),
            Err(SectionError::NotAssisted { .. })
        ));
    }
}
