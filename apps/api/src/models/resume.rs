use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Theme color applied when a record carries none.
pub const DEFAULT_THEME_COLOR: &str = "#1E293B";

/// Colors offered by the theme picker.
pub const THEME_PALETTE: &[&str] = &[
    "#1E293B", "#2563EB", "#059669", "#10B981", "#6B7280", "#F59E0B", "#8B5CF6", "#F97316",
    "#EF4444", "#3B82F6", "#14B8A6", "#4B5563", "#64748B", "#16A34A", "#0EA5E9", "#E11D48",
    "#9333EA", "#7C3AED", "#EAB308", "#6EE7B7",
];

/// Returns true for `#RRGGBB` color tokens.
pub fn is_color_token(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

// ────────────────────────────────────────────────────────────────────────────
// Layout identifiers
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of preview arrangements. Unknown identifiers resolve to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum LayoutId {
    #[default]
    Default,
    TopSummary,
    RightSidebar,
    ExperientialFocus,
    TwoColumnEqual,
    MainContentCentric,
    CleanSectioned,
}

impl LayoutId {
    pub const ALL: [LayoutId; 7] = [
        LayoutId::Default,
        LayoutId::TopSummary,
        LayoutId::RightSidebar,
        LayoutId::ExperientialFocus,
        LayoutId::TwoColumnEqual,
        LayoutId::MainContentCentric,
        LayoutId::CleanSectioned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutId::Default => "default",
            LayoutId::TopSummary => "layout-top-summary",
            LayoutId::RightSidebar => "layout-right-sidebar",
            LayoutId::ExperientialFocus => "layout-experiential-focus",
            LayoutId::TwoColumnEqual => "layout-two-column-equal",
            LayoutId::MainContentCentric => "layout-main-content-centric",
            LayoutId::CleanSectioned => "layout-clean-sectioned",
        }
    }

    /// Resolves an identifier, falling back to the default layout.
    pub fn resolve(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .unwrap_or_default()
    }
}

impl From<Option<String>> for LayoutId {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(LayoutId::resolve).unwrap_or_default()
    }
}

impl From<LayoutId> for &'static str {
    fn from(value: LayoutId) -> Self {
        value.as_str()
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub title: String,
    pub company_name: String,
    pub city: String,
    pub state: String,
    pub start_date: String,
    pub end_date: String,
    pub currently_working: bool,
    /// Rich-text markup.
    pub work_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub university_name: String,
    pub degree: String,
    pub major: String,
    pub start_date: String,
    pub end_date: String,
    /// Rich-text markup.
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub tech_stack: String,
    /// Rich-text markup.
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub title: String,
    pub issuer: String,
    pub year: String,
    /// Rich-text markup.
    pub description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Resume document
// ────────────────────────────────────────────────────────────────────────────

/// The complete decoded resume shared by every section and the preview.
///
/// List fields accept either a JSON array or a JSON-encoded string when
/// deserialized; malformed input decodes to an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub document_id: Uuid,
    #[serde(default)]
    pub resume_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub personal: PersonalDetails,
    #[serde(default)]
    pub summary: String,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default)]
    pub layout: LayoutId,
    #[serde(default)]
    pub enable_hr_lines: bool,
    #[serde(default, deserialize_with = "tolerant::experience")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "tolerant::education")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "tolerant::skills")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "tolerant::projects")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "tolerant::certifications")]
    pub certifications: Vec<Certification>,
    #[serde(default, deserialize_with = "tolerant::hobbies")]
    pub hobbies: Vec<String>,
    #[serde(default, deserialize_with = "tolerant::languages")]
    pub languages: Vec<String>,
}

/// Per-field `deserialize_with` adapters so decode failures name their column.
mod tolerant {
    use serde::{de::DeserializeOwned, Deserializer};

    macro_rules! list_fields {
        ($($field:ident),* $(,)?) => {
            $(
                pub fn $field<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
                where
                    D: Deserializer<'de>,
                    T: DeserializeOwned,
                {
                    crate::codec::tolerant(stringify!($field), deserializer)
                }
            )*
        };
    }

    list_fields!(experience, education, skills, projects, certifications, hobbies, languages);
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

impl ResumeDocument {
    /// An empty document with no section data at all.
    pub fn empty(document_id: Uuid) -> Self {
        Self {
            document_id,
            resume_id: String::new(),
            title: String::new(),
            personal: PersonalDetails::default(),
            summary: String::new(),
            theme_color: default_theme_color(),
            layout: LayoutId::Default,
            enable_hr_lines: false,
            experience: vec![],
            education: vec![],
            skills: vec![],
            projects: vec![],
            certifications: vec![],
            hobbies: vec![],
            languages: vec![],
        }
    }

    /// A freshly started resume: one blank entry per record section.
    pub fn new(document_id: Uuid, title: &str) -> Self {
        Self {
            title: title.to_string(),
            experience: vec![Experience::default()],
            education: vec![Education::default()],
            skills: vec![Skill::default()],
            projects: vec![Project::default()],
            certifications: vec![Certification::default()],
            ..Self::empty(document_id)
        }
    }

    pub fn full_name(&self) -> String {
        [self.personal.first_name.trim(), self.personal.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store boundary types
// ────────────────────────────────────────────────────────────────────────────

/// Metadata supplied when a resume is started.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMeta {
    pub title: String,
    pub user_email: String,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResume {
    pub document_id: Uuid,
    pub resume_id: Uuid,
}

/// One row of the owner's resume listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub document_id: Uuid,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// A partial write. `None` leaves the stored column untouched; list fields
/// travel JSON-encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_hr_lines: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
}

impl ResumePatch {
    pub fn personal(details: &PersonalDetails) -> Self {
        Self {
            first_name: Some(details.first_name.clone()),
            last_name: Some(details.last_name.clone()),
            job_title: Some(details.job_title.clone()),
            address: Some(details.address.clone()),
            phone: Some(details.phone.clone()),
            email: Some(details.email.clone()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_resolve_known_ids() {
        for id in LayoutId::ALL {
            assert_eq!(LayoutId::resolve(id.as_str()), id);
        }
    }

    #[test]
    fn test_layout_resolve_unknown_falls_back() {
        assert_eq!(LayoutId::resolve("layout-brutalist"), LayoutId::Default);
        assert_eq!(LayoutId::resolve(""), LayoutId::Default);
    }

    #[test]
    fn test_layout_deserializes_unknown_as_default() {
        let id: LayoutId = serde_json::from_str("\"nope\"").unwrap();
        assert_eq!(id, LayoutId::Default);
        let id: LayoutId = serde_json::from_str("null").unwrap();
        assert_eq!(id, LayoutId::Default);
        assert_eq!(
            serde_json::to_string(&LayoutId::CleanSectioned).unwrap(),
            "\"layout-clean-sectioned\""
        );
    }

    #[test]
    fn test_color_token() {
        assert!(is_color_token("#1E293B"));
        assert!(is_color_token("#abcdef"));
        assert!(!is_color_token("1E293B"));
        assert!(!is_color_token("#12345"));
        assert!(!is_color_token("#GGGGGG"));
        assert!(THEME_PALETTE.iter().all(|c| is_color_token(c)));
    }

    #[test]
    fn test_document_accepts_encoded_and_decoded_lists() {
        let id = Uuid::new_v4();
        let raw = serde_json::json!({
            "documentId": id,
            "firstName": "Ada",
            "skills": "[{\"name\":\"Go\"}]",
            "languages": ["English"],
            "education": "{not json",
            "layout": "mystery"
        });
        let doc: ResumeDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.personal.first_name, "Ada");
        assert_eq!(doc.skills, vec![Skill { name: "Go".into() }]);
        assert_eq!(doc.languages, vec!["English".to_string()]);
        assert!(doc.education.is_empty());
        assert_eq!(doc.layout, LayoutId::Default);
        assert_eq!(doc.theme_color, DEFAULT_THEME_COLOR);
    }

    #[test]
    fn test_document_tolerates_null_layout_and_members() {
        let raw = serde_json::json!({
            "documentId": Uuid::new_v4(),
            "layout": null,
            "experience": [
                { "title": "Engineer", "companyName": "Acme", "city": null },
                { "title": "Lead", "currentlyWorking": true }
            ]
        });
        let doc: ResumeDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.layout, LayoutId::Default);
        assert_eq!(doc.experience.len(), 2);
        assert_eq!(doc.experience[0].city, "");
        assert!(doc.experience[1].currently_working);
    }

    #[test]
    fn test_new_document_seeds_record_sections() {
        let doc = ResumeDocument::new(Uuid::new_v4(), "Backend");
        assert_eq!(doc.experience.len(), 1);
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.skills.len(), 1);
        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.certifications.len(), 1);
        assert!(doc.hobbies.is_empty());
        assert!(doc.languages.is_empty());
    }

    #[test]
    fn test_full_name_skips_blanks() {
        let mut doc = ResumeDocument::empty(Uuid::new_v4());
        doc.personal.last_name = "Lovelace".into();
        assert_eq!(doc.full_name(), "Lovelace");
        doc.personal.first_name = "Ada".into();
        assert_eq!(doc.full_name(), "Ada Lovelace");
    }
}
