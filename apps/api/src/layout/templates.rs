//! The layout catalogue: one static arrangement per layout identifier.
//!
//! Adding a layout means adding a table row; the renderer has no
//! per-layout control flow.

use serde::Serialize;

use crate::models::resume::LayoutId;

/// One section block in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionTag {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Hobbies,
}

/// How separator rules are drawn when rule lines are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleStyle {
    Standard,
    /// Heavier rules between every block.
    Emphasized,
    /// Never draws rules.
    None,
}

/// A grid column: how many grid tracks it spans and its blocks, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub span: u8,
    pub sections: &'static [SectionTag],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTemplate {
    pub id: LayoutId,
    pub name: &'static str,
    pub description: &'static str,
    /// Full-width band above the columns.
    pub header: &'static [SectionTag],
    pub centered_header: bool,
    pub grid_columns: u8,
    pub columns: &'static [Column],
    pub rules: RuleStyle,
}

use SectionTag::*;

pub static TEMPLATES: [LayoutTemplate; 7] = [
    LayoutTemplate {
        id: LayoutId::Default,
        name: "Default",
        description: "Contact details and skills in a left sidebar, experience in the main column.",
        header: &[],
        centered_header: false,
        grid_columns: 3,
        columns: &[
            Column {
                span: 1,
                sections: &[Personal, Skills, Languages, Hobbies],
            },
            Column {
                span: 2,
                sections: &[Summary, Experience, Education, Projects, Certifications],
            },
        ],
        rules: RuleStyle::Standard,
    },
    LayoutTemplate {
        id: LayoutId::TopSummary,
        name: "Top Summary",
        description: "Header with name and summary, then two equal columns.",
        header: &[Personal, Summary],
        centered_header: false,
        grid_columns: 2,
        columns: &[
            Column {
                span: 1,
                sections: &[Experience, Education, Projects],
            },
            Column {
                span: 1,
                sections: &[Skills, Certifications, Languages, Hobbies],
            },
        ],
        rules: RuleStyle::Standard,
    },
    LayoutTemplate {
        id: LayoutId::RightSidebar,
        name: "Right Sidebar",
        description: "Main content on the left, contact details and skills on the right.",
        header: &[],
        centered_header: false,
        grid_columns: 3,
        columns: &[
            Column {
                span: 2,
                sections: &[Summary, Experience, Education, Projects, Certifications],
            },
            Column {
                span: 1,
                sections: &[Personal, Skills, Languages, Hobbies],
            },
        ],
        rules: RuleStyle::Standard,
    },
    LayoutTemplate {
        id: LayoutId::ExperientialFocus,
        name: "Experiential Focus",
        description: "Experience and projects lead the main column.",
        header: &[Personal, Summary],
        centered_header: false,
        grid_columns: 2,
        columns: &[
            Column {
                span: 1,
                sections: &[Experience, Projects, Education],
            },
            Column {
                span: 1,
                sections: &[Skills, Certifications, Languages, Hobbies],
            },
        ],
        rules: RuleStyle::Standard,
    },
    LayoutTemplate {
        id: LayoutId::TwoColumnEqual,
        name: "Two Column Equal",
        description: "Two balanced columns under a shared header.",
        header: &[Personal, Summary],
        centered_header: false,
        grid_columns: 2,
        columns: &[
            Column {
                span: 1,
                sections: &[Experience, Skills, Certifications],
            },
            Column {
                span: 1,
                sections: &[Education, Projects, Languages, Hobbies],
            },
        ],
        rules: RuleStyle::Standard,
    },
    LayoutTemplate {
        id: LayoutId::MainContentCentric,
        name: "Main Content Centric",
        description: "Centered header, wide main column, no separator lines.",
        header: &[Personal],
        centered_header: true,
        grid_columns: 3,
        columns: &[
            Column {
                span: 2,
                sections: &[Summary, Experience, Projects, Certifications],
            },
            Column {
                span: 1,
                sections: &[Skills, Education, Languages, Hobbies],
            },
        ],
        rules: RuleStyle::None,
    },
    LayoutTemplate {
        id: LayoutId::CleanSectioned,
        name: "Clean Sectioned",
        description: "A single column with clear separators between sections.",
        header: &[],
        centered_header: false,
        grid_columns: 1,
        columns: &[Column {
            span: 1,
            sections: &[
                Personal,
                Summary,
                Experience,
                Education,
                Skills,
                Projects,
                Certifications,
                Languages,
                Hobbies,
            ],
        }],
        rules: RuleStyle::Emphasized,
    },
];

/// The template for `id`. Every identifier has one.
pub fn template(id: LayoutId) -> &'static LayoutTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .unwrap_or(&TEMPLATES[0])
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_layout_has_a_template() {
        for id in LayoutId::ALL {
            assert_eq!(template(id).id, id);
        }
        assert_eq!(TEMPLATES.len(), LayoutId::ALL.len());
    }

    #[test]
    fn test_every_template_places_each_section_once() {
        for t in &TEMPLATES {
            let placed: Vec<SectionTag> = t
                .header
                .iter()
                .chain(t.columns.iter().flat_map(|c| c.sections.iter()))
                .copied()
                .collect();
            let unique: HashSet<_> = placed.iter().collect();
            assert_eq!(placed.len(), 9, "{} places {} blocks", t.name, placed.len());
            assert_eq!(unique.len(), 9, "{} repeats a block", t.name);
        }
    }

    #[test]
    fn test_column_spans_fill_grid() {
        for t in &TEMPLATES {
            let spans: u8 = t.columns.iter().map(|c| c.span).sum();
            assert_eq!(spans, t.grid_columns, "{}", t.name);
        }
    }
}
